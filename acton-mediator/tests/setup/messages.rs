/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */
#![allow(unused)]

use acton_mediator::prelude::*;

#[mediator_request]
pub struct Ping;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pong(pub String);

#[mediator_request]
pub struct Echo(pub String);

/// Never has a handler registered.
#[mediator_request]
pub struct Unhandled;

/// A capability some requests declare, so behaviours can target them as a group.
pub trait Audited: Message {
    fn actor(&self) -> &str;
}

#[mediator_request(targets(dyn Audited))]
pub struct TransferFunds {
    pub actor: String,
    pub amount: u64,
}

impl Audited for TransferFunds {
    fn actor(&self) -> &str {
        &self.actor
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferReceipt {
    pub amount: u64,
}

#[mediator_event]
pub struct UserRegistered {
    pub user_id: u64,
}

#[mediator_event]
pub struct OrderPlaced {
    pub order_id: u64,
}

/// An application error type, used to check errors come back unchanged.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("insufficient funds: needed {needed}")]
pub struct InsufficientFunds {
    pub needed: u64,
}
