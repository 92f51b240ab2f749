//! Defines the traits implemented by values that travel through the mediator.
//!
//! # Key Traits
//!
//! *   [`Message`]: A marker trait required for every request and event type.
//!     Ensures values are `Send`, `Sync`, `Debug` and support downcasting via `Any`.
//! *   [`Request`]: Implemented by values dispatched with
//!     [`Mediator::send`](crate::common::Mediator::send). Declares the behaviour
//!     targets the request satisfies.

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

// --- Public Re-exports ---
pub use mediator_interface::{MediatorInterface, MediatorInterfaceExt};
pub use message::Message;
pub use request::Request;

// --- Submodules ---

/// Defines [`MediatorInterface`] and its typed extension.
mod mediator_interface;
/// Defines [`Message`].
mod message;
/// Defines [`Request`].
mod request;
