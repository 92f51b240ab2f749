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

use crate::message::Targets;
use crate::traits::Message;

/// A value dispatched with [`Mediator::send`](crate::common::Mediator::send),
/// answered by exactly one handler.
///
/// The only item is [`behaviour_targets`](Request::behaviour_targets), which lists
/// the behaviour targets the request satisfies beyond its own type and
/// `dyn Message`. Most request types keep the empty default; the
/// `#[mediator_request]` attribute implements this trait for you.
///
/// ```rust,ignore
/// #[mediator_request(targets(dyn Audited))]
/// struct TransferFunds {
///     from: AccountId,
///     to: AccountId,
///     amount: u64,
/// }
/// ```
pub trait Request: Message + Sized {
    /// Declares additional behaviour targets for this request type.
    fn behaviour_targets(_targets: &mut Targets<Self>) {}
}
