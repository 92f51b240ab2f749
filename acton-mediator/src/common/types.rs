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

//! Defines common type aliases used within `acton-mediator`.
//!
//! Centralizes the future and type-erased function signatures shared by the
//! registries, the pipeline and the mediator.

use std::any::Any;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::common::{Next, Reply};
use crate::message::Context;

/// A pinned, boxed, `Send` future resolving to a pipeline [`Reply`].
///
/// This is the return type of [`Next::run`] and of the helper constructors on
/// [`Reply`] (`Reply::ready`, `Reply::fail`, ...).
pub type ReplyFuture = BoxFuture<'static, anyhow::Result<Reply>>;

/// A pinned, boxed, `Send` future resolving to the outcome of one event listener.
pub type EventFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Crate-internal: a request or event value with its concrete type erased.
pub(crate) type ErasedMessage = Arc<dyn Any + Send + Sync>;

/// Crate-internal: a request viewed as a behaviour target, i.e. a boxed `Arc<T>`.
pub(crate) type RequestView = Box<dyn Any + Send + Sync>;

/// Crate-internal: builds the view of an erased request for one behaviour target.
/// Returns `None` if the erased value is not the request type the cast was built for.
pub(crate) type ViewCast = Arc<dyn Fn(&ErasedMessage) -> Option<RequestView> + Send + Sync + 'static>;

/// Crate-internal: the type-erased signature of a registered request handler.
pub(crate) type HandlerFn = dyn Fn(Context, ErasedMessage) -> ReplyFuture + Send + Sync + 'static;

/// Crate-internal: the type-erased signature of a registered behaviour.
pub(crate) type BehaviourFn =
    dyn Fn(Context, RequestView, Next) -> ReplyFuture + Send + Sync + 'static;

/// Crate-internal: the type-erased signature of a registered event listener.
pub(crate) type ListenerFn = dyn Fn(Context, ErasedMessage) -> EventFuture + Send + Sync + 'static;
