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

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::common::{Reply, TypeKey};
use crate::message::{Context, Envelope};
use crate::traits::{Message, Request};

/// The object-safe dispatch surface of a mediator.
///
/// [`Mediator`](crate::common::Mediator) implements this trait. Application code
/// that only dispatches can depend on `&dyn MediatorInterface` (or an
/// `Arc<dyn MediatorInterface>`) instead, and tests can substitute their own
/// implementation.
///
/// The methods take type-erased values. Typed `send` and `send_event` calls are
/// provided for every implementor by [`MediatorInterfaceExt`].
#[async_trait]
pub trait MediatorInterface: Send + Sync {
    /// Sends the request in `request` to its handler, expecting a reply of
    /// `response_type`.
    ///
    /// An empty reply is converted to the response type's default by the caller.
    async fn dispatch(&self, ctx: &Context, request: Envelope, response_type: TypeKey) -> anyhow::Result<Reply>;

    /// Publishes the event in `event` to its listeners.
    async fn dispatch_event(&self, ctx: &Context, event: Envelope) -> anyhow::Result<()>;
}

/// Typed dispatch for every [`MediatorInterface`], including trait objects.
pub trait MediatorInterfaceExt: MediatorInterface {
    /// Sends `request` and converts the reply to `Resp`.
    ///
    /// An empty reply becomes `Resp::default()`; a reply of another type fails with
    /// [`MediatorError::UnexpectedReply`](crate::message::MediatorError::UnexpectedReply).
    fn send<Resp, R>(&self, ctx: &Context, request: R) -> impl Future<Output = anyhow::Result<Resp>> + Send
    where
        R: Request,
        Resp: Any + Send + Default,
    {
        async move {
            let request_type = TypeKey::of::<R>();
            self.dispatch(ctx, Envelope::new(Arc::new(request)), TypeKey::of::<Resp>())
                .await?
                .into_response(request_type)
        }
    }

    /// Publishes `event` to its listeners.
    fn send_event<E: Message>(&self, ctx: &Context, event: E) -> impl Future<Output = anyhow::Result<()>> + Send {
        async move { self.dispatch_event(ctx, Envelope::new(Arc::new(event))).await }
    }
}

impl<M: MediatorInterface + ?Sized> MediatorInterfaceExt for M {}
