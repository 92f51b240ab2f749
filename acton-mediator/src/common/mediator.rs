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

use std::any::{type_name, Any};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{FutureExt, TryFutureExt};
use static_assertions::assert_impl_all;
use tracing::{debug, error, instrument, trace};

use crate::common::config::{MediatorConfig, CONFIG};
use crate::common::logging;
use crate::common::pipeline::Pipeline;
use crate::common::registry::{
    BehaviourEntry, BehaviourRegistry, EventRegistry, HandlerEntry, HandlerRegistry,
    ListenerEntry,
};
use crate::common::{
    ErasedMessage, EventFuture, Next, Reply, ReplyFuture, RequestView, TypeKey,
};
use crate::message::{Context, Envelope, MediatorError, Targets};
use crate::traits::{MediatorInterface, Message, Request};

/// Routes requests to their handler through the matching behaviours, and events to
/// their listeners.
///
/// A `Mediator` is configured through `&mut self` and then used through `&self`.
/// Once setup is finished, wrap it in an [`Arc`] to dispatch from many tasks at once;
/// dispatch never mutates the registries and takes no locks.
///
/// Instances are independent: handlers, behaviours and listeners registered on one
/// mediator are never visible to another.
///
/// # Examples
///
/// ```rust,ignore
/// let mut mediator = Mediator::new();
/// mediator
///     .register_handler(|_ctx, request: Arc<GetBalance>| async move {
///         anyhow::Ok(Balance(request.account.len() as u64))
///     })
///     .register_behaviour::<dyn Message, _, _>(|_ctx, _request, next| next.run());
///
/// let mediator = Arc::new(mediator);
/// let balance: Balance = mediator.send(&Context::new(), GetBalance::default()).await?;
/// ```
pub struct Mediator {
    handlers: HandlerRegistry,
    behaviours: BehaviourRegistry,
    listeners: EventRegistry,
    config: MediatorConfig,
}

assert_impl_all!(Mediator: Send, Sync);

impl Mediator {
    /// Creates an empty mediator using the global [`CONFIG`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CONFIG.clone())
    }

    /// Creates an empty mediator using `config`.
    #[must_use]
    pub fn with_config(config: MediatorConfig) -> Self {
        Self {
            handlers: HandlerRegistry::with_capacity(config.limits.initial_handler_capacity),
            behaviours: BehaviourRegistry::with_capacity(config.limits.initial_behaviour_capacity),
            listeners: EventRegistry::with_capacity(config.limits.initial_event_type_capacity),
            config,
        }
    }

    /// Returns the configuration this mediator was created with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &MediatorConfig {
        &self.config
    }

    /// Registers the handler for request type `R`, producing responses of type `Resp`.
    ///
    /// A request type has at most one handler. Registering another handler for the
    /// same request type replaces the earlier one, whatever its response type.
    pub fn register_handler<R, Resp, F, Fut>(&mut self, handler: F) -> &mut Self
    where
        R: Request,
        Resp: Any + Send,
        F: Fn(Context, Arc<R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Resp>> + Send + 'static,
    {
        let request_type = TypeKey::of::<R>();
        let response_type = TypeKey::of::<Resp>();
        trace!(
            request_type = %request_type,
            type_id = ?request_type.id(),
            response_type = %response_type,
            "Adding request handler"
        );

        let invoke = move |ctx: Context, request: ErasedMessage| -> ReplyFuture {
            match request.downcast::<R>() {
                Ok(request) => handler(ctx, request).map_ok(Reply::new).boxed(),
                Err(_) => {
                    error!(
                        type_name = type_name::<R>(),
                        "Request handler called with incompatible request type (downcast failed)"
                    );
                    Reply::fail(MediatorError::IncompatibleRequest {
                        request_type: type_name::<R>(),
                        target: type_name::<R>(),
                    })
                }
            }
        };

        let replaced = self.handlers.insert(HandlerEntry {
            request_type,
            response_type,
            targets: Targets::<R>::collect(),
            invoke: Box::new(invoke),
        });
        if let Some(previous) = replaced {
            debug!(
                request_type = %request_type,
                previous_response_type = %previous.response_type,
                response_type = %response_type,
                "Replaced existing request handler"
            );
        }
        self
    }

    /// Registers a behaviour for every request that satisfies target `T`.
    ///
    /// `T` is either a concrete request type, `dyn Message` (every request), or a
    /// trait object that request types declare in
    /// [`Request::behaviour_targets`]. The behaviour receives the request as an
    /// `Arc<T>` together with the [`Next`] continuation.
    ///
    /// Behaviours run in registration order. A behaviour registered for a target no
    /// request satisfies never runs.
    pub fn register_behaviour<T, F, Fut>(&mut self, behaviour: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(Context, Arc<T>, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Reply>> + Send + 'static,
    {
        let applies_to = TypeKey::of::<T>();
        trace!(target_type = %applies_to, type_id = ?applies_to.id(), "Adding behaviour");

        let invoke = move |ctx: Context, view: RequestView, next: Next| -> ReplyFuture {
            match view.downcast::<Arc<T>>() {
                Ok(view) => behaviour(ctx, *view, next).boxed(),
                Err(_) => {
                    let request_type = next.request_type();
                    error!(
                        request_type = %request_type,
                        type_name = type_name::<T>(),
                        "Behaviour called with incompatible view (downcast failed)"
                    );
                    Reply::fail(MediatorError::IncompatibleRequest {
                        request_type: request_type.name(),
                        target: type_name::<T>(),
                    })
                }
            }
        };

        self.behaviours.push(BehaviourEntry {
            applies_to,
            invoke: Box::new(invoke),
        });
        self
    }

    /// Registers a listener for events of exactly type `E`.
    ///
    /// Listeners of one event type run one after another in registration order.
    pub fn register_event_handler<E, F, Fut>(&mut self, listener: F) -> &mut Self
    where
        E: Message,
        F: Fn(Context, Arc<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let event_type = TypeKey::of::<E>();
        trace!(event_type = %event_type, type_id = ?event_type.id(), "Adding event listener");

        let invoke = move |ctx: Context, event: ErasedMessage| -> EventFuture {
            match event.downcast::<E>() {
                Ok(event) => listener(ctx, event).boxed(),
                Err(_) => {
                    error!(
                        type_name = type_name::<E>(),
                        "Event listener called with incompatible event type (downcast failed)"
                    );
                    let error = anyhow::Error::from(MediatorError::IncompatibleRequest {
                        request_type: type_name::<E>(),
                        target: type_name::<E>(),
                    });
                    Box::pin(async move { Err::<(), _>(error) })
                }
            }
        };

        self.listeners.push(ListenerEntry {
            event_type,
            invoke: Box::new(invoke),
        });
        self
    }

    /// Sends `request` to its handler through every matching behaviour.
    ///
    /// `Resp` must implement [`Default`], because a behaviour may complete the
    /// pipeline with [`Reply::empty`]. A response type without `Default` cannot be
    /// dispatched through `send`; wrap it in an `Option` to dispatch it.
    ///
    /// # Errors
    ///
    /// * [`MediatorError::HandlerNotFound`] if no handler is registered for `R`.
    ///   Nothing runs.
    /// * [`MediatorError::ResponseTypeMismatch`] if the handler for `R` produces a
    ///   type other than `Resp`. Nothing runs.
    /// * [`MediatorError::UnexpectedReply`] if a behaviour completes the pipeline with
    ///   a value that is not a `Resp`.
    /// * Any error returned by a behaviour or the handler, unchanged.
    ///
    /// A behaviour that completes the pipeline with [`Reply::empty`] yields
    /// `Resp::default()`.
    #[instrument(skip_all, level = "debug", fields(request_type = type_name::<R>()))]
    pub async fn send<Resp, R>(&self, ctx: &Context, request: R) -> anyhow::Result<Resp>
    where
        R: Request,
        Resp: Any + Send + Default,
    {
        self.send_arc(ctx, Arc::new(request)).await
    }

    /// Like [`send`](Mediator::send), for a request that is already shared.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Mediator::send).
    pub async fn send_arc<Resp, R>(&self, ctx: &Context, request: Arc<R>) -> anyhow::Result<Resp>
    where
        R: Request,
        Resp: Any + Send + Default,
    {
        self.route(ctx, Envelope::new(request), TypeKey::of::<Resp>())
            .await?
            .into_response(TypeKey::of::<R>())
    }

    /// Publishes `event` to every listener registered for exactly type `E`.
    ///
    /// Listeners run sequentially in registration order. Having no listeners is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns the first listener error unchanged; later listeners do not run.
    #[instrument(skip_all, level = "debug", fields(event_type = type_name::<E>()))]
    pub async fn send_event<E: Message>(&self, ctx: &Context, event: E) -> anyhow::Result<()> {
        self.send_event_arc(ctx, Arc::new(event)).await
    }

    /// Like [`send_event`](Mediator::send_event), for an event that is already shared.
    ///
    /// # Errors
    ///
    /// Same as [`send_event`](Mediator::send_event).
    pub async fn send_event_arc<E: Message>(&self, ctx: &Context, event: Arc<E>) -> anyhow::Result<()> {
        self.fan_out(ctx, Envelope::new(event)).await
    }

    /// Alias of [`send_event`](Mediator::send_event).
    ///
    /// # Errors
    ///
    /// Same as [`send_event`](Mediator::send_event).
    pub async fn publish<E: Message>(&self, ctx: &Context, event: E) -> anyhow::Result<()> {
        self.send_event(ctx, event).await
    }

    /// Returns `true` if a handler is registered for request type `R`.
    #[must_use]
    pub fn has_handler<R: ?Sized + 'static>(&self) -> bool {
        self.handlers.contains(&TypeKey::of::<R>())
    }

    /// Returns the number of request types with a handler.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Returns the number of registered behaviours.
    #[must_use]
    pub fn behaviour_count(&self) -> usize {
        self.behaviours.len()
    }

    /// Returns the number of listeners registered for event type `E`.
    #[must_use]
    pub fn listener_count<E: ?Sized + 'static>(&self) -> usize {
        self.listeners.listeners(&TypeKey::of::<E>()).len()
    }

    /// Runs the handler lookup, the response type check and the pipeline for an
    /// erased request. The reply is left for the caller to convert.
    async fn route(&self, ctx: &Context, request: Envelope, expected: TypeKey) -> anyhow::Result<Reply> {
        let (request_type, request) = request.into_parts();
        let Some(handler) = self.handlers.get(&request_type) else {
            return Err(self.reject(
                ctx,
                MediatorError::HandlerNotFound {
                    request_type: request_type.name(),
                },
            ));
        };

        if handler.response_type != expected {
            return Err(self.reject(
                ctx,
                MediatorError::ResponseTypeMismatch {
                    request_type: request_type.name(),
                    expected: expected.name(),
                    registered: handler.response_type.name(),
                },
            ));
        }

        let stages = self.behaviours.matching(&handler.targets);
        Pipeline::new(
            request,
            Arc::clone(handler),
            stages,
            self.config.behavior.trace_pipeline,
        )
        .start(ctx.clone())
        .await
    }

    async fn fan_out(&self, ctx: &Context, event: Envelope) -> anyhow::Result<()> {
        let (event_type, event) = event.into_parts();
        for (index, listener) in self.listeners.listeners(&event_type).iter().enumerate() {
            if self.config.behavior.trace_pipeline {
                trace!(event_type = %event_type, listener = index, "Invoking event listener");
            }
            (listener.invoke)(ctx.clone(), Arc::clone(&event)).await?;
        }
        Ok(())
    }

    fn reject(&self, ctx: &Context, failure: MediatorError) -> anyhow::Error {
        if self.config.behavior.log_dispatch_failures {
            logging::in_context(ctx, || error!(error = ?failure, "{failure}"));
        }
        failure.into()
    }
}

#[async_trait]
impl MediatorInterface for Mediator {
    async fn dispatch(&self, ctx: &Context, request: Envelope, response_type: TypeKey) -> anyhow::Result<Reply> {
        self.route(ctx, request, response_type).await
    }

    async fn dispatch_event(&self, ctx: &Context, event: Envelope) -> anyhow::Result<()> {
        self.fan_out(ctx, event).await
    }
}

impl Default for Mediator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mediator")
            .field("handlers", &self.handlers.len())
            .field("behaviours", &self.behaviours.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
