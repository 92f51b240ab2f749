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

use std::fmt;
use std::sync::Arc;

use tracing::{error, trace};

use crate::common::registry::{BehaviourEntry, HandlerEntry};
use crate::common::{ErasedMessage, Reply, ReplyFuture, TypeKey, ViewCast};
use crate::message::{Context, MediatorError};

/// Crate-internal: a matching behaviour paired with the view it receives.
pub(crate) struct Stage {
    pub(crate) behaviour: Arc<BehaviourEntry>,
    pub(crate) view: ViewCast,
}

/// Crate-internal: everything one dispatch needs, shared by every `Next` of that dispatch.
pub(crate) struct Pipeline {
    request_type: TypeKey,
    request: ErasedMessage,
    handler: Arc<HandlerEntry>,
    stages: Vec<Stage>,
    trace_stages: bool,
}

impl Pipeline {
    pub(crate) fn new(
        request: ErasedMessage,
        handler: Arc<HandlerEntry>,
        stages: Vec<Stage>,
        trace_stages: bool,
    ) -> Self {
        Self {
            request_type: handler.request_type,
            request,
            handler,
            stages,
            trace_stages,
        }
    }

    /// Runs the outermost stage. The returned future is the whole dispatch.
    pub(crate) fn start(self, ctx: Context) -> ReplyFuture {
        Next {
            ctx,
            pipeline: Arc::new(self),
            cursor: 0,
        }
        .run()
    }
}

/// The rest of the pipeline downstream of a behaviour.
///
/// Every behaviour receives a `Next`. Calling [`run`](Next::run) invokes the next
/// matching behaviour, or the handler once no behaviours remain, and returns its
/// future. Dropping the `Next` without running it short-circuits the dispatch; the
/// behaviour's own reply becomes the result.
///
/// `run` consumes the `Next`. A behaviour that needs the downstream pipeline more
/// than once, such as a retry, clones it first; every run invokes the remaining
/// behaviours and the handler again.
///
/// ```rust,ignore
/// mediator.register_behaviour::<dyn Message, _, _>(|_ctx, request, next| async move {
///     tracing::info!(?request, "before");
///     let reply = next.run().await;
///     tracing::info!(ok = reply.is_ok(), "after");
///     reply
/// });
/// ```
#[derive(Clone)]
pub struct Next {
    ctx: Context,
    pipeline: Arc<Pipeline>,
    cursor: usize,
}

impl Next {
    /// Runs the remainder of the pipeline.
    pub fn run(self) -> ReplyFuture {
        let Self {
            ctx,
            pipeline,
            cursor,
        } = self;

        let Some(stage) = pipeline.stages.get(cursor) else {
            if pipeline.trace_stages {
                trace!(request_type = %pipeline.request_type, "Invoking handler");
            }
            return (pipeline.handler.invoke)(ctx, Arc::clone(&pipeline.request));
        };

        if pipeline.trace_stages {
            trace!(
                request_type = %pipeline.request_type,
                behaviour_target = %stage.behaviour.applies_to,
                stage = cursor,
                "Invoking behaviour"
            );
        }

        let Some(view) = (stage.view)(&pipeline.request) else {
            error!(
                request_type = %pipeline.request_type,
                behaviour_target = %stage.behaviour.applies_to,
                "Behaviour view could not be built for request (downcast failed)"
            );
            return Reply::fail(MediatorError::IncompatibleRequest {
                request_type: pipeline.request_type.name(),
                target: stage.behaviour.applies_to.name(),
            });
        };

        let next = Self {
            ctx: ctx.clone(),
            pipeline: Arc::clone(&pipeline),
            cursor: cursor + 1,
        };
        (stage.behaviour.invoke)(ctx, view, next)
    }

    /// Replaces the context the downstream pipeline runs with.
    ///
    /// By default downstream stages receive the same context as the current behaviour.
    #[must_use]
    pub fn with_context(mut self, ctx: Context) -> Self {
        self.ctx = ctx;
        self
    }

    /// Returns the context the downstream pipeline will run with.
    #[inline]
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.ctx
    }

    /// Returns the number of behaviours still to run before the handler.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pipeline.stages.len().saturating_sub(self.cursor)
    }

    pub(crate) fn request_type(&self) -> TypeKey {
        self.pipeline.request_type
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("request_type", &self.pipeline.request_type)
            .field("cursor", &self.cursor)
            .field("remaining", &self.remaining())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use futures::FutureExt;
    use parking_lot::Mutex;

    use super::*;
    use crate::message::Targets;
    use crate::traits::Request;

    #[derive(Debug)]
    struct Ping;
    impl Request for Ping {}

    type Log = Arc<Mutex<Vec<String>>>;

    fn handler(log: &Log) -> Arc<HandlerEntry> {
        let log = Arc::clone(log);
        Arc::new(HandlerEntry {
            request_type: TypeKey::of::<Ping>(),
            response_type: TypeKey::of::<&'static str>(),
            targets: Targets::<Ping>::collect(),
            invoke: Box::new(move |_ctx, _request| {
                log.lock().push("handler".to_string());
                Reply::ready("pong")
            }),
        })
    }

    fn stage(log: &Log, name: &'static str, view: &ViewCast) -> Stage {
        let log = Arc::clone(log);
        let behaviour = BehaviourEntry {
            applies_to: TypeKey::of::<Ping>(),
            invoke: Box::new(move |_ctx, _view, next: Next| {
                let log = Arc::clone(&log);
                log.lock().push(format!("{name} before ({} left)", next.remaining()));
                async move {
                    let reply = next.run().await;
                    log.lock().push(format!("{name} after"));
                    reply
                }
                .boxed()
            }),
        };
        Stage {
            behaviour: Arc::new(behaviour),
            view: Arc::clone(view),
        }
    }

    fn request() -> ErasedMessage {
        Arc::new(Ping) as Arc<dyn Any + Send + Sync>
    }

    #[tokio::test]
    async fn stages_wrap_the_handler_in_order() {
        let log = Log::default();
        let targets = Targets::<Ping>::collect();
        let view = targets.get(&TypeKey::of::<Ping>()).unwrap();
        let stages = vec![stage(&log, "outer", view), stage(&log, "inner", view)];

        let reply = Pipeline::new(request(), handler(&log), stages, true)
            .start(Context::new())
            .await
            .unwrap();

        assert_eq!(reply.downcast::<&'static str>().unwrap(), "pong");
        assert_eq!(
            *log.lock(),
            vec![
                "outer before (1 left)",
                "inner before (0 left)",
                "handler",
                "inner after",
                "outer after",
            ]
        );
    }

    #[tokio::test]
    async fn empty_pipeline_invokes_the_handler_directly() {
        let log = Log::default();
        let reply = Pipeline::new(request(), handler(&log), Vec::new(), false)
            .start(Context::new())
            .await
            .unwrap();
        assert!(reply.is::<&'static str>());
        assert_eq!(*log.lock(), vec!["handler"]);
    }

    #[tokio::test]
    async fn cloned_next_runs_the_downstream_pipeline_again() {
        let log = Log::default();
        let targets = Targets::<Ping>::collect();
        let view = targets.get(&TypeKey::of::<Ping>()).unwrap();
        let twice = Stage {
            behaviour: Arc::new(BehaviourEntry {
                applies_to: TypeKey::of::<Ping>(),
                invoke: Box::new(|_ctx, _view, next: Next| {
                    async move {
                        next.clone().run().await?;
                        next.run().await
                    }
                    .boxed()
                }),
            }),
            view: Arc::clone(view),
        };
        let stages = vec![twice, stage(&log, "inner", view)];

        let reply = Pipeline::new(request(), handler(&log), stages, false)
            .start(Context::new())
            .await
            .unwrap();

        assert!(reply.is::<&'static str>());
        assert_eq!(
            *log.lock(),
            vec![
                "inner before (0 left)",
                "handler",
                "inner after",
                "inner before (0 left)",
                "handler",
                "inner after",
            ]
        );
    }

    #[tokio::test]
    async fn failed_view_is_reported_as_incompatible_request() {
        #[derive(Debug)]
        struct Other;
        impl Request for Other {}

        let log = Log::default();
        let other_targets = Targets::<Other>::collect();
        let wrong_view = other_targets.get(&TypeKey::of::<Other>()).unwrap();
        let stages = vec![stage(&log, "outer", wrong_view)];

        let error = Pipeline::new(request(), handler(&log), stages, false)
            .start(Context::new())
            .await
            .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<MediatorError>(),
            Some(MediatorError::IncompatibleRequest { .. })
        ));
        assert!(log.lock().is_empty());
    }
}
