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
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::Dispatch;

use crate::common::TypeKey;

type ContextValues = HashMap<TypeKey, Arc<dyn Any + Send + Sync>>;

/// The per-call context threaded through every handler, behaviour and listener.
///
/// A `Context` is cheap to clone. Every `with_*` method returns a new context and
/// leaves the original untouched, so a behaviour can enrich the context it passes
/// downstream without affecting its caller.
///
/// The mediator itself never inspects the cancellation token or the deadline; they
/// are carried for the bodies that want to honour them.
#[derive(Clone, Default)]
pub struct Context {
    cancellation_token: CancellationToken,
    deadline: Option<Instant>,
    logger: Option<Dispatch>,
    values: Arc<ContextValues>,
}

impl Context {
    /// Creates a context with a fresh cancellation token, no deadline, no logger
    /// and no values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this context using `token` for cancellation.
    #[must_use]
    pub fn with_cancellation_token(&self, token: CancellationToken) -> Self {
        let mut ctx = self.clone();
        ctx.cancellation_token = token;
        ctx
    }

    /// Returns the cancellation token.
    #[inline]
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    /// Returns `true` once the cancellation token has been cancelled.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Returns a copy of this context whose token is a child of this one.
    ///
    /// Cancelling the parent cancels the child; cancelling the child leaves the
    /// parent running.
    #[must_use]
    pub fn child(&self) -> Self {
        self.with_cancellation_token(self.cancellation_token.child_token())
    }

    /// Returns a copy of this context with the given deadline.
    ///
    /// An existing earlier deadline is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let mut ctx = self.clone();
        ctx.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        ctx
    }

    /// Returns a copy of this context whose deadline is `timeout` from now.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Returns the deadline, if one was set.
    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns a copy of this context carrying `logger`.
    #[must_use]
    pub fn with_logger(&self, logger: Dispatch) -> Self {
        let mut ctx = self.clone();
        ctx.logger = Some(logger);
        ctx
    }

    /// Returns the logger attached to this context, or the default `tracing`
    /// dispatcher of the current thread if none was attached.
    #[must_use]
    pub fn logger(&self) -> Dispatch {
        match &self.logger {
            Some(logger) => logger.clone(),
            None => tracing::dispatcher::get_default(Dispatch::clone),
        }
    }

    /// Returns a copy of this context carrying `value`, keyed by its type.
    ///
    /// A value of the same type already present is replaced in the copy.
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut ctx = self.clone();
        Arc::make_mut(&mut ctx.values).insert(TypeKey::of::<T>(), Arc::new(value));
        ctx
    }

    /// Returns the value of type `T`, if one was attached.
    #[must_use]
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeKey::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.is_cancelled())
            .field("deadline", &self.deadline)
            .field("has_logger", &self.logger.is_some())
            .field("values", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
