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

//! The value flowing back through the behaviour pipeline.
//!
//! Handlers produce typed responses, but behaviours may be registered against
//! broad targets (for example `dyn Message`) and therefore see replies of many
//! different types. [`Reply`] carries the response with its type erased, plus the
//! name of the producing type for diagnostics.
//!
//! # Behaviours
//!
//! ```ignore
//! // Pass the downstream reply through untouched
//! mediator.register_behaviour::<dyn Message, _, _>(|_ctx, _request, next| next.run());
//!
//! // Short-circuit with a value of the expected response type
//! mediator.register_behaviour::<GetQuote, _, _>(|_ctx, _request, _next| {
//!     Reply::ready(Quote::cached())
//! });
//!
//! // Short-circuit with an error
//! mediator.register_behaviour::<dyn Audited, _, _>(|_ctx, _request, _next| {
//!     Reply::fail(anyhow::anyhow!("audit log unavailable"))
//! });
//! ```

use std::any::{type_name, Any};
use std::fmt;

use crate::common::{ReplyFuture, TypeKey};
use crate::message::MediatorError;

const EMPTY_REPLY: &str = "<empty>";

/// A type-erased pipeline value, possibly absent.
///
/// The mediator converts the final `Reply` of a dispatch back into the caller's
/// expected response type: an empty reply becomes the response type's
/// [`Default`] value, a reply holding the expected type is unwrapped, and any
/// other reply is rejected with
/// [`MediatorError::UnexpectedReply`](crate::message::MediatorError::UnexpectedReply).
pub struct Reply {
    value: Option<Box<dyn Any + Send>>,
    type_name: &'static str,
}

impl Reply {
    /// Wraps `value` in a reply.
    #[must_use]
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Some(Box::new(value)),
            type_name: type_name::<T>(),
        }
    }

    /// Creates the absent reply.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            value: None,
            type_name: EMPTY_REPLY,
        }
    }

    /// Returns `true` if this reply holds no value.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the name of the type held by this reply, or `<empty>`.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if this reply holds a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.value.as_ref().is_some_and(|value| value.is::<T>())
    }

    /// Borrows the held value as a `T`, if that is its type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_ref().and_then(|value| value.downcast_ref::<T>())
    }

    /// Mutably borrows the held value as a `T`, if that is its type.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.as_mut().and_then(|value| value.downcast_mut::<T>())
    }

    /// Takes the held value out as a `T`.
    ///
    /// # Errors
    ///
    /// Returns the reply unchanged if it is empty or holds another type.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self { value, type_name } = self;
        match value {
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(concrete) => Ok(*concrete),
                Err(boxed) => Err(Self {
                    value: Some(boxed),
                    type_name,
                }),
            },
            None => Err(Self::empty()),
        }
    }

    /// Converts the final reply of a dispatch into the caller's response type.
    ///
    /// An empty reply becomes `T::default()`. A reply holding another type fails
    /// with [`MediatorError::UnexpectedReply`].
    pub(crate) fn into_response<T: Any + Default>(self, request_type: TypeKey) -> anyhow::Result<T> {
        if self.is_empty() {
            return Ok(T::default());
        }
        self.downcast::<T>().map_err(|reply| {
            MediatorError::UnexpectedReply {
                request_type: request_type.name(),
                expected: type_name::<T>(),
                actual: reply.type_name(),
            }
            .into()
        })
    }

    /// Creates an immediately resolving future that succeeds with `value`.
    ///
    /// Use this from a behaviour that short-circuits without running `next`.
    #[inline]
    #[must_use]
    pub fn ready<T: Any + Send>(value: T) -> ReplyFuture {
        let reply = Self::new(value);
        Box::pin(async move { anyhow::Ok(reply) })
    }

    /// Creates an immediately resolving future that succeeds with the empty reply.
    #[inline]
    #[must_use]
    pub fn ready_empty() -> ReplyFuture {
        Box::pin(async { anyhow::Ok(Self::empty()) })
    }

    /// Creates an immediately resolving future that fails with `error`.
    #[inline]
    #[must_use]
    pub fn fail(error: impl Into<anyhow::Error>) -> ReplyFuture {
        let error = error.into();
        Box::pin(async move { Err::<Self, _>(error) })
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reply")
            .field("type_name", &self.type_name)
            .field("present", &self.value.is_some())
            .finish()
    }
}
