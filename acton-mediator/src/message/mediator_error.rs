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

use thiserror::Error;

/// Errors raised by the mediator while routing a request.
///
/// Dispatch operations return [`anyhow::Result`], so these errors arrive wrapped in an
/// [`anyhow::Error`]. Recover them with [`anyhow::Error::downcast_ref`]:
///
/// ```rust,ignore
/// let err = mediator.send::<Pong, _>(&ctx, Ping).await.unwrap_err();
/// assert!(matches!(
///     err.downcast_ref::<MediatorError>(),
///     Some(MediatorError::HandlerNotFound { .. })
/// ));
/// ```
///
/// Errors produced by handlers, behaviours and listeners are never converted into a
/// `MediatorError`; they reach the caller exactly as they were returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediatorError {
    /// No handler is registered for the request type.
    #[error("no handler registered for request type {request_type}")]
    HandlerNotFound {
        /// Name of the request type that was sent.
        request_type: &'static str,
    },

    /// The caller expected a different response type than the handler declares.
    #[error(
        "response type mismatch for request type {request_type}: expected {expected}, handler responds with {registered}"
    )]
    ResponseTypeMismatch {
        /// Name of the request type that was sent.
        request_type: &'static str,
        /// Name of the response type the caller asked for.
        expected: &'static str,
        /// Name of the response type the registered handler produces.
        registered: &'static str,
    },

    /// A behaviour completed the pipeline with a value of the wrong type.
    #[error("unexpected reply for request type {request_type}: expected {expected}, got {actual}")]
    UnexpectedReply {
        /// Name of the request type that was sent.
        request_type: &'static str,
        /// Name of the response type the caller asked for.
        expected: &'static str,
        /// Name of the type the pipeline actually produced.
        actual: &'static str,
    },

    /// The request could not be viewed as the target a behaviour was registered for.
    #[error("request type {request_type} cannot be viewed as behaviour target {target}")]
    IncompatibleRequest {
        /// Name of the request type that was sent.
        request_type: &'static str,
        /// Name of the behaviour target.
        target: &'static str,
    },
}

impl MediatorError {
    /// Returns `true` for [`MediatorError::HandlerNotFound`].
    #[must_use]
    pub const fn is_handler_not_found(&self) -> bool {
        matches!(self, Self::HandlerNotFound { .. })
    }

    /// Returns `true` for [`MediatorError::ResponseTypeMismatch`].
    #[must_use]
    pub const fn is_response_type_mismatch(&self) -> bool {
        matches!(self, Self::ResponseTypeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_types_involved() {
        let err = MediatorError::ResponseTypeMismatch {
            request_type: "app::Ping",
            expected: "app::Pong",
            registered: "alloc::string::String",
        };
        let message = err.to_string();
        assert!(message.contains("app::Ping"));
        assert!(message.contains("app::Pong"));
        assert!(message.contains("alloc::string::String"));
        assert!(err.is_response_type_mismatch());
        assert!(!err.is_handler_not_found());
    }

    #[test]
    fn survives_a_round_trip_through_anyhow() {
        let err: anyhow::Error = MediatorError::HandlerNotFound {
            request_type: "app::Ping",
        }
        .into();
        let recovered = err.downcast_ref::<MediatorError>();
        assert!(recovered.is_some_and(MediatorError::is_handler_not_found));
    }
}
