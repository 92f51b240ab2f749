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

#![forbid(unsafe_code)]
#![forbid(missing_docs)] // Keep this to enforce coverage

//! # Acton Mediator
//!
//! In-process message dispatch built around the mediator pattern. Callers that
//! *issue* a request or event are decoupled from the code that *handles* it;
//! the Rust type of the value is the routing key.
//!
//! ## Key Concepts
//!
//! - **Requests**: values sent through [`Mediator::send`](crate::common::Mediator::send).
//!   Exactly one handler is registered per request type and it produces exactly one response.
//! - **Behaviours**: middleware wrapped around the handler. Behaviours run in
//!   registration order before the handler and unwind in reverse order after it.
//!   A behaviour may short-circuit by not running [`Next`](crate::common::Next).
//! - **Targets**: a behaviour is registered against a *target* type. Every request
//!   matches its own type and `dyn Message`; request types may declare additional
//!   trait-object targets (see [`Request`](crate::traits::Request)).
//! - **Events**: values published through
//!   [`Mediator::send_event`](crate::common::Mediator::send_event) to zero or more
//!   listeners, invoked sequentially until the first failure.
//! - **Context**: a cheap, cloneable value threaded through every call. It carries a
//!   cancellation token, an optional deadline, a contextual logger and typed values.
//! - **Interface**: [`MediatorInterface`](crate::traits::MediatorInterface) is the
//!   object-safe dispatch surface. Code that only dispatches can take a
//!   `&dyn MediatorInterface` and be tested against a substitute.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use acton_mediator::prelude::*;
//!
//! #[mediator_request]
//! struct Ping;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Pong;
//!
//! let mut mediator = Mediator::new();
//! mediator.register_handler(|_ctx, _ping: Arc<Ping>| async move { anyhow::Ok(Pong) });
//!
//! let pong: Pong = mediator.send(&Context::new(), Ping).await?;
//! ```

/// Internal utilities and structures used throughout the mediator.
pub(crate) mod common;

/// Defines the dispatch context, behaviour targets and error types.
pub(crate) mod message;

/// Defines the traits implemented by dispatchable values.
pub(crate) mod traits;

/// Configuration loaded from XDG-compliant locations.
pub use crate::common::config;

/// Contextual logger accessors.
pub use crate::common::logging::{logger, with_logger};

/// A prelude module for conveniently importing the most commonly used items.
///
/// # Re-exports
///
/// ## Macros (from `acton-mediator-macro`)
/// *   [`acton_mediator_macro::mediator_request`]: Attribute macro for defining requests.
/// *   [`acton_mediator_macro::mediator_event`]: Attribute macro for defining events.
///
/// ## Core Types
/// *   [`crate::common::Mediator`]: Owns the registries and performs dispatch.
/// *   [`crate::common::Next`]: The continuation handed to behaviours.
/// *   [`crate::common::Reply`]: Type-erased value flowing through the pipeline.
/// *   [`crate::common::TypeKey`]: Type identity used as a registry key.
/// *   [`crate::message::Context`]: Cancellation, deadline, logger and typed values.
/// *   [`crate::message::MediatorError`]: Dispatch-time errors.
/// *   [`crate::message::Targets`]: Builder for the targets a request satisfies.
/// *   [`crate::traits::Message`]: Marker trait for all dispatchable values.
/// *   [`crate::traits::Request`]: Trait for values dispatched with `send`.
/// *   [`crate::traits::MediatorInterface`]: Object-safe dispatch surface, for code that
///     should not depend on the concrete [`crate::common::Mediator`].
/// *   [`crate::traits::MediatorInterfaceExt`]: Typed `send` and `send_event` for any
///     `MediatorInterface`.
/// *   [`crate::message::Envelope`]: A type-erased request or event.
///
/// ## External Re-exports
/// *   [`async_trait::async_trait`](https://docs.rs/async-trait/latest/async_trait/attr.async_trait.html): The macro for implementing `MediatorInterface`.
pub mod prelude {
    pub use acton_mediator_macro::*;
    pub use async_trait::async_trait;

    pub use crate::common::config::MediatorConfig;
    pub use crate::common::logging::{logger, with_logger};
    pub use crate::common::{EventFuture, Mediator, Next, Reply, ReplyFuture, TypeKey};
    pub use crate::message::{Context, Envelope, MediatorError, Targets};
    pub use crate::traits::{MediatorInterface, MediatorInterfaceExt, Message, Request};
}
