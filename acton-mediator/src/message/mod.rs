//! Defines the values that travel alongside a dispatch.
//!
//! # Key Components
//!
//! *   [`Context`]: The per-call context carrying a cancellation token, an optional
//!     deadline, a contextual logger and typed values.
//! *   [`MediatorError`]: The errors raised by the mediator itself (as opposed to
//!     errors returned by handlers, behaviours and listeners).
//! *   [`Targets`]: The builder a request type uses to declare which behaviour
//!     targets it satisfies.

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
pub use context::Context;
pub use envelope::Envelope;
pub use mediator_error::MediatorError;
pub use targets::Targets;

// --- Crate-Internal Re-exports ---
pub(crate) use targets::TargetSet;

// --- Submodules ---

/// Defines [`Context`].
mod context;
/// Defines [`Envelope`].
mod envelope;
/// Defines [`MediatorError`].
mod mediator_error;
/// Defines [`Targets`] and the resolved target table.
mod targets;
