//! Provides the dispatch engine and its supporting types.
//!
//! # Key Re-exported Components:
//!
//! *   [`Mediator`]: Owns the handler, behaviour and listener registries and exposes
//!     the `send` / `send_event` entry points.
//! *   [`Next`]: The single-use continuation a behaviour runs to reach the rest of the
//!     pipeline.
//! *   [`Reply`]: The type-erased value produced by handlers and behaviours.
//! *   [`TypeKey`]: The identity of a Rust type, used as every registry key.
//!
//! Internal types and submodules handle the implementation details for these components.

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
pub use mediator::Mediator;
pub use pipeline::Next;
pub use reply::Reply;
pub use type_key::TypeKey;

// --- Crate-Internal Re-exports ---
pub use types::*;

// --- Submodules ---

/// Defines the future and handler type aliases.
mod types;

/// Defines `TypeKey`, the type identity used as a registry key.
mod type_key;
/// Defines the `Reply` value flowing through the pipeline.
mod reply;
/// Defines the handler, behaviour and listener registries.
mod registry;
/// Defines the pipeline walk and the `Next` continuation.
mod pipeline;
/// Defines the `Mediator` and its dispatch entry points.
mod mediator;
/// Contextual logger lookup.
pub mod logging;
/// Defines the configuration system for the mediator.
pub mod config;
