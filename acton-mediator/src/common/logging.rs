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

//! Attaches a logger to a [`Context`] and looks it up again.
//!
//! The logger is a [`tracing::Dispatch`]. When none is attached, lookups return the
//! default dispatcher of the current thread, which is the global subscriber unless a
//! scoped default is active.

use tracing::Dispatch;

use crate::message::Context;

/// Returns a copy of `ctx` carrying `logger`.
#[must_use]
pub fn with_logger(ctx: &Context, logger: Dispatch) -> Context {
    ctx.with_logger(logger)
}

/// Returns the logger attached to `ctx`, or the current default dispatcher.
#[must_use]
pub fn logger(ctx: &Context) -> Dispatch {
    ctx.logger()
}

/// Runs `f` with the logger of `ctx` as the default dispatcher.
pub(crate) fn in_context<T>(ctx: &Context, f: impl FnOnce() -> T) -> T {
    tracing::dispatcher::with_default(&logger(ctx), f)
}
