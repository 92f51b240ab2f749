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

use crate::common::{ErasedMessage, TypeKey};
use crate::traits::Message;

/// A request or event with its concrete type erased, as passed to
/// [`MediatorInterface`](crate::traits::MediatorInterface).
///
/// The envelope remembers the [`TypeKey`] of the value it was built from, which is
/// the routing key the mediator uses to find handlers and listeners.
#[derive(Clone)]
pub struct Envelope {
    type_key: TypeKey,
    message: ErasedMessage,
}

impl Envelope {
    /// Wraps a shared message.
    #[must_use]
    pub fn new<T: Message>(message: Arc<T>) -> Self {
        Self {
            type_key: TypeKey::of::<T>(),
            message,
        }
    }

    /// Returns the type of the wrapped message.
    #[inline]
    #[must_use]
    pub const fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// Returns `true` if the wrapped message is a `T`.
    #[inline]
    #[must_use]
    pub fn is<T: Message>(&self) -> bool {
        self.type_key.is::<T>()
    }

    /// Borrows the wrapped message as a `T`, if that is its type.
    #[must_use]
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        (*self.message).downcast_ref::<T>()
    }

    /// Returns the wrapped message as an `Arc<T>`, if that is its type.
    #[must_use]
    pub fn downcast<T: Message>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.message).downcast::<T>().ok()
    }

    pub(crate) fn into_parts(self) -> (TypeKey, ErasedMessage) {
        (self.type_key, self.message)
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("type", &self.type_key)
            .finish_non_exhaustive()
    }
}
