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
use std::fmt::Debug;

/// A marker trait for every value dispatched through the mediator.
///
/// Requests and events must be `Send + Sync + 'static` so they can be shared as
/// `Arc`s across the pipeline, and `Debug` so they can be logged.
///
/// A blanket implementation is provided, so any type satisfying the bounds is a
/// `Message`. `dyn Message` is also the universal behaviour target: a behaviour
/// registered for it wraps every request and receives an `Arc<dyn Message>`.
/// Use [`downcast_ref`](#method.downcast_ref) on that trait object to reach the
/// concrete request.
pub trait Message: Any + Send + Sync + Debug + sealed::AsAny {}

impl<T> Message for T where T: Any + Send + Sync + Debug {}

mod sealed {
    use std::any::Any;

    /// Upcast to `Any`. Not nameable outside this module, so method calls on an
    /// `Arc<dyn Message>` always reach the inherent methods of `dyn Message`.
    pub trait AsAny {
        /// Returns `self` as `&dyn Any`.
        fn as_any_sealed(&self) -> &dyn Any;
    }

    impl<T: Any> AsAny for T {
        #[inline]
        fn as_any_sealed(&self) -> &dyn Any {
            self
        }
    }
}

impl dyn Message {
    /// Returns the concrete message as a dynamic [`Any`] trait object.
    ///
    /// Called on an `Arc<dyn Message>`, this reaches the value inside the `Arc`.
    #[inline]
    #[must_use]
    pub fn as_any(&self) -> &dyn Any {
        sealed::AsAny::as_any_sealed(self)
    }

    /// Returns `true` if the message is a `T`.
    #[inline]
    #[must_use]
    pub fn is<T: Message>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrows the message as a `T`, if that is its concrete type.
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
