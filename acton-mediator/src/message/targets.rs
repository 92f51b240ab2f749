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

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::common::{ErasedMessage, RequestView, TypeKey, ViewCast};
use crate::traits::{Message, Request};

/// The behaviour targets a request type `R` satisfies.
///
/// A behaviour registered for target `T` runs for every request whose target table
/// contains `T`, and receives the request as an `Arc<T>`. Every request type
/// satisfies itself and `dyn Message`; further targets are declared in
/// [`Request::behaviour_targets`] with [`Targets::add`]:
///
/// ```rust,ignore
/// trait Audited: Message {
///     fn actor(&self) -> &str;
/// }
///
/// impl Request for TransferFunds {
///     fn behaviour_targets(targets: &mut Targets<Self>) {
///         targets.add::<dyn Audited>(|request| request);
///     }
/// }
/// ```
///
/// The `#[mediator_request(targets(dyn Audited))]` attribute generates the same code.
pub struct Targets<R> {
    casts: HashMap<TypeKey, ViewCast>,
    _request: PhantomData<fn() -> R>,
}

impl<R: Request> Targets<R> {
    fn new() -> Self {
        Self {
            casts: HashMap::new(),
            _request: PhantomData,
        }
    }

    /// Declares that `R` satisfies target `T`, viewed through `upcast`.
    ///
    /// For trait-object targets the upcast is an unsizing coercion, so a closure
    /// returning its argument unchanged is enough. Declaring the same target twice
    /// keeps the last upcast.
    pub fn add<T>(&mut self, upcast: fn(Arc<R>) -> Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let cast: ViewCast = Arc::new(move |request: &ErasedMessage| {
            let request = Arc::clone(request).downcast::<R>().ok()?;
            Some(Box::new(upcast(request)) as RequestView)
        });
        self.casts.insert(TypeKey::of::<T>(), cast);
        self
    }

    /// Returns `true` if target `T` has been declared.
    #[must_use]
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.casts.contains_key(&TypeKey::of::<T>())
    }

    /// Builds the complete target table of `R`.
    pub(crate) fn collect() -> TargetSet {
        let mut targets = Self::new();
        R::behaviour_targets(&mut targets);
        targets.add::<R>(|request| request);
        targets.add::<dyn Message>(upcast_message::<R>);
        TargetSet {
            casts: targets.casts,
        }
    }
}

impl<R> fmt::Debug for Targets<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.casts.keys()).finish()
    }
}

fn upcast_message<R: Message>(request: Arc<R>) -> Arc<dyn Message> {
    request
}

/// The resolved target table of one request type, stored with its handler.
#[derive(Clone, Default)]
pub(crate) struct TargetSet {
    casts: HashMap<TypeKey, ViewCast>,
}

impl TargetSet {
    pub(crate) fn get(&self, target: &TypeKey) -> Option<&ViewCast> {
        self.casts.get(target)
    }
}

impl fmt::Debug for TargetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.casts.keys()).finish()
    }
}
