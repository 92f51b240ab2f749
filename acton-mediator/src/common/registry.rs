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

//! Type-keyed registries owned by a [`Mediator`](crate::common::Mediator).
//!
//! All three registries are populated through `&mut Mediator` during setup and only
//! read during dispatch, so they are plain `HashMap`s and `Vec`s with no locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::common::pipeline::Stage;
use crate::common::{BehaviourFn, HandlerFn, ListenerFn, TypeKey};
use crate::message::TargetSet;

/// Crate-internal: the single handler registered for one request type.
pub(crate) struct HandlerEntry {
    pub(crate) request_type: TypeKey,
    pub(crate) response_type: TypeKey,
    pub(crate) targets: TargetSet,
    pub(crate) invoke: Box<HandlerFn>,
}

/// Crate-internal: one registered behaviour and the target it applies to.
pub(crate) struct BehaviourEntry {
    pub(crate) applies_to: TypeKey,
    pub(crate) invoke: Box<BehaviourFn>,
}

/// Crate-internal: one registered event listener.
pub(crate) struct ListenerEntry {
    pub(crate) event_type: TypeKey,
    pub(crate) invoke: Box<ListenerFn>,
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("request_type", &self.request_type)
            .field("response_type", &self.response_type)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for BehaviourEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourEntry")
            .field("applies_to", &self.applies_to)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

/// Crate-internal: at most one handler per request type.
#[derive(Debug, Default)]
pub(crate) struct HandlerRegistry {
    entries: HashMap<TypeKey, Arc<HandlerEntry>>,
}

impl HandlerRegistry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Stores `entry`, returning the handler it replaced, if any.
    pub(crate) fn insert(&mut self, entry: HandlerEntry) -> Option<Arc<HandlerEntry>> {
        self.entries.insert(entry.request_type, Arc::new(entry))
    }

    pub(crate) fn get(&self, request_type: &TypeKey) -> Option<&Arc<HandlerEntry>> {
        self.entries.get(request_type)
    }

    pub(crate) fn contains(&self, request_type: &TypeKey) -> bool {
        self.entries.contains_key(request_type)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Crate-internal: every behaviour, in registration order.
#[derive(Debug, Default)]
pub(crate) struct BehaviourRegistry {
    entries: Vec<Arc<BehaviourEntry>>,
}

impl BehaviourRegistry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, entry: BehaviourEntry) {
        self.entries.push(Arc::new(entry));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the stages whose target is in `targets`, keeping registration order.
    pub(crate) fn matching(&self, targets: &TargetSet) -> Vec<Stage> {
        self.entries
            .iter()
            .filter_map(|behaviour| {
                targets.get(&behaviour.applies_to).map(|view| Stage {
                    behaviour: Arc::clone(behaviour),
                    view: Arc::clone(view),
                })
            })
            .collect()
    }
}

/// Crate-internal: listeners grouped by exact event type, each list in registration order.
#[derive(Debug, Default)]
pub(crate) struct EventRegistry {
    entries: HashMap<TypeKey, Vec<Arc<ListenerEntry>>>,
}

impl EventRegistry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, entry: ListenerEntry) {
        self.entries
            .entry(entry.event_type)
            .or_default()
            .push(Arc::new(entry));
    }

    pub(crate) fn listeners(&self, event_type: &TypeKey) -> &[Arc<ListenerEntry>] {
        self.entries
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
