// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A type-keyed registry of scene-level processors.
//!
//! Scene processors own data computed outside the frame loop (baked light
//! probes, for instance). Renderers never query this registry while a frame
//! is in flight: the code that assembles the lighting feature fetches the
//! processors it needs once and hands them to each renderer's constructor.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A registry of shared scene processors keyed by [`TypeId`].
///
/// # Example
///
/// ```rust
/// use lumen_core::processors::SceneProcessors;
/// use std::sync::Arc;
///
/// struct ProbeBaker { probes: usize }
///
/// let mut processors = SceneProcessors::new();
/// processors.insert(Arc::new(ProbeBaker { probes: 12 }));
///
/// let baker = processors.get::<ProbeBaker>().unwrap();
/// assert_eq!(baker.probes, 12);
/// ```
#[derive(Default, Clone)]
pub struct SceneProcessors {
    processors: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl SceneProcessors {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            processors: HashMap::new(),
        }
    }

    /// Registers a processor, keyed by `T`'s [`TypeId`].
    ///
    /// If a processor of the same type was already registered, it is replaced.
    pub fn insert<T: Send + Sync + 'static>(&mut self, processor: Arc<T>) {
        self.processors.insert(TypeId::of::<T>(), processor);
    }

    /// Returns a shared handle to a previously registered processor.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.processors
            .get(&TypeId::of::<T>())
            .and_then(|processor| Arc::clone(processor).downcast::<T>().ok())
    }

    /// Returns `true` if a processor of type `T` is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.processors.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Returns `true` if no processors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl fmt::Debug for SceneProcessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneProcessors")
            .field("entries", &self.processors.len())
            .finish()
    }
}
