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

//! The rendering context handed to light group renderers at initialization.

use crate::processors::SceneProcessors;

/// Default number of views accumulators are sized for.
pub const DEFAULT_VIEW_CAPACITY: usize = 4;

/// Everything a light group renderer may need when it is initialized.
///
/// The context is only read during `initialize`. Renderers that depend on a
/// scene processor receive it explicitly when they are constructed (see
/// [`SceneProcessors`]), so nothing here is looked up while a frame is
/// being shaded.
#[derive(Debug)]
pub struct RenderContext {
    /// Scene-level processors, keyed by their concrete type.
    pub processors: SceneProcessors,
    /// Expected number of views per frame. Used as a sizing hint only.
    pub view_capacity: usize,
}

impl RenderContext {
    /// Creates a context with the default view capacity.
    pub fn new(processors: SceneProcessors) -> Self {
        Self {
            processors,
            view_capacity: DEFAULT_VIEW_CAPACITY,
        }
    }

    /// Overrides the view capacity hint.
    pub fn with_view_capacity(mut self, view_capacity: usize) -> Self {
        self.view_capacity = view_capacity;
        self
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(SceneProcessors::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_has_view_capacity() {
        let context = RenderContext::default();
        assert_eq!(context.view_capacity, DEFAULT_VIEW_CAPACITY);
        assert!(context.processors.is_empty());
    }

    #[test]
    fn test_with_view_capacity() {
        let context = RenderContext::default().with_view_capacity(9);
        assert_eq!(context.view_capacity, 9);
    }
}
