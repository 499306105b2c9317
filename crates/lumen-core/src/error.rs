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

//! Defines the error type for the lighting subsystem.
//!
//! Every variant describes a breach of the frame protocol
//! (`initialize` → `reset` → `set_views` → `process_lights` →
//! `update_shader_permutation_entry`). Absent runtime data, empty view sets
//! and views without lights are valid states and never produce an error.

use thiserror::Error;

/// An error raised when a renderer or shader group is driven out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LightingError {
    /// The renderer was used before `initialize` was called.
    #[error("light group renderer '{renderer}' used before initialization")]
    NotInitialized {
        /// The strategy name of the offending renderer.
        renderer: &'static str,
    },
    /// A view slot was opened before the frame's views were declared.
    #[error("views were not set for the current frame")]
    ViewsNotSet,
    /// The view index does not exist in the frame's view list.
    #[error("view index {view_index} is out of range (frame has {view_count} views)")]
    ViewOutOfRange {
        /// The requested view index.
        view_index: usize,
        /// The number of views declared for the frame.
        view_count: usize,
    },
    /// A light was added before any view slot was opened this frame.
    #[error("a light was added before any view was opened")]
    NoActiveView,
    /// A light index refers past the end of the light collection.
    #[error("light index {light_index} is out of range (collection has {light_count} lights)")]
    LightOutOfRange {
        /// The requested light index.
        light_index: usize,
        /// The number of lights in the collection.
        light_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LightingError::ViewOutOfRange {
            view_index: 3,
            view_count: 2,
        };
        assert_eq!(
            err.to_string(),
            "view index 3 is out of range (frame has 2 views)",
        );

        let err = LightingError::NotInitialized {
            renderer: "LightProbe",
        };
        assert!(err.to_string().contains("LightProbe"));
    }
}
