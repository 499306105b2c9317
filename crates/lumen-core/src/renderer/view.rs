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

//! Defines [`RenderView`], one camera pass within a frame.

use super::light::Light;

/// A stable identifier for a view, independent of its position in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// A camera/viewport descriptor for one rendering pass.
///
/// Views live for one frame. They are owned by the orchestrator and only
/// borrowed by the light group renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Stable identity of the view.
    pub id: ViewId,
    /// Position of the view in the frame's view list.
    pub index: usize,
    /// The camera's view matrix (world to view space), column-major.
    pub view_matrix: [[f32; 4]; 4],
    /// The camera's projection matrix (view to clip space), column-major.
    pub projection_matrix: [[f32; 4]; 4],
    /// Bitmask of light layers this view renders.
    pub culling_mask: u32,
}

impl RenderView {
    /// Creates a view with identity matrices that sees every light layer.
    pub fn new(id: ViewId, index: usize) -> Self {
        Self {
            id,
            index,
            view_matrix: IDENTITY,
            projection_matrix: IDENTITY,
            culling_mask: u32::MAX,
        }
    }

    /// Restricts the view to lights whose mask intersects `culling_mask`.
    pub fn with_culling_mask(mut self, culling_mask: u32) -> Self {
        self.culling_mask = culling_mask;
        self
    }

    /// Sets the view and projection matrices.
    pub fn with_matrices(
        mut self,
        view_matrix: [[f32; 4]; 4],
        projection_matrix: [[f32; 4]; 4],
    ) -> Self {
        self.view_matrix = view_matrix;
        self.projection_matrix = projection_matrix;
        self
    }

    /// Returns `true` if `light` is enabled and on a layer this view renders.
    pub fn sees(&self, light: &Light) -> bool {
        light.enabled && (light.culling_mask & self.culling_mask) != 0
    }
}
