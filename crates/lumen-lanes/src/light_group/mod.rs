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

//! Light group renderers and the contract they implement.
//!
//! A light group renderer is a swappable strategy for one light category
//! (direct lights, environment probes, ...). The lighting feature drives all
//! of its renderers through the same frame protocol:
//!
//! ```text
//! initialize(ctx)
//! per frame:
//!     reset()  →  set_views(views)  →  [ process_lights(params) ]*
//!              →  update_shader_permutation_entry(entry)
//! ```
//!
//! ## Light hand-off
//!
//! Lights are handed out per view as a [`LightIndices`] list that moves from
//! renderer to renderer. `process_lights` takes the list by value and returns
//! the indices it did **not** claim, so a light is never processed twice and
//! the next renderer only sees what is left.

use lumen_core::renderer::{LightCollection, LightIndices, LightTypeTag, RenderView};
use lumen_core::{LightingError, RenderContext};
use std::any::Any;

mod light_probe;
mod permutation;
mod shader_group;
mod typed;

pub use light_probe::*;
pub use permutation::*;
pub use shader_group::*;
pub use typed::*;

/// Inputs of one [`LightGroupRenderer::process_lights`] call.
#[derive(Debug)]
pub struct ProcessLightsParameters<'a> {
    /// Position of the view in the frame's view list.
    pub view_index: usize,
    /// The view being processed.
    pub view: &'a RenderView,
    /// The frame-global light collection.
    pub lights: &'a LightCollection,
    /// The lights of this view that no previous renderer claimed.
    pub light_indices: LightIndices,
}

/// The capability contract every light category renderer implements.
///
/// Renderers whose [`light_types`](Self::light_types) is empty do not
/// classify lights: they claim whatever reaches them. The lighting feature
/// therefore runs every classifying renderer before any of them.
pub trait LightGroupRenderer: Send + Sync {
    /// Human-readable name identifying this renderer.
    ///
    /// Used for logging and per-frame statistics.
    fn strategy_name(&self) -> &'static str;

    /// The light types this renderer claims. Empty means "claims everything left".
    fn light_types(&self) -> &[LightTypeTag];

    /// Whether this renderer contributes environment lighting.
    ///
    /// Environment groups are bound to the `environmentLights` composition
    /// slots, every other group to `directLightGroups`.
    fn is_environment_light(&self) -> bool {
        false
    }

    /// One-time setup. Allocates accumulation state sized to `context`.
    ///
    /// Calling it again on an initialized renderer does nothing.
    fn initialize(&mut self, context: &RenderContext) -> Result<(), LightingError>;

    /// Clears all per-frame accumulation. Called once at the start of each frame.
    fn reset(&mut self);

    /// Declares the ordered views of the current frame.
    fn set_views(&mut self, views: &[RenderView]) -> Result<(), LightingError>;

    /// Claims lights of one view and returns the indices left for the next renderer.
    fn process_lights(
        &mut self,
        parameters: ProcessLightsParameters<'_>,
    ) -> Result<LightIndices, LightingError>;

    /// Appends this renderer's shader group to the frame's permutation entry.
    ///
    /// Must be called after every `process_lights` of the frame. Fails with
    /// `NotInitialized` instead of leaving the group out of the frame.
    fn update_shader_permutation_entry<'a>(
        &'a mut self,
        entry: &mut LightShaderPermutationEntry<'a>,
    ) -> Result<(), LightingError>;

    /// Downcast to a concrete type for type-specific operations.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to a concrete type (mutable) for type-specific operations.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Returns the initialized shader group of a renderer, or `NotInitialized`.
pub(crate) fn initialized_group<'a>(
    group: &'a mut Option<LightShaderGroupDynamic>,
    renderer: &'static str,
) -> Result<&'a mut LightShaderGroupDynamic, LightingError> {
    group
        .as_mut()
        .ok_or(LightingError::NotInitialized { renderer })
}
