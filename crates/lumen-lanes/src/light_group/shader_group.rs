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

//! The per-view light accumulation engine shared by every light group.
//!
//! A [`LightShaderGroupDynamic`] collects, for one light category, the lights
//! each view of the frame will shade with, and decides which shader
//! permutation the category binds. The decision itself is delegated to an
//! injected [`ShaderSourceResolver`], so concrete renderers specialize the
//! group by composition instead of overriding it.
//!
//! ## Frame protocol
//!
//! ```text
//! reset()  →  set_views(views)
//!          →  [ add_view(i, ..)  →  [ add_light(..) ]* ]*
//!          →  update_layout(name)
//! ```
//!
//! `add_light` always targets the view most recently opened with `add_view`.

use lumen_core::renderer::{GpuLight, Light, RenderView, ShaderSource, ShadowMapId};
use lumen_core::LightingError;

/// One light accumulated for a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightEntry {
    /// Index of the light in the frame's light collection.
    pub light_index: usize,
    /// The light as extracted for this frame.
    pub light: Light,
    /// The shadow map associated with the light, if any.
    pub shadow: Option<ShadowMapId>,
}

impl LightEntry {
    /// Packs the light for upload.
    pub fn to_gpu(&self) -> GpuLight {
        GpuLight::from_light(&self.light)
    }
}

/// What a resolver knows when a group's layout is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRequest<'a> {
    /// Key of the shader-graph composition slot the group is bound to.
    pub composition_name: &'a str,
    /// The largest number of lights accumulated for a single view this frame.
    pub max_light_count: usize,
}

/// Strategy deciding which shader permutation a light group binds.
///
/// Any `Fn(&LayoutRequest) -> ShaderSource` closure is a resolver.
pub trait ShaderSourceResolver: Send + Sync {
    /// Resolves the shader source for the current frame.
    fn resolve(&self, request: &LayoutRequest<'_>) -> ShaderSource;
}

impl<F> ShaderSourceResolver for F
where
    F: Fn(&LayoutRequest<'_>) -> ShaderSource + Send + Sync,
{
    fn resolve(&self, request: &LayoutRequest<'_>) -> ShaderSource {
        self(request)
    }
}

/// Layout state of a light group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderGroupState<'a> {
    /// `update_layout` has never run.
    Uninitialized,
    /// The source committed by the latest `update_layout`.
    Ready(&'a ShaderSource),
}

#[derive(Debug, Default)]
struct ViewSlot {
    opened: bool,
    lights: Vec<LightEntry>,
}

/// Accumulates per-view light entries for one light category and resolves
/// the category's shader permutation.
pub struct LightShaderGroupDynamic {
    label: &'static str,
    resolver: Box<dyn ShaderSourceResolver>,
    // Slots beyond `view_count` are kept only to reuse their allocations.
    slots: Vec<ViewSlot>,
    view_count: usize,
    views_set: bool,
    active_view: Option<usize>,
    light_current_count: usize,
    light_last_count: usize,
    composition_name: Option<String>,
    shader_source: Option<ShaderSource>,
    permutation_dirty: bool,
}

impl LightShaderGroupDynamic {
    /// Creates a group resolving its shader source with `resolver`.
    pub fn new(label: &'static str, resolver: impl ShaderSourceResolver + 'static) -> Self {
        Self::with_view_capacity(label, resolver, 0)
    }

    /// Creates a group with accumulation slots preallocated for `view_capacity` views.
    pub fn with_view_capacity(
        label: &'static str,
        resolver: impl ShaderSourceResolver + 'static,
        view_capacity: usize,
    ) -> Self {
        let mut slots = Vec::with_capacity(view_capacity);
        slots.resize_with(view_capacity, ViewSlot::default);
        Self {
            label,
            resolver: Box::new(resolver),
            slots,
            view_count: 0,
            views_set: false,
            active_view: None,
            light_current_count: 0,
            light_last_count: 0,
            composition_name: None,
            shader_source: None,
            permutation_dirty: false,
        }
    }

    /// Human-readable name of the group, used in logs.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Clears all accumulated lights and the frame's view set.
    ///
    /// The committed shader source survives; it is re-evaluated by the next
    /// `update_layout`.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.opened = false;
            slot.lights.clear();
        }
        self.view_count = 0;
        self.views_set = false;
        self.active_view = None;
        self.light_last_count = self.light_current_count;
        self.light_current_count = 0;
    }

    /// Declares the ordered views of the current frame.
    pub fn set_views(&mut self, views: &[RenderView]) {
        if self.slots.len() < views.len() {
            self.slots.resize_with(views.len(), ViewSlot::default);
        }
        for slot in &mut self.slots {
            slot.opened = false;
            slot.lights.clear();
        }
        self.view_count = views.len();
        self.views_set = true;
        self.active_view = None;
    }

    /// Opens the accumulation slot of `view_index`; subsequent `add_light`
    /// calls target this view.
    ///
    /// `expected_light_count` only reserves capacity, it does not cap the slot.
    pub fn add_view(
        &mut self,
        view_index: usize,
        view: &RenderView,
        expected_light_count: usize,
    ) -> Result<(), LightingError> {
        if !self.views_set {
            return Err(LightingError::ViewsNotSet);
        }
        if view_index >= self.view_count {
            return Err(LightingError::ViewOutOfRange {
                view_index,
                view_count: self.view_count,
            });
        }

        log::trace!(
            "{}: opening view {} ({:?}), expecting {} lights",
            self.label,
            view_index,
            view.id,
            expected_light_count
        );

        let slot = &mut self.slots[view_index];
        slot.opened = true;
        slot.lights.reserve(expected_light_count);
        self.active_view = Some(view_index);
        Ok(())
    }

    /// Appends a light to the view opened by the latest `add_view`.
    pub fn add_light(
        &mut self,
        light_index: usize,
        light: &Light,
        shadow: Option<ShadowMapId>,
    ) -> Result<(), LightingError> {
        let view_index = self.active_view.ok_or(LightingError::NoActiveView)?;
        let slot = &mut self.slots[view_index];
        slot.lights.push(LightEntry {
            light_index,
            light: *light,
            shadow,
        });
        self.light_current_count = self.light_current_count.max(slot.lights.len());
        Ok(())
    }

    /// Resolves and commits the shader source for this frame.
    ///
    /// The resolver runs exactly once per call, so the result always reflects
    /// the state of whatever it observes at call time.
    pub fn update_layout(&mut self, composition_name: &str) -> &ShaderSource {
        let request = LayoutRequest {
            composition_name,
            max_light_count: self.light_current_count,
        };
        let source = self.resolver.resolve(&request);

        self.permutation_dirty = self.shader_source.as_ref() != Some(&source);
        if self.permutation_dirty {
            log::debug!(
                "{}: shader permutation for '{}' is now {}",
                self.label,
                composition_name,
                source
            );
        }

        if self.composition_name.as_deref() != Some(composition_name) {
            self.composition_name = Some(composition_name.to_owned());
        }
        self.shader_source.insert(source)
    }

    /// The layout state after the latest `update_layout`.
    pub fn state(&self) -> ShaderGroupState<'_> {
        match &self.shader_source {
            Some(source) => ShaderGroupState::Ready(source),
            None => ShaderGroupState::Uninitialized,
        }
    }

    /// The shader source committed by the latest `update_layout`.
    pub fn shader_source(&self) -> Option<&ShaderSource> {
        self.shader_source.as_ref()
    }

    /// The composition slot passed to the latest `update_layout`.
    pub fn composition_name(&self) -> Option<&str> {
        self.composition_name.as_deref()
    }

    /// `true` if the latest `update_layout` committed a different source than
    /// the one before it.
    pub fn is_permutation_dirty(&self) -> bool {
        self.permutation_dirty
    }

    /// Number of views declared for the current frame.
    pub fn view_count(&self) -> usize {
        self.view_count
    }

    /// Lights accumulated for `view_index`, in insertion order.
    ///
    /// Views that were declared but never opened have no lights.
    pub fn view_lights(&self, view_index: usize) -> Result<&[LightEntry], LightingError> {
        if view_index >= self.view_count {
            return Err(LightingError::ViewOutOfRange {
                view_index,
                view_count: self.view_count,
            });
        }
        Ok(&self.slots[view_index].lights)
    }

    /// Returns `true` if `add_view` opened `view_index` this frame.
    pub fn is_view_opened(&self, view_index: usize) -> bool {
        view_index < self.view_count && self.slots[view_index].opened
    }

    /// Number of lights accumulated for `view_index` (zero for unknown views).
    pub fn light_count(&self, view_index: usize) -> usize {
        self.view_lights(view_index).map_or(0, <[LightEntry]>::len)
    }

    /// Number of lights accumulated across every view this frame.
    pub fn total_light_count(&self) -> usize {
        self.slots[..self.view_count]
            .iter()
            .map(|slot| slot.lights.len())
            .sum()
    }

    /// The largest per-view light count of the current frame.
    pub fn light_current_count(&self) -> usize {
        self.light_current_count
    }

    /// The largest per-view light count of the previous frame.
    pub fn light_last_count(&self) -> usize {
        self.light_last_count
    }

    /// Copies the accumulated lights of every view, indexed by view.
    pub fn snapshot_view_lights(&self) -> Vec<Vec<LightEntry>> {
        self.slots[..self.view_count]
            .iter()
            .map(|slot| slot.lights.clone())
            .collect()
    }
}

impl std::fmt::Debug for LightShaderGroupDynamic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightShaderGroupDynamic")
            .field("label", &self.label)
            .field("view_count", &self.view_count)
            .field("total_lights", &self.total_light_count())
            .field("shader_source", &self.shader_source)
            .finish()
    }
}
