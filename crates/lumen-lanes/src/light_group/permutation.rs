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

//! The frame's shader-permutation composite.
//!
//! Renderers append their shader groups to a [`LightShaderPermutationEntry`]
//! once all lights of the frame were processed. Finalizing the entry updates
//! every group's layout against its composition slot and produces an owned
//! [`ShaderPermutation`] that the shading stage binds.

use super::shader_group::{LightEntry, LightShaderGroupDynamic};
use lumen_core::renderer::{GpuLight, ShaderSource};

/// Collects the light groups contributing to one frame's shader permutation.
#[derive(Debug, Default)]
pub struct LightShaderPermutationEntry<'a> {
    direct_lights: Vec<&'a mut LightShaderGroupDynamic>,
    environment_lights: Vec<&'a mut LightShaderGroupDynamic>,
}

impl<'a> LightShaderPermutationEntry<'a> {
    /// Creates an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group of direct lights.
    pub fn add_direct_light_group(&mut self, group: &'a mut LightShaderGroupDynamic) {
        self.direct_lights.push(group);
    }

    /// Appends a group of environment lights.
    pub fn add_environment_light_group(&mut self, group: &'a mut LightShaderGroupDynamic) {
        self.environment_lights.push(group);
    }

    /// Number of direct light groups appended so far.
    pub fn direct_light_group_count(&self) -> usize {
        self.direct_lights.len()
    }

    /// Number of environment light groups appended so far.
    pub fn environment_light_group_count(&self) -> usize {
        self.environment_lights.len()
    }

    /// Updates every group's layout and snapshots the result.
    ///
    /// Groups are bound to the composition slots `directLightGroups[i]` and
    /// `environmentLights[i]`, in the order they were appended.
    pub fn finalize(self) -> ShaderPermutation {
        ShaderPermutation {
            direct_lights: bind_groups(self.direct_lights, "directLightGroups"),
            environment_lights: bind_groups(self.environment_lights, "environmentLights"),
        }
    }
}

fn bind_groups(groups: Vec<&mut LightShaderGroupDynamic>, slot: &str) -> Vec<ShaderGroupBinding> {
    groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let composition_name = format!("{slot}[{i}]");
            let shader_source = group.update_layout(&composition_name).clone();
            ShaderGroupBinding {
                label: group.label(),
                composition_name,
                shader_source,
                changed: group.is_permutation_dirty(),
                view_lights: group.snapshot_view_lights(),
            }
        })
        .collect()
}

/// One light group bound to a composition slot for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderGroupBinding {
    /// Label of the group that produced this binding.
    pub label: &'static str,
    /// The composition slot the group is bound to.
    pub composition_name: String,
    /// The permutation selected for this frame.
    pub shader_source: ShaderSource,
    /// `true` if the permutation differs from the previous frame's.
    pub changed: bool,
    /// Accumulated lights, indexed by view.
    pub view_lights: Vec<Vec<LightEntry>>,
}

impl ShaderGroupBinding {
    /// Number of lights bound for `view_index`.
    pub fn light_count(&self, view_index: usize) -> usize {
        self.view_lights.get(view_index).map_or(0, Vec::len)
    }

    /// Packs the lights of `view_index` for upload.
    pub fn pack_view(&self, view_index: usize) -> Vec<GpuLight> {
        self.view_lights
            .get(view_index)
            .map(|lights| lights.iter().map(LightEntry::to_gpu).collect())
            .unwrap_or_default()
    }
}

/// The finalized light shader permutation of a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderPermutation {
    /// Bindings of the direct light groups, in slot order.
    pub direct_lights: Vec<ShaderGroupBinding>,
    /// Bindings of the environment light groups, in slot order.
    pub environment_lights: Vec<ShaderGroupBinding>,
}

impl ShaderPermutation {
    /// Iterates over every binding, direct groups first.
    pub fn bindings(&self) -> impl Iterator<Item = &ShaderGroupBinding> {
        self.direct_lights.iter().chain(&self.environment_lights)
    }

    /// Finds the binding produced by the group labelled `label`.
    pub fn find(&self, label: &str) -> Option<&ShaderGroupBinding> {
        self.bindings().find(|binding| binding.label == label)
    }

    /// `true` if any group selected a different permutation than last frame.
    pub fn changed(&self) -> bool {
        self.bindings().any(|binding| binding.changed)
    }
}
