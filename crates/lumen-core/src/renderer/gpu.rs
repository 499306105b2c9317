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

//! GPU-friendly light layout used to upload accumulated lights.

use super::light::{Light, LightType};
use bytemuck::{Pod, Zeroable};

/// GPU-friendly representation of a light source.
///
/// A single unified layout represents every light type so that one storage
/// buffer per light group is enough.
///
/// # Memory Layout
///
/// Total size: 64 bytes (16 × 4-byte fields).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    /// Light position in world space (ignored for directional and environment lights).
    pub position: [f32; 3],
    /// Maximum range of the light (point/spot lights only).
    pub range: f32,

    /// Light color (RGB, linear space).
    pub color: [f32; 3],
    /// Light intensity multiplier.
    pub intensity: f32,

    /// Light direction (normalized, for directional/spot lights).
    pub direction: [f32; 3],
    /// One of the `TYPE_*` constants.
    pub light_type: u32,

    /// Cosine of inner cone angle (spot lights only).
    pub inner_cone_cos: f32,
    /// Cosine of outer cone angle (spot lights only).
    pub outer_cone_cos: f32,
    /// Padding for 16-byte alignment.
    pub _padding: [f32; 2],
}

impl GpuLight {
    /// Light type constant for directional lights.
    pub const TYPE_DIRECTIONAL: u32 = 0;
    /// Light type constant for point lights.
    pub const TYPE_POINT: u32 = 1;
    /// Light type constant for spot lights.
    pub const TYPE_SPOT: u32 = 2;
    /// Light type constant for ambient lights.
    pub const TYPE_AMBIENT: u32 = 3;
    /// Light type constant for skybox lights.
    pub const TYPE_SKYBOX: u32 = 4;

    /// Packs an extracted light.
    pub fn from_light(light: &Light) -> Self {
        let base = Self {
            position: light.position,
            direction: light.direction,
            ..Self::zeroed()
        };

        match light.light_type {
            LightType::Directional(l) => Self {
                position: [0.0; 3],
                color: l.color,
                intensity: l.intensity,
                light_type: Self::TYPE_DIRECTIONAL,
                ..base
            },
            LightType::Point(l) => Self {
                range: l.range,
                color: l.color,
                intensity: l.intensity,
                direction: [0.0; 3],
                light_type: Self::TYPE_POINT,
                ..base
            },
            LightType::Spot(l) => Self {
                range: l.range,
                color: l.color,
                intensity: l.intensity,
                light_type: Self::TYPE_SPOT,
                inner_cone_cos: l.inner_cone_angle.cos(),
                outer_cone_cos: l.outer_cone_angle.cos(),
                ..base
            },
            LightType::Ambient(l) => Self {
                position: [0.0; 3],
                color: l.color,
                intensity: l.intensity,
                direction: [0.0; 3],
                light_type: Self::TYPE_AMBIENT,
                ..base
            },
            LightType::Skybox(l) => Self {
                position: [0.0; 3],
                color: l.color,
                intensity: l.intensity,
                direction: [0.0; 3],
                light_type: Self::TYPE_SKYBOX,
                ..base
            },
        }
    }
}
