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

//! Defines light types, the frame-global light collection and per-view
//! light index lists.

use crate::error::LightingError;
use std::ops::Index;

/// A directional light source that illuminates from a uniform direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The color of the light in linear RGB space.
    pub color: [f32; 3],
    /// The intensity multiplier for the light.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

/// A point light source that emits light in all directions from a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// The color of the light in linear RGB space.
    pub color: [f32; 3],
    /// The intensity of the light in lumens.
    pub intensity: f32,
    /// The maximum range of the light in world units.
    pub range: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 100.0,
            range: 10.0,
        }
    }
}

/// A spot light source that emits light in a cone from a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// The color of the light in linear RGB space.
    pub color: [f32; 3],
    /// The intensity of the light in lumens.
    pub intensity: f32,
    /// The maximum range of the light in world units.
    pub range: f32,
    /// The angle in radians at which the light begins to fall off.
    pub inner_cone_angle: f32,
    /// The angle in radians at which the light is fully attenuated.
    pub outer_cone_angle: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 200.0,
            range: 15.0,
            inner_cone_angle: 20.0_f32.to_radians(),
            outer_cone_angle: 35.0_f32.to_radians(),
        }
    }
}

/// A uniform ambient term applied to the whole scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// The color of the light in linear RGB space.
    pub color: [f32; 3],
    /// The intensity multiplier for the light.
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.1,
        }
    }
}

/// Image-based environment lighting from a skybox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyboxLight {
    /// Tint applied to the sampled environment.
    pub color: [f32; 3],
    /// The intensity multiplier for the light.
    pub intensity: f32,
}

impl Default for SkyboxLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

/// An enumeration of all supported light types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightType {
    /// A directional light (sun-like, infinite distance, no falloff).
    Directional(DirectionalLight),
    /// A point light (omni-directional with distance falloff).
    Point(PointLight),
    /// A spotlight (cone-shaped with distance and angular falloff).
    Spot(SpotLight),
    /// A constant ambient term.
    Ambient(AmbientLight),
    /// Environment lighting sampled from a skybox.
    Skybox(SkyboxLight),
}

impl LightType {
    /// Returns the classification tag of this light.
    pub fn tag(&self) -> LightTypeTag {
        match self {
            LightType::Directional(_) => LightTypeTag::Directional,
            LightType::Point(_) => LightTypeTag::Point,
            LightType::Spot(_) => LightTypeTag::Spot,
            LightType::Ambient(_) => LightTypeTag::Ambient,
            LightType::Skybox(_) => LightTypeTag::Skybox,
        }
    }
}

impl Default for LightType {
    fn default() -> Self {
        LightType::Directional(DirectionalLight::default())
    }
}

/// The fieldless classification renderers use to claim lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LightTypeTag {
    /// See [`DirectionalLight`].
    Directional,
    /// See [`PointLight`].
    Point,
    /// See [`SpotLight`].
    Spot,
    /// See [`AmbientLight`].
    Ambient,
    /// See [`SkyboxLight`].
    Skybox,
}

impl LightTypeTag {
    /// Tags of lights that directly illuminate surfaces from a position or direction.
    pub const DIRECT: [LightTypeTag; 3] = [
        LightTypeTag::Directional,
        LightTypeTag::Point,
        LightTypeTag::Spot,
    ];

    /// Returns `true` for lights that contribute scene-wide environment lighting.
    pub fn is_environment(&self) -> bool {
        matches!(self, LightTypeTag::Ambient | LightTypeTag::Skybox)
    }
}

/// A light as extracted for one frame.
///
/// Position and direction are world-space and come from the light's
/// transform; they are ignored by the light types that have no use for them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// The type and properties of the light source.
    pub light_type: LightType,
    /// World-space position.
    pub position: [f32; 3],
    /// World-space direction (normalized).
    pub direction: [f32; 3],
    /// Disabled lights are never handed to a view.
    pub enabled: bool,
    /// Bitmask matched against [`RenderView::culling_mask`](super::RenderView::culling_mask).
    pub culling_mask: u32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::default(),
            position: [0.0; 3],
            direction: [0.0, -1.0, 0.0],
            enabled: true,
            culling_mask: u32::MAX,
        }
    }
}

impl Light {
    /// Creates a new enabled light visible to every view.
    pub fn new(light_type: LightType) -> Self {
        Self {
            light_type,
            ..Default::default()
        }
    }

    /// Sets the world-space position.
    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    /// Sets the world-space direction.
    pub fn facing(mut self, direction: [f32; 3]) -> Self {
        self.direction = direction;
        self
    }

    /// Restricts the light to views whose mask intersects `culling_mask`.
    pub fn with_culling_mask(mut self, culling_mask: u32) -> Self {
        self.culling_mask = culling_mask;
        self
    }

    /// Returns the classification tag of this light.
    pub fn tag(&self) -> LightTypeTag {
        self.light_type.tag()
    }
}

/// An opaque handle to a shadow map allocated by the shadow lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShadowMapId(pub usize);

/// The ordered, frame-global list of lights shared by every view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightCollection {
    lights: Vec<Light>,
}

impl LightCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a light and returns its index.
    pub fn push(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    /// Returns the light at `index`, or a [`LightingError::LightOutOfRange`].
    pub fn get(&self, index: usize) -> Result<&Light, LightingError> {
        self.lights
            .get(index)
            .ok_or(LightingError::LightOutOfRange {
                light_index: index,
                light_count: self.lights.len(),
            })
    }

    /// Number of lights in the collection.
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Returns `true` if the collection holds no lights.
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Iterates over the lights in collection order.
    pub fn iter(&self) -> std::slice::Iter<'_, Light> {
        self.lights.iter()
    }

    /// Removes every light, keeping the allocation for the next frame.
    pub fn clear(&mut self) {
        self.lights.clear();
    }
}

impl Index<usize> for LightCollection {
    type Output = Light;

    fn index(&self, index: usize) -> &Light {
        &self.lights[index]
    }
}

impl FromIterator<Light> for LightCollection {
    fn from_iter<I: IntoIterator<Item = Light>>(iter: I) -> Self {
        Self {
            lights: iter.into_iter().collect(),
        }
    }
}

/// An ordered list of indices into a [`LightCollection`], scoped to one view.
///
/// The list is handed from renderer to renderer by value. Each renderer
/// splits off the indices it claims with [`partition`](Self::partition) and
/// passes the remainder on, so no light is processed twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightIndices {
    indices: Vec<usize>,
}

impl LightIndices {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` indices.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
        }
    }

    /// Appends an index.
    pub fn push(&mut self, index: usize) {
        self.indices.push(index);
    }

    /// Number of indices in the list.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The indices in order.
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Iterates over the indices in order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, usize>> {
        self.indices.iter().copied()
    }

    /// Splits the list into `(claimed, remaining)`, preserving order in both.
    pub fn partition<F>(self, mut claims: F) -> (LightIndices, LightIndices)
    where
        F: FnMut(usize) -> bool,
    {
        let (claimed, remaining): (Vec<usize>, Vec<usize>) =
            self.indices.into_iter().partition(|&index| claims(index));
        (
            LightIndices { indices: claimed },
            LightIndices { indices: remaining },
        )
    }

    /// Consumes the list, returning the raw indices.
    pub fn into_vec(self) -> Vec<usize> {
        self.indices
    }
}

impl From<Vec<usize>> for LightIndices {
    fn from(indices: Vec<usize>) -> Self {
        Self { indices }
    }
}

impl FromIterator<usize> for LightIndices {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LightIndices {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.into_iter()
    }
}
