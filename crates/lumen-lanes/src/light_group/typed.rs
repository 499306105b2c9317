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

//! A renderer that claims lights by type.

use super::shader_group::{LayoutRequest, LightShaderGroupDynamic};
use super::{
    initialized_group, LightGroupRenderer, LightShaderPermutationEntry, ProcessLightsParameters,
};
use lumen_core::renderer::{LightIndices, LightTypeTag, RenderView, ShaderSource};
use lumen_core::{LightingError, RenderContext};
use std::any::Any;
use std::borrow::Cow;

/// Claims the lights whose type is in its set and leaves the rest.
///
/// The bound permutation is `shader_class` instantiated with the largest
/// number of lights any view accumulated this frame, so the shader is
/// recompiled only when that maximum changes.
pub struct TypedLightGroupRenderer {
    name: &'static str,
    light_types: Vec<LightTypeTag>,
    shader_class: Cow<'static, str>,
    environment: bool,
    group: Option<LightShaderGroupDynamic>,
}

impl TypedLightGroupRenderer {
    /// Creates a direct light renderer claiming `light_types`.
    pub fn new(
        name: &'static str,
        light_types: impl IntoIterator<Item = LightTypeTag>,
        shader_class: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name,
            light_types: light_types.into_iter().collect(),
            shader_class: shader_class.into(),
            environment: false,
            group: None,
        }
    }

    /// Directional, point and spot lights bound to `shader_class`.
    pub fn direct_lights(shader_class: impl Into<Cow<'static, str>>) -> Self {
        Self::new("DirectLights", LightTypeTag::DIRECT, shader_class)
    }

    /// Ambient lights bound to `shader_class` as an environment group.
    pub fn ambient(shader_class: impl Into<Cow<'static, str>>) -> Self {
        Self::new("AmbientLights", [LightTypeTag::Ambient], shader_class).as_environment()
    }

    /// Binds the group to an environment slot instead of a direct one.
    pub fn as_environment(mut self) -> Self {
        self.environment = true;
        self
    }

    /// The accumulation group, once initialized.
    pub fn group(&self) -> Option<&LightShaderGroupDynamic> {
        self.group.as_ref()
    }
}

impl LightGroupRenderer for TypedLightGroupRenderer {
    fn strategy_name(&self) -> &'static str {
        self.name
    }

    fn light_types(&self) -> &[LightTypeTag] {
        &self.light_types
    }

    fn is_environment_light(&self) -> bool {
        self.environment
    }

    fn initialize(&mut self, context: &RenderContext) -> Result<(), LightingError> {
        if self.group.is_some() {
            log::warn!("{}: already initialized, ignoring", self.name);
            return Ok(());
        }

        let shader_class = self.shader_class.clone();
        let resolver = move |request: &LayoutRequest<'_>| ShaderSource {
            class_name: shader_class.clone(),
            parameter_count: u32::try_from(request.max_light_count).unwrap_or(u32::MAX),
        };
        self.group = Some(LightShaderGroupDynamic::with_view_capacity(
            self.name,
            resolver,
            context.view_capacity,
        ));
        Ok(())
    }

    fn reset(&mut self) {
        if let Some(group) = &mut self.group {
            group.reset();
        }
    }

    fn set_views(&mut self, views: &[RenderView]) -> Result<(), LightingError> {
        initialized_group(&mut self.group, self.name)?.set_views(views);
        Ok(())
    }

    fn process_lights(
        &mut self,
        parameters: ProcessLightsParameters<'_>,
    ) -> Result<LightIndices, LightingError> {
        let group = initialized_group(&mut self.group, self.name)?;
        let ProcessLightsParameters {
            view_index,
            view,
            lights,
            light_indices,
        } = parameters;

        for index in light_indices.iter() {
            lights.get(index)?;
        }
        let light_types = &self.light_types;
        let (claimed, remaining) =
            light_indices.partition(|index| light_types.contains(&lights[index].tag()));

        group.add_view(view_index, view, claimed.len())?;
        for index in claimed {
            group.add_light(index, &lights[index], None)?;
        }

        Ok(remaining)
    }

    fn update_shader_permutation_entry<'a>(
        &'a mut self,
        entry: &mut LightShaderPermutationEntry<'a>,
    ) -> Result<(), LightingError> {
        let environment = self.environment;
        let group = initialized_group(&mut self.group, self.name)?;
        if environment {
            entry.add_environment_light_group(group);
        } else {
            entry.add_direct_light_group(group);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::renderer::{
        AmbientLight, DirectionalLight, Light, LightCollection, LightType, PointLight, SpotLight,
        ViewId,
    };

    fn mixed_lights() -> LightCollection {
        [
            LightType::Point(PointLight::default()),
            LightType::Ambient(AmbientLight::default()),
            LightType::Directional(DirectionalLight::default()),
            LightType::Spot(SpotLight::default()),
            LightType::Ambient(AmbientLight::default()),
        ]
        .into_iter()
        .map(Light::new)
        .collect()
    }

    fn process(
        renderer: &mut TypedLightGroupRenderer,
        lights: &LightCollection,
        indices: LightIndices,
    ) -> LightIndices {
        let views = [RenderView::new(ViewId(0), 0)];
        renderer.initialize(&RenderContext::default()).unwrap();
        renderer.reset();
        renderer.set_views(&views).unwrap();
        renderer
            .process_lights(ProcessLightsParameters {
                view_index: 0,
                view: &views[0],
                lights,
                light_indices: indices,
            })
            .unwrap()
    }

    #[test]
    fn test_direct_renderer_claims_only_its_types() {
        let lights = mixed_lights();
        let mut renderer = TypedLightGroupRenderer::direct_lights("LightDirectGroup");

        let remaining = process(&mut renderer, &lights, (0..5).collect());

        assert_eq!(remaining.as_slice(), &[1, 4]);
        let claimed: Vec<usize> = renderer
            .group()
            .unwrap()
            .view_lights(0)
            .unwrap()
            .iter()
            .map(|entry| entry.light_index)
            .collect();
        assert_eq!(claimed, vec![0, 2, 3]);
    }

    #[test]
    fn test_permutation_tracks_max_light_count() {
        let lights = mixed_lights();
        let mut renderer = TypedLightGroupRenderer::direct_lights("LightDirectGroup");
        process(&mut renderer, &lights, (0..5).collect());

        let mut entry = LightShaderPermutationEntry::new();
        renderer.update_shader_permutation_entry(&mut entry).unwrap();
        assert_eq!(entry.direct_light_group_count(), 1);

        let permutation = entry.finalize();
        assert_eq!(
            permutation.direct_lights[0].shader_source,
            ShaderSource::new("LightDirectGroup", 3),
        );
    }

    #[test]
    fn test_ambient_renderer_is_environment() {
        let lights = mixed_lights();
        let mut renderer = TypedLightGroupRenderer::ambient("LightAmbient");
        let remaining = process(&mut renderer, &lights, (0..5).collect());

        assert_eq!(remaining.as_slice(), &[0, 2, 3]);

        let mut entry = LightShaderPermutationEntry::new();
        renderer.update_shader_permutation_entry(&mut entry).unwrap();
        assert_eq!(entry.environment_light_group_count(), 1);
        assert_eq!(entry.direct_light_group_count(), 0);
    }

    #[test]
    fn test_out_of_range_index_claims_nothing() {
        let lights = mixed_lights();
        let mut renderer = TypedLightGroupRenderer::direct_lights("LightDirectGroup");
        renderer.initialize(&RenderContext::default()).unwrap();
        let views = [RenderView::new(ViewId(0), 0)];
        renderer.set_views(&views).unwrap();

        let result = renderer.process_lights(ProcessLightsParameters {
            view_index: 0,
            view: &views[0],
            lights: &lights,
            light_indices: vec![0, 9].into(),
        });

        assert_eq!(
            result,
            Err(LightingError::LightOutOfRange {
                light_index: 9,
                light_count: 5,
            })
        );
        assert_eq!(renderer.group().unwrap().total_light_count(), 0);
    }

    #[test]
    fn test_uninitialized_renderer_cannot_join_permutation() {
        let mut renderer = TypedLightGroupRenderer::direct_lights("LightDirectGroup");
        let mut entry = LightShaderPermutationEntry::new();

        let result = renderer.update_shader_permutation_entry(&mut entry);

        assert_eq!(
            result,
            Err(LightingError::NotInitialized {
                renderer: "DirectLights"
            })
        );
        assert_eq!(entry.direct_light_group_count(), 0);
    }
}
