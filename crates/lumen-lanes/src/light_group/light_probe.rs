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

//! Environment lighting from baked light probes.
//!
//! The [`LightProbeRenderer`] is a catch-all environment renderer: it claims
//! every light that reaches it and binds either the probe shading
//! permutation or a plain environment fallback, depending on whether the
//! scene's probe processor currently holds runtime data. Availability is
//! polled on every layout update, so the permutation follows probes that
//! finish loading (or get unloaded) without the renderer tracking any
//! loading state itself.

use super::shader_group::{LayoutRequest, LightShaderGroupDynamic, ShaderSourceResolver};
use super::{
    initialized_group, LightGroupRenderer, LightShaderPermutationEntry, ProcessLightsParameters,
};
use lumen_core::processors::SceneProcessors;
use lumen_core::renderer::{LightIndices, LightTypeTag, RenderView, ShaderSource};
use lumen_core::runtime_data::{
    LightProbeProcessor, LightRuntimeDataProvider, LIGHT_PROBE_SH_ORDER,
};
use lumen_core::{LightingError, RenderContext};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

const STRATEGY_NAME: &str = "LightProbe";

/// The two permutations a light probe group chooses between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightProbeShaderConfig {
    /// Bound while probe runtime data is available.
    pub enabled: ShaderSource,
    /// Bound while no probe runtime data exists.
    pub disabled: ShaderSource,
}

impl LightProbeShaderConfig {
    /// Probe shading, instantiated with the SH order of the runtime data.
    pub const ENABLED: ShaderSource = ShaderSource::new("LightProbeShader", LIGHT_PROBE_SH_ORDER);
    /// No-op environment contribution.
    pub const DISABLED: ShaderSource = ShaderSource::new("EnvironmentLight", 0);
}

impl Default for LightProbeShaderConfig {
    fn default() -> Self {
        Self {
            enabled: Self::ENABLED,
            disabled: Self::DISABLED,
        }
    }
}

/// Selects the probe permutation from the provider's state at call time.
pub struct LightProbeShaderResolver {
    provider: Option<Arc<dyn LightRuntimeDataProvider>>,
    config: LightProbeShaderConfig,
}

impl LightProbeShaderResolver {
    /// Creates a resolver. A missing provider always resolves to the disabled variant.
    pub fn new(
        provider: Option<Arc<dyn LightRuntimeDataProvider>>,
        config: LightProbeShaderConfig,
    ) -> Self {
        Self { provider, config }
    }
}

impl ShaderSourceResolver for LightProbeShaderResolver {
    fn resolve(&self, _request: &LayoutRequest<'_>) -> ShaderSource {
        let has_data = self
            .provider
            .as_ref()
            .is_some_and(|provider| provider.has_runtime_data());

        if has_data {
            self.config.enabled.clone()
        } else {
            self.config.disabled.clone()
        }
    }
}

/// Catch-all environment renderer for light probes.
///
/// # Examples
///
/// ```
/// use lumen_core::runtime_data::LightProbeProcessor;
/// use lumen_lanes::LightProbeRenderer;
/// use std::sync::Arc;
///
/// let processor = Arc::new(LightProbeProcessor::new());
/// let renderer = LightProbeRenderer::new(processor);
/// ```
pub struct LightProbeRenderer {
    provider: Option<Arc<dyn LightRuntimeDataProvider>>,
    config: LightProbeShaderConfig,
    group: Option<LightShaderGroupDynamic>,
}

impl LightProbeRenderer {
    /// Creates a renderer polling `provider` for runtime data.
    pub fn new(provider: Arc<dyn LightRuntimeDataProvider>) -> Self {
        Self {
            provider: Some(provider),
            config: LightProbeShaderConfig::default(),
            group: None,
        }
    }

    /// Creates a renderer for a scene without a probe processor.
    ///
    /// It always binds the disabled permutation.
    pub fn without_provider() -> Self {
        Self {
            provider: None,
            config: LightProbeShaderConfig::default(),
            group: None,
        }
    }

    /// Wires the renderer to the scene's [`LightProbeProcessor`], if registered.
    pub fn from_processors(processors: &SceneProcessors) -> Self {
        match processors.get::<LightProbeProcessor>() {
            Some(processor) => Self::new(processor),
            None => {
                log::debug!(
                    "{STRATEGY_NAME}: no LightProbeProcessor registered, probes disabled"
                );
                Self::without_provider()
            }
        }
    }

    /// Overrides the permutations chosen between. Must be set before `initialize`.
    pub fn with_config(mut self, config: LightProbeShaderConfig) -> Self {
        self.config = config;
        self
    }

    /// The accumulation group, once initialized.
    pub fn group(&self) -> Option<&LightShaderGroupDynamic> {
        self.group.as_ref()
    }

    /// Mutable access to the accumulation group, once initialized.
    pub fn group_mut(&mut self) -> Option<&mut LightShaderGroupDynamic> {
        self.group.as_mut()
    }
}

impl LightGroupRenderer for LightProbeRenderer {
    fn strategy_name(&self) -> &'static str {
        STRATEGY_NAME
    }

    fn light_types(&self) -> &[LightTypeTag] {
        &[]
    }

    fn is_environment_light(&self) -> bool {
        true
    }

    fn initialize(&mut self, context: &RenderContext) -> Result<(), LightingError> {
        if self.group.is_some() {
            log::warn!("{STRATEGY_NAME}: already initialized, ignoring");
            return Ok(());
        }

        let resolver = LightProbeShaderResolver::new(self.provider.clone(), self.config.clone());
        self.group = Some(LightShaderGroupDynamic::with_view_capacity(
            STRATEGY_NAME,
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
        initialized_group(&mut self.group, STRATEGY_NAME)?.set_views(views);
        Ok(())
    }

    fn process_lights(
        &mut self,
        parameters: ProcessLightsParameters<'_>,
    ) -> Result<LightIndices, LightingError> {
        let group = initialized_group(&mut self.group, STRATEGY_NAME)?;
        let ProcessLightsParameters {
            view_index,
            view,
            lights,
            light_indices,
        } = parameters;

        for index in light_indices.iter() {
            lights.get(index)?;
        }

        group.add_view(view_index, view, light_indices.len())?;
        for index in light_indices {
            group.add_light(index, &lights[index], None)?;
        }

        // Everything that reached the catch-all is consumed.
        Ok(LightIndices::new())
    }

    fn update_shader_permutation_entry<'a>(
        &'a mut self,
        entry: &mut LightShaderPermutationEntry<'a>,
    ) -> Result<(), LightingError> {
        let group = initialized_group(&mut self.group, STRATEGY_NAME)?;
        entry.add_environment_light_group(group);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
