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

//! Defines the ForwardLightingFeature, the orchestrator of the lighting pass.
//!
//! The feature owns every light group renderer and drives them through the
//! same protocol each frame:
//!
//! 1. `reset` every renderer.
//! 2. `set_views` with the frame's views.
//! 3. For each view, build the list of lights the view can see and hand it
//!    from renderer to renderer through `process_lights`.
//! 4. Collect every renderer's shader group into a permutation entry and
//!    finalize it.
//!
//! ## Renderer ordering
//!
//! Renderers that classify lights by type always run before renderers that
//! claim everything left (empty `light_types`). Within each of those two
//! classes, registration order is kept. A catch-all renderer registered first
//! therefore still only sees the lights no classifying renderer wanted.

use crate::config::ForwardLightingConfig;
use crate::stats::LightingStats;
use lumen_core::renderer::{LightCollection, LightIndices, RenderView};
use lumen_core::{LightingError, RenderContext};
use lumen_lanes::{
    LightGroupRenderer, LightProbeRenderer, LightShaderPermutationEntry, ProcessLightsParameters,
    ShaderPermutation, TypedLightGroupRenderer,
};

/// The result of one frame's lighting pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLighting {
    /// The shader permutation to bind, with the lights of every group per view.
    pub permutation: ShaderPermutation,
    /// Statistics about the frame.
    pub stats: LightingStats,
}

/// The feature responsible for aggregating lights and selecting the lighting
/// shader permutation of each frame.
pub struct ForwardLightingFeature {
    config: ForwardLightingConfig,
    context: RenderContext,
    // Renderers in registration order.
    renderers: Vec<Box<dyn LightGroupRenderer>>,
    // Indices into `renderers`, in execution order.
    order: Vec<usize>,
    initialized: bool,
    frame_index: u64,
    last_stats: LightingStats,
}

impl ForwardLightingFeature {
    /// Creates a feature without any renderer.
    pub fn new(config: ForwardLightingConfig, mut context: RenderContext) -> Self {
        context.view_capacity = context.view_capacity.max(config.view_capacity);
        Self {
            config,
            context,
            renderers: Vec::new(),
            order: Vec::new(),
            initialized: false,
            frame_index: 0,
            last_stats: LightingStats::default(),
        }
    }

    /// Creates a feature with the standard renderer set:
    /// direct lights, ambient lights and light probes.
    ///
    /// The light probe renderer is wired to the context's
    /// [`LightProbeProcessor`](lumen_core::runtime_data::LightProbeProcessor)
    /// here, once; it is never looked up again.
    pub fn with_default_renderers(
        config: ForwardLightingConfig,
        context: RenderContext,
    ) -> Result<Self, LightingError> {
        let direct = TypedLightGroupRenderer::direct_lights(config.direct_light_shader.clone());
        let ambient = TypedLightGroupRenderer::ambient(config.ambient_light_shader.clone());
        let probes = LightProbeRenderer::from_processors(&context.processors)
            .with_config(config.light_probe.clone());

        let mut feature = Self::new(config, context);
        feature.register(Box::new(direct))?;
        feature.register(Box::new(ambient))?;
        feature.register(Box::new(probes))?;
        Ok(feature)
    }

    /// Adds a renderer. It is initialized right away if the feature already is.
    pub fn register(
        &mut self,
        mut renderer: Box<dyn LightGroupRenderer>,
    ) -> Result<(), LightingError> {
        if self.initialized {
            renderer.initialize(&self.context)?;
        }
        log::debug!(
            "ForwardLightingFeature: registered renderer '{}' (types: {:?}, environment: {})",
            renderer.strategy_name(),
            renderer.light_types(),
            renderer.is_environment_light()
        );
        self.renderers.push(renderer);
        self.resolve_order();
        Ok(())
    }

    fn resolve_order(&mut self) {
        let renderers = &self.renderers;
        self.order = (0..renderers.len()).collect();
        // Stable: registration order is kept within each class.
        self.order.sort_by_key(|&index| renderers[index].light_types().is_empty());
    }

    /// Initializes every registered renderer. Does nothing the second time.
    pub fn initialize(&mut self) -> Result<(), LightingError> {
        if self.initialized {
            return Ok(());
        }
        for renderer in &mut self.renderers {
            renderer.initialize(&self.context)?;
        }
        self.initialized = true;
        log::info!(
            "ForwardLightingFeature: initialized {} light group renderers",
            self.renderers.len()
        );
        Ok(())
    }

    /// The feature's configuration.
    pub fn config(&self) -> &ForwardLightingConfig {
        &self.config
    }

    /// Strategy names of the renderers, in execution order.
    pub fn renderer_order(&self) -> Vec<&'static str> {
        self.order
            .iter()
            .map(|&index| self.renderers[index].strategy_name())
            .collect()
    }

    /// Finds the first registered renderer of concrete type `T`.
    pub fn renderer<T: LightGroupRenderer + 'static>(&self) -> Option<&T> {
        self.renderers
            .iter()
            .find_map(|renderer| renderer.as_any().downcast_ref::<T>())
    }

    /// Number of frames rendered so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Statistics of the latest frame.
    pub fn last_stats(&self) -> &LightingStats {
        &self.last_stats
    }

    /// Runs the lighting pass of one frame.
    ///
    /// # Arguments
    ///
    /// * `views`: The frame's views, in the order their index refers to.
    /// * `lights`: The frame-global light collection.
    ///
    /// # Returns
    ///
    /// The finalized shader permutation and the frame's statistics. An error
    /// means a renderer breached the frame protocol; the frame should be
    /// abandoned.
    pub fn render_frame(
        &mut self,
        views: &[RenderView],
        lights: &LightCollection,
    ) -> Result<FrameLighting, LightingError> {
        if !self.initialized {
            self.initialize()?;
        }
        self.frame_index += 1;

        for renderer in &mut self.renderers {
            renderer.reset();
        }
        for renderer in &mut self.renderers {
            renderer.set_views(views)?;
        }

        let mut stats = LightingStats {
            frame_index: self.frame_index,
            view_count: views.len(),
            light_count: lights.len(),
            claimed: self
                .order
                .iter()
                .map(|&index| (self.renderers[index].strategy_name(), 0))
                .collect(),
            ..Default::default()
        };

        for (view_index, view) in views.iter().enumerate() {
            let mut light_indices =
                LightIndices::with_capacity(self.config.expected_lights_per_view);
            for (index, light) in lights.iter().enumerate() {
                if view.sees(light) {
                    light_indices.push(index);
                }
            }
            stats.visible_light_count += light_indices.len();

            for (slot, &renderer_index) in self.order.iter().enumerate() {
                let renderer = &mut self.renderers[renderer_index];
                let before = light_indices.len();
                light_indices = renderer.process_lights(ProcessLightsParameters {
                    view_index,
                    view,
                    lights,
                    light_indices,
                })?;
                stats.claimed[slot].1 += before.saturating_sub(light_indices.len());
            }

            if !light_indices.is_empty() {
                stats.unclaimed += light_indices.len();
                if self.config.log_unclaimed_lights {
                    log::debug!(
                        "ForwardLightingFeature: view {} left {} lights unclaimed: {:?}",
                        view_index,
                        light_indices.len(),
                        light_indices.as_slice()
                    );
                }
            }
        }

        let permutation = self.assemble_permutation()?;
        for binding in permutation.bindings().filter(|binding| binding.changed) {
            stats.permutation_changes += 1;
            log::info!(
                "ForwardLightingFeature: '{}' now binds {} to {}",
                binding.label,
                binding.shader_source,
                binding.composition_name
            );
        }

        log::debug!(
            "ForwardLightingFeature: frame {} lit {} views, claimed {}/{} visible lights",
            stats.frame_index,
            stats.view_count,
            stats.total_claimed(),
            stats.visible_light_count
        );

        self.last_stats = stats.clone();
        Ok(FrameLighting { permutation, stats })
    }

    fn assemble_permutation(&mut self) -> Result<ShaderPermutation, LightingError> {
        let mut entry = LightShaderPermutationEntry::new();
        let mut pending: Vec<Option<&mut Box<dyn LightGroupRenderer>>> =
            self.renderers.iter_mut().map(Some).collect();
        for &index in &self.order {
            if let Some(renderer) = pending[index].take() {
                renderer.update_shader_permutation_entry(&mut entry)?;
            }
        }
        Ok(entry.finalize())
    }
}
