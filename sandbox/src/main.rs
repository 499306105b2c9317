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

// Lumen Sandbox
// Runs the forward lighting feature over a handful of frames and prints what
// each light group bound.

use anyhow::{Context, Result};
use lumen_agents::{ForwardLightingConfig, ForwardLightingFeature, FrameLighting};
use lumen_core::renderer::{
    AmbientLight, DirectionalLight, Light, LightCollection, LightType, PointLight, RenderView,
    SkyboxLight, SpotLight, ViewId,
};
use lumen_core::runtime_data::{LightProbe, LightProbeProcessor};
use lumen_core::{RenderContext, SceneProcessors};
use std::sync::Arc;

const FRAME_COUNT: usize = 4;
// Probes are baked before this frame.
const PROBE_BAKE_FRAME: usize = 2;

fn load_config() -> Result<ForwardLightingConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read lighting config '{path}'"))?;
            let config = ForwardLightingConfig::from_ron(&source)?;
            log::info!("Loaded lighting configuration from '{path}'");
            Ok(config)
        }
        None => Ok(ForwardLightingConfig::default()),
    }
}

fn build_scene() -> LightCollection {
    let mut lights = LightCollection::new();
    lights.push(
        Light::new(LightType::Directional(DirectionalLight {
            color: [1.0, 0.95, 0.8],
            intensity: 3.0,
        }))
        .facing([0.3, -1.0, 0.2]),
    );
    for i in 0..3 {
        lights.push(
            Light::new(LightType::Point(PointLight {
                color: [1.0, 0.4, 0.1],
                intensity: 8.0,
                range: 6.0,
            }))
            .at([i as f32 * 4.0, 1.5, 0.0]),
        );
    }
    // Only visible to the main camera.
    lights.push(
        Light::new(LightType::Spot(SpotLight::default()))
            .at([0.0, 5.0, 0.0])
            .with_culling_mask(0b01),
    );
    lights.push(Light::new(LightType::Ambient(AmbientLight {
        color: [0.1, 0.1, 0.15],
        intensity: 1.0,
    })));
    lights.push(Light::new(LightType::Skybox(SkyboxLight::default())));
    lights
}

fn bake_probes() -> Vec<LightProbe> {
    let corners = [
        [-10.0, 0.0, -10.0],
        [10.0, 0.0, -10.0],
        [0.0, 0.0, 10.0],
        [0.0, 8.0, 0.0],
    ];
    corners
        .into_iter()
        .map(|position| LightProbe::ambient(position, [0.2, 0.22, 0.3]))
        .collect()
}

fn report(frame: &FrameLighting) {
    log::info!(
        "Frame {}: {} views, {} visible lights, {} unclaimed",
        frame.stats.frame_index,
        frame.stats.view_count,
        frame.stats.visible_light_count,
        frame.stats.unclaimed
    );
    for binding in frame.permutation.bindings() {
        let per_view: Vec<usize> = (0..frame.stats.view_count)
            .map(|view_index| binding.light_count(view_index))
            .collect();
        log::info!(
            "  {:<22} {:<14} -> {} lights per view: {:?}",
            binding.composition_name,
            binding.label,
            binding.shader_source,
            per_view
        );
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let probe_processor = Arc::new(LightProbeProcessor::new());
    let mut processors = SceneProcessors::new();
    processors.insert(probe_processor.clone());

    let mut feature =
        ForwardLightingFeature::with_default_renderers(config, RenderContext::new(processors))?;
    log::info!("Renderer order: {:?}", feature.renderer_order());

    let lights = build_scene();
    let views = [
        RenderView::new(ViewId(0), 0).with_culling_mask(0b11),
        RenderView::new(ViewId(1), 1).with_culling_mask(0b10),
    ];

    for frame_number in 0..FRAME_COUNT {
        if frame_number == PROBE_BAKE_FRAME {
            let available = probe_processor.update_probes(&bake_probes());
            log::info!("Baked light probes (runtime data available: {available})");
        }
        let frame = feature.render_frame(&views, &lights)?;
        report(&frame);
    }

    Ok(())
}
