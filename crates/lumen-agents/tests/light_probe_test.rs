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

use lumen_core::renderer::{
    AmbientLight, Light, LightCollection, LightIndices, LightType, PointLight, RenderView,
    ShaderSource, ViewId,
};
use lumen_core::runtime_data::{
    LightProbe, LightProbeRuntimeData, LightRuntimeDataProvider, LIGHT_PROBE_SH_ORDER,
};
use lumen_core::{LightingError, RenderContext};
use lumen_lanes::{
    LightGroupRenderer, LightProbeRenderer, LightShaderPermutationEntry, ProcessLightsParameters,
    ShaderPermutation,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

// --- Mock providers ---

fn probe_data() -> Arc<LightProbeRuntimeData> {
    let probes: Vec<LightProbe> = (0..4)
        .map(|i| LightProbe::ambient([i as f32, 0.0, 0.0], [0.3, 0.3, 0.3]))
        .collect();
    Arc::new(LightProbeRuntimeData::from_probes(&probes).unwrap())
}

/// Counts how many times runtime data is requested.
struct CountingProvider {
    queries: AtomicUsize,
    data: Option<Arc<LightProbeRuntimeData>>,
}

impl CountingProvider {
    fn new(data: Option<Arc<LightProbeRuntimeData>>) -> Self {
        Self {
            queries: AtomicUsize::new(0),
            data,
        }
    }

    fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl LightRuntimeDataProvider for CountingProvider {
    fn runtime_data(&self) -> Option<Arc<LightProbeRuntimeData>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.data.clone()
    }
}

/// Runtime data that can be switched on and off between frames.
struct ToggleProvider {
    available: AtomicBool,
    data: Arc<LightProbeRuntimeData>,
}

impl ToggleProvider {
    fn new() -> Self {
        Self {
            available: AtomicBool::new(false),
            data: probe_data(),
        }
    }

    fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl LightRuntimeDataProvider for ToggleProvider {
    fn runtime_data(&self) -> Option<Arc<LightProbeRuntimeData>> {
        self.available
            .load(Ordering::SeqCst)
            .then(|| self.data.clone())
    }
}
// ---

fn point_light_at(x: f32) -> Light {
    let light = Light::new(LightType::Point(PointLight::default()));
    light.at([x, 0.0, 0.0])
}

fn initialized(provider: Arc<dyn LightRuntimeDataProvider>) -> LightProbeRenderer {
    let mut renderer = LightProbeRenderer::new(provider);
    renderer.initialize(&RenderContext::default()).unwrap();
    renderer
}

fn finalize(renderer: &mut LightProbeRenderer) -> ShaderPermutation {
    let mut entry = LightShaderPermutationEntry::new();
    renderer.update_shader_permutation_entry(&mut entry).unwrap();
    entry.finalize()
}

fn probe_source(permutation: &ShaderPermutation) -> ShaderSource {
    permutation.environment_lights[0].shader_source.clone()
}

fn empty_frame(renderer: &mut LightProbeRenderer) -> ShaderPermutation {
    renderer.reset();
    renderer.set_views(&[]).unwrap();
    finalize(renderer)
}

#[test]
fn test_no_runtime_data_selects_disabled_shader() {
    let provider = Arc::new(CountingProvider::new(None));
    let mut renderer = initialized(provider);

    let group = renderer.group_mut().unwrap();
    let source = group.update_layout("main").clone();

    assert_eq!(source, ShaderSource::new("EnvironmentLight", 0));
}

#[test]
fn test_runtime_data_selects_probe_shader() {
    let provider = Arc::new(CountingProvider::new(Some(probe_data())));
    let mut renderer = initialized(provider);

    let group = renderer.group_mut().unwrap();
    let source = group.update_layout("main").clone();

    assert_eq!(source.class_name(), "LightProbeShader");
    assert_eq!(source.parameter_count, LIGHT_PROBE_SH_ORDER);
    assert_eq!(source.parameter_count, 3);
}

#[test]
fn test_probe_renderer_consumes_all_pending_lights() {
    let mut renderer = initialized(Arc::new(CountingProvider::new(None)));
    let views = [RenderView::new(ViewId(7), 0)];
    let lights: LightCollection = (0..5)
        .map(|i| point_light_at(i as f32))
        .collect();

    renderer.reset();
    renderer.set_views(&views).unwrap();
    let remaining = renderer
        .process_lights(ProcessLightsParameters {
            view_index: 0,
            view: &views[0],
            lights: &lights,
            light_indices: (0..5).collect(),
        })
        .unwrap();

    assert!(remaining.is_empty());
    let group = renderer.group().unwrap();
    assert_eq!(group.light_count(0), 5);
    let claimed: Vec<usize> = group
        .view_lights(0)
        .unwrap()
        .iter()
        .map(|entry| entry.light_index)
        .collect();
    assert_eq!(claimed, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_variant_follows_provider_between_frames() {
    let provider = Arc::new(ToggleProvider::new());
    let mut renderer = initialized(provider.clone());

    let first = empty_frame(&mut renderer);
    provider.set_available(true);
    let second = empty_frame(&mut renderer);

    assert_eq!(
        probe_source(&first),
        ShaderSource::new("EnvironmentLight", 0),
    );
    assert_eq!(
        probe_source(&second),
        ShaderSource::new("LightProbeShader", 3),
    );
    assert!(second.changed());

    provider.set_available(false);
    let third = empty_frame(&mut renderer);
    assert_eq!(probe_source(&third), probe_source(&first));
}

#[test]
fn test_variant_is_deterministic_for_unchanged_provider() {
    let provider = Arc::new(ToggleProvider::new());
    provider.set_available(true);
    let mut renderer = initialized(provider);

    let first = empty_frame(&mut renderer);
    let second = empty_frame(&mut renderer);

    assert_eq!(probe_source(&first), probe_source(&second));
    assert!(first.changed());
    assert!(!second.changed());
}

#[test]
fn test_provider_queried_once_per_layout_update() {
    let provider = Arc::new(CountingProvider::new(Some(probe_data())));
    let mut renderer = initialized(provider.clone());
    assert_eq!(provider.queries(), 0);

    for frame in 1..=3 {
        empty_frame(&mut renderer);
        assert_eq!(provider.queries(), frame);
    }
}

#[test]
fn test_reset_clears_accumulated_lights() {
    let mut renderer = initialized(Arc::new(CountingProvider::new(None)));
    let views = [RenderView::new(ViewId(0), 0), RenderView::new(ViewId(1), 1)];
    let lights: LightCollection = (0..3)
        .map(|_| Light::new(LightType::Ambient(AmbientLight::default())))
        .collect();

    renderer.reset();
    renderer.set_views(&views).unwrap();
    for (view_index, view) in views.iter().enumerate() {
        renderer
            .process_lights(ProcessLightsParameters {
                view_index,
                view,
                lights: &lights,
                light_indices: (0..3).collect(),
            })
            .unwrap();
    }
    assert_eq!(renderer.group().unwrap().total_light_count(), 6);

    renderer.reset();
    let group = renderer.group().unwrap();
    assert_eq!(group.total_light_count(), 0);
    assert_eq!(group.view_count(), 0);
    assert_eq!(group.light_current_count(), 0);
    assert_eq!(group.light_last_count(), 3);
}

#[test]
fn test_process_before_initialize_fails() {
    let mut renderer = LightProbeRenderer::without_provider();
    let view = RenderView::new(ViewId(0), 0);
    let lights = LightCollection::new();

    let result = renderer.process_lights(ProcessLightsParameters {
        view_index: 0,
        view: &view,
        lights: &lights,
        light_indices: LightIndices::new(),
    });

    assert_eq!(
        result,
        Err(LightingError::NotInitialized {
            renderer: "LightProbe"
        })
    );
}

#[test]
fn test_process_before_set_views_fails() {
    let mut renderer = initialized(Arc::new(CountingProvider::new(None)));
    let view = RenderView::new(ViewId(0), 0);
    let lights = LightCollection::new();

    renderer.reset();
    let result = renderer.process_lights(ProcessLightsParameters {
        view_index: 0,
        view: &view,
        lights: &lights,
        light_indices: LightIndices::new(),
    });

    assert_eq!(result, Err(LightingError::ViewsNotSet));
}

#[test]
fn test_out_of_range_light_index_fails() {
    let mut renderer = initialized(Arc::new(CountingProvider::new(None)));
    let views = [RenderView::new(ViewId(0), 0)];
    let lights: LightCollection = std::iter::once(Light::default()).collect();

    renderer.reset();
    renderer.set_views(&views).unwrap();
    let result = renderer.process_lights(ProcessLightsParameters {
        view_index: 0,
        view: &views[0],
        lights: &lights,
        light_indices: vec![0, 4].into(),
    });

    assert_eq!(
        result,
        Err(LightingError::LightOutOfRange {
            light_index: 4,
            light_count: 1
        })
    );
    assert_eq!(renderer.group().unwrap().light_count(0), 0);
}
