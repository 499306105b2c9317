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

//! Light probe runtime data and the provider contract used to query it.
//!
//! Runtime data is computed by a scene processor from the baked probes of a
//! scene and may appear, disappear or change at any time (probes still
//! loading, a scene being swapped). The lighting lanes only ever ask whether
//! data is present *right now*; they never own it.

use std::sync::{Arc, RwLock};

/// Order of the spherical harmonics stored per probe.
pub const LIGHT_PROBE_SH_ORDER: u32 = 3;

/// Number of RGB coefficients stored per probe (`order²`).
pub const LIGHT_PROBE_SH_COEFFICIENTS: usize =
    (LIGHT_PROBE_SH_ORDER * LIGHT_PROBE_SH_ORDER) as usize;

/// Minimum number of probes needed to build a tetrahedral probe volume.
pub const MIN_PROBES_FOR_TETRAHEDRALIZATION: usize = 4;

/// A single baked light probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightProbe {
    /// World-space position of the probe.
    pub position: [f32; 3],
    /// Spherical harmonics coefficients, one linear RGB triple per band entry.
    pub coefficients: [[f32; 3]; LIGHT_PROBE_SH_COEFFICIENTS],
}

impl LightProbe {
    /// Creates a probe that only carries a constant ambient term.
    pub fn ambient(position: [f32; 3], color: [f32; 3]) -> Self {
        let mut coefficients = [[0.0; 3]; LIGHT_PROBE_SH_COEFFICIENTS];
        coefficients[0] = color;
        Self {
            position,
            coefficients,
        }
    }
}

/// Probe data in the layout the shading stage consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightProbeRuntimeData {
    /// Probe positions, in probe order.
    pub positions: Vec<[f32; 3]>,
    /// Flattened SH coefficients, `LIGHT_PROBE_SH_COEFFICIENTS` per probe.
    pub coefficients: Vec<[f32; 3]>,
}

impl LightProbeRuntimeData {
    /// Builds runtime data from a set of probes.
    ///
    /// Returns `None` when there are too few probes to form a probe volume.
    pub fn from_probes(probes: &[LightProbe]) -> Option<Self> {
        if probes.len() < MIN_PROBES_FOR_TETRAHEDRALIZATION {
            return None;
        }

        let positions = probes.iter().map(|probe| probe.position).collect();
        let coefficients = probes
            .iter()
            .flat_map(|probe| probe.coefficients.iter().copied())
            .collect();

        Some(Self {
            positions,
            coefficients,
        })
    }

    /// Number of probes described by this data.
    pub fn probe_count(&self) -> usize {
        self.positions.len()
    }
}

/// An external source of light probe runtime data.
///
/// Implementors are queried, never owned, by the lighting lanes. A provider
/// reporting no data is a normal steady state.
pub trait LightRuntimeDataProvider: Send + Sync {
    /// Returns the current runtime data, if any has been computed.
    fn runtime_data(&self) -> Option<Arc<LightProbeRuntimeData>>;

    /// Returns `true` if runtime data is currently available.
    fn has_runtime_data(&self) -> bool {
        self.runtime_data().is_some()
    }
}

/// The scene processor that owns light probe runtime data.
///
/// Data can be replaced from any thread; readers see whichever value is
/// current when they ask.
#[derive(Debug, Default)]
pub struct LightProbeProcessor {
    runtime_data: RwLock<Option<Arc<LightProbeRuntimeData>>>,
}

impl LightProbeProcessor {
    /// Creates a processor without runtime data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the runtime data from the given probes.
    ///
    /// Returns `true` if the processor holds runtime data afterwards.
    pub fn update_probes(&self, probes: &[LightProbe]) -> bool {
        let data = LightProbeRuntimeData::from_probes(probes).map(Arc::new);
        let available = data.is_some();
        if !available && !probes.is_empty() {
            log::debug!(
                "LightProbeProcessor: {} probes are not enough to build a probe volume",
                probes.len()
            );
        }
        self.store(data);
        available
    }

    /// Replaces the runtime data.
    ///
    /// Data describing fewer than [`MIN_PROBES_FOR_TETRAHEDRALIZATION`] probes
    /// is dropped. Returns `true` if the processor holds runtime data afterwards.
    pub fn set_runtime_data(&self, data: LightProbeRuntimeData) -> bool {
        if data.probe_count() < MIN_PROBES_FOR_TETRAHEDRALIZATION {
            log::debug!(
                "LightProbeProcessor: rejected runtime data with {} probes",
                data.probe_count()
            );
            self.store(None);
            return false;
        }
        self.store(Some(Arc::new(data)));
        true
    }

    /// Drops the runtime data, e.g. when the scene is unloaded.
    pub fn clear_runtime_data(&self) {
        self.store(None);
    }

    fn store(&self, data: Option<Arc<LightProbeRuntimeData>>) {
        let mut guard = match self.runtime_data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = data;
    }
}

impl LightRuntimeDataProvider for LightProbeProcessor {
    fn runtime_data(&self) -> Option<Arc<LightProbeRuntimeData>> {
        match self.runtime_data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probes(count: usize) -> Vec<LightProbe> {
        (0..count)
            .map(|i| LightProbe::ambient([i as f32, 0.0, 0.0], [0.2, 0.2, 0.2]))
            .collect()
    }

    #[test]
    fn test_sh_coefficient_count() {
        assert_eq!(LIGHT_PROBE_SH_COEFFICIENTS, 9);
    }

    #[test]
    fn test_runtime_data_requires_a_probe_volume() {
        assert!(LightProbeRuntimeData::from_probes(&probes(3)).is_none());

        let data = LightProbeRuntimeData::from_probes(&probes(4)).unwrap();
        assert_eq!(data.probe_count(), 4);
        assert_eq!(data.coefficients.len(), 4 * LIGHT_PROBE_SH_COEFFICIENTS);
        assert_eq!(data.coefficients[0], [0.2, 0.2, 0.2]);
        assert_eq!(data.coefficients[1], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_processor_starts_without_data() {
        let processor = LightProbeProcessor::new();
        assert!(!processor.has_runtime_data());
        assert!(processor.runtime_data().is_none());
    }

    #[test]
    fn test_processor_update_and_clear() {
        let processor = LightProbeProcessor::new();

        assert!(!processor.update_probes(&probes(2)));
        assert!(!processor.has_runtime_data());

        assert!(processor.update_probes(&probes(6)));
        assert_eq!(processor.runtime_data().unwrap().probe_count(), 6);

        processor.clear_runtime_data();
        assert!(!processor.has_runtime_data());
    }

    #[test]
    fn test_processor_set_runtime_data() {
        let processor = LightProbeProcessor::new();
        let data = LightProbeRuntimeData::from_probes(&probes(5)).unwrap();

        assert!(processor.set_runtime_data(data));
        assert_eq!(processor.runtime_data().unwrap().probe_count(), 5);
    }

    #[test]
    fn test_processor_rejects_data_without_probe_volume() {
        let processor = LightProbeProcessor::new();
        assert!(processor.update_probes(&probes(4)));

        let stored = processor.set_runtime_data(LightProbeRuntimeData::default());
        assert!(!stored);
        assert!(!processor.has_runtime_data());
        assert!(processor.runtime_data().is_none());
    }
}
