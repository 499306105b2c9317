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

//! Per-frame lighting statistics.

/// What happened to the lights of one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightingStats {
    /// Index of the frame, starting at 1.
    pub frame_index: u64,
    /// Number of views rendered.
    pub view_count: usize,
    /// Number of lights in the frame's collection.
    pub light_count: usize,
    /// Sum over views of the lights each view could see.
    pub visible_light_count: usize,
    /// Lights claimed by each renderer across all views, in execution order.
    pub claimed: Vec<(&'static str, usize)>,
    /// Visible lights no renderer claimed, summed over views.
    pub unclaimed: usize,
    /// Number of light groups whose shader permutation changed this frame.
    pub permutation_changes: usize,
}

impl LightingStats {
    /// Lights claimed by the renderer named `strategy_name` (zero if unknown).
    pub fn claimed_by(&self, strategy_name: &str) -> usize {
        self.claimed
            .iter()
            .filter(|(name, _)| *name == strategy_name)
            .map(|(_, count)| count)
            .sum()
    }

    /// Lights claimed by any renderer.
    pub fn total_claimed(&self) -> usize {
        self.claimed.iter().map(|(_, count)| count).sum()
    }
}
