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

//! Configuration of the forward lighting feature.
//!
//! The configuration is plain data and can be loaded from RON. Every field
//! is optional in the file; missing ones keep their defaults.
//!
//! ```ron
//! (
//!     light_probe: (
//!         enabled: (class_name: "LightProbeShader", parameter_count: 3),
//!         disabled: (class_name: "EnvironmentLight"),
//!     ),
//!     direct_light_shader: "LightDirectGroup",
//!     view_capacity: 2,
//! )
//! ```

use lumen_lanes::LightProbeShaderConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error raised while loading a [`ForwardLightingConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The RON document could not be parsed.
    #[error("invalid lighting configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The configuration could not be serialized.
    #[error("failed to serialize lighting configuration: {0}")]
    Serialize(#[from] ron::Error),
}

/// Settings of the forward lighting feature and its default renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardLightingConfig {
    /// Permutations selected by the light probe renderer.
    pub light_probe: LightProbeShaderConfig,
    /// Shader class bound by the direct light renderer.
    pub direct_light_shader: String,
    /// Shader class bound by the ambient light renderer.
    pub ambient_light_shader: String,
    /// Expected number of views per frame. Sizing hint only.
    pub view_capacity: usize,
    /// Expected number of lights per view. Sizing hint only.
    pub expected_lights_per_view: usize,
    /// Whether lights left unclaimed after every renderer ran are logged.
    pub log_unclaimed_lights: bool,
}

impl Default for ForwardLightingConfig {
    fn default() -> Self {
        Self {
            light_probe: LightProbeShaderConfig::default(),
            direct_light_shader: "LightDirectGroup".to_owned(),
            ambient_light_shader: "LightAmbient".to_owned(),
            view_capacity: 4,
            expected_lights_per_view: 16,
            log_unclaimed_lights: true,
        }
    }
}

impl ForwardLightingConfig {
    /// Parses a configuration from a RON document.
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Serializes the configuration as pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}
