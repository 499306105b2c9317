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

//! Defines [`ShaderSource`], the descriptor of a shader permutation.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// An immutable descriptor naming a shader class and its parameter count.
///
/// Shader sources are selected by light groups each time their layout is
/// updated and compared by value; they are never mutated in place. Compiling
/// them is the job of the shader backend, which treats them as opaque keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShaderSource {
    /// Name of the shader class implementing the permutation.
    pub class_name: Cow<'static, str>,
    /// Number of generic parameters the class is instantiated with.
    #[serde(default)]
    pub parameter_count: u32,
}

impl ShaderSource {
    /// Creates a shader source from a static class name.
    pub const fn new(class_name: &'static str, parameter_count: u32) -> Self {
        Self {
            class_name: Cow::Borrowed(class_name),
            parameter_count,
        }
    }

    /// Creates a shader source from an owned class name.
    pub fn owned(class_name: impl Into<String>, parameter_count: u32) -> Self {
        Self {
            class_name: Cow::Owned(class_name.into()),
            parameter_count,
        }
    }

    /// Name of the shader class.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

impl fmt::Display for ShaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parameter_count == 0 {
            write!(f, "{}", self.class_name)
        } else {
            write!(f, "{}<{}>", self.class_name, self.parameter_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrowed_and_owned_compare_equal() {
        let borrowed = ShaderSource::new("LightProbeShader", 3);
        let owned = ShaderSource::owned("LightProbeShader".to_string(), 3);
        assert_eq!(borrowed, owned);
        assert_ne!(borrowed, ShaderSource::new("LightProbeShader", 2));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ShaderSource::new("LightProbeShader", 3).to_string(),
            "LightProbeShader<3>",
        );
        assert_eq!(
            ShaderSource::new("EnvironmentLight", 0).to_string(),
            "EnvironmentLight",
        );
    }
}
