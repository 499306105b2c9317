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

//! Backend-agnostic rendering types consumed by the lighting lanes.
//!
//! This module defines the "common language" between the orchestrating
//! feature and the light group renderers: the lights of a frame, the views
//! that render them, the shader sources selected for each light group and
//! the GPU layout lights are packed into.

pub mod gpu;
pub mod light;
pub mod shader;
pub mod view;

pub use self::gpu::GpuLight;
pub use self::light::{
    AmbientLight, DirectionalLight, Light, LightCollection, LightIndices, LightType, LightTypeTag,
    PointLight, ShadowMapId, SkyboxLight, SpotLight,
};
pub use self::shader::ShaderSource;
pub use self::view::{RenderView, ViewId};
