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

//! The scene's point light.

use crate::math::{LinearRgba, Vec3};
use crate::renderer::api::scene::LightUniform;

/// An omnidirectional light at a point in world space.
///
/// There is no attenuation or shadowing term: the light contributes the same
/// color at every distance.
///
/// # Examples
///
/// ```
/// use lumina_core::math::{LinearRgba, Vec3};
/// use lumina_core::renderer::PointLight;
///
/// let light = PointLight::new(Vec3::new(2.0, 2.0, 2.0), LinearRgba::WHITE);
/// let uniform = light.to_uniform();
/// assert_eq!(uniform.position(), Vec3::new(2.0, 2.0, 2.0));
/// assert_eq!(uniform.color(), Vec3::ONE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position.
    pub position: Vec3,
    /// Linear color; alpha is ignored.
    pub color: LinearRgba,
}

impl PointLight {
    /// Creates a point light.
    pub fn new(position: Vec3, color: LinearRgba) -> Self {
        Self { position, color }
    }

    /// Packs the light into its uniform block.
    pub fn to_uniform(&self) -> LightUniform {
        LightUniform::new(self.position, self.color.rgb_vec())
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::new(2.0, 2.0, 2.0), LinearRgba::WHITE)
    }
}
