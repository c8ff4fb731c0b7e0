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

//! Fragment math shared by every lit variant.
//!
//! The functions here are space-agnostic: a [`SurfacePoint`] holds positions
//! and a normal in whichever space the variant lights in (world or tangent).

use super::settings::{LightCombine, ShadingSettings};
use lumina_core::math::{LinearRgba, Vec3};
use lumina_core::renderer::api::CubeBinding;

/// Remaps a normal-map texel from `[0, 1]` to a unit tangent-space normal.
///
/// The RGB channels go through `sample * 2 - 1`; alpha is ignored.
#[inline]
pub fn decode_normal(sample: LinearRgba) -> Vec3 {
    (sample.rgb_vec() * 2.0 - Vec3::ONE).normalize()
}

/// The inputs of the lighting model at one fragment, all in the same space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    /// Shading point.
    pub position: Vec3,
    /// Unit shading normal.
    pub normal: Vec3,
    /// Camera position.
    pub view_position: Vec3,
    /// Light position.
    pub light_position: Vec3,
}

impl SurfacePoint {
    /// Unit direction from the shading point towards the light.
    #[inline]
    pub fn light_dir(&self) -> Vec3 {
        (self.light_position - self.position).normalize()
    }

    /// Unit direction from the shading point towards the camera.
    #[inline]
    pub fn view_dir(&self) -> Vec3 {
        (self.view_position - self.position).normalize()
    }
}

/// The three Blinn-Phong terms, each already scaled by the light color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTerms {
    /// `light_color * ambient_strength`.
    pub ambient: Vec3,
    /// `light_color * max(n·l, 0)`.
    pub diffuse: Vec3,
    /// `light_color * max(n·h, 0)^shininess`.
    pub specular: Vec3,
}

impl LightTerms {
    /// Sums the terms according to `mode`.
    #[inline]
    pub fn combine(&self, mode: LightCombine) -> Vec3 {
        match mode {
            LightCombine::Additive => self.ambient + self.diffuse + self.specular,
            LightCombine::AmbientModulated => self.ambient * self.diffuse + self.specular,
        }
    }
}

/// Evaluates the single-point-light Blinn-Phong model.
///
/// When the view and light directions cancel out the half vector is zero and
/// so is the specular term.
pub fn blinn_phong(surface: &SurfacePoint, light_color: Vec3, settings: &ShadingSettings) -> LightTerms {
    let light_dir = surface.light_dir();
    let half_dir = (surface.view_dir() + light_dir).normalize();

    let diffuse_strength = surface.normal.dot(light_dir).max(0.0);
    let specular_strength = surface.normal.dot(half_dir).max(0.0).powf(settings.shininess);

    LightTerms {
        ambient: light_color * settings.ambient_strength,
        diffuse: light_color * diffuse_strength,
        specular: light_color * specular_strength,
    }
}

/// The environment contribution: the cube map sampled along `reflect(-view_dir, normal)`.
///
/// `view_dir` and `normal` must be world-space. Negative texels are clamped to
/// zero so the contribution never darkens the lighting term.
pub fn environment_reflection(
    environment: &CubeBinding<'_>,
    view_dir: Vec3,
    normal: Vec3,
    reflectivity: f32,
) -> Vec3 {
    let direction = (-view_dir).reflect(normal);
    environment.sample(direction).rgb_vec().max(Vec3::ZERO) * reflectivity
}

/// Modulates the lighting term by the diffuse texel; alpha comes from the texel.
#[inline]
pub fn compose(lighting: Vec3, diffuse: LinearRgba) -> LinearRgba {
    LinearRgba::from_rgb_alpha(lighting * diffuse.rgb_vec(), diffuse.a)
}
