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

use crate::shading_lane::fragment_stage::{blinn_phong, compose, environment_reflection, SurfacePoint};
use crate::shading_lane::vertex_stage::{clip_position, world_position};
use crate::shading_lane::{LitVarying, ShadingSettings, ShadingStages, VaryingSet, VertexOutput};
use lumina_core::math::LinearRgba;
use lumina_core::renderer::api::{
    CameraUniform, CubeBinding, InstanceRaw, LightUniform, ModelVertex, TextureBinding, VertexAttributes,
};

/// World-space Blinn-Phong on the interpolated geometric normal, with an
/// optional environment reflection.
#[derive(Debug, Clone, Copy)]
pub struct BasicLit<'a> {
    camera: &'a CameraUniform,
    light: &'a LightUniform,
    diffuse: TextureBinding<'a>,
    environment: Option<CubeBinding<'a>>,
    settings: ShadingSettings,
}

impl<'a> BasicLit<'a> {
    /// Creates the stage pair. Reflection is enabled when `environment` is bound.
    pub fn new(
        camera: &'a CameraUniform,
        light: &'a LightUniform,
        diffuse: TextureBinding<'a>,
        environment: Option<CubeBinding<'a>>,
        settings: ShadingSettings,
    ) -> Self {
        Self {
            camera,
            light,
            diffuse,
            environment,
            settings,
        }
    }

    /// Whether the environment reflection is added.
    pub fn has_reflection(&self) -> bool {
        self.environment.is_some()
    }
}

impl ShadingStages for BasicLit<'_> {
    type Varying = LitVarying;

    const NAME: &'static str = "BasicLit";
    const REQUIRED_ATTRIBUTES: VertexAttributes = VertexAttributes::LIT;
    const VARYINGS_WRITTEN: VaryingSet = VaryingSet::TEX_COORDS
        .union(VaryingSet::WORLD_POSITION)
        .union(VaryingSet::WORLD_NORMAL);
    const VARYINGS_READ: VaryingSet = Self::VARYINGS_WRITTEN;

    fn vertex(&self, vertex: &ModelVertex, instance: &InstanceRaw) -> VertexOutput<Self::Varying> {
        let transform = instance.transform();
        let world = world_position(&transform, vertex);
        VertexOutput {
            clip_position: clip_position(self.camera, world),
            varying: LitVarying {
                tex_coords: vertex.tex_coords(),
                world_position: world.truncate(),
                world_normal: transform.world_direction(vertex.normal()).normalize(),
            },
        }
    }

    fn fragment(&self, varying: &Self::Varying) -> LinearRgba {
        let surface = SurfacePoint {
            position: varying.world_position,
            normal: varying.world_normal.normalize(),
            view_position: self.camera.eye(),
            light_position: self.light.position(),
        };
        let terms = blinn_phong(&surface, self.light.color(), &self.settings);
        let mut lighting = terms.combine(self.settings.combine);
        if let Some(environment) = &self.environment {
            lighting += environment_reflection(
                environment,
                surface.view_dir(),
                surface.normal,
                self.settings.reflectivity,
            );
        }
        compose(lighting, self.diffuse.sample(varying.tex_coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumina_core::math::{Mat4, Vec2, Vec3};
    use lumina_core::renderer::api::{CubeTexture, Sampler, Texture2d};

    #[test]
    fn test_reflection_adds_scaled_environment() {
        let camera = CameraUniform::from_matrices(Vec3::new(0.0, 0.0, 5.0), Mat4::IDENTITY, Mat4::IDENTITY);
        // Light behind the surface: ambient only.
        let light = LightUniform::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ONE);
        let white = Texture2d::solid(LinearRgba::WHITE);
        let sky = CubeTexture::solid(LinearRgba::rgb(0.5, 1.0, 2.0));
        let sampler = Sampler::NEAREST_CLAMP;
        let diffuse = TextureBinding::new(&white, &sampler);
        let settings = ShadingSettings::default();

        let plain = BasicLit::new(&camera, &light, diffuse, None, settings);
        let mirror = BasicLit::new(&camera, &light, diffuse, Some(CubeBinding::new(&sky, &sampler)), settings);
        assert!(mirror.has_reflection());

        let vertex = ModelVertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::Z);
        let varying = plain.vertex(&vertex, &InstanceRaw::default()).varying;
        let base = plain.fragment(&varying);
        let reflected = mirror.fragment(&varying);

        assert_relative_eq!(base.r, 0.1, epsilon = 1e-6);
        assert_relative_eq!(reflected.r - base.r, 0.05, epsilon = 1e-6);
        assert_relative_eq!(reflected.g - base.g, 0.1, epsilon = 1e-6);
        assert_relative_eq!(reflected.b - base.b, 0.2, epsilon = 1e-6);
        assert_eq!(reflected.a, 1.0);
    }
}
