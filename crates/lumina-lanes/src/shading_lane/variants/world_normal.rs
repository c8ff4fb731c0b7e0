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

use crate::shading_lane::basis::TangentFrame;
use crate::shading_lane::fragment_stage::{
    blinn_phong, compose, decode_normal, environment_reflection, SurfacePoint,
};
use crate::shading_lane::vertex_stage::{clip_position, world_position, WorldBasis};
use crate::shading_lane::{ShadingSettings, ShadingStages, VaryingSet, VertexOutput, WorldSpaceVarying};
use lumina_core::math::LinearRgba;
use lumina_core::renderer::api::{
    CameraUniform, CubeBinding, InstanceRaw, LightUniform, ModelVertex, TextureBinding, VertexAttributes,
};

/// Normal mapping lit in world space, with an optional environment reflection.
///
/// The interpolated basis is re-orthogonalized per fragment before the
/// normal-map sample is carried into world space.
#[derive(Debug, Clone, Copy)]
pub struct NormalMappedWorld<'a> {
    camera: &'a CameraUniform,
    light: &'a LightUniform,
    diffuse: TextureBinding<'a>,
    normal: TextureBinding<'a>,
    environment: Option<CubeBinding<'a>>,
    settings: ShadingSettings,
}

impl<'a> NormalMappedWorld<'a> {
    /// Creates the stage pair. Reflection is enabled when `environment` is bound.
    pub fn new(
        camera: &'a CameraUniform,
        light: &'a LightUniform,
        diffuse: TextureBinding<'a>,
        normal: TextureBinding<'a>,
        environment: Option<CubeBinding<'a>>,
        settings: ShadingSettings,
    ) -> Self {
        Self {
            camera,
            light,
            diffuse,
            normal,
            environment,
            settings,
        }
    }

    /// Whether the environment reflection is added.
    pub fn has_reflection(&self) -> bool {
        self.environment.is_some()
    }
}

impl ShadingStages for NormalMappedWorld<'_> {
    type Varying = WorldSpaceVarying;

    const NAME: &'static str = "NormalMappedWorld";
    const REQUIRED_ATTRIBUTES: VertexAttributes = VertexAttributes::ALL;
    const VARYINGS_WRITTEN: VaryingSet = VaryingSet::TEX_COORDS
        .union(VaryingSet::WORLD_POSITION)
        .union(VaryingSet::WORLD_VIEW_POSITION)
        .union(VaryingSet::WORLD_LIGHT_POSITION)
        .union(VaryingSet::WORLD_NORMAL)
        .union(VaryingSet::WORLD_TANGENT)
        .union(VaryingSet::WORLD_BITANGENT);
    const VARYINGS_READ: VaryingSet = Self::VARYINGS_WRITTEN;

    fn vertex(&self, vertex: &ModelVertex, instance: &InstanceRaw) -> VertexOutput<Self::Varying> {
        let transform = instance.transform();
        let world = world_position(&transform, vertex);
        let basis = WorldBasis::from_vertex(&transform, vertex);
        VertexOutput {
            clip_position: clip_position(self.camera, world),
            varying: WorldSpaceVarying {
                tex_coords: vertex.tex_coords(),
                world_position: world.truncate(),
                world_view_position: self.camera.eye(),
                world_light_position: self.light.position(),
                world_normal: basis.normal,
                world_tangent: basis.tangent,
                world_bitangent: basis.bitangent,
            },
        }
    }

    fn fragment(&self, varying: &Self::Varying) -> LinearRgba {
        let frame = TangentFrame::new(
            varying.world_normal,
            varying.world_tangent,
            varying.world_bitangent,
        );
        let tangent_normal = decode_normal(self.normal.sample(varying.tex_coords));
        let surface = SurfacePoint {
            position: varying.world_position,
            normal: frame.to_world(tangent_normal).normalize(),
            view_position: varying.world_view_position,
            light_position: varying.world_light_position,
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
