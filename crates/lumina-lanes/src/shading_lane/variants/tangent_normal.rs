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

use crate::shading_lane::fragment_stage::{blinn_phong, compose, decode_normal, SurfacePoint};
use crate::shading_lane::vertex_stage::{clip_position, world_position, TangentSpacePositions, WorldBasis};
use crate::shading_lane::{ShadingSettings, ShadingStages, TangentSpaceVarying, VaryingSet, VertexOutput};
use lumina_core::math::LinearRgba;
use lumina_core::renderer::api::{
    CameraUniform, InstanceRaw, LightUniform, ModelVertex, TextureBinding, VertexAttributes,
};

/// Normal mapping lit in tangent space.
///
/// The vertex stage moves the shading point, eye and light into the vertex's
/// tangent frame, so the fragment stage uses the decoded normal-map sample
/// as its normal without any basis math.
#[derive(Debug, Clone, Copy)]
pub struct NormalMappedTangent<'a> {
    camera: &'a CameraUniform,
    light: &'a LightUniform,
    diffuse: TextureBinding<'a>,
    normal: TextureBinding<'a>,
    settings: ShadingSettings,
}

impl<'a> NormalMappedTangent<'a> {
    /// Creates the stage pair.
    pub fn new(
        camera: &'a CameraUniform,
        light: &'a LightUniform,
        diffuse: TextureBinding<'a>,
        normal: TextureBinding<'a>,
        settings: ShadingSettings,
    ) -> Self {
        Self {
            camera,
            light,
            diffuse,
            normal,
            settings,
        }
    }
}

impl ShadingStages for NormalMappedTangent<'_> {
    type Varying = TangentSpaceVarying;

    const NAME: &'static str = "NormalMappedTangent";
    const REQUIRED_ATTRIBUTES: VertexAttributes = VertexAttributes::ALL;
    const VARYINGS_WRITTEN: VaryingSet = VaryingSet::TEX_COORDS
        .union(VaryingSet::TANGENT_POSITION)
        .union(VaryingSet::TANGENT_VIEW_POSITION)
        .union(VaryingSet::TANGENT_LIGHT_POSITION);
    const VARYINGS_READ: VaryingSet = Self::VARYINGS_WRITTEN;

    fn vertex(&self, vertex: &ModelVertex, instance: &InstanceRaw) -> VertexOutput<Self::Varying> {
        let transform = instance.transform();
        let world = world_position(&transform, vertex);
        let frame = WorldBasis::from_vertex(&transform, vertex).frame();
        let positions = TangentSpacePositions::new(&frame, world.truncate(), self.camera, self.light);
        VertexOutput {
            clip_position: clip_position(self.camera, world),
            varying: TangentSpaceVarying {
                tex_coords: vertex.tex_coords(),
                tangent_position: positions.position,
                tangent_view_position: positions.view_position,
                tangent_light_position: positions.light_position,
            },
        }
    }

    fn fragment(&self, varying: &Self::Varying) -> LinearRgba {
        let surface = SurfacePoint {
            position: varying.tangent_position,
            normal: decode_normal(self.normal.sample(varying.tex_coords)),
            view_position: varying.tangent_view_position,
            light_position: varying.tangent_light_position,
        };
        let terms = blinn_phong(&surface, self.light.color(), &self.settings);
        compose(
            terms.combine(self.settings.combine),
            self.diffuse.sample(varying.tex_coords),
        )
    }
}
