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

use crate::shading_lane::vertex_stage::{clip_position, world_position};
use crate::shading_lane::{ShadingStages, TexturedVarying, VaryingSet, VertexOutput};
use lumina_core::math::LinearRgba;
use lumina_core::renderer::api::{CameraUniform, InstanceRaw, ModelVertex, TextureBinding, VertexAttributes};

/// The diffuse texture, unlit.
#[derive(Debug, Clone, Copy)]
pub struct UnlitTextured<'a> {
    camera: &'a CameraUniform,
    diffuse: TextureBinding<'a>,
}

impl<'a> UnlitTextured<'a> {
    /// Creates the stage pair.
    pub fn new(camera: &'a CameraUniform, diffuse: TextureBinding<'a>) -> Self {
        Self { camera, diffuse }
    }
}

impl ShadingStages for UnlitTextured<'_> {
    type Varying = TexturedVarying;

    const NAME: &'static str = "UnlitTextured";
    const REQUIRED_ATTRIBUTES: VertexAttributes = VertexAttributes::TEXTURED;
    const VARYINGS_WRITTEN: VaryingSet = VaryingSet::TEX_COORDS;
    const VARYINGS_READ: VaryingSet = VaryingSet::TEX_COORDS;

    fn vertex(&self, vertex: &ModelVertex, instance: &InstanceRaw) -> VertexOutput<Self::Varying> {
        let world = world_position(&instance.transform(), vertex);
        VertexOutput {
            clip_position: clip_position(self.camera, world),
            varying: TexturedVarying {
                tex_coords: vertex.tex_coords(),
            },
        }
    }

    fn fragment(&self, varying: &Self::Varying) -> LinearRgba {
        self.diffuse.sample(varying.tex_coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_core::math::{Vec2, Vec3};
    use lumina_core::renderer::api::{Sampler, Texture2d};

    #[test]
    fn test_returns_the_texel_unmodified() {
        let texel = LinearRgba::new(0.2, 0.4, 0.6, 0.5);
        let texture = Texture2d::solid(texel);
        let camera = CameraUniform::default();
        let stages = UnlitTextured::new(&camera, TextureBinding::new(&texture, &Sampler::LINEAR_REPEAT));

        let vertex = ModelVertex::new(Vec3::new(0.5, 0.5, 0.0), Vec2::new(0.3, 0.7), Vec3::Z);
        let out = stages.vertex(&vertex, &InstanceRaw::default());
        assert_eq!(out.varying.tex_coords, Vec2::new(0.3, 0.7));
        assert_eq!(out.clip_position, vertex.position().extend(1.0));
        assert_eq!(stages.fragment(&out.varying), texel);
    }
}
