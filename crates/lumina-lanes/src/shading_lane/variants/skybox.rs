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

use crate::shading_lane::{ShadingStages, SkyVarying, VaryingSet, VertexOutput};
use lumina_core::math::{LinearRgba, Vec2, Vec3, Vec4};
use lumina_core::renderer::api::{CameraUniform, CubeBinding, InstanceRaw, ModelVertex, VertexAttributes};

/// Corners of the triangle covering the whole viewport, in NDC.
///
/// Matches the corners the WGSL vertex stage derives from `vertex_index`.
pub const FULLSCREEN_TRIANGLE: [Vec2; 3] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(3.0, -1.0),
    Vec2::new(-1.0, 3.0),
];

/// The environment cube drawn behind the scene.
///
/// Each pixel is pushed to the far plane and the camera's inverse matrices
/// turn it back into a world-space view ray, which selects the cube texel.
#[derive(Debug, Clone, Copy)]
pub struct Skybox<'a> {
    camera: &'a CameraUniform,
    environment: CubeBinding<'a>,
}

impl<'a> Skybox<'a> {
    /// Creates the stage pair.
    pub fn new(camera: &'a CameraUniform, environment: CubeBinding<'a>) -> Self {
        Self { camera, environment }
    }

    /// The full-screen triangle as vertices for the CPU path.
    pub fn fullscreen_triangle() -> [ModelVertex; 3] {
        FULLSCREEN_TRIANGLE.map(|corner| ModelVertex::new(Vec3::new(corner.x, corner.y, 1.0), Vec2::ZERO, Vec3::ZERO))
    }

    /// World-space view direction through the pixel at `ndc`.
    pub fn view_ray(&self, ndc: Vec2) -> Vec3 {
        let view = self.camera.inv_proj_matrix() * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let direction = view.project().extend(0.0);
        (self.camera.inv_view_matrix() * direction).truncate().normalize()
    }
}

impl ShadingStages for Skybox<'_> {
    type Varying = SkyVarying;

    const NAME: &'static str = "Skybox";
    const REQUIRED_ATTRIBUTES: VertexAttributes = VertexAttributes::NONE;
    const VARYINGS_WRITTEN: VaryingSet = VaryingSet::NDC_POSITION;
    const VARYINGS_READ: VaryingSet = VaryingSet::NDC_POSITION;

    /// Reads the NDC corner from `position.xy`; the instance is ignored.
    fn vertex(&self, vertex: &ModelVertex, _instance: &InstanceRaw) -> VertexOutput<Self::Varying> {
        let corner = vertex.position();
        VertexOutput {
            clip_position: Vec4::new(corner.x, corner.y, 1.0, 1.0),
            varying: SkyVarying {
                ndc: Vec2::new(corner.x, corner.y),
            },
        }
    }

    fn fragment(&self, varying: &Self::Varying) -> LinearRgba {
        self.environment.sample(self.view_ray(varying.ndc)).with_alpha(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumina_core::math::{Mat4, FRAC_PI_2};
    use lumina_core::renderer::api::{CubeTexture, Sampler, Texture2d};

    fn labelled_cube() -> CubeTexture {
        let face = |v: f32| Texture2d::solid(LinearRgba::rgb(v, v, v));
        CubeTexture::new([face(0.0), face(1.0), face(2.0), face(3.0), face(4.0), face(5.0)])
            .expect("six equal faces")
    }

    #[test]
    fn test_center_pixel_looks_down_the_camera_axis() {
        let camera = CameraUniform::from_matrices(
            Vec3::ZERO,
            Mat4::IDENTITY,
            Mat4::perspective_rh_zo(FRAC_PI_2, 1.0, 0.1, 100.0),
        );
        let cube = labelled_cube();
        let sampler = Sampler::NEAREST_CLAMP;
        let sky = Skybox::new(&camera, CubeBinding::new(&cube, &sampler));

        let ray = sky.view_ray(Vec2::ZERO);
        assert_relative_eq!(ray.z, -1.0, epsilon = 1e-4);

        // -Z is the sixth face.
        let color = sky.fragment(&SkyVarying { ndc: Vec2::ZERO });
        assert_eq!(color, LinearRgba::rgb(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_fullscreen_triangle_covers_the_viewport() {
        let camera = CameraUniform::default();
        let cube = labelled_cube();
        let sampler = Sampler::NEAREST_CLAMP;
        let sky = Skybox::new(&camera, CubeBinding::new(&cube, &sampler));
        let clips: Vec<Vec4> = Skybox::fullscreen_triangle()
            .iter()
            .map(|v| sky.vertex(v, &InstanceRaw::default()).clip_position)
            .collect();
        assert_eq!(clips[0], Vec4::new(-1.0, -1.0, 1.0, 1.0));
        assert_eq!(clips[1], Vec4::new(3.0, -1.0, 1.0, 1.0));
        assert_eq!(clips[2], Vec4::new(-1.0, 3.0, 1.0, 1.0));
    }
}
