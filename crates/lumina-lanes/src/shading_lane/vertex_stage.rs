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

//! Vertex math shared by every variant.
//!
//! Each helper is a pure function of one vertex, one instance and the
//! read-only camera/light blocks.

use super::basis::TangentFrame;
use lumina_core::math::{Vec3, Vec4};
use lumina_core::renderer::api::{CameraUniform, InstanceTransform, LightUniform, ModelVertex};

/// Object-space position to homogeneous world position (`w = 1` in, model applied).
#[inline]
pub fn world_position(transform: &InstanceTransform, vertex: &ModelVertex) -> Vec4 {
    transform.world_position(vertex.position())
}

/// World position to clip space through `view_proj`.
#[inline]
pub fn clip_position(camera: &CameraUniform, world: Vec4) -> Vec4 {
    camera.view_proj_matrix() * world
}

/// The vertex's basis carried to world space by the normal matrix.
///
/// Tangent and bitangent read zero on meshes without a tangent basis; they
/// come out as zero vectors, never NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBasis {
    /// Unit world normal.
    pub normal: Vec3,
    /// Unit world tangent.
    pub tangent: Vec3,
    /// Unit world bitangent.
    pub bitangent: Vec3,
}

impl WorldBasis {
    /// Transforms and normalizes the vertex basis.
    pub fn from_vertex(transform: &InstanceTransform, vertex: &ModelVertex) -> Self {
        Self {
            normal: transform.world_direction(vertex.normal()).normalize(),
            tangent: transform.world_direction(vertex.tangent()).normalize(),
            bitangent: transform.world_direction(vertex.bitangent()).normalize(),
        }
    }

    /// The orthonormal tangent frame built from this basis.
    #[inline]
    pub fn frame(&self) -> TangentFrame {
        TangentFrame::new(self.normal, self.tangent, self.bitangent)
    }
}

/// Shading point, eye and light expressed in one vertex's tangent space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentSpacePositions {
    /// Shading point.
    pub position: Vec3,
    /// Camera position.
    pub view_position: Vec3,
    /// Light position.
    pub light_position: Vec3,
}

impl TangentSpacePositions {
    /// Pre-transforms the three lighting positions with the world-to-tangent matrix.
    pub fn new(
        frame: &TangentFrame,
        world_position: Vec3,
        camera: &CameraUniform,
        light: &LightUniform,
    ) -> Self {
        let to_tangent = frame.to_tangent_matrix();
        Self {
            position: to_tangent * world_position,
            view_position: to_tangent * camera.eye(),
            light_position: to_tangent * light.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumina_core::math::{Mat3, Mat4, Vec2};
    use lumina_core::renderer::api::InstanceRaw;

    #[test]
    fn test_clip_position_is_view_proj_times_model() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let transform = InstanceTransform::new(model, Mat3::IDENTITY);
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let proj = Mat4::perspective_rh_zo(1.0, 1.5, 0.1, 100.0);
        let camera = CameraUniform::from_matrices(Vec3::new(0.0, 0.0, 5.0), view, proj);
        let vertex = ModelVertex::new(Vec3::new(0.5, -0.5, 0.25), Vec2::ZERO, Vec3::Z);

        let clip = clip_position(&camera, world_position(&transform, &vertex));
        let expected = proj * view * model * vertex.position().extend(1.0);
        for i in 0..4 {
            assert_relative_eq!(clip[i], expected[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn test_world_basis_is_normalized() {
        let model = Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0));
        let transform = InstanceRaw::from_model(model).transform();
        let vertex = ModelVertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::new(1.0, 1.0, 0.0).normalize())
            .with_tangent_basis(Vec3::X, Vec3::Y);
        let basis = WorldBasis::from_vertex(&transform, &vertex);
        assert_relative_eq!(basis.normal.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(basis.tangent.length(), 1.0, epsilon = 1e-5);
        // Non-uniform scale tilts the normal away from the stretched axis.
        assert!(basis.normal.y > basis.normal.x);
    }

    #[test]
    fn test_missing_tangent_basis_yields_zero_vectors() {
        let vertex = ModelVertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::Z);
        let transform = InstanceRaw::default().transform();
        let basis = WorldBasis::from_vertex(&transform, &vertex);
        assert_eq!(basis.tangent, Vec3::ZERO);
        assert_eq!(basis.bitangent, Vec3::ZERO);
    }

    #[test]
    fn test_tangent_space_positions() {
        let frame = TangentFrame::new(Vec3::Y, Vec3::X, -Vec3::Z);
        let camera = CameraUniform::from_matrices(Vec3::new(0.0, 3.0, 0.0), Mat4::IDENTITY, Mat4::IDENTITY);
        let light = LightUniform::new(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE);
        let positions = TangentSpacePositions::new(&frame, Vec3::ZERO, &camera, &light);
        // World up is the tangent-space normal axis.
        assert_relative_eq!(positions.view_position.z, 3.0, epsilon = 1e-5);
        assert_relative_eq!(positions.light_position.x, 2.0, epsilon = 1e-5);
        assert_eq!(positions.position, Vec3::ZERO);
    }
}
