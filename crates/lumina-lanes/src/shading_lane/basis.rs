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

//! The tangent/bitangent/normal frame shared by both normal-mapping paths.
//!
//! The tangent-space variant builds this frame per vertex, the world-space
//! variant per fragment from interpolated vectors. Both go through
//! [`TangentFrame::new`], which is what makes the two paths produce the same
//! shading for the same surface.

use lumina_core::math::{Mat3, Vec3};

/// Re-orthogonalizes `tangent` against the unit `normal`.
///
/// Interpolation across a triangle lets the tangent drift out of the normal's
/// plane; subtracting the projection onto the normal restores orthogonality.
/// Applying it to an already-orthogonal pair returns the (normalized) tangent.
#[inline]
pub fn gram_schmidt(tangent: Vec3, normal: Vec3) -> Vec3 {
    (tangent - normal * tangent.dot(normal)).normalize()
}

/// An orthonormal tangent-to-world basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentFrame {
    /// Unit tangent (`u` direction).
    pub tangent: Vec3,
    /// Unit bitangent (`v` direction).
    pub bitangent: Vec3,
    /// Unit normal.
    pub normal: Vec3,
}

impl TangentFrame {
    /// Builds the frame from (possibly interpolated) basis vectors.
    ///
    /// The bitangent is recomputed as `cross(tangent, normal)` and flipped when
    /// it disagrees with the authored `bitangent`, so mirrored UV layouts keep
    /// their handedness.
    pub fn new(normal: Vec3, tangent: Vec3, bitangent: Vec3) -> Self {
        let normal = normal.normalize();
        let tangent = gram_schmidt(tangent, normal);
        let mut reconstructed = tangent.cross(normal);
        if reconstructed.dot(bitangent) < 0.0 {
            reconstructed = -reconstructed;
        }
        Self {
            tangent,
            bitangent: reconstructed,
            normal,
        }
    }

    /// The tangent-to-world matrix, columns `(T, B, N)`.
    #[inline]
    pub fn to_world_matrix(&self) -> Mat3 {
        Mat3::from_cols(self.tangent, self.bitangent, self.normal)
    }

    /// The world-to-tangent matrix: the transpose of [`Self::to_world_matrix`].
    #[inline]
    pub fn to_tangent_matrix(&self) -> Mat3 {
        self.to_world_matrix().transpose()
    }

    /// Carries a tangent-space vector to world space.
    #[inline]
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        self.to_world_matrix() * v
    }

    /// Carries a world-space vector to tangent space.
    #[inline]
    pub fn to_tangent(&self, v: Vec3) -> Vec3 {
        self.to_tangent_matrix() * v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn test_gram_schmidt_removes_normal_component() {
        let n = Vec3::Z;
        let t = gram_schmidt(Vec3::new(1.0, 0.0, 0.5), n);
        assert_vec3_eq(t, Vec3::X);
        assert_relative_eq!(t.dot(n), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_frame_is_orthonormal() {
        let frame = TangentFrame::new(
            Vec3::new(0.1, 0.2, 1.0),
            Vec3::new(1.0, 0.3, 0.0),
            Vec3::new(0.0, 1.0, 0.1),
        );
        assert_relative_eq!(frame.tangent.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(frame.bitangent.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(frame.tangent.dot(frame.normal), 0.0, epsilon = 1e-5);
        assert_relative_eq!(frame.bitangent.dot(frame.normal), 0.0, epsilon = 1e-5);
        assert_relative_eq!(frame.bitangent.dot(frame.tangent), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_bitangent_follows_authored_handedness() {
        let right_handed = TangentFrame::new(Vec3::Z, Vec3::X, Vec3::Y);
        assert_vec3_eq(right_handed.bitangent, Vec3::Y);
        let mirrored = TangentFrame::new(Vec3::Z, Vec3::X, -Vec3::Y);
        assert_vec3_eq(mirrored.bitangent, -Vec3::Y);
    }

    #[test]
    fn test_to_world_and_back() {
        let frame = TangentFrame::new(Vec3::Y, Vec3::X, -Vec3::Z);
        // A flat normal-map sample maps to the geometric normal.
        assert_vec3_eq(frame.to_world(Vec3::Z), Vec3::Y);
        let v = Vec3::new(0.3, -0.4, 0.8);
        assert_vec3_eq(frame.to_tangent(frame.to_world(v)), v);
    }
}
