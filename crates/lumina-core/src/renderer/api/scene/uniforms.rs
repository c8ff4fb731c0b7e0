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

//! GPU-compatible uniform blocks for the camera (group 1) and light (group 2).
//!
//! These structures use `#[repr(C)]` with explicit padding so their byte layout
//! matches the std140 rules WGSL applies to uniform buffers.

use crate::math::{Mat4, Vec3, Vec4};
use crate::renderer::camera::{Camera, Projection};

/// Camera data bound at group 1, binding 0.
///
/// # Memory Layout
///
/// 16 bytes of view position followed by four 64-byte matrices, 272 bytes in
/// total. Every member is 16-byte aligned, so no padding is needed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// World-space eye position, homogeneous (`w = 1`).
    pub view_position: [f32; 4],
    /// World-to-view matrix.
    pub view: [[f32; 4]; 4],
    /// `projection * view`.
    pub view_proj: [[f32; 4]; 4],
    /// Inverse of the projection matrix.
    pub inv_proj: [[f32; 4]; 4],
    /// Inverse of the view matrix.
    pub inv_view: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view_position: [0.0, 0.0, 0.0, 1.0],
            view: identity,
            view_proj: identity,
            inv_proj: identity,
            inv_view: identity,
        }
    }
}

impl CameraUniform {
    /// Builds a uniform from an eye position and explicit view/projection matrices.
    pub fn from_matrices(eye: Vec3, view: Mat4, projection: Mat4) -> Self {
        let mut uniform = Self::default();
        uniform.set_matrices(eye, view, projection);
        uniform
    }

    /// Refreshes every field from a camera and projection, once per frame.
    ///
    /// `view_proj` is always `projection * view`.
    pub fn update_view_projection(&mut self, camera: &Camera, projection: &Projection) {
        match camera.view_matrix() {
            Some(view) => self.set_matrices(camera.position, view, projection.matrix()),
            None => log::error!(
                "CameraUniform: camera at {:?} has a degenerate view direction, keeping the previous matrices",
                camera.position
            ),
        }
    }

    fn set_matrices(&mut self, eye: Vec3, view: Mat4, projection: Mat4) {
        self.view_position = eye.extend(1.0).to_array();
        self.view = view.to_cols_array_2d();
        self.view_proj = (projection * view).to_cols_array_2d();
        self.inv_proj = projection
            .inverse()
            .unwrap_or_else(|| {
                log::error!("CameraUniform: singular projection matrix, inverse set to identity");
                Mat4::IDENTITY
            })
            .to_cols_array_2d();
        self.inv_view = view
            .inverse()
            .unwrap_or_else(|| {
                log::error!("CameraUniform: singular view matrix, inverse set to identity");
                Mat4::IDENTITY
            })
            .to_cols_array_2d();
    }

    /// World-space eye position.
    #[inline]
    pub fn eye(&self) -> Vec3 {
        Vec4::from(self.view_position).truncate()
    }

    /// World-to-view matrix.
    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view)
    }

    /// View-projection matrix.
    #[inline]
    pub fn view_proj_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }

    /// Inverse projection matrix.
    #[inline]
    pub fn inv_proj_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inv_proj)
    }

    /// Inverse view matrix.
    #[inline]
    pub fn inv_view_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inv_view)
    }
}

/// The single point light bound at group 2, binding 0.
///
/// # Memory Layout
///
/// A `vec3<f32>` occupies 16 bytes in a uniform block, so each field is
/// followed by a padding float. Total size: 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// World-space light position.
    pub position: [f32; 3],
    _padding: f32,
    /// Linear RGB light color.
    pub color: [f32; 3],
    _padding2: f32,
}

impl LightUniform {
    /// Creates a light uniform from a position and color.
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            _padding: 0.0,
            color: color.to_array(),
            _padding2: 0.0,
        }
    }

    /// World-space light position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position.into()
    }

    /// Linear RGB light color.
    #[inline]
    pub fn color(&self) -> Vec3 {
        self.color.into()
    }
}

impl Default for LightUniform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{degrees_to_radians, Vec4};
    use approx::assert_relative_eq;
    use std::mem::size_of;

    #[test]
    fn test_uniform_sizes_are_16_byte_multiples() {
        assert_eq!(size_of::<CameraUniform>(), 272);
        assert_eq!(size_of::<LightUniform>(), 32);
        assert_eq!(size_of::<CameraUniform>() % 16, 0);
    }

    #[test]
    fn test_update_view_projection() {
        let camera = Camera::new(Vec3::new(0.0, 1.0, 4.0), degrees_to_radians(-90.0), 0.0);
        let projection = Projection::new(800, 600, degrees_to_radians(45.0), 0.1, 100.0);
        let mut uniform = CameraUniform::default();
        uniform.update_view_projection(&camera, &projection);

        assert_eq!(uniform.eye(), Vec3::new(0.0, 1.0, 4.0));
        let vp = uniform.view_proj_matrix();
        let expected = projection.matrix() * camera.view_matrix().expect("valid camera");
        assert_eq!(vp, expected);

        // The inverses undo their matrices.
        let p = Vec4::new(0.3, -0.2, 0.5, 1.0);
        let back = uniform.inv_view_matrix() * (uniform.view_matrix() * p);
        assert_relative_eq!(back.x, p.x, epsilon = 1e-4);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-4);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-4);
        let back = uniform.inv_proj_matrix() * (projection.matrix() * p);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-4);
    }

    #[test]
    fn test_light_uniform_padding() {
        let light = LightUniform::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.5, 0.5));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&light));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.0, 0.5, 0.5, 0.5, 0.0]);
        assert_eq!(light.color(), Vec3::splat(0.5));
    }
}
