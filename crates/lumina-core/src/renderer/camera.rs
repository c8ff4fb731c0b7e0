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

//! A yaw/pitch camera and its perspective projection.

use crate::math::{Mat4, Vec3, FRAC_PI_2};

/// Pitch is kept just short of straight up/down so the view basis stays defined.
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// A first-person camera described by a position and two Euler angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-space eye position.
    pub position: Vec3,
    /// Rotation around the world Y axis, in radians. Zero looks down +X.
    pub yaw: f32,
    /// Elevation above the horizon, in radians.
    pub pitch: f32,
}

impl Camera {
    /// Creates a camera; `pitch` is clamped to just under ±90°.
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2),
        }
    }

    /// The unit view direction.
    pub fn forward(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    /// The world-to-view matrix, or `None` if the view direction is degenerate.
    pub fn view_matrix(&self) -> Option<Mat4> {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }
}

/// A right-handed perspective projection with a `[0, 1]` depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    aspect: f32,
    fov_y: f32,
    z_near: f32,
    z_far: f32,
}

impl Projection {
    /// Creates a projection for a `width` x `height` viewport.
    pub fn new(width: u32, height: u32, fov_y: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fov_y,
            z_near,
            z_far,
        }
    }

    /// Updates the aspect ratio after the viewport changes size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// The projection matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_zo(self.fov_y, self.aspect, self.z_near, self.z_far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, degrees_to_radians};

    #[test]
    fn test_pitch_is_clamped() {
        let camera = Camera::new(Vec3::ZERO, 0.0, 10.0);
        assert!(camera.pitch < FRAC_PI_2);
        assert!(camera.view_matrix().is_some());
    }

    #[test]
    fn test_forward_from_yaw() {
        let camera = Camera::new(Vec3::ZERO, degrees_to_radians(90.0), 0.0);
        let f = camera.forward();
        assert!(approx_eq(f.z, 1.0));
        assert!(approx_eq(f.length(), 1.0));
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut projection = Projection::new(800, 600, 1.0, 0.1, 10.0);
        projection.resize(1000, 500);
        assert!(approx_eq(projection.aspect(), 2.0));
        projection.resize(10, 0);
        assert!(projection.aspect().is_finite());
    }
}
