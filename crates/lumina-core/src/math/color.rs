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

//! Defines the `LinearRgba` color type and associated operations.

use crate::math::vector::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A color in **linear RGBA** space with `f32` components.
///
/// Shading math (lighting sums, texture modulation) is only correct in a linear
/// space. Components may exceed `1.0`; clamping to the displayable range is the
/// framebuffer's business, not the shading stage's.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque white (`[1.0, 1.0, 1.0, 1.0]`).
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black (`[0.0, 0.0, 0.0, 0.0]`).
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new `LinearRgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `LinearRgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Builds a color from an RGB vector and an explicit alpha.
    #[inline]
    pub fn from_rgb_alpha(rgb: Vec3, a: f32) -> Self {
        Self::new(rgb.x, rgb.y, rgb.z, a)
    }

    /// Creates a `LinearRgba` from a [`Vec4`] in `(r, g, b, a)` order.
    #[inline]
    pub fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Converts this color to a [`Vec4`].
    #[inline]
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    /// The RGB channels as a [`Vec3`], dropping alpha.
    #[inline]
    pub fn rgb_vec(&self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Returns a copy of this color with a new alpha value.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// The largest of the three color channels, ignoring alpha.
    #[inline]
    pub fn max_channel(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }
}

impl Default for LinearRgba {
    /// Defaults to opaque white, the neutral element of texture modulation.
    fn default() -> Self {
        Self::WHITE
    }
}

impl Add for LinearRgba {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl Sub for LinearRgba {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a - rhs.a)
    }
}

impl Mul<f32> for LinearRgba {
    type Output = Self;
    /// Scales all four components, alpha included.
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

impl Mul for LinearRgba {
    type Output = Self;
    /// Component-wise modulation.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

impl From<[f32; 4]> for LinearRgba {
    #[inline]
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_vec_roundtrip() {
        let c = LinearRgba::from_rgb_alpha(Vec3::new(0.1, 0.2, 0.3), 0.5);
        assert_eq!(c.rgb_vec(), Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(c.a, 0.5);
        assert_eq!(LinearRgba::from_vec4(c.to_vec4()), c);
    }

    #[test]
    fn test_modulation() {
        let c = LinearRgba::new(0.5, 1.0, 0.25, 1.0) * LinearRgba::new(0.5, 0.5, 4.0, 0.5);
        assert_eq!(c, LinearRgba::new(0.25, 0.5, 1.0, 0.5));
        assert_eq!(c.max_channel(), 1.0);
        assert_eq!(c.with_alpha(1.0).a, 1.0);
    }
}
