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

//! Vertex-to-fragment varying records.
//!
//! Each variant has its own record type, so a fragment stage can only read
//! what its vertex stage wrote. [`VaryingSet`] names the same slots at runtime
//! for the shader composer and for program validation.

use lumina_core::math::{Vec2, Vec3, Vec4};
use std::fmt;

/// A varying record that can be blended across a triangle.
pub trait Interpolate: Copy + Send + Sync {
    /// Blends three vertex records with barycentric `weights` (summing to one).
    fn interpolate(a: &Self, b: &Self, c: &Self, weights: Vec3) -> Self;
}

impl Interpolate for () {
    #[inline]
    fn interpolate(_: &Self, _: &Self, _: &Self, _: Vec3) -> Self {}
}

macro_rules! impl_interpolate_linear {
    ($($ty:ty),+) => {
        $(
            impl Interpolate for $ty {
                #[inline]
                fn interpolate(a: &Self, b: &Self, c: &Self, weights: Vec3) -> Self {
                    *a * weights.x + *b * weights.y + *c * weights.z
                }
            }
        )+
    };
}

impl_interpolate_linear!(Vec2, Vec3, Vec4);

/// Derives [`Interpolate`] for a varying record, field by field.
macro_rules! impl_interpolate_fields {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl Interpolate for $ty {
            #[inline]
            fn interpolate(a: &Self, b: &Self, c: &Self, weights: Vec3) -> Self {
                Self {
                    $($field: Interpolate::interpolate(&a.$field, &b.$field, &c.$field, weights)),+
                }
            }
        }
    };
}

/// Varyings of the unlit textured variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TexturedVarying {
    /// Texture coordinate.
    pub tex_coords: Vec2,
}

impl_interpolate_fields!(TexturedVarying { tex_coords });

/// Varyings of the basic lit variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LitVarying {
    /// Texture coordinate.
    pub tex_coords: Vec2,
    /// World-space position of the shading point.
    pub world_position: Vec3,
    /// World-space geometric normal (unit at the vertices).
    pub world_normal: Vec3,
}

impl_interpolate_fields!(LitVarying {
    tex_coords,
    world_position,
    world_normal
});

/// Varyings of the tangent-space normal-mapped variant.
///
/// Positions are pre-transformed into the vertex's tangent frame so the
/// fragment stage can light with the normal-map sample as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TangentSpaceVarying {
    /// Texture coordinate.
    pub tex_coords: Vec2,
    /// Shading point, tangent space.
    pub tangent_position: Vec3,
    /// Eye position, tangent space.
    pub tangent_view_position: Vec3,
    /// Light position, tangent space.
    pub tangent_light_position: Vec3,
}

impl_interpolate_fields!(TangentSpaceVarying {
    tex_coords,
    tangent_position,
    tangent_view_position,
    tangent_light_position
});

/// Varyings of the world-space normal-mapped variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldSpaceVarying {
    /// Texture coordinate.
    pub tex_coords: Vec2,
    /// Shading point, world space.
    pub world_position: Vec3,
    /// Eye position, world space.
    pub world_view_position: Vec3,
    /// Light position, world space.
    pub world_light_position: Vec3,
    /// World-space normal.
    pub world_normal: Vec3,
    /// World-space tangent.
    pub world_tangent: Vec3,
    /// World-space bitangent.
    pub world_bitangent: Vec3,
}

impl_interpolate_fields!(WorldSpaceVarying {
    tex_coords,
    world_position,
    world_view_position,
    world_light_position,
    world_normal,
    world_tangent,
    world_bitangent,
});

/// Varyings of the skybox variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkyVarying {
    /// Normalized device coordinate of the pixel on the far plane.
    pub ndc: Vec2,
}

impl_interpolate_fields!(SkyVarying { ndc });

/// A set of named varying slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VaryingSet {
    bits: u16,
}

impl VaryingSet {
    /// No varyings besides the clip position.
    pub const NONE: Self = Self::from_bits(0);
    /// Texture coordinate.
    pub const TEX_COORDS: Self = Self::from_bits(1 << 0);
    /// World-space shading point.
    pub const WORLD_POSITION: Self = Self::from_bits(1 << 1);
    /// World-space eye position.
    pub const WORLD_VIEW_POSITION: Self = Self::from_bits(1 << 2);
    /// World-space light position.
    pub const WORLD_LIGHT_POSITION: Self = Self::from_bits(1 << 3);
    /// World-space normal.
    pub const WORLD_NORMAL: Self = Self::from_bits(1 << 4);
    /// World-space tangent.
    pub const WORLD_TANGENT: Self = Self::from_bits(1 << 5);
    /// World-space bitangent.
    pub const WORLD_BITANGENT: Self = Self::from_bits(1 << 6);
    /// Tangent-space shading point.
    pub const TANGENT_POSITION: Self = Self::from_bits(1 << 7);
    /// Tangent-space eye position.
    pub const TANGENT_VIEW_POSITION: Self = Self::from_bits(1 << 8);
    /// Tangent-space light position.
    pub const TANGENT_LIGHT_POSITION: Self = Self::from_bits(1 << 9);
    /// Far-plane normalized device coordinate.
    pub const NDC_POSITION: Self = Self::from_bits(1 << 10);

    const NAMES: [(Self, &'static str); 11] = [
        (Self::TEX_COORDS, "tex_coords"),
        (Self::WORLD_POSITION, "world_position"),
        (Self::WORLD_VIEW_POSITION, "world_view_position"),
        (Self::WORLD_LIGHT_POSITION, "world_light_position"),
        (Self::WORLD_NORMAL, "world_normal"),
        (Self::WORLD_TANGENT, "world_tangent"),
        (Self::WORLD_BITANGENT, "world_bitangent"),
        (Self::TANGENT_POSITION, "tangent_position"),
        (Self::TANGENT_VIEW_POSITION, "tangent_view_position"),
        (Self::TANGENT_LIGHT_POSITION, "tangent_light_position"),
        (Self::NDC_POSITION, "ndc"),
    ];

    const fn from_bits(bits: u16) -> Self {
        Self { bits }
    }

    /// Combines two sets.
    pub const fn union(self, other: Self) -> Self {
        Self::from_bits(self.bits | other.bits)
    }

    /// Returns `true` if every slot of `other` is in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// The slots of `self` that `available` lacks.
    pub const fn missing_from(&self, available: Self) -> Self {
        Self::from_bits(self.bits & !available.bits)
    }

    /// Returns `true` when the set is empty.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of slots in the set.
    pub const fn len(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Slot names in declaration order; the order the shader composer emits them.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::NAMES
            .into_iter()
            .filter(move |(slot, _)| self.contains(*slot))
            .map(|(_, name)| name)
    }
}

impl std::ops::BitOr for VaryingSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Debug for VaryingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl fmt::Display for VaryingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.names().collect();
        write!(f, "{}", names.join(", "))
    }
}
