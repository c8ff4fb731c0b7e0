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

//! The per-vertex record and its buffer layout (shader locations 0 to 4).

use crate::math::{Vec2, Vec3};
use crate::renderer::api::pipeline::{
    VertexAttributeDescriptor, VertexBufferLayoutDescriptor, VertexFormat, VertexStepMode,
};
use std::borrow::Cow;
use std::fmt;
use std::mem::size_of;

/// Shader location of the object-space position.
pub const POSITION_LOCATION: u32 = 0;
/// Shader location of the texture coordinate.
pub const TEX_COORDS_LOCATION: u32 = 1;
/// Shader location of the object-space normal.
pub const NORMAL_LOCATION: u32 = 2;
/// Shader location of the object-space tangent.
pub const TANGENT_LOCATION: u32 = 3;
/// Shader location of the object-space bitangent.
pub const BITANGENT_LOCATION: u32 = 4;

/// A mesh vertex as uploaded to the vertex buffer.
///
/// Meshes without a tangent basis still carry the tangent and bitangent slots
/// (zero-filled); the [`VertexAttributes`] declared for the mesh tell the
/// pipeline which slots hold authored data.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Texture coordinate.
    pub tex_coords: [f32; 2],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Object-space tangent, aligned with increasing `u`.
    pub tangent: [f32; 3],
    /// Object-space bitangent, aligned with increasing `v`.
    pub bitangent: [f32; 3],
}

const ATTRIBUTES: [VertexAttributeDescriptor; 5] = [
    VertexAttributeDescriptor {
        shader_location: POSITION_LOCATION,
        format: VertexFormat::Float32x3,
        offset: 0,
    },
    VertexAttributeDescriptor {
        shader_location: TEX_COORDS_LOCATION,
        format: VertexFormat::Float32x2,
        offset: 12,
    },
    VertexAttributeDescriptor {
        shader_location: NORMAL_LOCATION,
        format: VertexFormat::Float32x3,
        offset: 20,
    },
    VertexAttributeDescriptor {
        shader_location: TANGENT_LOCATION,
        format: VertexFormat::Float32x3,
        offset: 32,
    },
    VertexAttributeDescriptor {
        shader_location: BITANGENT_LOCATION,
        format: VertexFormat::Float32x3,
        offset: 44,
    },
];

impl ModelVertex {
    /// Creates a vertex without a tangent basis.
    pub fn new(position: Vec3, tex_coords: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            tex_coords: [tex_coords.x, tex_coords.y],
            normal: normal.to_array(),
            ..Default::default()
        }
    }

    /// Sets the tangent and bitangent.
    pub fn with_tangent_basis(mut self, tangent: Vec3, bitangent: Vec3) -> Self {
        self.tangent = tangent.to_array();
        self.bitangent = bitangent.to_array();
        self
    }

    /// Object-space position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position.into()
    }

    /// Texture coordinate.
    #[inline]
    pub fn tex_coords(&self) -> Vec2 {
        self.tex_coords.into()
    }

    /// Object-space normal.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal.into()
    }

    /// Object-space tangent.
    #[inline]
    pub fn tangent(&self) -> Vec3 {
        self.tangent.into()
    }

    /// Object-space bitangent.
    #[inline]
    pub fn bitangent(&self) -> Vec3 {
        self.bitangent.into()
    }

    /// The buffer layout carrying all five attributes.
    pub fn layout() -> VertexBufferLayoutDescriptor<'static> {
        VertexBufferLayoutDescriptor {
            array_stride: size_of::<ModelVertex>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Borrowed(&ATTRIBUTES),
        }
    }

    /// The buffer layout exposing only `attributes`, at their usual offsets.
    pub fn layout_for(attributes: VertexAttributes) -> VertexBufferLayoutDescriptor<'static> {
        VertexBufferLayoutDescriptor {
            array_stride: size_of::<ModelVertex>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Owned(
                ATTRIBUTES
                    .iter()
                    .filter(|attr| {
                        VertexAttributes::from_location(attr.shader_location)
                            .is_some_and(|a| attributes.contains(a))
                    })
                    .copied()
                    .collect(),
            ),
        }
    }
}

/// A set of per-vertex attributes a mesh provides or a variant requires.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VertexAttributes {
    bits: u8,
}

impl VertexAttributes {
    /// No attributes.
    pub const NONE: Self = Self { bits: 0 };
    /// Object-space position (location 0).
    pub const POSITION: Self = Self { bits: 1 << 0 };
    /// Texture coordinate (location 1).
    pub const TEX_COORDS: Self = Self { bits: 1 << 1 };
    /// Object-space normal (location 2).
    pub const NORMAL: Self = Self { bits: 1 << 2 };
    /// Object-space tangent (location 3).
    pub const TANGENT: Self = Self { bits: 1 << 3 };
    /// Object-space bitangent (location 4).
    pub const BITANGENT: Self = Self { bits: 1 << 4 };
    /// Position and texture coordinate.
    pub const TEXTURED: Self = Self::POSITION.union(Self::TEX_COORDS);
    /// Position, texture coordinate and normal.
    pub const LIT: Self = Self::TEXTURED.union(Self::NORMAL);
    /// Every attribute, tangent basis included.
    pub const ALL: Self = Self::LIT.union(Self::TANGENT).union(Self::BITANGENT);

    /// Combines two sets.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns `true` if every attribute of `other` is in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// The attributes of `self` missing from `available`.
    pub const fn missing_from(&self, available: Self) -> Self {
        Self {
            bits: self.bits & !available.bits,
        }
    }

    /// Returns `true` when the set is empty.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// The attribute bound at `location`, if any.
    pub const fn from_location(location: u32) -> Option<Self> {
        match location {
            POSITION_LOCATION => Some(Self::POSITION),
            TEX_COORDS_LOCATION => Some(Self::TEX_COORDS),
            NORMAL_LOCATION => Some(Self::NORMAL),
            TANGENT_LOCATION => Some(Self::TANGENT),
            BITANGENT_LOCATION => Some(Self::BITANGENT),
            _ => None,
        }
    }

    /// The attributes a per-vertex buffer layout feeds.
    pub fn from_layout(layout: &VertexBufferLayoutDescriptor<'_>) -> Self {
        layout
            .attributes
            .iter()
            .filter_map(|attr| Self::from_location(attr.shader_location))
            .fold(Self::NONE, Self::union)
    }

    fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            (Self::POSITION, "position"),
            (Self::TEX_COORDS, "tex_coords"),
            (Self::NORMAL, "normal"),
            (Self::TANGENT, "tangent"),
            (Self::BITANGENT, "bitangent"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

impl std::ops::BitOr for VertexAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Debug for VertexAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl fmt::Display for VertexAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.names().collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::pipeline::validate_vertex_buffers;

    #[test]
    fn test_model_vertex_size_matches_layout() {
        assert_eq!(size_of::<ModelVertex>(), 56);
        let layout = ModelVertex::layout();
        assert_eq!(layout.array_stride, 56);
        assert_eq!(layout.validate(), Ok(()));
        assert_eq!(VertexAttributes::from_layout(&layout), VertexAttributes::ALL);
    }

    #[test]
    fn test_layout_for_subset_keeps_offsets() {
        let layout = ModelVertex::layout_for(VertexAttributes::LIT);
        let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
        assert_eq!(layout.attribute(NORMAL_LOCATION).map(|a| a.offset), Some(20));
        assert!(validate_vertex_buffers(&[layout]).is_ok());
    }

    #[test]
    fn test_missing_attributes() {
        let missing = VertexAttributes::ALL.missing_from(VertexAttributes::LIT);
        assert_eq!(missing, VertexAttributes::TANGENT | VertexAttributes::BITANGENT);
        assert_eq!(missing.to_string(), "tangent, bitangent");
        assert!(VertexAttributes::TEXTURED.missing_from(VertexAttributes::ALL).is_empty());
    }

    #[test]
    fn test_accessors_roundtrip() {
        let v = ModelVertex::new(Vec3::new(1.0, 2.0, 3.0), Vec2::new(0.25, 0.75), Vec3::Y)
            .with_tangent_basis(Vec3::X, Vec3::Z);
        assert_eq!(v.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v.tex_coords(), Vec2::new(0.25, 0.75));
        assert_eq!(v.normal(), Vec3::Y);
        assert_eq!(v.tangent(), Vec3::X);
        assert_eq!(v.bitangent(), Vec3::Z);
    }
}
