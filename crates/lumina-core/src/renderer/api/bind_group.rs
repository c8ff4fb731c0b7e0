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

//! Bind group layout descriptors and shader stage visibility flags.

use crate::renderer::error::LayoutError;
use std::num::NonZeroU64;

/// A set of shader stages a binding is visible to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderStageFlags {
    bits: u32,
}

impl ShaderStageFlags {
    /// No shader stages.
    pub const NONE: Self = Self { bits: 0 };
    /// Vertex shader stage.
    pub const VERTEX: Self = Self { bits: 1 << 0 };
    /// Fragment shader stage.
    pub const FRAGMENT: Self = Self { bits: 1 << 1 };
    /// Both graphics stages.
    pub const VERTEX_FRAGMENT: Self = Self {
        bits: Self::VERTEX.bits | Self::FRAGMENT.bits,
    };

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns `true` if every stage in `other` is also in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl std::ops::BitOr for ShaderStageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Describes the type of buffer binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferBindingType {
    /// A uniform buffer.
    Uniform,
}

/// The dimension of a texture view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureViewDimension {
    /// A 2D texture view.
    D2,
    /// A cube texture view (six square faces).
    Cube,
}

/// The type of value a texture returns when sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSampleType {
    /// A floating-point texture sample.
    Float {
        /// Whether the texture can be sampled through a filtering sampler.
        filterable: bool,
    },
}

/// The type of sampler binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerBindingType {
    /// A filtering sampler.
    Filtering,
    /// A non-filtering sampler.
    NonFiltering,
}

/// The type of resource bound at a binding point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingType {
    /// A buffer binding.
    Buffer {
        /// The type of buffer binding.
        ty: BufferBindingType,
        /// Minimum size required for the buffer binding.
        min_binding_size: Option<NonZeroU64>,
    },
    /// A sampled texture binding.
    Texture {
        /// The type of value the texture yields.
        sample_type: TextureSampleType,
        /// The dimension of the texture view.
        view_dimension: TextureViewDimension,
    },
    /// A sampler binding.
    Sampler(SamplerBindingType),
}

/// Describes a single binding entry in a bind group layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindGroupLayoutEntry {
    /// The binding index (e.g., `@binding(0)` in WGSL).
    pub binding: u32,
    /// Which shader stages can access this binding.
    pub visibility: ShaderStageFlags,
    /// The type of resource being bound.
    pub ty: BindingType,
}

impl BindGroupLayoutEntry {
    /// A uniform buffer of at least `size` bytes.
    pub fn uniform(binding: u32, visibility: ShaderStageFlags, size: u64) -> Self {
        Self {
            binding,
            visibility,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                min_binding_size: NonZeroU64::new(size),
            },
        }
    }

    /// A filterable float texture of the given dimension.
    pub fn texture(binding: u32, visibility: ShaderStageFlags, view_dimension: TextureViewDimension) -> Self {
        Self {
            binding,
            visibility,
            ty: BindingType::Texture {
                sample_type: TextureSampleType::Float { filterable: true },
                view_dimension,
            },
        }
    }

    /// A filtering sampler.
    pub fn sampler(binding: u32, visibility: ShaderStageFlags) -> Self {
        Self {
            binding,
            visibility,
            ty: BindingType::Sampler(SamplerBindingType::Filtering),
        }
    }
}

/// Describes a bind group layout to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindGroupLayoutDescriptor {
    /// Optional debug label.
    pub label: Option<&'static str>,
    /// The entries in this bind group layout.
    pub entries: Vec<BindGroupLayoutEntry>,
}

impl BindGroupLayoutDescriptor {
    /// Returns the entry at `binding`, if declared.
    pub fn entry(&self, binding: u32) -> Option<&BindGroupLayoutEntry> {
        self.entries.iter().find(|e| e.binding == binding)
    }

    /// Checks that no binding index is declared twice. `group` only feeds the error.
    pub fn validate(&self, group: u32) -> Result<(), LayoutError> {
        for (i, a) in self.entries.iter().enumerate() {
            if self.entries[i + 1..].iter().any(|b| b.binding == a.binding) {
                return Err(LayoutError::DuplicateBinding {
                    group,
                    binding: a.binding,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_flags() {
        let both = ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT;
        assert_eq!(both, ShaderStageFlags::VERTEX_FRAGMENT);
        assert!(both.contains(ShaderStageFlags::FRAGMENT));
        assert!(!ShaderStageFlags::VERTEX.contains(ShaderStageFlags::FRAGMENT));
        assert!(ShaderStageFlags::VERTEX.contains(ShaderStageFlags::NONE));
    }

    #[test]
    fn test_duplicate_binding_is_rejected() {
        let layout = BindGroupLayoutDescriptor {
            label: Some("material"),
            entries: vec![
                BindGroupLayoutEntry::texture(0, ShaderStageFlags::FRAGMENT, TextureViewDimension::D2),
                BindGroupLayoutEntry::sampler(0, ShaderStageFlags::FRAGMENT),
            ],
        };
        assert_eq!(
            layout.validate(0),
            Err(LayoutError::DuplicateBinding {
                group: 0,
                binding: 0
            })
        );
    }

    #[test]
    fn test_uniform_entry_records_size() {
        let entry = BindGroupLayoutEntry::uniform(0, ShaderStageFlags::VERTEX_FRAGMENT, 288);
        assert_eq!(
            entry.ty,
            BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                min_binding_size: NonZeroU64::new(288),
            }
        );
    }
}
