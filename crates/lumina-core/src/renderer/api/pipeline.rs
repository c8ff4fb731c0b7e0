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

//! Vertex input and color output descriptors for render pipelines.
//!
//! These mirror the shape of the backend's pipeline-state structures without
//! depending on any backend crate, so the shading core can describe the
//! buffers it consumes and the collaborator can translate them 1:1.

use crate::renderer::error::LayoutError;
use std::borrow::Cow;

/// The memory format of a single vertex attribute.
///
/// Only the 32-bit float formats the shading pipeline consumes are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// One 32-bit float component.
    Float32,
    /// Two 32-bit float components.
    Float32x2,
    /// Three 32-bit float components.
    Float32x3,
    /// Four 32-bit float components.
    Float32x4,
}

impl VertexFormat {
    /// Returns the size in bytes of this vertex format.
    pub const fn size(&self) -> u64 {
        match self {
            VertexFormat::Float32 => 4,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }

    /// Number of scalar components.
    pub const fn components(&self) -> u32 {
        match self {
            VertexFormat::Float32 => 1,
            VertexFormat::Float32x2 => 2,
            VertexFormat::Float32x3 => 3,
            VertexFormat::Float32x4 => 4,
        }
    }
}

/// Defines how often the GPU advances to the next element in a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexStepMode {
    /// The GPU advances to the next element for each vertex.
    Vertex,
    /// The GPU advances to the next element only for each new instance.
    Instance,
}

/// Describes a single vertex attribute within a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttributeDescriptor {
    /// The shader location (`@location(n)`) this attribute feeds.
    pub shader_location: u32,
    /// The format of the attribute data.
    pub format: VertexFormat,
    /// Byte offset of this attribute from the start of the element.
    pub offset: u64,
}

impl VertexAttributeDescriptor {
    /// Byte offset one past the last byte of this attribute.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.offset + self.format.size()
    }
}

/// Describes how one vertex buffer is laid out in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexBufferLayoutDescriptor<'a> {
    /// Byte distance between consecutive elements.
    pub array_stride: u64,
    /// Whether elements advance per vertex or per instance.
    pub step_mode: VertexStepMode,
    /// The attributes read from each element.
    pub attributes: Cow<'a, [VertexAttributeDescriptor]>,
}

impl VertexBufferLayoutDescriptor<'_> {
    /// Checks that every attribute lies inside the stride and that no two
    /// attributes share bytes.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for attr in self.attributes.iter() {
            if attr.end() > self.array_stride {
                return Err(LayoutError::AttributeOutOfBounds {
                    location: attr.shader_location,
                    end: attr.end(),
                    stride: self.array_stride,
                });
            }
        }
        for (i, a) in self.attributes.iter().enumerate() {
            for b in self.attributes.iter().skip(i + 1) {
                if a.offset < b.end() && b.offset < a.end() {
                    return Err(LayoutError::OverlappingAttributes {
                        first: a.shader_location,
                        second: b.shader_location,
                    });
                }
            }
        }
        Ok(())
    }

    /// Looks up the attribute bound to `location`, if this buffer feeds it.
    pub fn attribute(&self, location: u32) -> Option<&VertexAttributeDescriptor> {
        self.attributes
            .iter()
            .find(|attr| attr.shader_location == location)
    }
}

/// Validates a full set of vertex buffers as they would be bound together.
///
/// Each buffer must be internally consistent and no shader location may be
/// claimed by more than one attribute across all buffers.
pub fn validate_vertex_buffers(buffers: &[VertexBufferLayoutDescriptor<'_>]) -> Result<(), LayoutError> {
    let mut seen: Vec<u32> = Vec::new();
    for buffer in buffers {
        buffer.validate()?;
        for attr in buffer.attributes.iter() {
            if seen.contains(&attr.shader_location) {
                return Err(LayoutError::DuplicateShaderLocation {
                    location: attr.shader_location,
                });
            }
            seen.push(attr.shader_location);
        }
    }
    Ok(())
}

/// Describes the fragment stage's color output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorTargetDescriptor {
    /// The output location (`@location(n)` on the fragment return value).
    pub location: u32,
    /// The component format the fragment stage writes.
    pub format: VertexFormat,
}

impl ColorTargetDescriptor {
    /// A single four-component float color written to location 0.
    pub const RGBA_FLOAT: Self = Self {
        location: 0,
        format: VertexFormat::Float32x4,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(shader_location: u32, format: VertexFormat, offset: u64) -> VertexAttributeDescriptor {
        VertexAttributeDescriptor {
            shader_location,
            format,
            offset,
        }
    }

    #[test]
    fn test_validate_accepts_packed_layout() {
        let layout = VertexBufferLayoutDescriptor {
            array_stride: 20,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Owned(vec![
                attr(0, VertexFormat::Float32x3, 0),
                attr(1, VertexFormat::Float32x2, 12),
            ]),
        };
        assert_eq!(layout.validate(), Ok(()));
        assert_eq!(layout.attribute(1).map(|a| a.offset), Some(12));
        assert!(layout.attribute(2).is_none());
    }

    #[test]
    fn test_validate_rejects_overflow_and_overlap() {
        let overflow = VertexBufferLayoutDescriptor {
            array_stride: 16,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Owned(vec![attr(0, VertexFormat::Float32x3, 8)]),
        };
        assert_eq!(
            overflow.validate(),
            Err(LayoutError::AttributeOutOfBounds {
                location: 0,
                end: 20,
                stride: 16
            })
        );

        let overlap = VertexBufferLayoutDescriptor {
            array_stride: 32,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Owned(vec![
                attr(0, VertexFormat::Float32x4, 0),
                attr(1, VertexFormat::Float32x2, 8),
            ]),
        };
        assert_eq!(
            overlap.validate(),
            Err(LayoutError::OverlappingAttributes {
                first: 0,
                second: 1
            })
        );
    }

    #[test]
    fn test_duplicate_location_across_buffers() {
        let a = VertexBufferLayoutDescriptor {
            array_stride: 12,
            step_mode: VertexStepMode::Vertex,
            attributes: Cow::Owned(vec![attr(5, VertexFormat::Float32x3, 0)]),
        };
        let b = VertexBufferLayoutDescriptor {
            array_stride: 16,
            step_mode: VertexStepMode::Instance,
            attributes: Cow::Owned(vec![attr(5, VertexFormat::Float32x4, 0)]),
        };
        assert_eq!(
            validate_vertex_buffers(&[a, b]),
            Err(LayoutError::DuplicateShaderLocation { location: 5 })
        );
    }
}
