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

//! Errors raised while validating resource layouts and texel data.

use std::fmt;

/// A vertex buffer or bind group layout that cannot be handed to a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Two attributes across the bound vertex buffers claim the same shader location.
    DuplicateShaderLocation {
        /// The location declared twice.
        location: u32,
    },
    /// An attribute extends past the end of its buffer's stride.
    AttributeOutOfBounds {
        /// The location of the offending attribute.
        location: u32,
        /// Byte offset one past the attribute's last byte.
        end: u64,
        /// The stride of the buffer that owns the attribute.
        stride: u64,
    },
    /// Two attributes of the same buffer share bytes.
    OverlappingAttributes {
        /// The first attribute's location.
        first: u32,
        /// The second attribute's location.
        second: u32,
    },
    /// Two entries of one bind group layout use the same binding index.
    DuplicateBinding {
        /// The bind group index.
        group: u32,
        /// The binding index declared twice.
        binding: u32,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::DuplicateShaderLocation { location } => {
                write!(f, "Shader location {location} is declared more than once")
            }
            LayoutError::AttributeOutOfBounds {
                location,
                end,
                stride,
            } => {
                write!(
                    f,
                    "Attribute at location {location} ends at byte {end}, past the buffer stride of {stride}"
                )
            }
            LayoutError::OverlappingAttributes { first, second } => {
                write!(
                    f,
                    "Attributes at locations {first} and {second} overlap in the same buffer"
                )
            }
            LayoutError::DuplicateBinding { group, binding } => {
                write!(
                    f,
                    "Binding {binding} is declared more than once in bind group {group}"
                )
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Texel data that does not describe a valid texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// The texture has a zero width or height.
    Empty,
    /// The texel count does not match `width * height`.
    DimensionMismatch {
        /// The declared width.
        width: u32,
        /// The declared height.
        height: u32,
        /// The number of texels supplied.
        texels: usize,
    },
    /// A cube map face is not square or differs in size from the first face.
    InvalidCubeFace {
        /// Index of the offending face, in +X, -X, +Y, -Y, +Z, -Z order.
        face: usize,
    },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Empty => write!(f, "Texture has no texels"),
            TextureError::DimensionMismatch {
                width,
                height,
                texels,
            } => {
                write!(
                    f,
                    "Texture declared as {width}x{height} but {texels} texels were supplied"
                )
            }
            TextureError::InvalidCubeFace { face } => {
                write!(f, "Cube map face {face} is not square or does not match face 0")
            }
        }
    }
}

impl std::error::Error for TextureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LayoutError::DuplicateShaderLocation { location: 5 };
        assert_eq!(format!("{err}"), "Shader location 5 is declared more than once");

        let err = LayoutError::AttributeOutOfBounds {
            location: 2,
            end: 40,
            stride: 32,
        };
        assert_eq!(
            format!("{err}"),
            "Attribute at location 2 ends at byte 40, past the buffer stride of 32"
        );

        let err = TextureError::DimensionMismatch {
            width: 2,
            height: 2,
            texels: 3,
        };
        assert_eq!(
            format!("{err}"),
            "Texture declared as 2x2 but 3 texels were supplied"
        );

        let err = LayoutError::DuplicateBinding {
            group: 0,
            binding: 1,
        };
        assert_eq!(
            format!("{err}"),
            "Binding 1 is declared more than once in bind group 0"
        );
    }
}
