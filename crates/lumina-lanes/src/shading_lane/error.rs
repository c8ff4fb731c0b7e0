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

//! Build-time errors of the shading lane.
//!
//! Every contract violation the lane can detect is reported while a program
//! is being built. Stage functions themselves have no error channel.

use super::recipe::ShadingOutput;
use super::varying::VaryingSet;
use lumina_core::renderer::api::VertexAttributes;
use lumina_core::renderer::LayoutError;
use thiserror::Error;

/// A shading configuration that cannot be turned into a program.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShadingError {
    /// A normal-mapped variant was requested for a mesh without a tangent basis.
    #[error("{variant} samples a normal map but the mesh lacks its tangent basis (missing: {missing})")]
    MissingTangentBasis {
        /// The variant being built.
        variant: &'static str,
        /// The attributes the mesh does not provide, including part of the tangent basis.
        missing: VertexAttributes,
    },

    /// The mesh lacks a vertex attribute the variant's vertex stage reads.
    #[error("{variant} requires vertex attributes the mesh does not provide: {missing}")]
    MissingVertexAttribute {
        /// The variant being built.
        variant: &'static str,
        /// The missing attributes.
        missing: VertexAttributes,
    },

    /// The variant declares a binding that was not supplied.
    #[error("{variant} expects a resource at group {group}, binding {binding}")]
    MissingBinding {
        /// The variant being built.
        variant: &'static str,
        /// Bind group index.
        group: u32,
        /// Binding index within the group.
        binding: u32,
    },

    /// Tangent-space lighting only makes sense when a normal map is sampled.
    #[error("tangent-space lighting requires a normal map")]
    TangentSpaceRequiresNormalMap,

    /// The reflection vector is computed in world space only.
    #[error("environment reflection requires world-space lighting")]
    ReflectionRequiresWorldSpace,

    /// A lighting feature was requested on a recipe without lighting.
    #[error("{feature} requires lighting to be enabled")]
    LightingRequired {
        /// The feature that was requested.
        feature: &'static str,
    },

    /// A feature flag was combined with an output that ignores it.
    #[error("{output:?} output does not support {feature}")]
    UnsupportedCombination {
        /// The requested output.
        output: ShadingOutput,
        /// The flag that cannot be honored.
        feature: &'static str,
    },

    /// A fragment stage reads varyings its vertex stage does not write.
    #[error("{variant} fragment stage reads varyings its vertex stage does not write: {missing}")]
    VaryingMismatch {
        /// The variant being built.
        variant: &'static str,
        /// The unwritten varyings.
        missing: VaryingSet,
    },

    /// A lighting constant is out of range.
    #[error("invalid shading setting `{name}`: {value}")]
    InvalidSetting {
        /// The offending field.
        name: &'static str,
        /// Its value.
        value: f32,
    },

    /// A fragment sample references a vertex or instance outside the batch.
    #[error("fragment sample {index} references a vertex or instance outside the batch")]
    SampleOutOfRange {
        /// Index of the offending sample.
        index: usize,
    },

    /// A vertex buffer or bind group layout is malformed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = ShadingError::MissingTangentBasis {
            variant: "NormalMappedWorld",
            missing: VertexAttributes::TANGENT | VertexAttributes::BITANGENT,
        };
        assert_eq!(
            err.to_string(),
            "NormalMappedWorld samples a normal map but the mesh lacks its tangent basis (missing: tangent, bitangent)"
        );

        let err = ShadingError::MissingBinding {
            variant: "BasicLit",
            group: 2,
            binding: 0,
        };
        assert_eq!(err.to_string(), "BasicLit expects a resource at group 2, binding 0");
    }

    #[test]
    fn test_layout_error_is_transparent() {
        let err: ShadingError = LayoutError::DuplicateShaderLocation { location: 3 }.into();
        assert_eq!(err.to_string(), "Shader location 3 is declared more than once");
    }
}
