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

//! Shading lane - composable vertex and fragment stages for forward rendering.

pub mod basis;
pub mod bindings;
pub mod error;
pub mod executor;
pub mod fragment_stage;
pub mod program;
pub mod recipe;
pub mod settings;
pub mod variants;
pub mod varying;
pub mod vertex_stage;

pub use bindings::*;
pub use error::*;
pub use executor::*;
pub use program::*;
pub use recipe::*;
pub use settings::*;
pub use varying::*;

use lumina_core::math::{LinearRgba, Vec4};
use lumina_core::renderer::api::{InstanceRaw, ModelVertex, VertexAttributes};

/// What a vertex stage hands to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput<V> {
    /// Homogeneous clip-space position. Every variant writes it.
    pub clip_position: Vec4,
    /// The variant's varying record.
    pub varying: V,
}

/// A matched pair of vertex and fragment stages.
///
/// Implementors are the shading variants. Each declares the vertex
/// attributes its vertex stage reads and the varying slots flowing between
/// its stages; the declarations are checked when a
/// [`ShadingProgram`](program::ShadingProgram) is built, so the stage
/// functions themselves never fail.
///
/// Both stage functions are pure. They may be invoked from many threads at
/// once and in any order.
pub trait ShadingStages: Send + Sync {
    /// Per-vertex record interpolated across each triangle.
    type Varying: Interpolate;

    /// Identifier used in logs and errors.
    const NAME: &'static str;

    /// Vertex attributes the vertex stage reads.
    const REQUIRED_ATTRIBUTES: VertexAttributes;

    /// Varying slots the vertex stage populates.
    const VARYINGS_WRITTEN: VaryingSet;

    /// Varying slots the fragment stage dereferences.
    const VARYINGS_READ: VaryingSet;

    /// Transforms one vertex of one instance.
    fn vertex(&self, vertex: &ModelVertex, instance: &InstanceRaw) -> VertexOutput<Self::Varying>;

    /// Shades one fragment from its interpolated varyings.
    fn fragment(&self, varying: &Self::Varying) -> LinearRgba;

    /// Fails when the fragment stage reads a slot the vertex stage leaves unpopulated.
    fn check_varyings() -> Result<(), ShadingError>
    where
        Self: Sized,
    {
        let missing = Self::VARYINGS_READ.missing_from(Self::VARYINGS_WRITTEN);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ShadingError::VaryingMismatch {
                variant: Self::NAME,
                missing,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReadsTooMuch;

    impl ShadingStages for ReadsTooMuch {
        type Varying = TexturedVarying;
        const NAME: &'static str = "ReadsTooMuch";
        const REQUIRED_ATTRIBUTES: VertexAttributes = VertexAttributes::TEXTURED;
        const VARYINGS_WRITTEN: VaryingSet = VaryingSet::TEX_COORDS;
        const VARYINGS_READ: VaryingSet = VaryingSet::TEX_COORDS.union(VaryingSet::WORLD_NORMAL);

        fn vertex(&self, vertex: &ModelVertex, _instance: &InstanceRaw) -> VertexOutput<Self::Varying> {
            VertexOutput {
                clip_position: vertex.position().extend(1.0),
                varying: TexturedVarying {
                    tex_coords: vertex.tex_coords(),
                },
            }
        }

        fn fragment(&self, _varying: &Self::Varying) -> LinearRgba {
            LinearRgba::WHITE
        }
    }

    #[test]
    fn test_unwritten_varying_is_a_build_error() {
        assert_eq!(
            ReadsTooMuch::check_varyings(),
            Err(ShadingError::VaryingMismatch {
                variant: "ReadsTooMuch",
                missing: VaryingSet::WORLD_NORMAL,
            })
        );
    }
}
