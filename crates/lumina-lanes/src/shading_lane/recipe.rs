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

//! Variant selection.
//!
//! A [`ShadingRecipe`] states which effects a draw wants; [`ShadingRecipe::select`]
//! maps it onto exactly one [`ShadingVariant`] or explains why no variant fits.

use super::bindings::{
    camera_layout, environment_layout, light_layout, material_layout, CAMERA_GROUP,
    ENVIRONMENT_GROUP, LIGHT_GROUP, MATERIAL_GROUP,
};
use super::error::ShadingError;
use super::variants::{BasicLit, NormalMappedTangent, NormalMappedWorld, Skybox, SolidColor, UnlitTextured};
use super::varying::VaryingSet;
use super::ShadingStages;
use lumina_core::renderer::api::{
    BindGroupLayoutDescriptor, ColorTargetDescriptor, InstanceRaw, ModelVertex,
    VertexAttributes, VertexBufferLayoutDescriptor,
};
use serde::{Deserialize, Serialize};

/// What the fragment stage writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadingOutput {
    /// Material texturing, optionally lit.
    #[default]
    Material,
    /// A fixed debug color, ignoring every binding.
    SolidColor,
    /// The environment cube seen from the camera (skybox).
    Environment,
}

/// The effects a draw asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingRecipe {
    /// What the fragment stage writes.
    pub output: ShadingOutput,
    /// Evaluate the point light.
    pub needs_lighting: bool,
    /// Perturb the normal with a normal map.
    pub needs_normal_map: bool,
    /// Light in tangent space instead of world space.
    pub needs_tangent_space: bool,
    /// Add an environment-map reflection.
    pub needs_reflection: bool,
}

impl ShadingRecipe {
    /// Texture only.
    pub const UNLIT: Self = Self::material(false, false, false, false);
    /// World-space Blinn-Phong with the geometric normal.
    pub const BASIC_LIT: Self = Self::material(true, false, false, false);
    /// Normal mapping lit in tangent space.
    pub const NORMAL_MAPPED_TANGENT: Self = Self::material(true, true, true, false);
    /// Normal mapping lit in world space.
    pub const NORMAL_MAPPED_WORLD: Self = Self::material(true, true, false, false);
    /// Fixed debug color.
    pub const SOLID_COLOR: Self = Self::output(ShadingOutput::SolidColor);
    /// Environment cube as background.
    pub const SKYBOX: Self = Self::output(ShadingOutput::Environment);

    const fn material(lighting: bool, normal_map: bool, tangent_space: bool, reflection: bool) -> Self {
        Self {
            output: ShadingOutput::Material,
            needs_lighting: lighting,
            needs_normal_map: normal_map,
            needs_tangent_space: tangent_space,
            needs_reflection: reflection,
        }
    }

    const fn output(output: ShadingOutput) -> Self {
        Self {
            output,
            needs_lighting: false,
            needs_normal_map: false,
            needs_tangent_space: false,
            needs_reflection: false,
        }
    }

    /// Returns a copy that also asks for environment reflection.
    pub const fn with_reflection(mut self) -> Self {
        self.needs_reflection = true;
        self
    }

    /// Picks the variant implementing this recipe.
    pub fn select(&self) -> Result<ShadingVariant, ShadingError> {
        match self.output {
            ShadingOutput::SolidColor => self.reject_flags().map(|()| ShadingVariant::SolidColor),
            ShadingOutput::Environment => self.reject_flags().map(|()| ShadingVariant::Skybox),
            ShadingOutput::Material => self.select_material(),
        }
    }

    fn flags(&self) -> [(&'static str, bool); 4] {
        [
            ("lighting", self.needs_lighting),
            ("normal mapping", self.needs_normal_map),
            ("tangent-space lighting", self.needs_tangent_space),
            ("reflection", self.needs_reflection),
        ]
    }

    fn reject_flags(&self) -> Result<(), ShadingError> {
        match self.flags().into_iter().find(|(_, set)| *set) {
            Some((feature, _)) => Err(ShadingError::UnsupportedCombination {
                output: self.output,
                feature,
            }),
            None => Ok(()),
        }
    }

    fn select_material(&self) -> Result<ShadingVariant, ShadingError> {
        if !self.needs_lighting {
            if let Some((feature, _)) = self.flags().into_iter().skip(1).find(|(_, set)| *set) {
                return Err(ShadingError::LightingRequired { feature });
            }
            return Ok(ShadingVariant::UnlitTextured);
        }
        if self.needs_tangent_space && !self.needs_normal_map {
            return Err(ShadingError::TangentSpaceRequiresNormalMap);
        }
        if self.needs_tangent_space && self.needs_reflection {
            return Err(ShadingError::ReflectionRequiresWorldSpace);
        }
        let reflection = self.needs_reflection;
        Ok(match (self.needs_normal_map, self.needs_tangent_space) {
            (true, true) => ShadingVariant::NormalMappedTangent,
            (true, false) => ShadingVariant::NormalMappedWorld { reflection },
            _ => ShadingVariant::BasicLit { reflection },
        })
    }
}

/// One concrete, closed pairing of vertex and fragment stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShadingVariant {
    /// Diffuse texture, no lighting.
    UnlitTextured,
    /// World-space Blinn-Phong on the geometric normal.
    BasicLit {
        /// Adds the environment reflection.
        reflection: bool,
    },
    /// Normal mapping, lighting vectors pre-transformed to tangent space per vertex.
    NormalMappedTangent,
    /// Normal mapping, basis re-orthogonalized and lit per fragment in world space.
    NormalMappedWorld {
        /// Adds the environment reflection.
        reflection: bool,
    },
    /// Fixed color; isolates vertex-stage problems.
    SolidColor,
    /// Full-screen environment background.
    Skybox,
}

impl ShadingVariant {
    /// Every variant, reflection on and off included.
    pub const ALL: [Self; 8] = [
        Self::UnlitTextured,
        Self::BasicLit { reflection: false },
        Self::BasicLit { reflection: true },
        Self::NormalMappedTangent,
        Self::NormalMappedWorld { reflection: false },
        Self::NormalMappedWorld { reflection: true },
        Self::SolidColor,
        Self::Skybox,
    ];

    /// The simplest recipe selecting this variant.
    pub fn recipe(&self) -> ShadingRecipe {
        match *self {
            Self::UnlitTextured => ShadingRecipe::UNLIT,
            Self::BasicLit { reflection } => ShadingRecipe {
                needs_reflection: reflection,
                ..ShadingRecipe::BASIC_LIT
            },
            Self::NormalMappedTangent => ShadingRecipe::NORMAL_MAPPED_TANGENT,
            Self::NormalMappedWorld { reflection } => ShadingRecipe {
                needs_reflection: reflection,
                ..ShadingRecipe::NORMAL_MAPPED_WORLD
            },
            Self::SolidColor => ShadingRecipe::SOLID_COLOR,
            Self::Skybox => ShadingRecipe::SKYBOX,
        }
    }

    /// The stage pair's identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UnlitTextured => UnlitTextured::NAME,
            Self::BasicLit { .. } => BasicLit::NAME,
            Self::NormalMappedTangent => NormalMappedTangent::NAME,
            Self::NormalMappedWorld { .. } => NormalMappedWorld::NAME,
            Self::SolidColor => SolidColor::NAME,
            Self::Skybox => Skybox::NAME,
        }
    }

    /// Vertex attributes the mesh must carry.
    pub fn required_attributes(&self) -> VertexAttributes {
        match self {
            Self::UnlitTextured => UnlitTextured::REQUIRED_ATTRIBUTES,
            Self::BasicLit { .. } => BasicLit::REQUIRED_ATTRIBUTES,
            Self::NormalMappedTangent => NormalMappedTangent::REQUIRED_ATTRIBUTES,
            Self::NormalMappedWorld { .. } => NormalMappedWorld::REQUIRED_ATTRIBUTES,
            Self::SolidColor => SolidColor::REQUIRED_ATTRIBUTES,
            Self::Skybox => Skybox::REQUIRED_ATTRIBUTES,
        }
    }

    /// `(written, read)` varying slots of the stage pair.
    pub fn varyings(&self) -> (VaryingSet, VaryingSet) {
        match self {
            Self::UnlitTextured => (UnlitTextured::VARYINGS_WRITTEN, UnlitTextured::VARYINGS_READ),
            Self::BasicLit { .. } => (BasicLit::VARYINGS_WRITTEN, BasicLit::VARYINGS_READ),
            Self::NormalMappedTangent => (
                NormalMappedTangent::VARYINGS_WRITTEN,
                NormalMappedTangent::VARYINGS_READ,
            ),
            Self::NormalMappedWorld { .. } => (
                NormalMappedWorld::VARYINGS_WRITTEN,
                NormalMappedWorld::VARYINGS_READ,
            ),
            Self::SolidColor => (SolidColor::VARYINGS_WRITTEN, SolidColor::VARYINGS_READ),
            Self::Skybox => (Skybox::VARYINGS_WRITTEN, Skybox::VARYINGS_READ),
        }
    }

    /// Runs the stage pair's varying consistency check.
    pub fn check_varyings(&self) -> Result<(), ShadingError> {
        match self {
            Self::UnlitTextured => UnlitTextured::check_varyings(),
            Self::BasicLit { .. } => BasicLit::check_varyings(),
            Self::NormalMappedTangent => NormalMappedTangent::check_varyings(),
            Self::NormalMappedWorld { .. } => NormalMappedWorld::check_varyings(),
            Self::SolidColor => SolidColor::check_varyings(),
            Self::Skybox => Skybox::check_varyings(),
        }
    }

    /// Whether the point light is evaluated.
    pub fn is_lit(&self) -> bool {
        matches!(
            self,
            Self::BasicLit { .. } | Self::NormalMappedTangent | Self::NormalMappedWorld { .. }
        )
    }

    /// Whether group 0 carries a normal map.
    pub fn uses_normal_map(&self) -> bool {
        matches!(self, Self::NormalMappedTangent | Self::NormalMappedWorld { .. })
    }

    /// Whether group 3 is bound.
    pub fn uses_environment(&self) -> bool {
        matches!(
            self,
            Self::BasicLit { reflection: true } | Self::NormalMappedWorld { reflection: true } | Self::Skybox
        )
    }

    /// Whether the per-instance buffer is consumed. The skybox draws one
    /// full-screen triangle and ignores instancing.
    pub fn uses_instances(&self) -> bool {
        !matches!(self, Self::Skybox)
    }

    /// Bind group layouts by group index, in ascending group order.
    pub fn bind_group_layouts(&self) -> Vec<(u32, BindGroupLayoutDescriptor)> {
        let mut layouts = Vec::with_capacity(4);
        if !matches!(self, Self::SolidColor | Self::Skybox) {
            layouts.push((MATERIAL_GROUP, material_layout(self.uses_normal_map())));
        }
        layouts.push((CAMERA_GROUP, camera_layout()));
        if self.is_lit() {
            layouts.push((LIGHT_GROUP, light_layout()));
        }
        if self.uses_environment() {
            layouts.push((ENVIRONMENT_GROUP, environment_layout()));
        }
        layouts
    }

    /// Vertex buffer layouts: the packed mesh buffer, then the instance buffer.
    ///
    /// The skybox generates its triangle from the vertex index and binds no buffers.
    pub fn vertex_buffer_layouts(&self) -> Vec<VertexBufferLayoutDescriptor<'static>> {
        if !self.uses_instances() {
            return Vec::new();
        }
        vec![
            ModelVertex::layout_for(self.required_attributes()),
            InstanceRaw::layout(),
        ]
    }

    /// The fragment output.
    pub fn color_target(&self) -> ColorTargetDescriptor {
        ColorTargetDescriptor::RGBA_FLOAT
    }

    /// Checks that a mesh providing `available` attributes can feed this variant.
    pub fn check_mesh(&self, available: VertexAttributes) -> Result<(), ShadingError> {
        let missing = self.required_attributes().missing_from(available);
        if missing.is_empty() {
            return Ok(());
        }
        let tangent_basis = VertexAttributes::TANGENT | VertexAttributes::BITANGENT;
        if self.uses_normal_map() && !tangent_basis.missing_from(available).is_empty() {
            Err(ShadingError::MissingTangentBasis {
                variant: self.name(),
                missing,
            })
        } else {
            Err(ShadingError::MissingVertexAttribute {
                variant: self.name(),
                missing,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_select_their_variant() {
        assert_eq!(ShadingRecipe::UNLIT.select(), Ok(ShadingVariant::UnlitTextured));
        assert_eq!(
            ShadingRecipe::BASIC_LIT.select(),
            Ok(ShadingVariant::BasicLit { reflection: false })
        );
        assert_eq!(
            ShadingRecipe::NORMAL_MAPPED_TANGENT.select(),
            Ok(ShadingVariant::NormalMappedTangent)
        );
        assert_eq!(
            ShadingRecipe::NORMAL_MAPPED_WORLD.with_reflection().select(),
            Ok(ShadingVariant::NormalMappedWorld { reflection: true })
        );
        assert_eq!(ShadingRecipe::SOLID_COLOR.select(), Ok(ShadingVariant::SolidColor));
        assert_eq!(ShadingRecipe::SKYBOX.select(), Ok(ShadingVariant::Skybox));
    }

    #[test]
    fn test_variant_recipe_selects_the_variant() {
        for variant in ShadingVariant::ALL {
            assert_eq!(variant.recipe().select(), Ok(variant));
        }
    }

    #[test]
    fn test_inconsistent_recipes_are_rejected() {
        let tangent_only = ShadingRecipe {
            needs_tangent_space: true,
            ..ShadingRecipe::BASIC_LIT
        };
        assert_eq!(tangent_only.select(), Err(ShadingError::TangentSpaceRequiresNormalMap));

        assert_eq!(
            ShadingRecipe::NORMAL_MAPPED_TANGENT.with_reflection().select(),
            Err(ShadingError::ReflectionRequiresWorldSpace)
        );

        let unlit_normal = ShadingRecipe {
            needs_normal_map: true,
            ..ShadingRecipe::UNLIT
        };
        assert_eq!(
            unlit_normal.select(),
            Err(ShadingError::LightingRequired {
                feature: "normal mapping"
            })
        );

        let lit_sky = ShadingRecipe {
            needs_lighting: true,
            ..ShadingRecipe::SKYBOX
        };
        assert_eq!(
            lit_sky.select(),
            Err(ShadingError::UnsupportedCombination {
                output: ShadingOutput::Environment,
                feature: "lighting"
            })
        );
    }

    #[test]
    fn test_every_variant_has_consistent_varyings() {
        for variant in ShadingVariant::ALL {
            assert!(variant.check_varyings().is_ok(), "{}", variant.name());
            let (written, read) = variant.varyings();
            assert!(written.contains(read), "{}", variant.name());
        }
    }

    #[test]
    fn test_bind_groups_follow_the_contract() {
        let groups = |v: ShadingVariant| -> Vec<u32> {
            v.bind_group_layouts().into_iter().map(|(g, _)| g).collect()
        };
        assert_eq!(groups(ShadingVariant::UnlitTextured), vec![0, 1]);
        assert_eq!(groups(ShadingVariant::BasicLit { reflection: false }), vec![0, 1, 2]);
        assert_eq!(groups(ShadingVariant::NormalMappedWorld { reflection: true }), vec![0, 1, 2, 3]);
        assert_eq!(groups(ShadingVariant::SolidColor), vec![1]);
        assert_eq!(groups(ShadingVariant::Skybox), vec![1, 3]);

        for variant in ShadingVariant::ALL {
            let target = variant.color_target();
            assert_eq!(target.location, 0);
            assert_eq!(target.format.components(), 4);
        }
    }

    #[test]
    fn test_mesh_checks() {
        let world = ShadingVariant::NormalMappedWorld { reflection: false };
        assert_eq!(
            world.check_mesh(VertexAttributes::LIT),
            Err(ShadingError::MissingTangentBasis {
                variant: "NormalMappedWorld",
                missing: VertexAttributes::TANGENT | VertexAttributes::BITANGENT,
            })
        );
        assert_eq!(
            ShadingVariant::BasicLit { reflection: false }.check_mesh(VertexAttributes::TEXTURED),
            Err(ShadingError::MissingVertexAttribute {
                variant: "BasicLit",
                missing: VertexAttributes::NORMAL,
            })
        );
        // The tangent basis is named even when other attributes are missing too.
        let bare = VertexAttributes::TEXTURED.union(VertexAttributes::TANGENT);
        assert_eq!(
            ShadingVariant::NormalMappedTangent.check_mesh(bare),
            Err(ShadingError::MissingTangentBasis {
                variant: "NormalMappedTangent",
                missing: VertexAttributes::NORMAL | VertexAttributes::BITANGENT,
            })
        );
        assert!(matches!(
            world.check_mesh(VertexAttributes::POSITION),
            Err(ShadingError::MissingTangentBasis { .. })
        ));
        // A complete tangent basis with other gaps stays a plain missing attribute.
        assert!(matches!(
            world.check_mesh(VertexAttributes::ALL.missing_from(VertexAttributes::NORMAL)),
            Err(ShadingError::MissingVertexAttribute { .. })
        ));
        assert!(world.check_mesh(VertexAttributes::ALL).is_ok());
        assert!(ShadingVariant::Skybox.check_mesh(VertexAttributes::NONE).is_ok());
    }

    #[test]
    fn test_vertex_buffers_do_not_collide() {
        for variant in ShadingVariant::ALL {
            let buffers = variant.vertex_buffer_layouts();
            assert!(
                lumina_core::renderer::api::validate_vertex_buffers(&buffers).is_ok(),
                "{}",
                variant.name()
            );
        }
        assert!(ShadingVariant::Skybox.vertex_buffer_layouts().is_empty());
    }

    #[test]
    fn test_recipe_from_ron() {
        let recipe: ShadingRecipe =
            ron::from_str("(needs_lighting: true, needs_normal_map: true)").expect("valid recipe");
        assert_eq!(recipe, ShadingRecipe::NORMAL_MAPPED_WORLD);
    }
}
