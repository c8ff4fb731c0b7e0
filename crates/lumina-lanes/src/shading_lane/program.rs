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

//! Building and running a validated shading program.

use super::bindings::BindingSet;
use crate::shaders;
use super::error::ShadingError;
use super::executor::{self, FragmentSample};
use super::recipe::{ShadingRecipe, ShadingVariant};
use super::settings::{LightCombine, ShadingSettings};
use super::variants::{BasicLit, NormalMappedTangent, NormalMappedWorld, Skybox, SolidColor, UnlitTextured};
use lumina_core::math::{LinearRgba, Vec4};
use lumina_core::renderer::api::{validate_vertex_buffers, InstanceRaw, ModelVertex, VertexAttributes};

enum Stages<'a> {
    UnlitTextured(UnlitTextured<'a>),
    BasicLit(BasicLit<'a>),
    NormalMappedTangent(NormalMappedTangent<'a>),
    NormalMappedWorld(NormalMappedWorld<'a>),
    SolidColor(SolidColor<'a>),
    Skybox(Skybox<'a>),
}

/// Expands `$body` once per variant with `$stages` bound to the concrete stage pair.
macro_rules! with_stages {
    ($self:expr, $stages:ident => $body:expr) => {
        match &$self.stages {
            Stages::UnlitTextured($stages) => $body,
            Stages::BasicLit($stages) => $body,
            Stages::NormalMappedTangent($stages) => $body,
            Stages::NormalMappedWorld($stages) => $body,
            Stages::SolidColor($stages) => $body,
            Stages::Skybox($stages) => $body,
        }
    };
}

/// A shading variant bound to its resources, ready to run.
///
/// Every contract check happens in [`ShadingProgram::build`]; once built, a
/// program can only fail on malformed fragment samples.
pub struct ShadingProgram<'a> {
    variant: ShadingVariant,
    settings: ShadingSettings,
    stages: Stages<'a>,
}

impl<'a> ShadingProgram<'a> {
    /// Selects the variant for `recipe` and validates it against the mesh
    /// layout and the bound resources.
    ///
    /// # Errors
    ///
    /// Returns the first violated contract: invalid settings, an inconsistent
    /// recipe, a missing vertex attribute, a malformed layout, a missing
    /// binding or a varying read without being written.
    pub fn build(
        recipe: &ShadingRecipe,
        mesh: VertexAttributes,
        bindings: &BindingSet<'a>,
        settings: &ShadingSettings,
    ) -> Result<Self, ShadingError> {
        let result = Self::try_build(recipe, mesh, bindings, settings);
        match &result {
            Ok(program) => {
                log::info!(
                    "ShadingProgram: built {} ({} bind groups, combine {})",
                    program.variant.name(),
                    program.variant.bind_group_layouts().len(),
                    settings.combine.name()
                );
                if program.variant.is_lit() && settings.combine == LightCombine::AmbientModulated {
                    log::warn!(
                        "ShadingProgram: {} uses ambient * diffuse + specular, which is black wherever diffuse is zero; confirm this is intended",
                        program.variant.name()
                    );
                }
            }
            Err(e) => log::warn!("ShadingProgram: rejected {:?}: {}", recipe, e),
        }
        result
    }

    fn try_build(
        recipe: &ShadingRecipe,
        mesh: VertexAttributes,
        bindings: &BindingSet<'a>,
        settings: &ShadingSettings,
    ) -> Result<Self, ShadingError> {
        settings.validate()?;
        let variant = recipe.select()?;
        variant.check_mesh(mesh)?;
        validate_vertex_buffers(&variant.vertex_buffer_layouts())?;
        for (group, layout) in variant.bind_group_layouts() {
            layout.validate(group)?;
            bindings.check_layout(variant.name(), group, &layout)?;
        }
        variant.check_varyings()?;

        let name = variant.name();
        let settings = *settings;
        let stages = match variant {
            ShadingVariant::UnlitTextured => Stages::UnlitTextured(UnlitTextured::new(
                bindings.require_camera(name)?,
                bindings.require_diffuse(name)?,
            )),
            ShadingVariant::BasicLit { reflection } => Stages::BasicLit(BasicLit::new(
                bindings.require_camera(name)?,
                bindings.require_light(name)?,
                bindings.require_diffuse(name)?,
                reflection
                    .then(|| bindings.require_environment(name))
                    .transpose()?,
                settings,
            )),
            ShadingVariant::NormalMappedTangent => Stages::NormalMappedTangent(NormalMappedTangent::new(
                bindings.require_camera(name)?,
                bindings.require_light(name)?,
                bindings.require_diffuse(name)?,
                bindings.require_normal(name)?,
                settings,
            )),
            ShadingVariant::NormalMappedWorld { reflection } => {
                Stages::NormalMappedWorld(NormalMappedWorld::new(
                    bindings.require_camera(name)?,
                    bindings.require_light(name)?,
                    bindings.require_diffuse(name)?,
                    bindings.require_normal(name)?,
                    reflection
                        .then(|| bindings.require_environment(name))
                        .transpose()?,
                    settings,
                ))
            }
            ShadingVariant::SolidColor => Stages::SolidColor(SolidColor::new(
                bindings.require_camera(name)?,
                settings.solid_color,
            )),
            ShadingVariant::Skybox => Stages::Skybox(Skybox::new(
                bindings.require_camera(name)?,
                bindings.require_environment(name)?,
            )),
        };
        Ok(Self {
            variant,
            settings,
            stages,
        })
    }

    /// The selected variant.
    pub fn variant(&self) -> ShadingVariant {
        self.variant
    }

    /// The selected variant's name.
    pub fn name(&self) -> &'static str {
        self.variant.name()
    }

    /// The lighting constants the program was built with.
    pub fn settings(&self) -> &ShadingSettings {
        &self.settings
    }

    /// The WGSL module implementing the same stages on the GPU.
    pub fn wgsl(&self) -> String {
        shaders::shader_source(self.variant, &self.settings)
    }

    /// Runs the vertex stage only and returns the clip positions,
    /// instance-major.
    pub fn clip_positions(&self, vertices: &[ModelVertex], instances: &[InstanceRaw]) -> Vec<Vec4> {
        let instances = self.effective_instances(instances);
        with_stages!(self, stages => executor::run_vertex_stage(stages, vertices, instances).clip_positions())
    }

    /// Runs both stages and returns one color per fragment sample.
    pub fn shade(
        &self,
        vertices: &[ModelVertex],
        instances: &[InstanceRaw],
        samples: &[FragmentSample],
    ) -> Result<Vec<LinearRgba>, ShadingError> {
        let instances = self.effective_instances(instances);
        with_stages!(self, stages => executor::shade(stages, vertices, instances, samples))
    }

    // The skybox ignores instancing and is drawn exactly once.
    fn effective_instances<'i>(&self, instances: &'i [InstanceRaw]) -> &'i [InstanceRaw] {
        const SINGLE: &[InstanceRaw] = &[InstanceRaw::IDENTITY];
        if self.variant.uses_instances() {
            instances
        } else {
            SINGLE
        }
    }
}

impl std::fmt::Debug for ShadingProgram<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadingProgram")
            .field("variant", &self.variant)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
