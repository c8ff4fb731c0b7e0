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

//! The bind group contract between the shading lane and the engine.
//!
//! | Group | Binding | Resource |
//! |-------|---------|----------|
//! | 0 | 0, 1 | diffuse texture, sampler |
//! | 0 | 2, 3 | normal texture, sampler (normal-mapped variants) |
//! | 1 | 0 | [`CameraUniform`] |
//! | 2 | 0 | [`LightUniform`] |
//! | 3 | 0, 1 | environment cube, sampler (reflection and skybox variants) |
//!
//! Indices are stable across variants: a variant that does not use a
//! binding leaves the slot empty rather than renumbering.

use super::error::ShadingError;
use lumina_core::renderer::api::{
    BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, CameraUniform, CubeBinding,
    LightUniform, SamplerBindingType, ShaderStageFlags, TextureBinding, TextureSampleType,
    TextureViewDimension,
};
use std::mem::size_of;

/// Material textures.
pub const MATERIAL_GROUP: u32 = 0;
/// Camera uniform block.
pub const CAMERA_GROUP: u32 = 1;
/// Light uniform block.
pub const LIGHT_GROUP: u32 = 2;
/// Environment cube map.
pub const ENVIRONMENT_GROUP: u32 = 3;

/// Diffuse texture, group 0.
pub const DIFFUSE_TEXTURE_BINDING: u32 = 0;
/// Diffuse sampler, group 0.
pub const DIFFUSE_SAMPLER_BINDING: u32 = 1;
/// Normal-map texture, group 0.
pub const NORMAL_TEXTURE_BINDING: u32 = 2;
/// Normal-map sampler, group 0.
pub const NORMAL_SAMPLER_BINDING: u32 = 3;
/// The uniform block of groups 1 and 2.
pub const UNIFORM_BINDING: u32 = 0;
/// Environment cube texture, group 3.
pub const ENVIRONMENT_TEXTURE_BINDING: u32 = 0;
/// Environment sampler, group 3.
pub const ENVIRONMENT_SAMPLER_BINDING: u32 = 1;

/// Layout of group 0. The normal-map pair is declared only when `normal_map` is set.
pub fn material_layout(normal_map: bool) -> BindGroupLayoutDescriptor {
    let mut entries = vec![
        BindGroupLayoutEntry::texture(
            DIFFUSE_TEXTURE_BINDING,
            ShaderStageFlags::FRAGMENT,
            TextureViewDimension::D2,
        ),
        BindGroupLayoutEntry::sampler(DIFFUSE_SAMPLER_BINDING, ShaderStageFlags::FRAGMENT),
    ];
    if normal_map {
        entries.push(BindGroupLayoutEntry::texture(
            NORMAL_TEXTURE_BINDING,
            ShaderStageFlags::FRAGMENT,
            TextureViewDimension::D2,
        ));
        entries.push(BindGroupLayoutEntry::sampler(
            NORMAL_SAMPLER_BINDING,
            ShaderStageFlags::FRAGMENT,
        ));
    }
    BindGroupLayoutDescriptor {
        label: Some("material_bind_group_layout"),
        entries,
    }
}

/// Layout of group 1.
pub fn camera_layout() -> BindGroupLayoutDescriptor {
    BindGroupLayoutDescriptor {
        label: Some("camera_bind_group_layout"),
        entries: vec![BindGroupLayoutEntry::uniform(
            UNIFORM_BINDING,
            ShaderStageFlags::VERTEX_FRAGMENT,
            size_of::<CameraUniform>() as u64,
        )],
    }
}

/// Layout of group 2.
pub fn light_layout() -> BindGroupLayoutDescriptor {
    BindGroupLayoutDescriptor {
        label: Some("light_bind_group_layout"),
        entries: vec![BindGroupLayoutEntry::uniform(
            UNIFORM_BINDING,
            ShaderStageFlags::VERTEX_FRAGMENT,
            size_of::<LightUniform>() as u64,
        )],
    }
}

/// Layout of group 3.
///
/// The cube holds HDR texels, which are not filterable on every backend, so
/// it is paired with a non-filtering sampler.
pub fn environment_layout() -> BindGroupLayoutDescriptor {
    BindGroupLayoutDescriptor {
        label: Some("environment_bind_group_layout"),
        entries: vec![
            BindGroupLayoutEntry {
                binding: ENVIRONMENT_TEXTURE_BINDING,
                visibility: ShaderStageFlags::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: false },
                    view_dimension: TextureViewDimension::Cube,
                },
            },
            BindGroupLayoutEntry {
                binding: ENVIRONMENT_SAMPLER_BINDING,
                visibility: ShaderStageFlags::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::NonFiltering),
            },
        ],
    }
}

/// The resources the engine has bound for a draw.
///
/// Everything is borrowed: uniforms and textures stay owned by the engine
/// and are read-only for as long as a program built from this set lives.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingSet<'a> {
    /// Group 1.
    pub camera: Option<&'a CameraUniform>,
    /// Group 2.
    pub light: Option<&'a LightUniform>,
    /// Group 0, bindings 0 and 1.
    pub diffuse: Option<TextureBinding<'a>>,
    /// Group 0, bindings 2 and 3.
    pub normal: Option<TextureBinding<'a>>,
    /// Group 3.
    pub environment: Option<CubeBinding<'a>>,
}

impl<'a> BindingSet<'a> {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the camera block.
    pub fn with_camera(mut self, camera: &'a CameraUniform) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Binds the light block.
    pub fn with_light(mut self, light: &'a LightUniform) -> Self {
        self.light = Some(light);
        self
    }

    /// Binds the diffuse texture and sampler.
    pub fn with_diffuse(mut self, diffuse: TextureBinding<'a>) -> Self {
        self.diffuse = Some(diffuse);
        self
    }

    /// Binds the normal-map texture and sampler.
    pub fn with_normal_map(mut self, normal: TextureBinding<'a>) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Binds the environment cube map and sampler.
    pub fn with_environment(mut self, environment: CubeBinding<'a>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Whether a resource occupies `(group, binding)`.
    pub fn provides(&self, group: u32, binding: u32) -> bool {
        match (group, binding) {
            (MATERIAL_GROUP, DIFFUSE_TEXTURE_BINDING | DIFFUSE_SAMPLER_BINDING) => self.diffuse.is_some(),
            (MATERIAL_GROUP, NORMAL_TEXTURE_BINDING | NORMAL_SAMPLER_BINDING) => self.normal.is_some(),
            (CAMERA_GROUP, UNIFORM_BINDING) => self.camera.is_some(),
            (LIGHT_GROUP, UNIFORM_BINDING) => self.light.is_some(),
            (ENVIRONMENT_GROUP, ENVIRONMENT_TEXTURE_BINDING | ENVIRONMENT_SAMPLER_BINDING) => {
                self.environment.is_some()
            }
            _ => false,
        }
    }

    /// Checks every entry of `layout` against this set.
    pub fn check_layout(
        &self,
        variant: &'static str,
        group: u32,
        layout: &BindGroupLayoutDescriptor,
    ) -> Result<(), ShadingError> {
        match layout.entries.iter().find(|entry| !self.provides(group, entry.binding)) {
            Some(entry) => Err(ShadingError::MissingBinding {
                variant,
                group,
                binding: entry.binding,
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn require_camera(&self, variant: &'static str) -> Result<&'a CameraUniform, ShadingError> {
        self.camera.ok_or(missing(variant, CAMERA_GROUP, UNIFORM_BINDING))
    }

    pub(crate) fn require_light(&self, variant: &'static str) -> Result<&'a LightUniform, ShadingError> {
        self.light.ok_or(missing(variant, LIGHT_GROUP, UNIFORM_BINDING))
    }

    pub(crate) fn require_diffuse(&self, variant: &'static str) -> Result<TextureBinding<'a>, ShadingError> {
        self.diffuse
            .ok_or(missing(variant, MATERIAL_GROUP, DIFFUSE_TEXTURE_BINDING))
    }

    pub(crate) fn require_normal(&self, variant: &'static str) -> Result<TextureBinding<'a>, ShadingError> {
        self.normal
            .ok_or(missing(variant, MATERIAL_GROUP, NORMAL_TEXTURE_BINDING))
    }

    pub(crate) fn require_environment(&self, variant: &'static str) -> Result<CubeBinding<'a>, ShadingError> {
        self.environment
            .ok_or(missing(variant, ENVIRONMENT_GROUP, ENVIRONMENT_TEXTURE_BINDING))
    }
}

fn missing(variant: &'static str, group: u32, binding: u32) -> ShadingError {
    ShadingError::MissingBinding {
        variant,
        group,
        binding,
    }
}
