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

//! WGSL sources for the shading variants.
//!
//! Every variant is assembled from the same snippets, so the uniform blocks,
//! the instance attributes, the tangent-basis math and the lighting model are
//! written once and shared. Lighting constants come from [`ShadingSettings`]
//! and are emitted as WGSL `const` declarations ahead of the snippets.
//!
//! # Snippets
//!
//! - `common.wgsl` - `safe_normalize`
//! - `camera.wgsl` / `light.wgsl` - groups 1 and 2
//! - `instance.wgsl` - locations 5 to 11 and matrix reassembly
//! - `material.wgsl` / `normal_map.wgsl` - group 0 and normal decoding
//! - `environment.wgsl` / `no_environment.wgsl` - group 3 and the reflection term
//! - `basis.wgsl` - Gram-Schmidt tangent frame
//! - `lighting.wgsl` - Blinn-Phong terms and their combination
//!
//! # Usage
//!
//! ```ignore
//! use lumina_lanes::shaders::{shader_source, FRAGMENT_ENTRY_POINT};
//! use lumina_lanes::shading_lane::{ShadingSettings, ShadingVariant};
//!
//! let wgsl = shader_source(ShadingVariant::NormalMappedTangent, &ShadingSettings::default());
//! assert!(wgsl.contains(FRAGMENT_ENTRY_POINT));
//! ```

use crate::shading_lane::{LightCombine, ShadingSettings, ShadingVariant};
use std::fmt::Write;

/// Name of the vertex entry point in every generated module.
pub const VERTEX_ENTRY_POINT: &str = "vs_main";
/// Name of the fragment entry point in every generated module.
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

const COMMON_WGSL: &str = include_str!("common.wgsl");
const CAMERA_WGSL: &str = include_str!("camera.wgsl");
const LIGHT_WGSL: &str = include_str!("light.wgsl");
const INSTANCE_WGSL: &str = include_str!("instance.wgsl");
const MATERIAL_WGSL: &str = include_str!("material.wgsl");
const NORMAL_MAP_WGSL: &str = include_str!("normal_map.wgsl");
const ENVIRONMENT_WGSL: &str = include_str!("environment.wgsl");
const NO_ENVIRONMENT_WGSL: &str = include_str!("no_environment.wgsl");
const BASIS_WGSL: &str = include_str!("basis.wgsl");
const LIGHTING_WGSL: &str = include_str!("lighting.wgsl");

const UNLIT_WGSL: &str = include_str!("unlit.wgsl");
const SOLID_COLOR_WGSL: &str = include_str!("solid_color.wgsl");
const BASIC_LIT_WGSL: &str = include_str!("basic_lit.wgsl");
const TANGENT_NORMAL_WGSL: &str = include_str!("tangent_normal.wgsl");
const WORLD_NORMAL_WGSL: &str = include_str!("world_normal.wgsl");
const SKYBOX_WGSL: &str = include_str!("skybox.wgsl");

/// The snippets making up `variant`, in emission order.
fn snippets(variant: ShadingVariant) -> Vec<&'static str> {
    let mut parts = vec![COMMON_WGSL, CAMERA_WGSL];
    match variant {
        ShadingVariant::UnlitTextured => {
            parts.extend([INSTANCE_WGSL, MATERIAL_WGSL, UNLIT_WGSL]);
        }
        ShadingVariant::SolidColor => {
            parts.extend([INSTANCE_WGSL, SOLID_COLOR_WGSL]);
        }
        ShadingVariant::BasicLit { reflection } => {
            parts.extend([
                LIGHT_WGSL,
                INSTANCE_WGSL,
                MATERIAL_WGSL,
                environment(reflection),
                LIGHTING_WGSL,
                BASIC_LIT_WGSL,
            ]);
        }
        ShadingVariant::NormalMappedTangent => {
            parts.extend([
                LIGHT_WGSL,
                INSTANCE_WGSL,
                MATERIAL_WGSL,
                NORMAL_MAP_WGSL,
                BASIS_WGSL,
                LIGHTING_WGSL,
                TANGENT_NORMAL_WGSL,
            ]);
        }
        ShadingVariant::NormalMappedWorld { reflection } => {
            parts.extend([
                LIGHT_WGSL,
                INSTANCE_WGSL,
                MATERIAL_WGSL,
                NORMAL_MAP_WGSL,
                environment(reflection),
                BASIS_WGSL,
                LIGHTING_WGSL,
                WORLD_NORMAL_WGSL,
            ]);
        }
        ShadingVariant::Skybox => {
            parts.extend([ENVIRONMENT_WGSL, SKYBOX_WGSL]);
        }
    }
    parts
}

fn environment(reflection: bool) -> &'static str {
    if reflection {
        ENVIRONMENT_WGSL
    } else {
        NO_ENVIRONMENT_WGSL
    }
}

/// The `const` declarations carrying the lighting settings.
fn constants(settings: &ShadingSettings) -> String {
    let c = settings.solid_color;
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "const AMBIENT_STRENGTH: f32 = {:?};", settings.ambient_strength);
    let _ = writeln!(out, "const SHININESS: f32 = {:?};", settings.shininess);
    let _ = writeln!(out, "const REFLECTIVITY: f32 = {:?};", settings.reflectivity);
    let _ = writeln!(
        out,
        "const COMBINE_AMBIENT_MODULATED: bool = {};",
        settings.combine == LightCombine::AmbientModulated
    );
    let _ = writeln!(
        out,
        "const SOLID_COLOR: vec4<f32> = vec4<f32>({:?}, {:?}, {:?}, {:?});",
        c.r, c.g, c.b, c.a
    );
    out
}

/// Assembles the complete WGSL module for `variant`.
///
/// The module declares exactly the bind groups of
/// [`ShadingVariant::bind_group_layouts`] and reads exactly the vertex
/// locations of [`ShadingVariant::vertex_buffer_layouts`].
pub fn shader_source(variant: ShadingVariant, settings: &ShadingSettings) -> String {
    let mut source = format!("// {} shading variant\n\n", variant.name());
    source.push_str(&constants(settings));
    for snippet in snippets(variant) {
        source.push('\n');
        source.push_str(snippet);
    }
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(variant: ShadingVariant, settings: &ShadingSettings) -> naga::Module {
        let source = shader_source(variant, settings);
        let module = naga::front::wgsl::parse_str(&source)
            .unwrap_or_else(|e| panic!("{} failed to parse:\n{}", variant.name(), e.emit_to_string(&source)));
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
            .validate(&module)
            .unwrap_or_else(|e| panic!("{} failed validation: {e:?}", variant.name()));
        module
    }

    #[test]
    fn test_every_variant_has_both_stages() {
        for variant in ShadingVariant::ALL {
            let source = shader_source(variant, &ShadingSettings::default());
            assert!(source.contains("@vertex"), "{}", variant.name());
            assert!(source.contains("@fragment"), "{}", variant.name());
        }
    }

    #[test]
    fn test_every_variant_validates() {
        for variant in ShadingVariant::ALL {
            let module = parse(variant, &ShadingSettings::default());
            let names: Vec<&str> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
            assert_eq!(names.len(), 2, "{}", variant.name());
            assert!(names.contains(&VERTEX_ENTRY_POINT));
            assert!(names.contains(&FRAGMENT_ENTRY_POINT));
        }
    }

    #[test]
    fn test_ambient_modulated_variant_validates() {
        let settings = ShadingSettings {
            combine: LightCombine::AmbientModulated,
            shininess: 1.0e-3,
            ..Default::default()
        };
        let source = shader_source(ShadingVariant::BasicLit { reflection: false }, &settings);
        assert!(source.contains("const COMBINE_AMBIENT_MODULATED: bool = true;"));
        parse(ShadingVariant::BasicLit { reflection: false }, &settings);
    }

    #[test]
    fn test_bind_groups_match_the_layouts() {
        for variant in ShadingVariant::ALL {
            let source = shader_source(variant, &ShadingSettings::default());
            let expected: Vec<u32> = variant.bind_group_layouts().into_iter().map(|(g, _)| g).collect();
            for group in 0..4 {
                assert_eq!(
                    source.contains(&format!("@group({group})")),
                    expected.contains(&group),
                    "{} group {group}",
                    variant.name()
                );
            }
        }
    }

    #[test]
    fn test_varyings_are_declared() {
        for variant in ShadingVariant::ALL {
            let source = shader_source(variant, &ShadingSettings::default());
            let (written, _) = variant.varyings();
            for name in written.names() {
                assert!(
                    source.contains(&format!("{name}: vec")),
                    "{} lacks varying {name}",
                    variant.name()
                );
            }
        }
    }

    #[test]
    fn test_vertex_locations_match_the_buffers() {
        for variant in ShadingVariant::ALL {
            let source = shader_source(variant, &ShadingSettings::default());
            for buffer in variant.vertex_buffer_layouts() {
                for attribute in buffer.attributes.iter() {
                    assert!(
                        source.contains(&format!("@location({})", attribute.shader_location)),
                        "{} location {}",
                        variant.name(),
                        attribute.shader_location
                    );
                }
            }
        }
    }
}
