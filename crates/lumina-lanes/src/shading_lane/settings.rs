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

//! Tunable constants of the lighting model.

use super::error::ShadingError;
use anyhow::Context;
use lumina_core::math::LinearRgba;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the ambient, diffuse and specular terms are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LightCombine {
    /// `ambient + diffuse + specular`.
    #[default]
    Additive,
    /// `ambient * diffuse + specular`.
    ///
    /// Kept because one shipped shader lights this way. It goes black wherever
    /// the diffuse term is zero, which defeats the ambient term; awaiting a
    /// product decision before it is removed.
    AmbientModulated,
}

impl LightCombine {
    /// A human-readable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            LightCombine::Additive => "Additive",
            LightCombine::AmbientModulated => "AmbientModulated",
        }
    }
}

/// Lighting constants shared by every lit variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingSettings {
    /// Fraction of the light color applied everywhere regardless of orientation.
    pub ambient_strength: f32,
    /// Blinn-Phong specular exponent.
    pub shininess: f32,
    /// Scale of the environment-map reflection added to the lighting term.
    pub reflectivity: f32,
    /// How the lighting terms are combined.
    pub combine: LightCombine,
    /// Output of the solid-color debug variant.
    pub solid_color: LinearRgba,
}

impl Default for ShadingSettings {
    fn default() -> Self {
        Self {
            ambient_strength: 0.1,
            shininess: 32.0,
            reflectivity: 0.1,
            combine: LightCombine::Additive,
            solid_color: LinearRgba::new(0.3, 0.2, 0.1, 1.0),
        }
    }
}

impl ShadingSettings {
    /// Parses settings from RON. Omitted fields keep their defaults.
    pub fn from_ron_str(source: &str) -> anyhow::Result<Self> {
        let settings: Self = ron::from_str(source).context("Failed to parse shading settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads and parses a RON settings file.
    pub fn from_ron_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read shading settings from '{}'", path.display()))?;
        Self::from_ron_str(&source)
            .with_context(|| format!("Invalid shading settings in '{}'", path.display()))
    }

    /// Serializes the settings to pretty-printed RON.
    pub fn to_ron_string(&self) -> anyhow::Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize shading settings")
    }

    /// Rejects values that would make the lighting model produce NaN or negative light.
    pub fn validate(&self) -> Result<(), ShadingError> {
        let checks = [
            ("ambient_strength", self.ambient_strength, self.ambient_strength >= 0.0),
            ("shininess", self.shininess, self.shininess > 0.0),
            ("reflectivity", self.reflectivity, self.reflectivity >= 0.0),
        ];
        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(ShadingError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ShadingSettings::default();
        assert_eq!(settings.ambient_strength, 0.1);
        assert_eq!(settings.shininess, 32.0);
        assert_eq!(settings.reflectivity, 0.1);
        assert_eq!(settings.combine, LightCombine::Additive);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let settings =
            ShadingSettings::from_ron_str("(shininess: 64.0, combine: AmbientModulated)")
                .expect("valid settings");
        assert_eq!(settings.shininess, 64.0);
        assert_eq!(settings.combine, LightCombine::AmbientModulated);
        assert_eq!(settings.ambient_strength, 0.1);
    }

    #[test]
    fn test_ron_roundtrip() {
        let settings = ShadingSettings {
            reflectivity: 0.25,
            ..Default::default()
        };
        let text = settings.to_ron_string().expect("serializable");
        assert_eq!(ShadingSettings::from_ron_str(&text).expect("parsable"), settings);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ShadingSettings::from_ron_str("(shininess: 0.0)").expect_err("zero exponent");
        assert!(format!("{err:#}").contains("shininess"));

        let settings = ShadingSettings {
            reflectivity: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ShadingError::InvalidSetting {
                name: "reflectivity",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ShadingSettings::from_ron_file("/nonexistent/shading.ron").expect_err("no file");
        assert!(err.to_string().contains("/nonexistent/shading.ron"));
    }
}
