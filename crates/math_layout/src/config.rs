//! Layout settings
//!
//! Every placement rule of the engine is steered by a named factor. The
//! defaults reproduce the usual TeX-like look; hosts can override any of them
//! from a JSON settings file.

use crate::environment::{Color, FontRole};
use crate::error::{MathError, MathResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use text_metrics::FontEncoding;

/// A logical font role bound to a concrete family
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FontDefinition {
    /// Family name handed to the metrics provider
    pub family: String,
    /// Glyph encoding of the family
    #[serde(default)]
    pub encoding: FontEncoding,
}

impl FontDefinition {
    pub fn new(family: impl Into<String>, encoding: FontEncoding) -> Self {
        Self {
            family: family.into(),
            encoding,
        }
    }
}

/// Families used for each logical font role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontFamilies {
    pub roman: FontDefinition,
    pub sans: FontDefinition,
    pub math_roman: FontDefinition,
    pub math_sans: FontDefinition,
    pub typewriter: FontDefinition,
    pub script: FontDefinition,
    pub blackboard: FontDefinition,
    pub caligraphic: FontDefinition,
    pub fraktur: FontDefinition,
    /// Family used for symbols in the win-symbol encoding
    pub symbol: FontDefinition,
    /// Family tried for symbols the active family has no glyph for
    pub fallback: FontDefinition,
}

impl Default for FontFamilies {
    fn default() -> Self {
        Self {
            roman: FontDefinition::new("Serif", FontEncoding::Unicode),
            sans: FontDefinition::new("Sans", FontEncoding::Unicode),
            math_roman: FontDefinition::new("Serif", FontEncoding::Unicode),
            math_sans: FontDefinition::new("Sans", FontEncoding::Unicode),
            typewriter: FontDefinition::new("Monospace", FontEncoding::Unicode),
            script: FontDefinition::new("Script", FontEncoding::Unicode),
            blackboard: FontDefinition::new("Blackboard", FontEncoding::Unicode),
            caligraphic: FontDefinition::new("Caligraphic", FontEncoding::Unicode),
            fraktur: FontDefinition::new("Fraktur", FontEncoding::Unicode),
            symbol: FontDefinition::new("Symbol", FontEncoding::WinSymbol),
            fallback: FontDefinition::new("Serif", FontEncoding::Unicode),
        }
    }
}

impl FontFamilies {
    /// Definition bound to `role`
    pub fn get(&self, role: FontRole) -> &FontDefinition {
        match role {
            FontRole::Roman => &self.roman,
            FontRole::Sans => &self.sans,
            FontRole::MathRoman => &self.math_roman,
            FontRole::MathSans => &self.math_sans,
            FontRole::Typewriter => &self.typewriter,
            FontRole::Script => &self.script,
            FontRole::Blackboard => &self.blackboard,
            FontRole::Caligraphic => &self.caligraphic,
            FontRole::Fraktur => &self.fraktur,
        }
    }

    /// Rebind `role` to another family
    pub fn set(&mut self, role: FontRole, definition: FontDefinition) {
        let slot = match role {
            FontRole::Roman => &mut self.roman,
            FontRole::Sans => &mut self.sans,
            FontRole::MathRoman => &mut self.math_roman,
            FontRole::MathSans => &mut self.math_sans,
            FontRole::Typewriter => &mut self.typewriter,
            FontRole::Script => &mut self.script,
            FontRole::Blackboard => &mut self.blackboard,
            FontRole::Caligraphic => &mut self.caligraphic,
            FontRole::Fraktur => &mut self.fraktur,
        };
        *slot = definition;
    }
}

/// Tunable factors and base font of the layout engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Base font size in points
    pub font_size: f64,
    /// Base text color
    pub font_color: Color,
    /// Font role -> family table
    pub fonts: FontFamilies,

    /// Size of sub/superscript content relative to the parent
    pub subsuper_size_factor: f64,
    /// Italic correction in multiples of the space width
    pub italic_correction_factor: f64,
    /// Subscript baseline shift in multiples of the x-height
    pub sub_shift_factor: f64,
    /// Superscript bottom shift in multiples of the x-height
    pub super_shift_factor: f64,
    /// Subscript shift after a large node, in multiples of the child ascent
    pub special_sub_shift_factor: f64,
    /// Superscript shift after a large node, in multiples of the child ascent
    pub special_super_shift_factor: f64,
    /// A predecessor counts as large when it exceeds the font ascent (descent)
    /// by this factor
    pub subsuper_mode_selection_by_size_factor: f64,
    /// Size of limits above/below a stacked operator
    pub operatorsubsuper_size_factor: f64,
    /// Gap between a stacked operator and its limits, in x-heights
    pub operatorsubsuper_distance_factor: f64,
    /// Extra width around a stacked operator, in widths of "x"
    pub operatorsubsuper_extraspace_factor: f64,
    /// Width of relations and operators that extend in math mode
    pub mathoperator_width_factor: f64,
    /// Horizontal offset of limits of integral-like symbols
    pub int_sub_super_x_correction_factor: f64,
    /// Horizontal offset of side scripts of integral-like symbols, in widths of "X"
    pub int_sub_besides_x_correction_factor: f64,
    /// Horizontal overhang of italic text per unit ascent
    pub italic_slant_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            font_color: Color::BLACK,
            fonts: FontFamilies::default(),
            subsuper_size_factor: 0.7,
            italic_correction_factor: 0.4,
            sub_shift_factor: 0.4,
            super_shift_factor: 0.6,
            special_sub_shift_factor: 0.4,
            special_super_shift_factor: 0.4,
            subsuper_mode_selection_by_size_factor: 1.01,
            operatorsubsuper_size_factor: 0.65,
            operatorsubsuper_distance_factor: 0.25,
            operatorsubsuper_extraspace_factor: 0.5,
            mathoperator_width_factor: 1.5,
            int_sub_super_x_correction_factor: 0.1,
            int_sub_besides_x_correction_factor: 0.1,
            italic_slant_factor: 0.2,
        }
    }
}

impl LayoutConfig {
    /// Load settings from `path`, or return defaults if the file doesn't exist
    /// or doesn't hold a valid configuration
    pub fn load(path: impl AsRef<Path>) -> MathResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match Self::from_json(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    "Ignoring invalid layout settings {}, using defaults: {}",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save settings to `path` as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> MathResult<()> {
        let path = path.as_ref();
        self.validate()?;
        if path.is_dir() {
            return Err(MathError::Config(format!(
                "{} is a directory",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> MathResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a negative base size and non-finite factors
    pub fn validate(&self) -> MathResult<()> {
        if !self.font_size.is_finite() || self.font_size < 0.0 {
            return Err(MathError::Config(format!(
                "font_size must be a non-negative number, got {}",
                self.font_size
            )));
        }

        let factors = [
            ("subsuper_size_factor", self.subsuper_size_factor),
            ("italic_correction_factor", self.italic_correction_factor),
            ("sub_shift_factor", self.sub_shift_factor),
            ("super_shift_factor", self.super_shift_factor),
            ("special_sub_shift_factor", self.special_sub_shift_factor),
            ("special_super_shift_factor", self.special_super_shift_factor),
            (
                "subsuper_mode_selection_by_size_factor",
                self.subsuper_mode_selection_by_size_factor,
            ),
            ("operatorsubsuper_size_factor", self.operatorsubsuper_size_factor),
            ("operatorsubsuper_distance_factor", self.operatorsubsuper_distance_factor),
            ("operatorsubsuper_extraspace_factor", self.operatorsubsuper_extraspace_factor),
            ("mathoperator_width_factor", self.mathoperator_width_factor),
            ("int_sub_super_x_correction_factor", self.int_sub_super_x_correction_factor),
            ("int_sub_besides_x_correction_factor", self.int_sub_besides_x_correction_factor),
            ("italic_slant_factor", self.italic_slant_factor),
        ];
        if let Some((name, value)) = factors.iter().find(|(_, value)| !value.is_finite()) {
            return Err(MathError::Config(format!("{} must be finite, got {}", name, value)));
        }
        Ok(())
    }

    pub fn to_json(&self) -> MathResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder-style override of the base font size
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_factors() {
        let config = LayoutConfig::default();
        assert_eq!(config.font_size, 10.0);
        assert_eq!(config.subsuper_size_factor, 0.7);
        assert_eq!(config.subsuper_mode_selection_by_size_factor, 1.01);
        assert_eq!(config.fonts.symbol.encoding, FontEncoding::WinSymbol);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LayoutConfig::from_json(r#"{"font_size": 14.0, "sub_shift_factor": 0.5}"#).unwrap();
        assert_eq!(config.font_size, 14.0);
        assert_eq!(config.sub_shift_factor, 0.5);
        assert_eq!(config.super_shift_factor, 0.6);
        assert_eq!(config.fonts, FontFamilies::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = LayoutConfig::default().with_font_size(12.0);
        config.fonts.set(FontRole::Sans, FontDefinition::new("Helvetica", FontEncoding::Standard));
        let json = config.to_json().unwrap();
        assert_eq!(LayoutConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_font_roles() {
        let mut fonts = FontFamilies::default();
        fonts.set(FontRole::Fraktur, FontDefinition::new("UnifrakturMaguntia", FontEncoding::Unicode));
        assert_eq!(fonts.get(FontRole::Fraktur).family, "UnifrakturMaguntia");
        assert_eq!(fonts.get(FontRole::Roman).family, "Serif");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = LayoutConfig::load(temp.path().join("absent.json")).unwrap();
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("layout.json");
        let config = LayoutConfig {
            italic_correction_factor: 0.3,
            ..LayoutConfig::default()
        };

        config.save(&path).unwrap();
        assert!(path.exists());

        let loaded = LayoutConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_corrupted_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("layout.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = LayoutConfig::load(&path).unwrap();
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn test_from_json_reports_errors() {
        let err = LayoutConfig::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, MathError::Json(_)));
    }

    #[test]
    fn test_from_json_rejects_negative_font_size() {
        let err = LayoutConfig::from_json(r#"{"font_size": -2.0}"#).unwrap_err();
        assert!(matches!(err, MathError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_non_finite_factor() {
        let config = LayoutConfig {
            sub_shift_factor: f64::NAN,
            ..LayoutConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sub_shift_factor"));
        assert!(LayoutConfig::default().with_font_size(0.0).validate().is_ok());
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("layout.json");

        let err = LayoutConfig::default().with_font_size(-1.0).save(&path).unwrap_err();
        assert!(matches!(err, MathError::Config(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_to_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = LayoutConfig::default().save(temp.path()).unwrap_err();
        assert!(matches!(err, MathError::Config(_)));
    }

    #[test]
    fn test_load_invalid_values_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("layout.json");
        std::fs::write(&path, r#"{"font_size": -12.0}"#).unwrap();

        let config = LayoutConfig::load(&path).unwrap();
        assert_eq!(config, LayoutConfig::default());
    }
}
