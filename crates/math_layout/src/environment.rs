//! Layout environment
//!
//! An [`Environment`] is the font and style state a node is laid out in. It
//! is passed down the tree by value: a node that needs a different state for
//! its children (smaller size, another font) derives a modified copy and
//! never touches its parent's.

use crate::config::LayoutConfig;
use crate::error::{MathError, MathResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use text_metrics::{FontEncoding, FontSpec};

// =============================================================================
// Color
// =============================================================================

/// A color in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    /// Parse a color name or a `#rrggbb` / `#rrggbbaa` hex string
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let color = match s.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "gray" | "grey" => Self::GRAY,
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" => Self::rgb(0, 255, 255),
            "magenta" => Self::rgb(255, 0, 255),
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "brown" => Self::rgb(165, 42, 42),
            "darkgreen" => Self::rgb(0, 100, 0),
            "darkblue" => Self::rgb(0, 0, 139),
            "darkred" => Self::rgb(139, 0, 0),
            "transparent" => Self::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// =============================================================================
// Font roles
// =============================================================================

/// Logical font selector; the concrete family comes from the settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontRole {
    Roman,
    Sans,
    MathRoman,
    MathSans,
    Typewriter,
    Script,
    Blackboard,
    Caligraphic,
    Fraktur,
}

impl Default for FontRole {
    fn default() -> Self {
        Self::Roman
    }
}

impl FontRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Roman => "roman",
            Self::Sans => "sans",
            Self::MathRoman => "math-roman",
            Self::MathSans => "math-sans",
            Self::Typewriter => "typewriter",
            Self::Script => "script",
            Self::Blackboard => "blackboard",
            Self::Caligraphic => "caligraphic",
            Self::Fraktur => "fraktur",
        }
    }
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontRole {
    type Err = MathError;

    fn from_str(s: &str) -> MathResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roman" | "rm" => Ok(Self::Roman),
            "sans" | "sf" => Ok(Self::Sans),
            "math-roman" | "mathrm" => Ok(Self::MathRoman),
            "math-sans" | "mathsf" => Ok(Self::MathSans),
            "typewriter" | "tt" => Ok(Self::Typewriter),
            "script" => Ok(Self::Script),
            "blackboard" | "bb" => Ok(Self::Blackboard),
            "caligraphic" | "cal" => Ok(Self::Caligraphic),
            "fraktur" | "frak" => Ok(Self::Fraktur),
            other => Err(MathError::UnknownFontRole(other.to_string())),
        }
    }
}

// =============================================================================
// Environment
// =============================================================================

/// Font and style state for laying out a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub font: FontRole,
    /// Font size in points
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub small_caps: bool,
    pub underlined: bool,
    pub overline: bool,
    pub strike: bool,
    /// Whether the content is typeset as math (affects operator widths)
    pub inside_math: bool,
    pub color: Color,
}

impl Environment {
    /// Upright text in the configured base font
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            font: FontRole::Roman,
            font_size: config.font_size,
            bold: false,
            italic: false,
            small_caps: false,
            underlined: false,
            overline: false,
            strike: false,
            inside_math: false,
            color: config.font_color,
        }
    }

    /// Math mode: math roman face, italic letters
    pub fn math(config: &LayoutConfig) -> Self {
        Self {
            font: FontRole::MathRoman,
            italic: true,
            inside_math: true,
            ..Self::new(config)
        }
    }

    /// Same state, font size multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            font_size: self.font_size * factor,
            ..self.clone()
        }
    }

    pub fn with_font(mut self, font: FontRole) -> Self {
        self.font = font;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Concrete face of this environment.
    ///
    /// Fails for negative or non-finite sizes; a zero size is valid and
    /// measures as nothing.
    pub fn font_spec(&self, config: &LayoutConfig) -> MathResult<FontSpec> {
        self.family_spec(&config.fonts.get(self.font).family)
    }

    /// The style of this environment applied to another family
    pub fn family_spec(&self, family: &str) -> MathResult<FontSpec> {
        if !self.font_size.is_finite() || self.font_size < 0.0 {
            return Err(MathError::InvalidFontSize(self.font_size));
        }
        Ok(FontSpec::new(family, self.font_size)
            .with_bold(self.bold)
            .with_italic(self.italic))
    }

    /// Glyph encoding of the active face
    pub fn encoding(&self, config: &LayoutConfig) -> FontEncoding {
        config.fonts.get(self.font).encoding
    }
}
