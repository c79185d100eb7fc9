//! Font specifications and metrics

use serde::{Deserialize, Serialize};

/// A concrete face at a concrete size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Font family name
    pub family: String,
    /// Size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Same face, size multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            ..self.clone()
        }
    }

    /// Hashable identity of this face, used as a cache key
    pub fn key(&self) -> FontKey {
        FontKey {
            family: self.family.clone(),
            size_bits: self.size.to_bits(),
            bold: self.bold,
            italic: self.italic,
        }
    }
}

/// Hashable form of a [`FontSpec`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    pub family: String,
    pub size_bits: u64,
    pub bold: bool,
    pub italic: bool,
}

/// Metrics of one face at one size, in device-independent length units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FontMetrics {
    /// Ascent above baseline (positive)
    pub ascent: f64,
    /// Descent below baseline (positive)
    pub descent: f64,
    /// Height of a lowercase x
    pub x_height: f64,
    /// Stroke width of rules drawn in this face (underline thickness)
    pub line_width: f64,
    /// Baseline-to-baseline distance of consecutive lines
    pub line_spacing: f64,
    /// Extra leading reported by the face, may be zero
    pub leading: f64,
    /// Distance of the strike-out line above the baseline
    pub strikeout_pos: f64,
}

impl FontMetrics {
    /// Metrics of a zero-size face
    pub fn zero() -> Self {
        Self::default()
    }

    /// Ascent + descent
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Tight extent of a rendered string
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBounds {
    pub width: f64,
    /// Extent above the baseline
    pub ascent: f64,
    /// Extent below the baseline
    pub descent: f64,
}

impl TextBounds {
    pub fn new(width: f64, ascent: f64, descent: f64) -> Self {
        Self {
            width,
            ascent,
            descent,
        }
    }

    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_spec_builder() {
        let font = FontSpec::new("Times", 12.0).with_bold(true).with_italic(true);
        assert_eq!(font.family, "Times");
        assert!(font.bold);
        assert!(font.italic);
    }

    #[test]
    fn test_scaled_keeps_face() {
        let font = FontSpec::new("Times", 10.0).with_italic(true);
        let small = font.scaled(0.7);
        assert_eq!(small.family, "Times");
        assert!(small.italic);
        assert!((small.size - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_key_distinguishes_sizes() {
        let a = FontSpec::new("Times", 10.0);
        let b = FontSpec::new("Times", 10.5);
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), a.clone().key());
    }

    #[test]
    fn test_metrics_height() {
        let m = FontMetrics {
            ascent: 8.0,
            descent: 2.0,
            ..FontMetrics::zero()
        };
        assert_eq!(m.height(), 10.0);
    }
}
