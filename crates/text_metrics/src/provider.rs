//! Metrics providers
//!
//! The layout engine never talks to a font backend directly. It asks a
//! [`MetricsProvider`] for the handful of numbers it needs, which keeps the
//! engine deterministic and testable without any font files installed.

use crate::font::{FontMetrics, FontSpec, TextBounds};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Font metric queries consumed by the layout engine.
///
/// Implementations must be deterministic: identical `(FontSpec, text)`
/// pairs always produce identical answers.
pub trait MetricsProvider: Send + Sync {
    /// Metrics of the face described by `font`
    fn font_metrics(&self, font: &FontSpec) -> FontMetrics;

    /// Advance width of `text` rendered in `font`
    fn text_width(&self, font: &FontSpec, text: &str) -> f64;

    /// Tight extent of `text` rendered in `font`
    fn text_bounds(&self, font: &FontSpec, text: &str) -> TextBounds;

    /// Whether `font` has glyphs for every character of `text`
    fn supports(&self, font: &FontSpec, text: &str) -> bool;
}

impl<P: MetricsProvider + ?Sized> MetricsProvider for Box<P> {
    fn font_metrics(&self, font: &FontSpec) -> FontMetrics {
        (**self).font_metrics(font)
    }

    fn text_width(&self, font: &FontSpec, text: &str) -> f64 {
        (**self).text_width(font, text)
    }

    fn text_bounds(&self, font: &FontSpec, text: &str) -> TextBounds {
        (**self).text_bounds(font, text)
    }

    fn supports(&self, font: &FontSpec, text: &str) -> bool {
        (**self).supports(font, text)
    }
}

/// Em-relative ratios describing a synthetic face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsProfile {
    pub ascent: f64,
    pub descent: f64,
    pub x_height: f64,
    pub line_width: f64,
    pub line_spacing: f64,
    pub leading: f64,
    pub strikeout_pos: f64,
    /// Advance of narrow glyphs (i, l, punctuation)
    pub narrow_advance: f64,
    /// Advance of most glyphs
    pub regular_advance: f64,
    /// Advance of wide glyphs (m, w, M, W)
    pub wide_advance: f64,
    /// Advance of the space character
    pub space_advance: f64,
    /// Width multiplier applied to bold faces
    pub bold_factor: f64,
}

impl Default for MetricsProfile {
    fn default() -> Self {
        // Approximate values for a typical serif text face
        Self {
            ascent: 0.8,
            descent: 0.2,
            x_height: 0.45,
            line_width: 0.05,
            line_spacing: 1.2,
            leading: 0.0,
            strikeout_pos: 0.3,
            narrow_advance: 0.3,
            regular_advance: 0.5,
            wide_advance: 0.8,
            space_advance: 0.25,
            bold_factor: 1.05,
        }
    }
}

impl MetricsProfile {
    /// Every glyph (space included) advances by `advance` em
    pub fn monospace(advance: f64) -> Self {
        Self {
            narrow_advance: advance,
            regular_advance: advance,
            wide_advance: advance,
            space_advance: advance,
            bold_factor: 1.0,
            ..Self::default()
        }
    }

    fn advance(&self, ch: char) -> f64 {
        match ch {
            ' ' => self.space_advance,
            'i' | 'j' | 'l' | 't' | 'f' | 'r' | 'I' | '1' | '.' | ',' | ':' | ';' | '!' | '|'
            | '\'' | '(' | ')' | '[' | ']' => self.narrow_advance,
            'm' | 'w' | 'M' | 'W' => self.wide_advance,
            _ => self.regular_advance,
        }
    }
}

/// Ratio-based metrics for any family.
///
/// Without access to real font data every face is modelled by a
/// [`MetricsProfile`]. Used as a fallback when no font backend is available,
/// and in tests.
#[derive(Debug, Clone, Default)]
pub struct ApproximateMetrics {
    profile: MetricsProfile,
    /// Characters a family cannot draw, keyed by family name
    missing: HashMap<String, HashSet<char>>,
}

impl ApproximateMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: MetricsProfile) -> Self {
        Self {
            profile,
            missing: HashMap::new(),
        }
    }

    /// Declare that `family` has no glyphs for `chars`
    pub fn without_glyphs(mut self, family: impl Into<String>, chars: impl IntoIterator<Item = char>) -> Self {
        self.missing.entry(family.into()).or_default().extend(chars);
        self
    }

    pub fn profile(&self) -> &MetricsProfile {
        &self.profile
    }

    fn em(font: &FontSpec) -> f64 {
        if font.size.is_finite() && font.size > 0.0 {
            font.size
        } else {
            0.0
        }
    }
}

impl MetricsProvider for ApproximateMetrics {
    fn font_metrics(&self, font: &FontSpec) -> FontMetrics {
        let em = Self::em(font);
        let p = &self.profile;
        FontMetrics {
            ascent: em * p.ascent,
            descent: em * p.descent,
            x_height: em * p.x_height,
            line_width: em * p.line_width,
            line_spacing: em * p.line_spacing,
            leading: em * p.leading,
            strikeout_pos: em * p.strikeout_pos,
        }
    }

    fn text_width(&self, font: &FontSpec, text: &str) -> f64 {
        let em = Self::em(font);
        let bold = if font.bold { self.profile.bold_factor } else { 1.0 };
        text.chars().map(|ch| self.profile.advance(ch)).sum::<f64>() * em * bold
    }

    fn text_bounds(&self, font: &FontSpec, text: &str) -> TextBounds {
        if text.is_empty() {
            return TextBounds::default();
        }
        let metrics = self.font_metrics(font);
        TextBounds::new(self.text_width(font, text), metrics.ascent, metrics.descent)
    }

    fn supports(&self, font: &FontSpec, text: &str) -> bool {
        match self.missing.get(&font.family) {
            Some(missing) => !text.chars().any(|ch| missing.contains(&ch)),
            None => true,
        }
    }
}
