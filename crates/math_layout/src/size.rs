//! Box metrics reported by nodes

use serde::{Deserialize, Serialize};

/// Size of a laid-out node, in device-independent length units.
///
/// The heights are measured down from the top edge of the box. The
/// exception is `strikeout_pos`, which is measured up from the baseline,
/// the same way [`text_metrics::FontMetrics::strikeout_pos`] is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeSize {
    pub width: f64,
    /// Top edge to baseline
    pub baseline_height: f64,
    /// Top edge to bottom edge, never less than `baseline_height`
    pub overall_height: f64,
    /// Baseline to strike-through line, positive upwards
    pub strikeout_pos: f64,
    /// Horizontal nudge for a following subscript
    pub baseline_x_correction: f64,
    /// Horizontal nudge for a following superscript
    pub top_x_correction: f64,
}

impl NodeSize {
    pub fn new(width: f64, baseline_height: f64, overall_height: f64) -> Self {
        Self {
            width,
            baseline_height,
            overall_height,
            ..Self::default()
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Baseline to bottom edge
    pub fn descent(&self) -> f64 {
        self.overall_height - self.baseline_height
    }

    pub fn with_strikeout(mut self, strikeout_pos: f64) -> Self {
        self.strikeout_pos = strikeout_pos;
        self
    }
}

/// Metrics of a symbol, with the extra correction used for limits
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolSize {
    pub size: NodeSize,
    /// Horizontal offset of limits stacked above/below the symbol
    pub sub_super_above_below_x_correction: f64,
}

impl SymbolSize {
    pub fn new(size: NodeSize) -> Self {
        Self {
            size,
            sub_super_above_below_x_correction: 0.0,
        }
    }
}

impl From<NodeSize> for SymbolSize {
    fn from(size: NodeSize) -> Self {
        Self::new(size)
    }
}
