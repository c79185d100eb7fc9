//! Math Layout - TeX-style layout of math text node trees
//!
//! A parser (not part of this crate) turns markup into a tree of nodes; this
//! crate computes the box of every node and draws the tree onto a canvas,
//! following TeX-like placement rules: shared baselines, sub/superscript
//! shifts, limits stacked above and below large operators, italic correction
//! and environment changes that flow to later siblings.
//!
//! # Modules
//!
//! - `nodes`: The node contract and the symbol, text, list and script nodes
//! - `environment`: Font, style and color state passed down the tree
//! - `symbols`: Named symbols with per-encoding glyphs and fallback
//! - `config`: Layout constants and font families, loadable from JSON
//! - `canvas`: Drawing surface trait and a recording implementation
//! - `engine`: Facade owning the collaborators of a layout pass

pub mod canvas;
pub mod config;
pub mod engine;
pub mod environment;
mod error;
pub mod nodes;
mod size;
pub mod symbols;

pub use error::*;
pub use size::*;

pub use canvas::{Canvas, DrawCommand, RecordingCanvas};
pub use config::{FontDefinition, FontFamilies, LayoutConfig};
pub use engine::{LayoutEngine, RenderOutput};
pub use environment::{Color, Environment, FontRole};
pub use nodes::{
    EnvInstruction, HorizontalAlignment, HorizontalListNode, LayoutNode, MathContext, MathNode,
    ModifyEnvironmentNode, SpacingMode, SubscriptNode, SuperscriptNode, SymbolNode, TextNode,
    VerticalListNode, VerticalOrientation,
};
pub use symbols::{Glyph, GlyphTransform, SymbolDef, SymbolFlags, SymbolTable};

pub use text_metrics::{FontEncoding, FontMetrics, FontSpec, MetricsProvider};
