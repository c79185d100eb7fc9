//! Layout engine facade
//!
//! Bundles the collaborators of a layout pass (configuration, metrics
//! provider, symbol table) so hosts can measure and draw a node tree without
//! wiring up a [`MathContext`] themselves.

use crate::canvas::{Canvas, DrawCommand, RecordingCanvas};
use crate::config::LayoutConfig;
use crate::environment::Environment;
use crate::error::MathResult;
use crate::nodes::{LayoutNode, MathContext, MathNode};
use crate::size::NodeSize;
use crate::symbols::SymbolTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use text_metrics::{ApproximateMetrics, MetricsProvider};

// =============================================================================
// Render output
// =============================================================================

/// A laid-out tree: its box and the drawing commands that render it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub size: NodeSize,
    pub commands: Vec<DrawCommand>,
}

impl RenderOutput {
    pub fn to_json(&self) -> MathResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Measures and draws math node trees
pub struct LayoutEngine {
    config: LayoutConfig,
    metrics: Box<dyn MetricsProvider>,
    symbols: SymbolTable,
}

impl LayoutEngine {
    /// Engine with approximate metrics and the default symbol table
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_metrics(config, ApproximateMetrics::new())
    }

    pub fn with_metrics(config: LayoutConfig, metrics: impl MetricsProvider + 'static) -> Self {
        Self {
            config,
            metrics: Box::new(metrics),
            symbols: SymbolTable::with_defaults(),
        }
    }

    /// Engine configured from a JSON file, see [`LayoutConfig::load`]
    pub fn from_config_file(path: impl AsRef<Path>) -> MathResult<Self> {
        Ok(Self::new(LayoutConfig::load(path)?))
    }

    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LayoutConfig {
        &mut self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn context(&self) -> MathContext<'_> {
        MathContext::new(&self.config, self.metrics.as_ref(), &self.symbols)
    }

    /// Text-mode environment at the configured size and color
    pub fn base_environment(&self) -> Environment {
        Environment::new(&self.config)
    }

    /// Math-mode environment (math roman, italic)
    pub fn math_environment(&self) -> Environment {
        Environment::math(&self.config)
    }

    pub fn measure(&self, node: &MathNode) -> MathResult<NodeSize> {
        self.measure_in(node, &self.base_environment())
    }

    pub fn measure_in(&self, node: &MathNode, env: &Environment) -> MathResult<NodeSize> {
        let size = node.measure(&self.context(), env)?;
        tracing::trace!(
            width = size.width,
            baseline_height = size.baseline_height,
            overall_height = size.overall_height,
            "measured math node"
        );
        Ok(size)
    }

    /// Draw `node` with its baseline at `y`; returns the x position after it
    pub fn draw(&self, node: &MathNode, canvas: &mut dyn Canvas, x: f64, y: f64) -> MathResult<f64> {
        self.draw_in(node, canvas, x, y, &self.base_environment())
    }

    pub fn draw_in(
        &self,
        node: &MathNode,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
    ) -> MathResult<f64> {
        tracing::trace!(x, y, font_size = env.font_size, "drawing math node");
        node.draw(&self.context(), canvas, x, y, env)
    }

    /// Lay out `node` with the top-left corner of its box at the origin
    pub fn render(&self, node: &MathNode) -> MathResult<RenderOutput> {
        self.render_in(node, &self.base_environment())
    }

    pub fn render_in(&self, node: &MathNode, env: &Environment) -> MathResult<RenderOutput> {
        let size = self.measure_in(node, env)?;
        let mut canvas = RecordingCanvas::new();
        self.draw_in(node, &mut canvas, 0.0, size.baseline_height, env)?;
        tracing::debug!(
            width = size.width,
            height = size.overall_height,
            commands = canvas.commands().len(),
            "rendered math node"
        );
        Ok(RenderOutput {
            size,
            commands: canvas.into_commands(),
        })
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .field("symbols", &self.symbols.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolDef;
    use tempfile::TempDir;
    use text_metrics::MetricsProfile;

    fn engine() -> LayoutEngine {
        LayoutEngine::with_metrics(
            LayoutConfig::default(),
            ApproximateMetrics::with_profile(MetricsProfile::monospace(0.5)),
        )
    }

    #[test]
    fn test_measure_plain_text() {
        let size = engine().measure(&MathNode::text("abc")).unwrap();
        assert_eq!(size.width, 15.0);
        assert_eq!(size.baseline_height, 8.0);
        assert_eq!(size.overall_height, 10.0);
    }

    #[test]
    fn test_render_places_box_at_origin() {
        let output = engine().render(&MathNode::hlist(vec![MathNode::text("a"), MathNode::text("b")])).unwrap();
        assert_eq!(output.size.width, 10.0);
        let texts: Vec<(f64, f64)> = output
            .commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec![(0.0, 8.0), (5.0, 8.0)]);
    }

    #[test]
    fn test_render_output_json() {
        let output = engine().render(&MathNode::text("x")).unwrap();
        let json = output.to_json().unwrap();
        assert!(json.contains("\"op\": \"text\""));
        let back: RenderOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }

    #[test]
    fn test_draw_returns_advance() {
        let engine = engine();
        let mut canvas = RecordingCanvas::new();
        let end = engine.draw(&MathNode::text("ab"), &mut canvas, 3.0, 20.0).unwrap();
        assert_eq!(end, 13.0);
        assert_eq!(canvas.texts(), vec![(3.0, 20.0, "ab")]);
    }

    #[test]
    fn test_math_environment() {
        let engine = engine();
        let env = engine.math_environment();
        assert!(env.inside_math);
        assert!(env.italic);
        assert_eq!(env.font_size, engine.config().font_size);
    }

    #[test]
    fn test_custom_symbols() {
        let mut engine = engine();
        assert!(engine.symbols().get("heart").is_none());
        engine.symbols_mut().insert("heart", SymbolDef::unicode("\u{2665}"));
        let size = engine.measure(&MathNode::symbol("heart")).unwrap();
        assert_eq!(size.width, 5.0);
    }

    #[test]
    fn test_invalid_font_size_is_reported() {
        let mut engine = engine();
        engine.config_mut().font_size = -1.0;
        assert!(engine.measure(&MathNode::text("a")).is_err());
    }

    #[test]
    fn test_from_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        LayoutConfig::default().with_font_size(14.0).save(&path).unwrap();

        let engine = LayoutEngine::from_config_file(&path).unwrap();
        assert_eq!(engine.config().font_size, 14.0);
        assert_eq!(engine.base_environment().font_size, 14.0);
    }
}
