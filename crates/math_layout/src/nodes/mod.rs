//! Layout nodes
//!
//! Every node answers two questions: how large is it ([`LayoutNode::measure`])
//! and where does it put its ink ([`LayoutNode::draw`]). Composite nodes
//! recurse into their children, passing a possibly modified [`Environment`]
//! down. Nodes own their children and never look upward.
//!
//! [`MathNode`] is the closed set of node kinds the sequencing logic needs to
//! tell apart; anything else (fractions, braces, ...) plugs in through
//! [`MathNode::Other`].

mod horizontal_list;
mod modify_env;
mod subsup;
mod symbol;
mod text;
mod vertical_list;

pub use horizontal_list::HorizontalListNode;
pub use modify_env::{EnvInstruction, ModifyEnvironmentNode};
pub use subsup::{SubscriptNode, SuperscriptNode};
pub use symbol::SymbolNode;
pub use text::TextNode;
pub use vertical_list::{HorizontalAlignment, SpacingMode, VerticalListNode, VerticalOrientation};

use crate::canvas::Canvas;
use crate::config::LayoutConfig;
use crate::environment::Environment;
use crate::error::MathResult;
use crate::size::{NodeSize, SymbolSize};
use crate::symbols::SymbolTable;
use std::fmt;
use text_metrics::{FontMetrics, FontSpec, MetricsProvider};

// =============================================================================
// Layout context
// =============================================================================

/// Shared, read-only collaborators of a layout pass
#[derive(Clone, Copy)]
pub struct MathContext<'a> {
    pub config: &'a LayoutConfig,
    pub metrics: &'a dyn MetricsProvider,
    pub symbols: &'a SymbolTable,
}

impl<'a> MathContext<'a> {
    pub fn new(
        config: &'a LayoutConfig,
        metrics: &'a dyn MetricsProvider,
        symbols: &'a SymbolTable,
    ) -> Self {
        Self {
            config,
            metrics,
            symbols,
        }
    }

    /// Concrete face of `env`
    pub fn font(&self, env: &Environment) -> MathResult<FontSpec> {
        env.font_spec(self.config)
    }

    pub fn font_metrics(&self, env: &Environment) -> MathResult<FontMetrics> {
        Ok(self.metrics.font_metrics(&self.font(env)?))
    }

    pub fn text_width(&self, env: &Environment, text: &str) -> MathResult<f64> {
        Ok(self.metrics.text_width(&self.font(env)?, text))
    }
}

impl fmt::Debug for MathContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MathContext")
            .field("config", &self.config)
            .field("symbols", &self.symbols.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Node contract
// =============================================================================

/// The measure/draw contract shared by all nodes.
///
/// `measure` must be a pure function of the node and `env`; `draw` renders
/// with the baseline of the node's box at `y` and its left edge at `x`, and
/// returns the x position after the node.
pub trait LayoutNode: fmt::Debug + Send + Sync {
    fn measure(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<NodeSize>;

    fn draw(
        &self,
        ctx: &MathContext<'_>,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
    ) -> MathResult<f64>;

    /// Whether following sub/superscripts are stacked above and below
    fn is_stacked_placement_operator(&self, _ctx: &MathContext<'_>) -> bool {
        false
    }

    /// Change the environment seen by later siblings
    fn modify_environment(&self, _ctx: &MathContext<'_>, _env: &mut Environment) {}
}

// =============================================================================
// Node kinds
// =============================================================================

/// A node of a math layout tree
#[derive(Debug)]
pub enum MathNode {
    Symbol(SymbolNode),
    Text(TextNode),
    HorizontalList(HorizontalListNode),
    VerticalList(VerticalListNode),
    Subscript(SubscriptNode),
    Superscript(SuperscriptNode),
    ModifyEnvironment(ModifyEnvironmentNode),
    /// Any other node honouring the same contract
    Other(Box<dyn LayoutNode>),
}

impl MathNode {
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(SymbolNode::new(name))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextNode::new(text))
    }

    pub fn hlist(children: Vec<MathNode>) -> Self {
        Self::HorizontalList(HorizontalListNode::with_children(children))
    }

    pub fn vlist(lines: Vec<MathNode>) -> Self {
        Self::VerticalList(VerticalListNode::with_children(lines))
    }

    pub fn subscript(child: MathNode) -> Self {
        Self::Subscript(SubscriptNode::new(child))
    }

    pub fn superscript(child: MathNode) -> Self {
        Self::Superscript(SuperscriptNode::new(child))
    }

    pub fn other(node: impl LayoutNode + 'static) -> Self {
        Self::Other(Box::new(node))
    }

    pub fn as_subscript(&self) -> Option<&SubscriptNode> {
        match self {
            Self::Subscript(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_superscript(&self) -> Option<&SuperscriptNode> {
        match self {
            Self::Superscript(node) => Some(node),
            _ => None,
        }
    }

    /// Metrics including the limit correction of symbols
    pub fn measure_extended(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<SymbolSize> {
        match self {
            Self::Symbol(node) => node.measure_symbol(ctx, env),
            other => Ok(other.measure(ctx, env)?.into()),
        }
    }

    fn as_layout_node(&self) -> &dyn LayoutNode {
        match self {
            Self::Symbol(node) => node,
            Self::Text(node) => node,
            Self::HorizontalList(node) => node,
            Self::VerticalList(node) => node,
            Self::Subscript(node) => node,
            Self::Superscript(node) => node,
            Self::ModifyEnvironment(node) => node,
            Self::Other(node) => node.as_ref(),
        }
    }
}

impl LayoutNode for MathNode {
    fn measure(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<NodeSize> {
        self.as_layout_node().measure(ctx, env)
    }

    fn draw(
        &self,
        ctx: &MathContext<'_>,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
    ) -> MathResult<f64> {
        self.as_layout_node().draw(ctx, canvas, x, y, env)
    }

    fn is_stacked_placement_operator(&self, ctx: &MathContext<'_>) -> bool {
        self.as_layout_node().is_stacked_placement_operator(ctx)
    }

    fn modify_environment(&self, ctx: &MathContext<'_>, env: &mut Environment) {
        self.as_layout_node().modify_environment(ctx, env)
    }
}

impl From<SymbolNode> for MathNode {
    fn from(node: SymbolNode) -> Self {
        Self::Symbol(node)
    }
}

impl From<TextNode> for MathNode {
    fn from(node: TextNode) -> Self {
        Self::Text(node)
    }
}

impl From<HorizontalListNode> for MathNode {
    fn from(node: HorizontalListNode) -> Self {
        Self::HorizontalList(node)
    }
}

impl From<VerticalListNode> for MathNode {
    fn from(node: VerticalListNode) -> Self {
        Self::VerticalList(node)
    }
}

impl From<ModifyEnvironmentNode> for MathNode {
    fn from(node: ModifyEnvironmentNode) -> Self {
        Self::ModifyEnvironment(node)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixed metrics shared by the node tests: a 10pt face with ascent 8,
    //! descent 2, x-height 4.5 and every glyph 5 wide.

    use super::*;
    use text_metrics::{ApproximateMetrics, MetricsProfile};

    pub struct Fixture {
        pub config: LayoutConfig,
        pub metrics: ApproximateMetrics,
        pub symbols: SymbolTable,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                config: LayoutConfig::default(),
                metrics: ApproximateMetrics::with_profile(MetricsProfile::monospace(0.5)),
                symbols: SymbolTable::with_defaults(),
            }
        }

        pub fn ctx(&self) -> MathContext<'_> {
            MathContext::new(&self.config, &self.metrics, &self.symbols)
        }

        pub fn env(&self) -> Environment {
            Environment::new(&self.config)
        }
    }

    /// A box of fixed metrics, independent of the environment
    #[derive(Debug, Clone, Copy)]
    pub struct FixedBox {
        pub size: NodeSize,
        pub stacked: bool,
    }

    impl FixedBox {
        pub fn new(width: f64, ascent: f64, descent: f64) -> Self {
            Self {
                size: NodeSize::new(width, ascent, ascent + descent),
                stacked: false,
            }
        }

        pub fn stacked(mut self) -> Self {
            self.stacked = true;
            self
        }
    }

    impl LayoutNode for FixedBox {
        fn measure(&self, _ctx: &MathContext<'_>, _env: &Environment) -> MathResult<NodeSize> {
            Ok(self.size)
        }

        fn draw(
            &self,
            _ctx: &MathContext<'_>,
            canvas: &mut dyn Canvas,
            x: f64,
            y: f64,
            env: &Environment,
        ) -> MathResult<f64> {
            canvas.draw_rect(
                x,
                y - self.size.baseline_height,
                self.size.width,
                self.size.overall_height,
                1.0,
                env.color,
            );
            Ok(x + self.size.width)
        }

        fn is_stacked_placement_operator(&self, _ctx: &MathContext<'_>) -> bool {
            self.stacked
        }
    }

    pub fn fixed(width: f64, ascent: f64, descent: f64) -> MathNode {
        MathNode::other(FixedBox::new(width, ascent, descent))
    }

    pub fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
}
