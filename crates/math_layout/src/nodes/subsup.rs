//! Subscript and superscript decorators
//!
//! Both shift a single child, typeset at a reduced size, away from the
//! parent baseline. The default shift is a multiple of the parent's x-height.
//! When the preceding sibling is unusually tall or deep, the special
//! placement computes a second candidate from that sibling's metrics and the
//! larger of the two shifts wins.

use super::{LayoutNode, MathContext, MathNode};
use crate::canvas::Canvas;
use crate::environment::Environment;
use crate::error::MathResult;
use crate::size::NodeSize;

/// Box of a decorator and where its child goes
struct Placement {
    size: NodeSize,
    child_env: Environment,
    /// Child offset from the decorator's left edge
    child_dx: f64,
    /// Child baseline offset from the parent baseline (down is positive)
    child_dy: f64,
}

/// Italic correction applied when nothing precedes the decorator
fn italic_correction(ctx: &MathContext<'_>, env: &Environment, prev: Option<&NodeSize>) -> MathResult<f64> {
    if prev.is_none() && env.italic {
        Ok(ctx.text_width(env, " ")? * ctx.config.italic_correction_factor)
    } else {
        Ok(0.0)
    }
}

// =============================================================================
// Subscript
// =============================================================================

/// Content set below the baseline
#[derive(Debug)]
pub struct SubscriptNode {
    child: Box<MathNode>,
}

impl SubscriptNode {
    pub fn new(child: MathNode) -> Self {
        Self {
            child: Box::new(child),
        }
    }

    pub fn child(&self) -> &MathNode {
        &self.child
    }

    fn placement(&self, ctx: &MathContext<'_>, env: &Environment, prev: Option<&NodeSize>) -> MathResult<Placement> {
        let cfg = ctx.config;
        let fm = ctx.font_metrics(env)?;
        let child_env = env.scaled(cfg.subsuper_size_factor);
        let child = self.child.measure(ctx, &child_env)?;

        let default_shift = cfg.sub_shift_factor * fm.x_height;
        let shift = match prev {
            Some(prev) => default_shift.max(prev.descent() + cfg.special_sub_shift_factor * child.baseline_height),
            None => default_shift,
        };
        let correction = italic_correction(ctx, env, prev)?;

        let size = NodeSize {
            width: child.width - correction,
            baseline_height: child.baseline_height - shift,
            overall_height: child.overall_height,
            strikeout_pos: prev.map_or(fm.strikeout_pos, |p| p.strikeout_pos),
            ..NodeSize::default()
        };
        Ok(Placement {
            size,
            child_env,
            child_dx: -correction,
            child_dy: shift,
        })
    }

    /// Size when placed after `prev`; `None` selects the default placement
    pub fn measure_special(&self, ctx: &MathContext<'_>, env: &Environment, prev: Option<&NodeSize>) -> MathResult<NodeSize> {
        Ok(self.placement(ctx, env, prev)?.size)
    }

    /// Draw after `prev`; returns the x position after the subscript
    pub fn draw_special(
        &self,
        ctx: &MathContext<'_>,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
        prev: Option<&NodeSize>,
    ) -> MathResult<f64> {
        let placement = self.placement(ctx, env, prev)?;
        self.child.draw(
            ctx,
            canvas,
            x + placement.child_dx,
            y + placement.child_dy,
            &placement.child_env,
        )?;
        Ok(x + placement.size.width)
    }
}

impl LayoutNode for SubscriptNode {
    fn measure(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<NodeSize> {
        self.measure_special(ctx, env, None)
    }

    fn draw(
        &self,
        ctx: &MathContext<'_>,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
    ) -> MathResult<f64> {
        self.draw_special(ctx, canvas, x, y, env, None)
    }
}

// =============================================================================
// Superscript
// =============================================================================

/// Content set above the baseline
#[derive(Debug)]
pub struct SuperscriptNode {
    child: Box<MathNode>,
}

impl SuperscriptNode {
    pub fn new(child: MathNode) -> Self {
        Self {
            child: Box::new(child),
        }
    }

    pub fn child(&self) -> &MathNode {
        &self.child
    }

    fn placement(&self, ctx: &MathContext<'_>, env: &Environment, prev: Option<&NodeSize>) -> MathResult<Placement> {
        let cfg = ctx.config;
        let fm = ctx.font_metrics(env)?;
        let child_env = env.scaled(cfg.subsuper_size_factor);
        let child = self.child.measure(ctx, &child_env)?;
        let child_descent = child.descent();

        // Shift of the child's bottom edge above the parent baseline
        let default_shift = cfg.super_shift_factor * fm.x_height;
        let shift = match prev {
            Some(prev) => default_shift.max(
                prev.baseline_height
                    - 2.0 * child_descent
                    - cfg.special_super_shift_factor * child.baseline_height,
            ),
            None => default_shift,
        };
        let correction = italic_correction(ctx, env, prev)?;

        let height = child.overall_height + shift;
        let size = NodeSize {
            width: child.width + correction,
            baseline_height: height,
            overall_height: height,
            strikeout_pos: prev.map_or(fm.strikeout_pos, |p| p.strikeout_pos),
            ..NodeSize::default()
        };
        Ok(Placement {
            size,
            child_env,
            child_dx: correction,
            child_dy: -(shift + child_descent),
        })
    }

    /// Size when placed after `prev`; `None` selects the default placement
    pub fn measure_special(&self, ctx: &MathContext<'_>, env: &Environment, prev: Option<&NodeSize>) -> MathResult<NodeSize> {
        Ok(self.placement(ctx, env, prev)?.size)
    }

    /// Draw after `prev`; returns the x position after the superscript
    pub fn draw_special(
        &self,
        ctx: &MathContext<'_>,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
        prev: Option<&NodeSize>,
    ) -> MathResult<f64> {
        let placement = self.placement(ctx, env, prev)?;
        self.child.draw(
            ctx,
            canvas,
            x + placement.child_dx,
            y + placement.child_dy,
            &placement.child_env,
        )?;
        Ok(x + placement.size.width)
    }
}

impl LayoutNode for SuperscriptNode {
    fn measure(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<NodeSize> {
        self.measure_special(ctx, env, None)
    }

    fn draw(
        &self,
        ctx: &MathContext<'_>,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
    ) -> MathResult<f64> {
        self.draw_special(ctx, canvas, x, y, env, None)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::canvas::RecordingCanvas;

    // Child text "a" at 7pt: width 3.5, ascent 5.6, descent 1.4.
    // Parent x-height 4.5, so the default sub shift is 1.8 and the default
    // super shift 2.7.

    #[test]
    fn test_subscript_default() {
        let fx = Fixture::new();
        let node = SubscriptNode::new(MathNode::text("a"));
        let size = node.measure(&fx.ctx(), &fx.env()).unwrap();
        assert!(approx(size.width, 3.5));
        assert!(approx(size.baseline_height, 5.6 - 1.8));
        assert!(approx(size.overall_height, 7.0));
        assert!(approx(size.descent(), 1.4 + 1.8));
        assert!(approx(size.strikeout_pos, 3.0));
    }

    #[test]
    fn test_superscript_default() {
        let fx = Fixture::new();
        let node = SuperscriptNode::new(MathNode::text("a"));
        let size = node.measure(&fx.ctx(), &fx.env()).unwrap();
        assert!(approx(size.width, 3.5));
        assert!(approx(size.baseline_height, 7.0 + 2.7));
        assert!(approx(size.overall_height, 7.0 + 2.7));
        assert!(approx(size.descent(), 0.0));
    }

    #[test]
    fn test_subscript_special_takes_larger_shift() {
        let fx = Fixture::new();
        let node = SubscriptNode::new(MathNode::text("a"));
        // deep predecessor: 3 + 0.4 * 5.6 = 5.24 > 1.8
        let deep = NodeSize::new(10.0, 12.0, 15.0).with_strikeout(4.0);
        let size = node.measure_special(&fx.ctx(), &fx.env(), Some(&deep)).unwrap();
        assert!(approx(size.baseline_height, 5.6 - 5.24));
        assert!(approx(size.strikeout_pos, 4.0));

        // no descent at all: 0.4 * 5.6 = 2.24 still beats 1.8
        let shallow = NodeSize::new(10.0, 8.0, 8.0);
        let size = node.measure_special(&fx.ctx(), &fx.env(), Some(&shallow)).unwrap();
        assert!(approx(size.baseline_height, 5.6 - 2.24));
    }

    #[test]
    fn test_superscript_special_takes_larger_shift() {
        let fx = Fixture::new();
        let node = SuperscriptNode::new(MathNode::text("a"));
        // tall predecessor: 20 - 2.8 - 2.24 = 14.96 > 2.7
        let tall = NodeSize::new(10.0, 20.0, 22.0);
        let size = node.measure_special(&fx.ctx(), &fx.env(), Some(&tall)).unwrap();
        assert!(approx(size.baseline_height, 7.0 + 14.96));

        let small = NodeSize::new(10.0, 4.0, 5.0);
        let size = node.measure_special(&fx.ctx(), &fx.env(), Some(&small)).unwrap();
        assert!(approx(size.baseline_height, 7.0 + 2.7));
    }

    #[test]
    fn test_italic_correction_without_predecessor() {
        let fx = Fixture::new();
        let env = fx.env().with_italic(true);
        // space is 5 wide, correction 0.4 * 5 = 2
        let sup = SuperscriptNode::new(MathNode::text("a"));
        let sub = SubscriptNode::new(MathNode::text("a"));
        assert!(approx(sup.measure(&fx.ctx(), &env).unwrap().width, 5.5));
        assert!(approx(sub.measure(&fx.ctx(), &env).unwrap().width, 1.5));

        let prev = NodeSize::new(5.0, 8.0, 10.0);
        assert!(approx(
            sup.measure_special(&fx.ctx(), &env, Some(&prev)).unwrap().width,
            3.5
        ));
    }

    #[test]
    fn test_draw_positions_child() {
        let fx = Fixture::new();
        let mut canvas = RecordingCanvas::new();
        let sub = SubscriptNode::new(MathNode::text("i"));
        let end = sub.draw(&fx.ctx(), &mut canvas, 10.0, 20.0, &fx.env()).unwrap();
        assert!(approx(end, 13.5));
        let (x, y, text) = canvas.texts()[0];
        assert_eq!(text, "i");
        assert!(approx(x, 10.0));
        assert!(approx(y, 21.8));

        let mut canvas = RecordingCanvas::new();
        let sup = SuperscriptNode::new(MathNode::text("2"));
        sup.draw(&fx.ctx(), &mut canvas, 0.0, 20.0, &fx.env()).unwrap();
        let (_, y, _) = canvas.texts()[0];
        assert!(approx(y, 20.0 - 2.7 - 1.4));
    }

    #[test]
    fn test_child_is_scaled() {
        let fx = Fixture::new();
        let mut canvas = RecordingCanvas::new();
        SuperscriptNode::new(MathNode::text("2"))
            .draw(&fx.ctx(), &mut canvas, 0.0, 0.0, &fx.env())
            .unwrap();
        match &canvas.commands()[0] {
            crate::canvas::DrawCommand::Text { font, .. } => assert!(approx(font.size, 7.0)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
