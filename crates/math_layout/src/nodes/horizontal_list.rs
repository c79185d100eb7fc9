//! Horizontal list
//!
//! Sets its children left to right on one shared baseline. Besides plain
//! sequencing it handles the placement rules that depend on neighbours:
//!
//! - a superscript directly followed by a subscript (or the other way round)
//!   is set as one stacked pair at the same x position;
//! - sub/superscripts after a stacked-placement operator (`\sum`, `\lim`)
//!   become limits centred above and below the operator;
//! - a sub/superscript after an unusually tall or deep sibling uses the
//!   special placement that takes the sibling's metrics into account.
//!
//! Measuring and drawing run through the same routine, so the advance
//! returned by `draw` always equals the measured width.

use super::{LayoutNode, MathContext, MathNode, SubscriptNode, SuperscriptNode};
use crate::canvas::Canvas;
use crate::environment::Environment;
use crate::error::MathResult;
use crate::size::NodeSize;

/// Sequence of nodes on one baseline
#[derive(Debug, Default)]
pub struct HorizontalListNode {
    children: Vec<MathNode>,
}

/// Where a drawing pass puts its ink
struct Pen<'c> {
    canvas: &'c mut dyn Canvas,
    x: f64,
    y: f64,
}

/// Running box of the children laid out so far
#[derive(Default)]
struct Accumulator {
    size: NodeSize,
    started: bool,
}

impl Accumulator {
    fn add(&mut self, ns: &NodeSize) {
        let out = &mut self.size;
        if !self.started {
            self.started = true;
            out.baseline_height = ns.baseline_height;
            out.overall_height = ns.overall_height;
            out.strikeout_pos = ns.strikeout_pos;
            return;
        }
        if ns.baseline_height > out.baseline_height {
            // keep the descent collected so far
            out.overall_height += ns.baseline_height - out.baseline_height;
            out.baseline_height = ns.baseline_height;
            out.strikeout_pos = ns.strikeout_pos;
        }
        if out.baseline_height + ns.descent() > out.overall_height {
            out.overall_height = out.baseline_height + ns.descent();
        }
    }
}

/// Sub/superscripts following a stacked-placement operator
struct Limits<'n> {
    sub: Option<&'n SubscriptNode>,
    sup: Option<&'n SuperscriptNode>,
    /// Number of list entries taken by the limits
    consumed: usize,
}

impl<'n> Limits<'n> {
    fn find(rest: &'n [MathNode]) -> Option<Self> {
        let first = rest.first()?;
        let second = rest.get(1);
        match (first, second) {
            (MathNode::Subscript(sub), Some(MathNode::Superscript(sup)))
            | (MathNode::Superscript(sup), Some(MathNode::Subscript(sub))) => Some(Self {
                sub: Some(sub),
                sup: Some(sup),
                consumed: 2,
            }),
            (MathNode::Subscript(sub), _) => Some(Self {
                sub: Some(sub),
                sup: None,
                consumed: 1,
            }),
            (MathNode::Superscript(sup), _) => Some(Self {
                sub: None,
                sup: Some(sup),
                consumed: 1,
            }),
            _ => None,
        }
    }
}

/// A superscript and a subscript next to each other, in either order
fn script_pair<'n>(
    first: &'n MathNode,
    second: Option<&'n MathNode>,
) -> Option<(&'n SuperscriptNode, &'n SubscriptNode)> {
    match (first, second?) {
        (MathNode::Superscript(sup), MathNode::Subscript(sub))
        | (MathNode::Subscript(sub), MathNode::Superscript(sup)) => Some((sup, sub)),
        _ => None,
    }
}

impl HorizontalListNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(children: Vec<MathNode>) -> Self {
        Self { children }
    }

    pub fn add_child(&mut self, child: MathNode) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[MathNode] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn layout(&self, ctx: &MathContext<'_>, env: &Environment, mut pen: Option<Pen<'_>>) -> MathResult<NodeSize> {
        let cfg = ctx.config;
        let mut ev = env.clone();
        let mut acc = Accumulator::default();
        let mut x_corrections = (0.0, 0.0);
        let mut xnew = 0.0;
        let mut i = 0;

        while i < self.children.len() {
            let fm = ctx.font_metrics(&ev)?;
            let space_width = ctx.text_width(&ev, " ")?;
            let limit_gap = fm.x_height * cfg.operatorsubsuper_distance_factor;
            let limit_extra = ctx.text_width(&ev, "x")? * cfg.operatorsubsuper_extraspace_factor;
            let special_ascent = fm.ascent * cfg.subsuper_mode_selection_by_size_factor;
            let special_descent = fm.descent * cfg.subsuper_mode_selection_by_size_factor;

            let prev = match i {
                0 => None,
                _ => Some(self.children[i - 1].measure_extended(ctx, &ev)?.size),
            };
            let prev_for_sub = prev.filter(|p| p.baseline_height > special_ascent);
            let prev_for_sup = prev.filter(|p| p.descent() > special_descent);
            let sub_shift_x = prev.map_or(0.0, |p| p.baseline_x_correction) + fm.line_width * 0.5;
            let sup_shift_x = prev.map_or(0.0, |p| p.top_x_correction);

            let child = &self.children[i];

            // Superscript and subscript stacked at the same position
            if let Some((sup, sub)) = script_pair(child, self.children.get(i + 1)) {
                let sup_size = sup.measure_special(ctx, &ev, prev_for_sup.as_ref())?;
                let sub_size = sub.measure_special(ctx, &ev, prev_for_sub.as_ref())?;
                let width = (sup_size.width + space_width).max(sub_size.width + sub_shift_x);
                if let Some(pen) = pen.as_mut() {
                    let x = pen.x + xnew;
                    sub.draw_special(ctx, &mut *pen.canvas, x + sub_shift_x, pen.y, &ev, prev_for_sub.as_ref())?;
                    sup.draw_special(ctx, &mut *pen.canvas, x, pen.y, &ev, prev_for_sup.as_ref())?;
                }
                acc.add(&sup_size);
                acc.add(&sub_size);
                xnew += width;
                i += 2;
                continue;
            }

            // Limits above/below a stacked-placement operator
            if child.is_stacked_placement_operator(ctx) {
                if let Some(limits) = Limits::find(&self.children[i + 1..]) {
                    let op = child.measure_extended(ctx, &ev)?;
                    let corr = op.sub_super_above_below_x_correction;
                    let op = op.size;
                    let limit_env = ev.scaled(cfg.operatorsubsuper_size_factor);
                    let sub_size = match limits.sub {
                        Some(sub) => Some(sub.child().measure(ctx, &limit_env)?),
                        None => None,
                    };
                    let sup_size = match limits.sup {
                        Some(sup) => Some(sup.child().measure(ctx, &limit_env)?),
                        None => None,
                    };

                    let mut width = op.width;
                    let mut ascent = op.baseline_height;
                    let mut descent = op.descent();
                    if let Some(s) = &sub_size {
                        width = width.max(s.width + corr);
                        descent += s.overall_height + limit_gap;
                    }
                    if let Some(s) = &sup_size {
                        width = width.max(s.width + corr);
                        ascent += s.overall_height + limit_gap;
                    }
                    width += limit_extra;

                    if let Some(pen) = pen.as_mut() {
                        let x = pen.x + xnew;
                        child.draw(ctx, &mut *pen.canvas, x + (width - op.width) / 2.0, pen.y, &ev)?;
                        if let (Some(sub), Some(s)) = (limits.sub, &sub_size) {
                            sub.child().draw(
                                ctx,
                                &mut *pen.canvas,
                                x + (width - s.width) / 2.0 - corr,
                                pen.y + op.descent() + s.baseline_height + limit_gap,
                                &limit_env,
                            )?;
                        }
                        if let (Some(sup), Some(s)) = (limits.sup, &sup_size) {
                            sup.child().draw(
                                ctx,
                                &mut *pen.canvas,
                                x + (width - s.width) / 2.0 + corr,
                                pen.y - op.baseline_height - s.descent() - limit_gap,
                                &limit_env,
                            )?;
                        }
                    }

                    acc.add(&NodeSize {
                        width,
                        baseline_height: ascent,
                        overall_height: ascent + descent,
                        strikeout_pos: op.strikeout_pos,
                        ..NodeSize::default()
                    });
                    xnew += width;
                    child.modify_environment(ctx, &mut ev);
                    i += 1 + limits.consumed;
                    continue;
                }
            }

            // Everything else, including a lone sub- or superscript
            let (ns, advance) = match child {
                MathNode::Subscript(sub) => {
                    let ns = sub.measure_special(ctx, &ev, prev_for_sub.as_ref())?;
                    if let Some(pen) = pen.as_mut() {
                        let x = pen.x + xnew + sub_shift_x;
                        sub.draw_special(ctx, &mut *pen.canvas, x, pen.y, &ev, prev_for_sub.as_ref())?;
                    }
                    (ns, ns.width + sub_shift_x)
                }
                MathNode::Superscript(sup) => {
                    let ns = sup.measure_special(ctx, &ev, prev_for_sup.as_ref())?;
                    if let Some(pen) = pen.as_mut() {
                        let x = pen.x + xnew + sup_shift_x;
                        sup.draw_special(ctx, &mut *pen.canvas, x, pen.y, &ev, prev_for_sup.as_ref())?;
                    }
                    (ns, ns.width + sup_shift_x)
                }
                other => {
                    let ns = other.measure(ctx, &ev)?;
                    if let Some(pen) = pen.as_mut() {
                        other.draw(ctx, &mut *pen.canvas, pen.x + xnew, pen.y, &ev)?;
                    }
                    (ns, ns.width)
                }
            };
            acc.add(&ns);
            x_corrections = (ns.baseline_x_correction, ns.top_x_correction);
            xnew += advance;
            child.modify_environment(ctx, &mut ev);
            i += 1;
        }

        let mut size = acc.size;
        size.width = xnew;
        size.baseline_x_correction = x_corrections.0;
        size.top_x_correction = x_corrections.1;
        Ok(size)
    }
}

impl LayoutNode for HorizontalListNode {
    fn measure(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<NodeSize> {
        self.layout(ctx, env, None)
    }

    fn draw(
        &self,
        ctx: &MathContext<'_>,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
    ) -> MathResult<f64> {
        let size = self.layout(ctx, env, Some(Pen { canvas, x, y }))?;
        Ok(x + size.width)
    }
}
