//! Vertical list
//!
//! Stacks its children as successive lines. Each line keeps its own
//! baseline; the distance between consecutive baselines comes from the
//! font's line spacing and the lines' extents. The box's baseline is one of
//! several anchors (top edge, first line, centre, last line, bottom edge).

use super::{LayoutNode, MathContext, MathNode};
use crate::canvas::Canvas;
use crate::environment::Environment;
use crate::error::MathResult;
use crate::size::NodeSize;
use serde::{Deserialize, Serialize};

/// Horizontal placement of lines narrower than the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Centered,
    Right,
}

/// Which point of the stack sits on the surrounding baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalOrientation {
    /// Top edge of the box
    Top,
    /// Baseline of the first line
    #[default]
    FirstLine,
    /// Middle of the box
    Centered,
    /// Baseline of the last line
    LastLine,
    /// Bottom edge of the box
    Bottom,
}

/// How far apart consecutive baselines are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacingMode {
    /// Lines touch, separated only by the leading
    Minimal,
    /// At least the font's line spacing
    #[default]
    Default,
}

/// Lines stacked top to bottom
#[derive(Debug)]
pub struct VerticalListNode {
    children: Vec<MathNode>,
    alignment: HorizontalAlignment,
    orientation: VerticalOrientation,
    spacing: SpacingMode,
    line_spacing_factor: f64,
}

impl Default for VerticalListNode {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            alignment: HorizontalAlignment::default(),
            orientation: VerticalOrientation::default(),
            spacing: SpacingMode::default(),
            line_spacing_factor: 1.0,
        }
    }
}

/// Box of the stack plus the offset of every line
struct StackLayout {
    size: NodeSize,
    /// (x, baseline y) of each line relative to the stack's origin
    offsets: Vec<(f64, f64)>,
}

impl VerticalListNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(children: Vec<MathNode>) -> Self {
        Self {
            children,
            ..Self::default()
        }
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_orientation(mut self, orientation: VerticalOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_spacing(mut self, spacing: SpacingMode) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_line_spacing_factor(mut self, factor: f64) -> Self {
        self.line_spacing_factor = factor;
        self
    }

    pub fn add_child(&mut self, child: MathNode) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[MathNode] {
        &self.children
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn orientation(&self) -> VerticalOrientation {
        self.orientation
    }

    pub fn spacing(&self) -> SpacingMode {
        self.spacing
    }

    pub fn line_spacing_factor(&self) -> f64 {
        self.line_spacing_factor
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn layout(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<StackLayout> {
        if self.children.is_empty() {
            return Ok(StackLayout {
                size: NodeSize::zero(),
                offsets: Vec::new(),
            });
        }

        let mut ev = env.clone();
        let mut lines: Vec<NodeSize> = Vec::with_capacity(self.children.len());
        let mut ys: Vec<f64> = Vec::with_capacity(self.children.len());
        let mut height = 0.0;
        let mut y = 0.0;

        for child in &self.children {
            let fm = ctx.font_metrics(&ev)?;
            let line_spacing = fm.line_spacing * self.line_spacing_factor;
            let leading = if fm.leading.abs() > 1e-6 { fm.leading } else { fm.line_width };
            let leading = leading * self.line_spacing_factor;

            let line = child.measure(ctx, &ev)?;
            match lines.last() {
                None => height = line.baseline_height,
                Some(prev) => {
                    let tight = prev.descent() + leading + line.baseline_height;
                    let delta = match self.spacing {
                        SpacingMode::Minimal => tight,
                        SpacingMode::Default => line_spacing.max(tight),
                    };
                    height += delta;
                    y += delta;
                }
            }
            lines.push(line);
            ys.push(y);
            child.modify_environment(ctx, &mut ev);
        }

        let (first, last) = (lines[0], lines[lines.len() - 1]);
        height += last.descent();
        let width = lines.iter().map(|l| l.width).fold(0.0, f64::max);

        let (baseline_height, strikeout_pos, y0) = match self.orientation {
            VerticalOrientation::Top => (0.0, 0.0, first.baseline_height),
            VerticalOrientation::FirstLine => (first.baseline_height, first.strikeout_pos, 0.0),
            VerticalOrientation::Centered => (height / 2.0, height / 4.0, -height / 2.0 + first.baseline_height),
            VerticalOrientation::LastLine => (
                height - last.descent(),
                last.strikeout_pos,
                -(height - first.baseline_height - last.descent()),
            ),
            VerticalOrientation::Bottom => (height, 0.0, -(height - first.baseline_height)),
        };

        let offsets = lines
            .iter()
            .zip(&ys)
            .map(|(line, y)| {
                let x = match self.alignment {
                    HorizontalAlignment::Left => 0.0,
                    HorizontalAlignment::Centered => (width - line.width) / 2.0,
                    HorizontalAlignment::Right => width - line.width,
                };
                (x, y + y0)
            })
            .collect();

        Ok(StackLayout {
            size: NodeSize {
                width,
                baseline_height,
                overall_height: height,
                strikeout_pos,
                ..NodeSize::default()
            },
            offsets,
        })
    }
}

impl LayoutNode for VerticalListNode {
    fn measure(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<NodeSize> {
        Ok(self.layout(ctx, env)?.size)
    }

    fn draw(
        &self,
        ctx: &MathContext<'_>,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
    ) -> MathResult<f64> {
        let layout = self.layout(ctx, env)?;
        let mut ev = env.clone();
        for (child, (dx, dy)) in self.children.iter().zip(&layout.offsets) {
            child.draw(ctx, canvas, x + dx, y + dy, &ev)?;
            child.modify_environment(ctx, &mut ev);
        }
        Ok(x + layout.size.width)
    }
}
