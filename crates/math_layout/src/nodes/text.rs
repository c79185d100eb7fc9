//! Literal text run

use super::{LayoutNode, MathContext};
use crate::canvas::Canvas;
use crate::environment::Environment;
use crate::error::MathResult;
use crate::size::NodeSize;
use text_metrics::FontSpec;

/// Size of small capitals relative to the surrounding text
const SMALL_CAPS_FACTOR: f64 = 0.8;

/// A run of text set in the current environment
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    text: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Face and string actually drawn
    fn shaped(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<(FontSpec, String)> {
        let font = ctx.font(env)?;
        if env.small_caps {
            Ok((font.scaled(SMALL_CAPS_FACTOR), self.text.to_uppercase()))
        } else {
            Ok((font, self.text.clone()))
        }
    }
}

impl LayoutNode for TextNode {
    fn measure(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<NodeSize> {
        let (font, text) = self.shaped(ctx, env)?;
        let fm = ctx.metrics.font_metrics(&font);
        let bounds = ctx.metrics.text_bounds(&font, &text);

        let mut size = NodeSize::new(ctx.metrics.text_width(&font, &text), bounds.ascent, bounds.height())
            .with_strikeout(fm.strikeout_pos);
        if env.italic {
            size.top_x_correction = ctx.config.italic_slant_factor * bounds.ascent;
        }
        Ok(size)
    }

    fn draw(
        &self,
        ctx: &MathContext<'_>,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        env: &Environment,
    ) -> MathResult<f64> {
        let size = self.measure(ctx, env)?;
        let (font, text) = self.shaped(ctx, env)?;
        let fm = ctx.metrics.font_metrics(&font);
        let end = x + size.width;

        canvas.draw_text(x, y, &text, &font, env.color);
        if env.underlined {
            let uy = y + fm.descent / 2.0;
            canvas.draw_line(x, uy, end, uy, fm.line_width, env.color);
        }
        if env.overline {
            let oy = y - size.baseline_height - fm.line_width;
            canvas.draw_line(x, oy, end, oy, fm.line_width, env.color);
        }
        if env.strike {
            let sy = y - fm.strikeout_pos;
            canvas.draw_line(x, sy, end, sy, fm.line_width, env.color);
        }
        Ok(end)
    }
}
