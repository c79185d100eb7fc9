//! Symbol leaf node

use super::{LayoutNode, MathContext};
use crate::canvas::Canvas;
use crate::environment::Environment;
use crate::error::MathResult;
use crate::size::{NodeSize, SymbolSize};
use crate::symbols::{Glyph, GlyphTransform, SymbolDef};
use std::f64::consts::FRAC_PI_2;
use text_metrics::{FontEncoding, FontSpec};

/// A named symbol such as `\alpha`, `\sum` or `\quad`
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolNode {
    name: String,
    /// Overrides the table's stacked-operator default
    limits: Option<bool>,
}

/// How a symbol ends up on the canvas
enum Shape<'t> {
    Glyph(&'t Glyph),
    Space,
    Placeholder,
}

struct SymbolLayout<'t> {
    size: SymbolSize,
    font: FontSpec,
    shape: Shape<'t>,
    /// Advance of the glyph itself, before any math-mode widening
    glyph_width: f64,
    y_factor: f64,
}

impl SymbolNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limits: None,
        }
    }

    /// Force limits above/below (`true`) or beside (`false`)
    pub fn with_limits(mut self, limits: bool) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Metrics including the horizontal offset of stacked limits
    pub fn measure_symbol(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<SymbolSize> {
        Ok(self.layout(ctx, env)?.size)
    }

    /// Family that provides glyphs of `encoding` in `env`
    fn family_for<'c>(ctx: &MathContext<'c>, env: &Environment, encoding: FontEncoding) -> &'c str {
        let active = ctx.config.fonts.get(env.font);
        if encoding == active.encoding {
            return &active.family;
        }
        match encoding {
            FontEncoding::WinSymbol => &ctx.config.fonts.symbol.family,
            FontEncoding::Unicode | FontEncoding::UnicodeLimited => &ctx.config.fonts.fallback.family,
            FontEncoding::Standard => &active.family,
        }
    }

    fn symbol_font(env: &Environment, family: &str, def: &SymbolDef) -> MathResult<FontSpec> {
        let mut font = env.family_spec(family)?.scaled(def.font_factor);
        if let Some(italic) = def.flags.italic {
            font.italic = italic;
        }
        if let Some(bold) = def.flags.bold {
            font.bold = bold;
        }
        Ok(font)
    }

    fn layout<'t>(&self, ctx: &MathContext<'t>, env: &Environment) -> MathResult<SymbolLayout<'t>> {
        let base_font = ctx.font(env)?;
        let metrics = ctx.metrics;
        let cfg = ctx.config;

        let resolved = ctx.symbols.resolve(&self.name, env.encoding(cfg), |encoding, text| {
            let family = Self::family_for(ctx, env, encoding);
            env.family_spec(family)
                .map(|font| metrics.supports(&font, text))
                .unwrap_or(false)
        });

        let Some(resolved) = resolved else {
            let fm = metrics.font_metrics(&base_font);
            let width = metrics.text_width(&base_font, "X");
            let size = NodeSize::new(width, fm.ascent, fm.height()).with_strikeout(fm.strikeout_pos);
            return Ok(SymbolLayout {
                size: size.into(),
                font: base_font,
                shape: Shape::Placeholder,
                glyph_width: width,
                y_factor: 0.0,
            });
        };

        let def = resolved.def;
        let Some(glyph) = resolved.glyph else {
            let spacing = def.spacing.unwrap_or(crate::symbols::Spacing {
                reference: 'x',
                factor: 1.0,
            });
            let width = metrics.text_width(&base_font, &spacing.reference.to_string()) * spacing.factor;
            let bounds = metrics.text_bounds(&base_font, "X");
            let fm = metrics.font_metrics(&base_font);
            let size = NodeSize::new(width, bounds.ascent, bounds.height()).with_strikeout(fm.strikeout_pos);
            return Ok(SymbolLayout {
                size: size.into(),
                font: base_font,
                shape: Shape::Space,
                glyph_width: width,
                y_factor: 0.0,
            });
        };

        let family = Self::family_for(ctx, env, resolved.encoding);
        let font = Self::symbol_font(env, family, def)?;
        let fm = metrics.font_metrics(&font);
        let bounds = metrics.text_bounds(&font, &glyph.text);
        let glyph_width = metrics.text_width(&font, &glyph.text);

        let mut size = match glyph.transform {
            GlyphTransform::QuarterTurn => {
                // centred on half the x-height; descent clamped at zero
                let ascent = (fm.x_height + glyph_width) / 2.0;
                let descent = ((glyph_width - fm.x_height) / 2.0).max(0.0);
                NodeSize::new(bounds.height(), ascent, ascent + descent)
            }
            GlyphTransform::None | GlyphTransform::FlipHorizontal => {
                NodeSize::new(glyph_width, bounds.ascent, bounds.height())
            }
        };
        if def.flags.height_is_ascent {
            size.overall_height = size.baseline_height * 1.1;
        }
        if def.flags.extend_width_in_math && env.inside_math {
            size.width *= cfg.mathoperator_width_factor;
        }
        size.strikeout_pos = fm.strikeout_pos;

        let mut symbol_size = SymbolSize::new(size);
        if def.integral {
            let x_width = metrics.text_width(&font, "X");
            symbol_size.sub_super_above_below_x_correction = cfg.int_sub_super_x_correction_factor * glyph_width;
            symbol_size.size.baseline_x_correction = -cfg.int_sub_besides_x_correction_factor * x_width;
            symbol_size.size.top_x_correction = cfg.int_sub_besides_x_correction_factor * x_width;
        }

        Ok(SymbolLayout {
            size: symbol_size,
            font,
            shape: Shape::Glyph(glyph),
            glyph_width,
            y_factor: def.y_factor,
        })
    }
}

impl LayoutNode for SymbolNode {
    fn measure(&self, ctx: &MathContext<'_>, env: &Environment) -> MathResult<NodeSize> {
        Ok(self.measure_symbol(ctx, env)?.size)
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
        let size = layout.size.size;
        let fm = ctx.metrics.font_metrics(&layout.font);

        match layout.shape {
            Shape::Space => {}
            Shape::Placeholder => {
                tracing::warn!("Unknown or undrawable symbol '{}', drawing placeholder", self.name);
                canvas.draw_rect(
                    x,
                    y - size.baseline_height,
                    size.width,
                    size.overall_height,
                    fm.line_width,
                    env.color,
                );
            }
            Shape::Glyph(glyph) => {
                let shift = (size.width - layout.glyph_width) / 2.0;
                let gx = x + shift.max(0.0);
                let gy = y + layout.y_factor * size.overall_height;
                match glyph.transform {
                    GlyphTransform::None => {
                        canvas.draw_text(gx, gy, &glyph.text, &layout.font, env.color);
                    }
                    GlyphTransform::FlipHorizontal => {
                        canvas.save();
                        canvas.translate(gx + layout.glyph_width, gy);
                        canvas.scale(-1.0, 1.0);
                        canvas.draw_text(0.0, 0.0, &glyph.text, &layout.font, env.color);
                        canvas.restore();
                    }
                    GlyphTransform::QuarterTurn => {
                        let bounds = ctx.metrics.text_bounds(&layout.font, &glyph.text);
                        canvas.save();
                        canvas.translate(gx + bounds.descent, gy - size.baseline_height);
                        canvas.rotate(FRAC_PI_2);
                        canvas.draw_text(0.0, 0.0, &glyph.text, &layout.font, env.color);
                        canvas.restore();
                    }
                }
                if glyph.draw_bar {
                    let x_width = ctx.metrics.text_width(&layout.font, "x");
                    let m_height = ctx.metrics.text_bounds(&layout.font, "M").ascent;
                    let bar_y = gy - fm.x_height - (m_height - fm.x_height) / 3.0;
                    let slant = if layout.font.italic { x_width / 3.0 } else { 0.0 };
                    canvas.draw_line(gx, bar_y, gx + x_width / 3.0 + slant, bar_y, fm.line_width, env.color);
                }
            }
        }

        Ok(x + size.width)
    }

    fn is_stacked_placement_operator(&self, ctx: &MathContext<'_>) -> bool {
        self.limits.unwrap_or_else(|| {
            ctx.symbols
                .get(&self.name)
                .map(|def| def.stacked_operator)
                .unwrap_or(false)
        })
    }
}
