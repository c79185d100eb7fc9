//! Environment-switching instructions
//!
//! Instructions like `\bf` or `\color{red}` take no space; they change the
//! font or style of every sibling that follows them in the same list.

use super::{LayoutNode, MathContext};
use crate::canvas::Canvas;
use crate::environment::{Color, Environment, FontRole};
use crate::error::{MathError, MathResult};
use crate::size::NodeSize;
use std::str::FromStr;

/// A parsed environment instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvInstruction {
    Bold,
    Medium,
    Italic,
    Upright,
    /// Toggle italic
    Emphasis,
    /// Roman, or math roman inside math
    Roman,
    /// Sans serif, or math sans inside math
    SansSerif,
    Font(FontRole),
    SmallCaps,
    NormalFont,
    Color(Color),
    /// Font size relative to the configured base size
    Size(f64),
}

impl EnvInstruction {
    /// Relative size of a LaTeX size command
    pub fn size_factor(name: &str) -> Option<f64> {
        let factor = match name {
            "tiny" => 0.5,
            "scriptsize" => 0.7,
            "footnotesize" => 0.8,
            "small" => 0.9,
            "normalsize" => 1.0,
            "large" => 1.2,
            "Large" => 1.44,
            "LARGE" => 1.728,
            "huge" => 2.074,
            "Huge" => 2.488,
            _ => return None,
        };
        Some(factor)
    }
}

impl FromStr for EnvInstruction {
    type Err = MathError;

    /// Parse an instruction name without the leading backslash, e.g. `bf`
    /// or `color{red}`
    fn from_str(s: &str) -> MathResult<Self> {
        let s = s.trim();
        if let Some(arg) = s.strip_prefix("color{").and_then(|rest| rest.strip_suffix('}')) {
            return Color::parse(arg)
                .map(EnvInstruction::Color)
                .ok_or_else(|| MathError::UnknownInstruction(s.to_string()));
        }
        if let Some(factor) = Self::size_factor(s) {
            return Ok(EnvInstruction::Size(factor));
        }
        let instruction = match s {
            "bf" | "bfseries" => EnvInstruction::Bold,
            "md" | "mdseries" => EnvInstruction::Medium,
            "it" | "itshape" => EnvInstruction::Italic,
            "up" | "upshape" => EnvInstruction::Upright,
            "em" => EnvInstruction::Emphasis,
            "rm" | "rmfamily" => EnvInstruction::Roman,
            "sf" | "sffamily" => EnvInstruction::SansSerif,
            "tt" | "ttfamily" => EnvInstruction::Font(FontRole::Typewriter),
            "cal" => EnvInstruction::Font(FontRole::Caligraphic),
            "frak" => EnvInstruction::Font(FontRole::Fraktur),
            "bb" => EnvInstruction::Font(FontRole::Blackboard),
            "script" => EnvInstruction::Font(FontRole::Script),
            "sc" | "scshape" => EnvInstruction::SmallCaps,
            "normalfont" => EnvInstruction::NormalFont,
            other => return Err(MathError::UnknownInstruction(other.to_string())),
        };
        Ok(instruction)
    }
}

/// Zero-size node applying an [`EnvInstruction`] to later siblings
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyEnvironmentNode {
    instruction: EnvInstruction,
}

impl ModifyEnvironmentNode {
    pub fn new(instruction: EnvInstruction) -> Self {
        Self { instruction }
    }

    /// Parse an instruction name such as `bf` or `color{red}`
    pub fn parse(name: &str) -> MathResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn instruction(&self) -> EnvInstruction {
        self.instruction
    }
}

impl LayoutNode for ModifyEnvironmentNode {
    fn measure(&self, _ctx: &MathContext<'_>, _env: &Environment) -> MathResult<NodeSize> {
        Ok(NodeSize::zero())
    }

    fn draw(
        &self,
        _ctx: &MathContext<'_>,
        _canvas: &mut dyn Canvas,
        x: f64,
        _y: f64,
        _env: &Environment,
    ) -> MathResult<f64> {
        Ok(x)
    }

    fn modify_environment(&self, ctx: &MathContext<'_>, env: &mut Environment) {
        match self.instruction {
            EnvInstruction::Bold => env.bold = true,
            EnvInstruction::Medium => env.bold = false,
            EnvInstruction::Italic => env.italic = true,
            EnvInstruction::Upright => env.italic = false,
            EnvInstruction::Emphasis => env.italic = !env.italic,
            EnvInstruction::Roman => {
                env.font = if env.inside_math { FontRole::MathRoman } else { FontRole::Roman };
            }
            EnvInstruction::SansSerif => {
                env.font = if env.inside_math { FontRole::MathSans } else { FontRole::Sans };
            }
            EnvInstruction::Font(role) => env.font = role,
            EnvInstruction::SmallCaps => env.small_caps = true,
            EnvInstruction::NormalFont => {
                env.font = FontRole::Roman;
                env.bold = false;
                env.italic = false;
                env.small_caps = false;
            }
            EnvInstruction::Color(color) => env.color = color,
            EnvInstruction::Size(factor) => env.font_size = ctx.config.font_size * factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn apply(name: &str, env: &mut Environment) {
        let fx = Fixture::new();
        ModifyEnvironmentNode::parse(name)
            .unwrap()
            .modify_environment(&fx.ctx(), env);
    }

    #[test]
    fn test_parse_instructions() {
        assert_eq!("bf".parse::<EnvInstruction>().unwrap(), EnvInstruction::Bold);
        assert_eq!(
            "frak".parse::<EnvInstruction>().unwrap(),
            EnvInstruction::Font(FontRole::Fraktur)
        );
        assert_eq!(
            "color{blue}".parse::<EnvInstruction>().unwrap(),
            EnvInstruction::Color(Color::BLUE)
        );
        assert_eq!("Large".parse::<EnvInstruction>().unwrap(), EnvInstruction::Size(1.44));
        assert!(matches!(
            "frobnicate".parse::<EnvInstruction>(),
            Err(MathError::UnknownInstruction(_))
        ));
        assert!("color{nocolor}".parse::<EnvInstruction>().is_err());
    }

    #[test]
    fn test_style_switches() {
        let fx = Fixture::new();
        let mut env = fx.env();
        apply("bf", &mut env);
        apply("it", &mut env);
        assert!(env.bold && env.italic);
        apply("em", &mut env);
        assert!(!env.italic);
        apply("md", &mut env);
        assert!(!env.bold);
    }

    #[test]
    fn test_font_switches_respect_math_mode() {
        let fx = Fixture::new();
        let mut text = fx.env();
        apply("sf", &mut text);
        assert_eq!(text.font, FontRole::Sans);

        let mut math = Environment::math(&fx.config);
        apply("sf", &mut math);
        assert_eq!(math.font, FontRole::MathSans);
        apply("rm", &mut math);
        assert_eq!(math.font, FontRole::MathRoman);
    }

    #[test]
    fn test_sizes_are_relative_to_base() {
        let fx = Fixture::new();
        let mut env = fx.env();
        apply("huge", &mut env);
        assert!(approx(env.font_size, 20.74));
        apply("small", &mut env);
        assert!(approx(env.font_size, 9.0));
    }

    #[test]
    fn test_normalfont_resets() {
        let fx = Fixture::new();
        let mut env = fx.env();
        apply("tt", &mut env);
        apply("bf", &mut env);
        apply("sc", &mut env);
        apply("normalfont", &mut env);
        assert_eq!(env.font, FontRole::Roman);
        assert!(!env.bold && !env.small_caps);
    }

    #[test]
    fn test_takes_no_space() {
        let fx = Fixture::new();
        let node = ModifyEnvironmentNode::new(EnvInstruction::Color(Color::RED));
        assert_eq!(node.measure(&fx.ctx(), &fx.env()).unwrap(), NodeSize::zero());
    }
}
