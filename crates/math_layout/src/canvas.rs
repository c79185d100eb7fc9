//! Drawing surface abstraction
//!
//! Nodes draw through the [`Canvas`] trait so the engine never depends on a
//! particular graphics backend. [`RecordingCanvas`] keeps every call as a
//! serializable [`DrawCommand`], which is what hosts without a native
//! backend and the tests use.

use crate::environment::Color;
use serde::{Deserialize, Serialize};
use text_metrics::FontSpec;

/// A surface that math nodes draw onto.
///
/// `y` coordinates passed to [`Canvas::draw_text`] are baselines; all other
/// coordinates are plain points. Transforms apply to everything drawn after
/// them until the matching [`Canvas::restore`].
pub trait Canvas {
    /// Draw `text` with its baseline starting at `(x, y)`
    fn draw_text(&mut self, x: f64, y: f64, text: &str, font: &FontSpec, color: Color);

    /// Draw a straight rule
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color);

    /// Outline a rectangle whose top-left corner is `(x, y)`
    fn draw_rect(&mut self, x: f64, y: f64, w: f64, h: f64, width: f64, color: Color);

    /// Push the current transform
    fn save(&mut self);

    /// Pop the transform pushed by the last [`Canvas::save`]
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);

    fn rotate(&mut self, radians: f64);

    fn scale(&mut self, sx: f64, sy: f64);
}

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Text {
        x: f64,
        y: f64,
        text: String,
        font: FontSpec,
        color: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
    },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        width: f64,
        color: Color,
    },
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    Rotate {
        radians: f64,
    },
    Scale {
        sx: f64,
        sy: f64,
    },
}

/// Canvas that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Recorded text runs as `(x, baseline y, text)`
    pub fn texts(&self) -> Vec<(f64, f64, &str)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Number of `save` calls not yet matched by a `restore`
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.depth = 0;
    }
}

impl Canvas for RecordingCanvas {
    fn draw_text(&mut self, x: f64, y: f64, text: &str, font: &FontSpec, color: Color) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            font: font.clone(),
            color,
        });
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }

    fn draw_rect(&mut self, x: f64, y: f64, w: f64, h: f64, width: f64, color: Color) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            w,
            h,
            width,
            color,
        });
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(DrawCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f64) {
        self.commands.push(DrawCommand::Rotate { radians });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.commands.push(DrawCommand::Scale { sx, sy });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_text() {
        let mut canvas = RecordingCanvas::new();
        let font = FontSpec::new("Serif", 10.0);
        canvas.draw_text(1.0, 8.0, "x", &font, Color::BLACK);
        canvas.draw_line(0.0, 0.0, 5.0, 0.0, 0.5, Color::RED);

        assert_eq!(canvas.commands().len(), 2);
        assert_eq!(canvas.texts(), vec![(1.0, 8.0, "x")]);
    }

    #[test]
    fn test_save_restore_depth() {
        let mut canvas = RecordingCanvas::new();
        canvas.save();
        canvas.translate(2.0, 3.0);
        canvas.save();
        canvas.rotate(std::f64::consts::FRAC_PI_2);
        assert_eq!(canvas.depth(), 2);
        canvas.restore();
        canvas.restore();
        assert_eq!(canvas.depth(), 0);
        canvas.restore();
        assert_eq!(canvas.depth(), 0);
    }

    #[test]
    fn test_command_serialization() {
        let cmd = DrawCommand::Scale { sx: -1.0, sy: 1.0 };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"op":"scale","sx":-1.0,"sy":1.0}"#);
    }
}
