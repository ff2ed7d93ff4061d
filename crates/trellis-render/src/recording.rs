//! A renderer that records draw calls instead of rasterizing them.

use trellis_core::{Point, Rect};

use crate::metrics::{FixedMetrics, GlyphPosition, TextBounds, TextMetrics};
use crate::renderer::{Renderer, Shadow};
use crate::types::{Color, Font, TextAlign};

/// One recorded draw call, in root coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        color: Color,
    },
    StrokeRoundedRect {
        rect: Rect,
        radius: f32,
        width: f32,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
    },
    Shadow(Shadow),
    Text {
        font: Font,
        pos: Point,
        align: TextAlign,
        color: Color,
        text: String,
    },
    TextBox {
        font: Font,
        pos: Point,
        width: i32,
        color: Color,
        text: String,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct State {
    offset: Point,
    scissor: Option<Rect>,
}

/// A headless [`Renderer`] that keeps every draw call.
///
/// Coordinates are recorded after the current translation has been applied,
/// so a command's position is where it would land on screen. Text is measured
/// with [`FixedMetrics`] unless other metrics are supplied.
pub struct RecordingRenderer<M: TextMetrics = FixedMetrics> {
    metrics: M,
    state: State,
    stack: Vec<State>,
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer<FixedMetrics> {
    pub fn new() -> Self {
        Self::with_metrics(FixedMetrics)
    }
}

impl Default for RecordingRenderer<FixedMetrics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TextMetrics> RecordingRenderer<M> {
    pub fn with_metrics(metrics: M) -> Self {
        Self {
            metrics,
            state: State::default(),
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Recorded commands in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All strings drawn with `draw_text`/`draw_text_box`, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } | DrawCommand::TextBox { text, .. } => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// The current translation.
    pub fn offset(&self) -> Point {
        self.state.offset
    }

    /// The current scissor rectangle in root coordinates.
    pub fn current_scissor(&self) -> Option<Rect> {
        self.state.scissor
    }

    /// Depth of the save stack; zero after a balanced frame.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    fn to_root(&self, rect: Rect) -> Rect {
        rect.translate(self.state.offset)
    }
}

impl<M: TextMetrics> TextMetrics for RecordingRenderer<M> {
    fn text_bounds(&self, font: &Font, text: &str) -> TextBounds {
        self.metrics.text_bounds(font, text)
    }

    fn text_box_bounds(&self, font: &Font, width: i32, text: &str) -> Rect {
        self.metrics.text_box_bounds(font, width, text)
    }

    fn glyph_positions(&self, font: &Font, x: f32, text: &str) -> Vec<GlyphPosition> {
        self.metrics.glyph_positions(font, x, text)
    }

    fn line_height(&self, font: &Font) -> f32 {
        self.metrics.line_height(font)
    }
}

impl<M: TextMetrics> Renderer for RecordingRenderer<M> {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        } else {
            tracing::warn!("restore() without matching save()");
        }
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.state.offset += Point::new(dx, dy);
    }

    fn scissor(&mut self, rect: Rect) {
        self.state.scissor = Some(self.to_root(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.to_root(rect);
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        let rect = self.to_root(rect);
        self.commands
            .push(DrawCommand::FillRoundedRect { rect, radius, color });
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color) {
        let rect = self.to_root(rect);
        self.commands.push(DrawCommand::StrokeRoundedRect {
            rect,
            radius,
            width,
            color,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        let offset = self.state.offset;
        self.commands.push(DrawCommand::Line {
            from: from + offset,
            to: to + offset,
            width,
            color,
        });
    }

    fn draw_shadow(&mut self, shadow: &Shadow) {
        let mut shadow = *shadow;
        shadow.rect = self.to_root(shadow.rect);
        self.commands.push(DrawCommand::Shadow(shadow));
    }

    fn draw_text(&mut self, font: &Font, pos: Point, align: TextAlign, color: Color, text: &str) {
        self.commands.push(DrawCommand::Text {
            font: font.clone(),
            pos: pos + self.state.offset,
            align,
            color,
            text: text.to_owned(),
        });
    }

    fn draw_text_box(&mut self, font: &Font, pos: Point, width: i32, color: Color, text: &str) {
        self.commands.push(DrawCommand::TextBox {
            font: font.clone(),
            pos: pos + self.state.offset,
            width,
            color,
            text: text.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_is_applied_and_restored() {
        let mut r = RecordingRenderer::new();
        r.save();
        r.translate(10, 20);
        r.fill_rect(Rect::new(1, 1, 5, 5), Color::WHITE);
        r.restore();
        r.fill_rect(Rect::new(1, 1, 5, 5), Color::WHITE);

        assert_eq!(r.save_depth(), 0);
        match &r.commands()[0] {
            DrawCommand::FillRect { rect, .. } => assert_eq!(*rect, Rect::new(11, 21, 5, 5)),
            other => panic!("unexpected command {other:?}"),
        }
        match &r.commands()[1] {
            DrawCommand::FillRect { rect, .. } => assert_eq!(*rect, Rect::new(1, 1, 5, 5)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_texts_are_collected() {
        let mut r = RecordingRenderer::new();
        let font = Font::new("sans", 16.0);
        r.draw_text(&font, Point::ZERO, TextAlign::TOP_LEFT, Color::WHITE, "one");
        r.draw_text_box(&font, Point::ZERO, 50, Color::WHITE, "two");
        assert_eq!(r.texts(), vec!["one", "two"]);
        assert_eq!(r.take_commands().len(), 2);
        assert!(r.commands().is_empty());
    }
}
