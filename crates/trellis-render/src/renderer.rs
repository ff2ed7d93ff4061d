//! The drawing contract widgets paint through.
//!
//! Widgets never own pixels. During the paint traversal they issue calls on a
//! [`Renderer`], with the current translation set to the widget's own origin.

use trellis_core::{Point, Rect};

use crate::metrics::TextMetrics;
use crate::types::{Color, Font, TextAlign};

/// A soft drop shadow around a rounded rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub rect: Rect,
    pub corner_radius: f32,
    pub size: f32,
    pub color: Color,
}

/// A 2D drawing backend.
pub trait Renderer: TextMetrics {
    /// Push the current translation and scissor.
    fn save(&mut self);

    /// Pop the translation and scissor pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Move the origin by `(dx, dy)`.
    fn translate(&mut self, dx: i32, dy: i32);

    /// Restrict drawing to `rect` (in current coordinates).
    fn scissor(&mut self, rect: Rect);

    // =========================================================================
    // Shapes
    // =========================================================================

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color);

    fn draw_line(&mut self, from: Point, to: Point, width: f32, color: Color);

    fn draw_shadow(&mut self, shadow: &Shadow);

    // =========================================================================
    // Text
    // =========================================================================

    /// Draw a single line of text.
    fn draw_text(&mut self, font: &Font, pos: Point, align: TextAlign, color: Color, text: &str);

    /// Draw text word-wrapped at `width`.
    fn draw_text_box(&mut self, font: &Font, pos: Point, width: i32, color: Color, text: &str);
}
