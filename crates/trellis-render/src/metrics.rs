//! Text measurement.
//!
//! Layout needs to know how large text will be before anything is drawn.
//! Render backends implement [`TextMetrics`]; [`FixedMetrics`] is a
//! deterministic stand-in for headless use and tests.

use trellis_core::Rect;
use unicode_segmentation::UnicodeSegmentation;

use crate::types::Font;

/// Result of measuring a single line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    /// Horizontal advance of the whole string.
    pub advance: f32,
    /// Bounding box relative to the draw origin (top-left aligned).
    pub rect: Rect,
}

/// Position of one grapheme cluster on a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPosition {
    /// Byte offset of the cluster in the source string.
    pub byte_index: usize,
    /// Left edge of the cluster.
    pub min_x: f32,
    /// Right edge of the cluster.
    pub max_x: f32,
}

impl GlyphPosition {
    /// Horizontal midpoint, used to decide which side of a glyph a click fell on.
    pub fn mid_x(&self) -> f32 {
        (self.min_x + self.max_x) * 0.5
    }
}

/// Text measurement supplied by a render backend.
pub trait TextMetrics {
    /// Measure a single line of text.
    fn text_bounds(&self, font: &Font, text: &str) -> TextBounds;

    /// Bounding box of `text` word-wrapped at `width`.
    fn text_box_bounds(&self, font: &Font, width: i32, text: &str) -> Rect;

    /// Grapheme positions of `text` drawn starting at `x`.
    fn glyph_positions(&self, font: &Font, x: f32, text: &str) -> Vec<GlyphPosition>;

    /// Height of one line of text.
    fn line_height(&self, font: &Font) -> f32 {
        font.size
    }
}

/// Monospace metrics: every grapheme is half the font size wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMetrics;

impl FixedMetrics {
    fn advance(font: &Font) -> f32 {
        font.size * 0.5
    }

    /// Greedy word wrap; returns the widths of the produced lines.
    fn wrap_widths(font: &Font, width: i32, text: &str) -> Vec<f32> {
        let adv = Self::advance(font);
        let limit = width.max(0) as f32;
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut current = 0.0_f32;
            let mut started = false;
            for word in paragraph.split_whitespace() {
                let w = word.graphemes(true).count() as f32 * adv;
                if !started {
                    current = w;
                    started = true;
                } else if current + adv + w <= limit {
                    current += adv + w;
                } else {
                    lines.push(current);
                    current = w;
                }
            }
            lines.push(current);
        }
        lines
    }
}

impl TextMetrics for FixedMetrics {
    fn text_bounds(&self, font: &Font, text: &str) -> TextBounds {
        let advance = text.graphemes(true).count() as f32 * Self::advance(font);
        TextBounds {
            advance,
            rect: Rect::new(0, 0, advance.ceil() as i32, font.size.ceil() as i32),
        }
    }

    fn text_box_bounds(&self, font: &Font, width: i32, text: &str) -> Rect {
        let lines = Self::wrap_widths(font, width, text);
        let widest = lines.iter().copied().fold(0.0_f32, f32::max);
        let height = lines.len() as f32 * self.line_height(font);
        Rect::new(0, 0, widest.ceil() as i32, height.ceil() as i32)
    }

    fn glyph_positions(&self, font: &Font, x: f32, text: &str) -> Vec<GlyphPosition> {
        let adv = Self::advance(font);
        text.grapheme_indices(true)
            .enumerate()
            .map(|(i, (byte_index, _))| {
                let min_x = x + i as f32 * adv;
                GlyphPosition {
                    byte_index,
                    min_x,
                    max_x: min_x + adv,
                }
            })
            .collect()
    }
}
