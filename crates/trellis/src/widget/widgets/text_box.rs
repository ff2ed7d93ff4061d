//! Single-line text entry.
//!
//! A [`TextBox`] shows its committed value until it gains focus. While it has
//! focus the user edits a working copy; the copy is committed when focus is
//! lost or Enter is pressed. On commit an empty entry becomes the default
//! value, an entry that does not match the format pattern is discarded, and
//! the edit callback may veto the new value.
//!
//! Caret and selection positions count grapheme clusters, so combining marks
//! and emoji sequences move as a single unit.
//!
//! # Example
//!
//! ```ignore
//! let port = TextBox::new("8080")
//!     .with_editable(true)
//!     .with_format(r"\d{1,5}")?
//!     .with_units("tcp")
//!     .on_edit(|value| value.parse::<u16>().is_ok());
//! let port = tree.insert(window, port)?;
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use regex::Regex;
use trellis_core::logging::targets;
use trellis_core::{Point, Rect, Size};
use trellis_render::{Color, Font, HAlign, TextAlign, TextMetrics};
use unicode_segmentation::UnicodeSegmentation;

use crate::clipboard::Clipboard;
use crate::widget::context::{EventCtx, LayoutCtx, PaintCtx};
use crate::widget::cursor::CursorShape;
use crate::widget::edit::EditAction;
use crate::widget::events::{
    ImePreeditEvent, KeyEvent, KeyboardModifiers, MouseButton, MouseButtonEvent, WidgetEvent,
};
use crate::widget::theme::Theme;
use crate::widget::traits::Widget;
use crate::widget::tree::{WidgetId, WidgetTree};

/// Two presses closer than this select the whole entry.
const DOUBLE_CLICK: Duration = Duration::from_millis(250);

/// An editable single-line text field.
pub struct TextBox {
    value: String,
    default_value: String,
    units: String,
    alignment: HAlign,
    editable: bool,
    format: Option<Regex>,
    valid_format: bool,
    committed: bool,
    /// Working copy while editing.
    editing: String,
    cursor: Option<usize>,
    selection: Option<usize>,
    yank: String,
    preedit: Option<ImePreeditEvent>,
    last_click: Option<Instant>,
    callback: Option<Box<dyn FnMut(&str) -> bool>>,
}

impl fmt::Debug for TextBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBox")
            .field("value", &self.value)
            .field("editable", &self.editable)
            .field("committed", &self.committed)
            .field("editing", &self.editing)
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl TextBox {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            default_value: String::new(),
            units: String::new(),
            alignment: HAlign::Center,
            editable: false,
            format: None,
            valid_format: true,
            committed: true,
            editing: String::new(),
            cursor: None,
            selection: None,
            yank: String::new(),
            preedit: None,
            last_click: None,
            callback: None,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// The committed value.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Value committed when the entry is left empty.
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn set_default_value(&mut self, value: impl Into<String>) {
        self.default_value = value.into();
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.set_default_value(value);
        self
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Unit suffix drawn at the right edge.
    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = units.into();
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.set_units(units);
        self
    }

    pub fn alignment(&self) -> HAlign {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: HAlign) {
        self.alignment = alignment;
    }

    pub fn with_alignment(mut self, alignment: HAlign) -> Self {
        self.alignment = alignment;
        self
    }

    /// Restrict committed values to full matches of `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn set_format(&mut self, pattern: &str) -> Result<(), regex::Error> {
        self.format = Some(Regex::new(&format!("^(?:{pattern})$"))?);
        Ok(())
    }

    pub fn with_format(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.set_format(pattern)?;
        Ok(self)
    }

    pub fn clear_format(&mut self) {
        self.format = None;
    }

    /// Called with the new value on commit; returning `false` restores the
    /// previous value.
    pub fn set_callback(&mut self, callback: impl FnMut(&str) -> bool + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn on_edit(mut self, callback: impl FnMut(&str) -> bool + 'static) -> Self {
        self.set_callback(callback);
        self
    }

    // =========================================================================
    // Editing state
    // =========================================================================

    /// Whether the box shows its committed value (not being edited).
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// The working copy being edited.
    pub fn editing_text(&self) -> &str {
        &self.editing
    }

    /// Whether the working copy matches the format pattern.
    pub fn is_valid_format(&self) -> bool {
        self.valid_format
    }

    /// Caret position in grapheme clusters.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Other end of the selection, in grapheme clusters.
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// The IME composition in progress.
    pub fn preedit_text(&self) -> Option<&str> {
        self.preedit.as_ref().map(|p| p.text.as_str())
    }

    fn begin_editing(&mut self) {
        self.editing = self.value.clone();
        self.committed = false;
        self.cursor = Some(0);
        self.selection = None;
    }

    fn commit(&mut self) {
        let backup = self.value.clone();
        if self.valid_format {
            self.value = if self.editing.is_empty() {
                self.default_value.clone()
            } else {
                self.editing.clone()
            };
        }
        if let Some(callback) = self.callback.as_mut() {
            if !callback(&self.value) {
                self.value = backup;
            }
        }
        self.committed = true;
        self.cursor = None;
        self.selection = None;
        self.update_validity();
    }

    fn update_validity(&mut self) {
        self.valid_format = self.editing.is_empty()
            || self.format.as_ref().is_none_or(|f| f.is_match(&self.editing));
    }

    fn grapheme_count(&self) -> usize {
        self.editing.graphemes(true).count()
    }

    /// Byte offset of grapheme `index`, or the end of the text.
    fn byte_at(&self, index: usize) -> usize {
        self.editing
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.editing.len(), |(b, _)| b)
    }

    /// Number of grapheme clusters starting before byte `offset`.
    fn index_of_byte(&self, offset: usize) -> usize {
        self.editing
            .grapheme_indices(true)
            .take_while(|(b, _)| *b < offset)
            .count()
    }

    fn caret(&self) -> usize {
        self.cursor.unwrap_or(0).min(self.grapheme_count())
    }

    /// Insert `text` at the caret; returns the caret index after the insert.
    fn insert_at_caret(&mut self, text: &str) -> usize {
        let at = self.byte_at(self.caret());
        self.editing.insert_str(at, text);
        self.index_of_byte(at + text.len())
    }

    fn remove_graphemes(&mut self, from: usize, to: usize) {
        let range = self.byte_at(from)..self.byte_at(to);
        self.editing.replace_range(range, "");
    }

    fn selection_range(&self) -> Option<(usize, usize)> {
        let selection = self.selection?;
        let caret = self.caret();
        Some((caret.min(selection), caret.max(selection)))
    }

    fn delete_selection(&mut self) -> bool {
        let Some((begin, end)) = self.selection_range() else {
            return false;
        };
        self.remove_graphemes(begin, end);
        self.cursor = Some(begin);
        self.selection = None;
        true
    }

    fn copy_selection(&self, clipboard: &mut dyn Clipboard) {
        let Some((begin, end)) = self.selection_range() else {
            return;
        };
        let text = &self.editing[self.byte_at(begin)..self.byte_at(end)];
        if let Err(err) = clipboard.set_text(text) {
            tracing::warn!(target: targets::WIDGET, %err, "copy failed");
        }
    }

    fn paste(&mut self, clipboard: &mut dyn Clipboard) {
        match clipboard.get_text() {
            Ok(text) => {
                let caret = self.insert_at_caret(&text);
                self.cursor = Some(caret);
            }
            Err(err) => tracing::debug!(target: targets::WIDGET, %err, "nothing to paste"),
        }
    }

    /// Start of the word left of the caret.
    fn word_start_before_caret(&self) -> usize {
        let end = self.byte_at(self.caret());
        let start = self.editing[..end]
            .split_word_bound_indices()
            .filter(|(_, word)| !word.trim().is_empty())
            .last()
            .map_or(0, |(b, _)| b);
        self.index_of_byte(start)
    }

    fn move_caret(&mut self, to: usize, extend: bool) {
        if extend {
            self.selection = Some(self.selection.unwrap_or(self.caret()));
        } else {
            self.selection = None;
        }
        self.cursor = Some(to);
    }

    fn apply(&mut self, action: EditAction, key: &KeyEvent, clipboard: &mut dyn Clipboard) {
        let extend = key.modifiers == KeyboardModifiers::SHIFT;
        let caret = self.caret();
        let count = self.grapheme_count();
        match action {
            EditAction::MoveLeft => self.move_caret(caret.saturating_sub(1), extend),
            EditAction::MoveRight => self.move_caret((caret + 1).min(count), extend),
            EditAction::MoveLineStart => self.move_caret(0, extend),
            EditAction::MoveLineEnd => self.move_caret(count, extend),
            EditAction::Backspace => {
                if !self.delete_selection() && caret > 0 {
                    self.remove_graphemes(caret - 1, caret);
                    self.cursor = Some(caret - 1);
                }
            }
            EditAction::Delete => {
                if !self.delete_selection() && caret < count {
                    self.remove_graphemes(caret, caret + 1);
                }
            }
            EditAction::DeleteWordLeft => {
                if !self.delete_selection() {
                    let start = self.word_start_before_caret();
                    self.remove_graphemes(start, caret);
                    self.cursor = Some(start);
                }
            }
            EditAction::CutToLineEnd => {
                let at = self.byte_at(caret);
                self.yank = self.editing.split_off(at);
            }
            EditAction::Yank => {
                let yank = self.yank.clone();
                self.insert_at_caret(&yank);
            }
            EditAction::Enter => {
                if !self.committed {
                    self.commit();
                }
            }
            EditAction::SelectAll => {
                self.cursor = Some(count);
                self.selection = Some(0);
            }
            EditAction::Copy => self.copy_selection(clipboard),
            EditAction::Cut => {
                self.copy_selection(clipboard);
                self.delete_selection();
            }
            EditAction::Paste => {
                self.delete_selection();
                self.paste(clipboard);
            }
        }
        self.update_validity();
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    fn font(theme: &Theme, size: Option<i32>) -> Font {
        theme.normal_font(size.unwrap_or(theme.text_box_font_size))
    }

    /// Text shown: the working copy with any composition spliced in at the
    /// caret, or the committed value.
    fn display_text(&self) -> String {
        if self.committed {
            return self.value.clone();
        }
        let mut text = self.editing.clone();
        if let Some(preedit) = &self.preedit {
            text.insert_str(self.byte_at(self.caret()), &preedit.text);
        }
        text
    }

    fn units_width(&self, metrics: &dyn TextMetrics, font: &Font) -> f32 {
        if self.units.is_empty() {
            0.0
        } else {
            metrics.text_bounds(font, &self.units).advance
        }
    }

    /// Left edge of the text for a box of `size`.
    fn text_origin(&self, metrics: &dyn TextMetrics, font: &Font, size: Size, text: &str) -> f32 {
        let spacing = size.height as f32 * 0.3;
        let text_width = metrics.text_bounds(font, text).advance;
        let units = self.units_width(metrics, font);
        match self.alignment {
            HAlign::Left => spacing,
            HAlign::Right => size.width as f32 - units - spacing - text_width,
            HAlign::Center => (size.width as f32 - units - text_width) * 0.5,
        }
    }

    /// Caret index nearest to `x` in the working copy.
    fn caret_from_x(&self, metrics: &dyn TextMetrics, font: &Font, size: Size, x: i32) -> usize {
        let origin = self.text_origin(metrics, font, size, &self.editing);
        let glyphs = metrics.glyph_positions(font, origin, &self.editing);
        let end = glyphs.last().map_or(origin, |g| g.max_x);
        let x = x as f32;

        let mut best = (glyphs.len(), (end - x).abs());
        for (i, glyph) in glyphs.iter().enumerate() {
            let distance = (glyph.min_x - x).abs();
            if distance < best.1 || (distance == best.1 && i < best.0) {
                best = (i, distance);
            }
        }
        best.0
    }

    fn handle_mouse_button(&mut self, cx: &mut EventCtx<'_>, e: &MouseButtonEvent) -> bool {
        if !self.editable || !cx.is_focused() || e.button != MouseButton::Left || self.preedit.is_some() {
            return false;
        }
        if self.committed {
            self.begin_editing();
        }
        if e.pressed {
            let now = cx.now();
            let double = self
                .last_click
                .is_some_and(|last| now.saturating_duration_since(last) < DOUBLE_CLICK);
            if double {
                self.selection = Some(0);
                self.cursor = Some(self.grapheme_count());
            } else {
                let font = Self::font(cx.theme(), cx.base().and_then(|b| b.font_size()));
                let index = self.caret_from_x(cx.metrics(), &font, cx.size(), e.pos.x);
                self.move_caret(index, e.modifiers.shift);
            }
            self.last_click = Some(now);
        }
        true
    }
}

impl Widget for TextBox {
    fn type_name(&self) -> &'static str {
        "TextBox"
    }

    fn attached(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        if let Some(base) = tree.base_mut(id) {
            base.set_cursor(CursorShape::IBeam);
        }
    }

    fn preferred_size(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Size {
        let font = Self::font(cx.theme(), cx.base(id).and_then(|b| b.font_size()));
        let height = font.size * 1.4;
        let text = cx.metrics().text_bounds(&font, &self.display_text()).advance;
        let units = self.units_width(cx.metrics(), &font);
        Size::new((height + text + units) as i32, height as i32)
    }

    fn event(&mut self, cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
        match event {
            WidgetEvent::MouseButton(e) => {
                cx.default_event(event);
                self.handle_mouse_button(cx, e)
            }
            WidgetEvent::MouseMotion(_) => self.editable && cx.is_focused(),
            WidgetEvent::MouseDrag(e) => {
                if !self.editable || !cx.is_focused() || self.committed {
                    return false;
                }
                let font = Self::font(cx.theme(), cx.base().and_then(|b| b.font_size()));
                let index = self.caret_from_x(cx.metrics(), &font, cx.size(), e.pos.x);
                self.move_caret(index, true);
                true
            }
            WidgetEvent::Focus(e) => {
                if self.editable {
                    if e.focused {
                        if self.committed {
                            self.begin_editing();
                        }
                    } else if !self.committed {
                        self.commit();
                    }
                    self.update_validity();
                }
                true
            }
            WidgetEvent::Key(e) => {
                if !self.editable || !cx.is_focused() {
                    return false;
                }
                if e.action.is_down() && self.preedit.is_none() {
                    if let Some(action) = EditAction::detect(e.key, e.modifiers) {
                        if self.committed && action != EditAction::Enter {
                            self.begin_editing();
                        }
                        self.apply(action, e, cx.clipboard());
                    }
                }
                true
            }
            WidgetEvent::Char(e) => {
                if !self.editable || !cx.is_focused() {
                    return false;
                }
                if self.committed {
                    self.begin_editing();
                }
                self.delete_selection();
                let caret = self.insert_at_caret(e.ch.encode_utf8(&mut [0; 4]));
                self.cursor = Some(caret);
                self.preedit = None;
                self.update_validity();
                true
            }
            WidgetEvent::ImePreedit(e) => {
                self.preedit = (!e.text.is_empty()).then(|| e.clone());
                true
            }
            WidgetEvent::ImeStatus => {
                if let Some(preedit) = self.preedit.take() {
                    if self.committed {
                        self.begin_editing();
                    }
                    let caret = self.insert_at_caret(&preedit.text);
                    self.cursor = Some(caret);
                    self.update_validity();
                }
                true
            }
            _ => cx.default_event(event),
        }
    }

    fn paint(&self, cx: &mut PaintCtx<'_>) {
        let Some(base) = cx.base() else {
            return;
        };
        let size = base.size();
        let theme = cx.theme();
        let metrics = cx.metrics();
        let font = Self::font(theme, base.font_size());
        let bounds = Rect::from_size(size);
        let corner = 3.0;
        let editing = !self.committed && base.is_focused();

        let text = self.display_text();
        let origin = self.text_origin(metrics, &font, size, &text);
        let middle = size.height / 2;
        let text_color = if base.is_enabled() {
            theme.text_color
        } else {
            theme.disabled_text_color
        };
        let border = if self.valid_format {
            theme.border_dark
        } else {
            Color::from_rgba8(255, 0, 0, 100)
        };

        let glyphs = editing.then(|| metrics.glyph_positions(&font, origin, &self.editing));
        let units_width = self.units_width(metrics, &font);

        let renderer = cx.renderer();
        renderer.fill_rounded_rect(bounds, corner, Color::mono(255, 32));
        renderer.stroke_rounded_rect(bounds, corner, 1.0, border);

        if !self.units.is_empty() {
            let spacing = (size.height as f32 * 0.3) as i32;
            renderer.draw_text(
                &font,
                Point::new(size.width - spacing - units_width as i32, middle),
                TextAlign::MIDDLE_LEFT,
                theme.text_color,
                &self.units,
            );
        }

        renderer.save();
        renderer.scissor(Rect::new(1, 1, size.width - 2, size.height - 2));
        renderer.draw_text(
            &font,
            Point::new(origin as i32, middle),
            TextAlign::MIDDLE_LEFT,
            text_color,
            &text,
        );

        if let Some(glyphs) = glyphs {
            let x_of = |index: usize| -> i32 {
                glyphs
                    .get(index)
                    .map(|g| g.min_x)
                    .or_else(|| glyphs.last().map(|g| g.max_x))
                    .unwrap_or(origin) as i32
            };
            let caret_x = x_of(self.caret());
            let line_top = middle - font.size as i32 / 2;

            if let Some((begin, end)) = self.selection_range() {
                let (left, right) = (x_of(begin), x_of(end));
                renderer.fill_rect(
                    Rect::new(left, line_top, right - left, font.size as i32),
                    Color::from_rgba8(255, 255, 255, 80),
                );
            }

            if let Some(preedit) = &self.preedit {
                let preedit_width = metrics.text_bounds(&font, &preedit.text).advance as i32;
                let underline_y = line_top + font.size as i32;
                renderer.draw_line(
                    Point::new(caret_x, underline_y),
                    Point::new(caret_x + preedit_width, underline_y),
                    1.0,
                    theme.text_color,
                );
            }

            renderer.draw_line(
                Point::new(caret_x, line_top),
                Point::new(caret_x, line_top + font.size as i32),
                1.0,
                Color::from_rgba8(255, 192, 0, 255),
            );
        }
        renderer.restore();
    }
}
