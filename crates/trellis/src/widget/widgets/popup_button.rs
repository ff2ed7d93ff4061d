//! A button that opens a popup.
//!
//! [`PopupButton`] owns a [`Popup`] created next to its window when the
//! button is inserted. The popup is shown while the button is pushed and is
//! anchored beside the window at the button's height. Removing the button
//! removes the popup with it.

use trellis_core::{Point, Size};
use trellis_render::TextAlign;

use super::button::{Button, ButtonFlags};
use super::popup::Popup;
use crate::widget::context::{EventCtx, LayoutCtx, PaintCtx};
use crate::widget::events::WidgetEvent;
use crate::widget::traits::Widget;
use crate::widget::tree::{WidgetId, WidgetTree};

/// Initial size of the popup.
pub const DEFAULT_POPUP_SIZE: Size = Size::new(320, 250);

/// Horizontal distance between the window's right edge and the popup anchor.
const ANCHOR_GAP: i32 = 15;

/// Chevron drawn on the right side of the button.
const CHEVRON_RIGHT: char = '\u{25B8}';

/// A toggle button that shows a popup while pushed.
#[derive(Debug)]
pub struct PopupButton {
    button: Button,
    popup: Option<WidgetId>,
    chevron: char,
}

impl PopupButton {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            button: Button::new(caption).with_flags(ButtonFlags::TOGGLE | ButtonFlags::POPUP),
            popup: None,
            chevron: CHEVRON_RIGHT,
        }
    }

    pub fn button(&self) -> &Button {
        &self.button
    }

    pub fn button_mut(&mut self) -> &mut Button {
        &mut self.button
    }

    /// The owned popup; `None` until the button is inserted.
    pub fn popup(&self) -> Option<WidgetId> {
        self.popup
    }

    pub fn chevron(&self) -> char {
        self.chevron
    }

    pub fn set_chevron(&mut self, chevron: char) {
        self.chevron = chevron;
    }
}

impl Widget for PopupButton {
    fn type_name(&self) -> &'static str {
        "PopupButton"
    }

    /// Create the popup beside the enclosing window.
    fn attached(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let window = tree.find_window(id);
        let host = window
            .and_then(|w| tree.parent(w))
            .unwrap_or_else(|| tree.root());
        match tree.insert(host, Popup::new(window)) {
            Ok(popup) => {
                if let Some(base) = tree.base_mut(popup) {
                    base.set_size(DEFAULT_POPUP_SIZE);
                    base.set_visible(false);
                }
                self.popup = Some(popup);
            }
            Err(err) => {
                tracing::warn!(target: trellis_core::logging::targets::TREE, %err, "popup creation failed");
            }
        }
    }

    fn preferred_size(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Size {
        let size = self.button.measure(cx, id);
        Size::new(size.width + ANCHOR_GAP, size.height)
    }

    fn after_layout(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let (Some(popup), Some(window)) = (self.popup, tree.find_window(id)) else {
            return;
        };
        let window_width = tree.base(window).map_or(0, |b| b.width());
        let height = tree.base(id).map_or(0, |b| b.height());
        let offset = tree.absolute_position(id).y - tree.absolute_position(window).y;
        if let Some(popup) = tree.downcast_mut::<Popup>(popup) {
            popup.set_anchor_pos(Point::new(window_width + ANCHOR_GAP, offset + height / 2));
        }
    }

    fn event(&mut self, cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
        match event {
            WidgetEvent::MouseButton(e) => {
                cx.default_event(event);
                self.button.handle_mouse_button(cx, e)
            }
            _ => cx.default_event(event),
        }
    }

    /// Popup visibility follows the pushed state; disabling closes it.
    fn refresh(&mut self, cx: &mut EventCtx<'_>) {
        if !cx.is_enabled() && self.button.is_pushed() {
            self.button.set_pushed(false);
        }
        let pushed = self.button.is_pushed();
        if let Some(base) = self.popup.and_then(|p| cx.tree_mut().base_mut(p)) {
            base.set_visible(pushed);
        }
    }

    fn paint(&self, cx: &mut PaintCtx<'_>) {
        self.button.paint_button(cx);

        let size = cx.size();
        let theme = cx.theme();
        let enabled = cx.base().is_some_and(|b| b.is_enabled());
        let font_size = cx.base().and_then(|b| b.font_size());
        let font = theme.icon_font(font_size.unwrap_or(theme.button_font_size));
        let color = if enabled {
            theme.text_color
        } else {
            theme.disabled_text_color
        };
        let mut glyph = [0; 4];
        cx.renderer().draw_text(
            &font,
            Point::new(size.width - ANCHOR_GAP, size.height / 2 - 1),
            TextAlign::MIDDLE_LEFT,
            color,
            self.chevron.encode_utf8(&mut glyph),
        );
    }

    fn dependents(&self) -> Vec<WidgetId> {
        self.popup.into_iter().collect()
    }
}
