//! Push, toggle, radio and popup buttons.
//!
//! A single [`Button`] type covers every button behaviour through
//! [`ButtonFlags`]:
//!
//! - **Normal**: pushed while the primary button is held; clicking fires the
//!   click callback.
//! - **Toggle**: each press flips the pushed state.
//! - **Radio**: pressing un-pushes the other radio buttons of its group (the
//!   explicit [`button_group`](Button::button_group), or its siblings when the
//!   group is empty).
//! - **Popup**: pressing un-pushes sibling popup buttons, so at most one of
//!   their popups is open.
//!
//! Every change of the pushed state fires the change callback, including the
//! un-pushing of other group members.
//!
//! # Example
//!
//! ```ignore
//! let ok = tree.insert(window, Button::new("OK").on_click(|| println!("ok")))?;
//! let bold = tree.insert(
//!     toolbar,
//!     Button::new("B")
//!         .with_flags(ButtonFlags::TOGGLE)
//!         .on_change(|pushed| println!("bold: {pushed}")),
//! )?;
//! ```

use std::fmt;
use std::ops::BitOr;

use trellis_core::{Point, Rect, Size};
use trellis_render::{Font, TextAlign};

use super::popup_button::PopupButton;
use crate::widget::context::{EventCtx, LayoutCtx, PaintCtx};
use crate::widget::events::{MouseButton, MouseButtonEvent, WidgetEvent};
use crate::widget::theme::Theme;
use crate::widget::traits::Widget;
use crate::widget::tree::{WidgetId, WidgetTree};

/// Behaviour flags of a [`Button`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonFlags(u8);

impl ButtonFlags {
    pub const NORMAL: Self = Self(1);
    pub const RADIO: Self = Self(2);
    pub const TOGGLE: Self = Self(4);
    pub const POPUP: Self = Self(8);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl Default for ButtonFlags {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl BitOr for ButtonFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A clickable button with a caption and an optional icon.
pub struct Button {
    caption: String,
    icon: Option<char>,
    flags: ButtonFlags,
    pushed: bool,
    button_group: Vec<WidgetId>,
    click: Option<Box<dyn FnMut()>>,
    change: Option<Box<dyn FnMut(bool)>>,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("caption", &self.caption)
            .field("icon", &self.icon)
            .field("flags", &self.flags)
            .field("pushed", &self.pushed)
            .field("button_group", &self.button_group)
            .finish_non_exhaustive()
    }
}

impl Button {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            icon: None,
            flags: ButtonFlags::NORMAL,
            pushed: false,
            button_group: Vec::new(),
            click: None,
            change: None,
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Icon glyph drawn left of the caption with the theme's icon face.
    pub fn icon(&self) -> Option<char> {
        self.icon
    }

    pub fn set_icon(&mut self, icon: Option<char>) {
        self.icon = icon;
    }

    pub fn with_icon(mut self, icon: char) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn flags(&self) -> ButtonFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: ButtonFlags) {
        self.flags = flags;
    }

    pub fn with_flags(mut self, flags: ButtonFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn is_pushed(&self) -> bool {
        self.pushed
    }

    /// Set the pushed state without firing callbacks.
    pub fn set_pushed(&mut self, pushed: bool) {
        self.pushed = pushed;
    }

    /// Explicit radio group; empty means "siblings".
    pub fn button_group(&self) -> &[WidgetId] {
        &self.button_group
    }

    pub fn set_button_group(&mut self, group: Vec<WidgetId>) {
        self.button_group = group;
    }

    /// Called on release inside the button after a press.
    pub fn set_click_callback(&mut self, callback: impl FnMut() + 'static) {
        self.click = Some(Box::new(callback));
    }

    pub fn on_click(mut self, callback: impl FnMut() + 'static) -> Self {
        self.set_click_callback(callback);
        self
    }

    /// Called with the new pushed state whenever it changes through input.
    pub fn set_change_callback(&mut self, callback: impl FnMut(bool) + 'static) {
        self.change = Some(Box::new(callback));
    }

    pub fn on_change(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.set_change_callback(callback);
        self
    }

    fn fire_change(&mut self) {
        let pushed = self.pushed;
        if let Some(change) = self.change.as_mut() {
            change(pushed);
        }
    }

    /// Un-push this button as a side effect of another group member's press.
    fn release_by_group(&mut self, flag: ButtonFlags) {
        if self.flags.contains(flag) && self.pushed {
            self.pushed = false;
            self.fire_change();
        }
    }

    /// Un-push the other members of this button's radio or popup group.
    fn release_group(&self, tree: &mut WidgetTree, id: WidgetId) {
        if self.flags.contains(ButtonFlags::RADIO) {
            let members = if self.button_group.is_empty() {
                siblings(tree, id)
            } else {
                self.button_group.clone()
            };
            for member in members.into_iter().filter(|&m| m != id) {
                if let Some(button) = button_mut(tree, member) {
                    button.release_by_group(ButtonFlags::RADIO);
                }
            }
        }
        if self.flags.contains(ButtonFlags::POPUP) {
            for member in siblings(tree, id).into_iter().filter(|&m| m != id) {
                if let Some(button) = button_mut(tree, member) {
                    button.release_by_group(ButtonFlags::POPUP);
                }
            }
        }
    }

    /// Primary-button handling shared with [`PopupButton`].
    pub(crate) fn handle_mouse_button(&mut self, cx: &mut EventCtx<'_>, e: &MouseButtonEvent) -> bool {
        if e.button != MouseButton::Left || !cx.is_enabled() {
            return false;
        }
        let was_pushed = self.pushed;
        if e.pressed {
            let id = cx.id();
            self.release_group(cx.tree_mut(), id);
            if self.flags.contains(ButtonFlags::TOGGLE) {
                self.pushed = !self.pushed;
            } else {
                self.pushed = true;
            }
        } else if self.pushed {
            if cx.local_rect().contains(e.pos) {
                if let Some(click) = self.click.as_mut() {
                    click();
                }
            }
            if self.flags.contains(ButtonFlags::NORMAL) {
                self.pushed = false;
            }
        }
        if was_pushed != self.pushed {
            self.fire_change();
        }
        true
    }

    fn font(theme: &Theme, size: Option<i32>) -> Font {
        theme.bold_font(size.unwrap_or(theme.button_font_size))
    }

    fn icon_font(theme: &Theme, size: Option<i32>) -> Font {
        let size = size.unwrap_or(theme.button_font_size);
        theme.icon_font((size as f32 * 1.5) as i32)
    }

    pub(crate) fn measure(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Size {
        let font_size = cx.base(id).and_then(|b| b.font_size());
        let theme = cx.theme();
        let font = Self::font(theme, font_size);
        let text_width = cx.metrics().text_bounds(&font, &self.caption).advance;

        let icon_width = match self.icon {
            Some(icon) => {
                let icon_font = Self::icon_font(theme, font_size);
                let advance = cx
                    .metrics()
                    .text_bounds(&icon_font, icon.encode_utf8(&mut [0; 4]))
                    .advance;
                advance + font.size * 0.15
            }
            None => 0.0,
        };
        Size::new(
            (text_width + icon_width) as i32 + 20,
            font.size as i32 + 10,
        )
    }

    pub(crate) fn paint_button(&self, cx: &mut PaintCtx<'_>) {
        let Some(base) = cx.base() else {
            return;
        };
        let size = base.size();
        let theme = cx.theme();
        let bounds = Rect::from_size(size);
        let corner = theme.button_corner_radius as f32;

        let fill = if self.pushed {
            theme.button_gradient_top_pushed
        } else if base.is_hovered() && base.is_enabled() {
            theme.button_gradient_top_focused
        } else {
            theme.button_gradient_top_unfocused
        };
        let text_color = if base.is_enabled() {
            theme.text_color
        } else {
            theme.disabled_text_color
        };
        let font = Self::font(theme, base.font_size());

        let text_width = cx.metrics().text_bounds(&font, &self.caption).advance as i32;
        let icon = self.icon.map(|icon| {
            let icon_font = Self::icon_font(theme, base.font_size());
            let mut buf = [0; 4];
            let glyph = icon.encode_utf8(&mut buf).to_owned();
            let width = cx.metrics().text_bounds(&icon_font, &glyph).advance as i32;
            (icon_font, glyph, width)
        });

        let renderer = cx.renderer();
        renderer.fill_rounded_rect(bounds, corner, fill);
        renderer.stroke_rounded_rect(bounds, corner, 1.0, theme.border_dark);
        renderer.stroke_rounded_rect(
            Rect::new(1, 1, size.width - 2, size.height - 2),
            corner,
            1.0,
            theme.border_light,
        );

        let center = Point::new(size.width / 2, size.height / 2);
        let mut text_pos = Point::new(center.x - text_width / 2, center.y - 1);
        if let Some((icon_font, glyph, icon_width)) = icon {
            let gap = (font.size * 0.15) as i32;
            text_pos.x += (icon_width + gap) / 2;
            let icon_pos = Point::new(text_pos.x - gap - icon_width, center.y + 1);
            renderer.draw_text(&icon_font, icon_pos, TextAlign::MIDDLE_LEFT, text_color, &glyph);
        }
        renderer.draw_text(
            &font,
            text_pos + Point::new(0, 1),
            TextAlign::MIDDLE_LEFT,
            theme.text_color_shadow,
            &self.caption,
        );
        renderer.draw_text(&font, text_pos, TextAlign::MIDDLE_LEFT, text_color, &self.caption);
    }
}

impl Widget for Button {
    fn type_name(&self) -> &'static str {
        "Button"
    }

    fn preferred_size(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Size {
        self.measure(cx, id)
    }

    fn event(&mut self, cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
        match event {
            WidgetEvent::MouseButton(e) => {
                cx.default_event(event);
                self.handle_mouse_button(cx, e)
            }
            _ => cx.default_event(event),
        }
    }

    fn paint(&self, cx: &mut PaintCtx<'_>) {
        self.paint_button(cx);
    }
}

fn siblings(tree: &WidgetTree, id: WidgetId) -> Vec<WidgetId> {
    tree.parent(id)
        .map(|p| tree.children(p).to_vec())
        .unwrap_or_default()
}

/// The button behaviour of `id`, whether a plain or a popup button.
pub(crate) fn button_mut(tree: &mut WidgetTree, id: WidgetId) -> Option<&mut Button> {
    if tree.downcast_ref::<Button>(id).is_some() {
        return tree.downcast_mut::<Button>(id);
    }
    tree.downcast_mut::<PopupButton>(id).map(PopupButton::button_mut)
}
