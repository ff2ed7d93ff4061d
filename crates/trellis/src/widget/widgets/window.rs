//! Top-level windows.
//!
//! A [`Window`] is a movable container with an optional title bar. Layouts
//! reserve the header height inside windows with a non-empty title (see
//! [`WidgetTree::window_title`](crate::widget::WidgetTree::window_title)).
//! Pressing the primary button on the header starts a drag that moves the
//! window, clamped to its parent's bounds. A modal window rejects pointer
//! input outside its bounds while it is on the focus path.
//!
//! # Example
//!
//! ```ignore
//! let window = tree.insert(root, Window::new("Settings").with_modal(true))?;
//! tree.set_layout(window, BoxLayout::new(BoxLayoutConfig::new(Orientation::Vertical)))?;
//! ```

use trellis_core::{Point, Rect, Size};
use trellis_render::{Shadow, TextAlign};

use crate::widget::context::{EventCtx, LayoutCtx, PaintCtx};
use crate::widget::events::{MouseButton, WidgetEvent};
use crate::widget::traits::{LayoutRole, Widget};
use crate::widget::tree::WidgetId;

/// Font size of window titles.
pub(crate) const TITLE_FONT_SIZE: i32 = 18;

/// A movable, optionally modal container with a title bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    title: String,
    modal: bool,
    drag: bool,
}

impl Default for Window {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Window {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            modal: false,
            drag: false,
        }
    }

    /// The title; an empty title hides the header.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn is_modal(&self) -> bool {
        self.modal
    }

    pub fn set_modal(&mut self, modal: bool) {
        self.modal = modal;
    }

    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    /// Whether a header drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag
    }

    /// Move by `rel`, keeping the window inside its parent.
    fn drag_by(&self, cx: &mut EventCtx<'_>, rel: Point) {
        let parent_size = cx
            .tree()
            .parent(cx.id())
            .and_then(|p| cx.tree().base(p))
            .map_or(Size::ZERO, |b| b.size());
        let size = cx.size();
        if let Some(base) = cx.base_mut() {
            let pos = base.pos() + rel;
            base.set_pos(Point::new(
                pos.x.min(parent_size.width - size.width).max(0),
                pos.y.min(parent_size.height - size.height).max(0),
            ));
        }
    }
}

impl Widget for Window {
    fn type_name(&self) -> &'static str {
        "Window"
    }

    fn layout_role(&self) -> LayoutRole {
        LayoutRole::Window {
            title: self.title.clone(),
        }
    }

    fn preferred_size(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Size {
        let content = cx.default_preferred_size(id);
        let font = cx.theme().bold_font(TITLE_FONT_SIZE);
        let title = cx.metrics().text_bounds(&font, &self.title).rect.size;
        Size::new(
            content.width.max(title.width + 20),
            content.height.max(title.height),
        )
    }

    fn event(&mut self, cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
        match event {
            WidgetEvent::MouseButton(e) => {
                if cx.default_event(event) {
                    return true;
                }
                if e.button == MouseButton::Left {
                    self.drag = e.pressed && e.pos.y < cx.theme().window_header_height;
                    return true;
                }
                false
            }
            WidgetEvent::MouseDrag(e) => {
                if self.drag && e.buttons.contains(MouseButton::Left) {
                    self.drag_by(cx, e.rel);
                    return true;
                }
                false
            }
            WidgetEvent::Scroll(_) => {
                cx.default_event(event);
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
        let focused = base.is_focused();
        let theme = cx.theme();
        let corner = theme.window_corner_radius as f32;
        let header = theme.window_header_height;
        let bounds = Rect::from_size(size);

        let renderer = cx.renderer();
        renderer.draw_shadow(&Shadow {
            rect: bounds,
            corner_radius: corner * 2.0,
            size: (theme.window_drop_shadow_size * 2) as f32,
            color: theme.drop_shadow,
        });
        let fill = if focused {
            theme.window_fill_focused
        } else {
            theme.window_fill_unfocused
        };
        renderer.fill_rounded_rect(bounds, corner, fill);

        if !self.title.is_empty() {
            renderer.fill_rounded_rect(
                Rect::new(0, 0, size.width, header),
                corner,
                theme.window_header_gradient_top,
            );
            renderer.draw_line(
                Point::new(0, header - 1),
                Point::new(size.width, header - 1),
                1.0,
                theme.window_header_sep_bot,
            );

            let font = theme.bold_font(TITLE_FONT_SIZE);
            let center = Point::new(size.width / 2, header / 2);
            renderer.draw_text(
                &font,
                center + Point::new(0, -1),
                TextAlign::CENTER,
                theme.drop_shadow,
                &self.title,
            );
            let title_color = if focused {
                theme.window_title_focused
            } else {
                theme.window_title_unfocused
            };
            renderer.draw_text(&font, center, TextAlign::CENTER, title_color, &self.title);
        }

        cx.paint_children();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::dispatcher::send_event;
    use crate::widget::events::{
        KeyboardModifiers, MouseButtonEvent, MouseButtons, MouseMotionEvent, ScrollEvent,
    };
    use crate::widget::testing::headless_tree;

    fn press(pos: Point, pressed: bool) -> WidgetEvent {
        WidgetEvent::MouseButton(MouseButtonEvent {
            pos,
            button: MouseButton::Left,
            pressed,
            modifiers: KeyboardModifiers::NONE,
        })
    }

    fn drag(rel: Point) -> WidgetEvent {
        WidgetEvent::MouseDrag(MouseMotionEvent {
            pos: Point::ZERO,
            rel,
            buttons: MouseButton::Left.into(),
            modifiers: KeyboardModifiers::NONE,
        })
    }

    #[test]
    fn test_default_title() {
        assert_eq!(Window::default().title(), "Untitled");
        assert!(!Window::default().is_modal());
    }

    #[test]
    fn test_header_press_starts_drag() {
        let (mut tree, mut env) = headless_tree();
        let root = tree.root();
        tree.base_mut(root).unwrap().set_size(Size::new(800, 600));
        let window = tree.insert(root, Window::new("Tools")).unwrap();
        {
            let base = tree.base_mut(window).unwrap();
            base.set_pos(Point::new(100, 100));
            base.set_size(Size::new(200, 150));
        }

        assert!(send_event(&mut tree, &mut env, window, &press(Point::new(20, 10), true)));
        assert!(tree.downcast_ref::<Window>(window).unwrap().is_dragging());

        assert!(send_event(&mut tree, &mut env, window, &drag(Point::new(15, -5))));
        assert_eq!(tree.base(window).unwrap().pos(), Point::new(115, 95));
    }

    #[test]
    fn test_drag_is_clamped_to_parent() {
        let (mut tree, mut env) = headless_tree();
        let root = tree.root();
        tree.base_mut(root).unwrap().set_size(Size::new(400, 300));
        let window = tree.insert(root, Window::new("Tools")).unwrap();
        {
            let base = tree.base_mut(window).unwrap();
            base.set_pos(Point::new(10, 10));
            base.set_size(Size::new(200, 150));
        }

        send_event(&mut tree, &mut env, window, &press(Point::new(20, 10), true));
        send_event(&mut tree, &mut env, window, &drag(Point::new(-50, 500)));
        assert_eq!(tree.base(window).unwrap().pos(), Point::new(0, 150));
    }

    #[test]
    fn test_body_press_does_not_drag() {
        let (mut tree, mut env) = headless_tree();
        let root = tree.root();
        let window = tree.insert(root, Window::new("Tools")).unwrap();
        tree.base_mut(window).unwrap().set_size(Size::new(200, 150));

        assert!(send_event(&mut tree, &mut env, window, &press(Point::new(20, 80), true)));
        assert!(!tree.downcast_ref::<Window>(window).unwrap().is_dragging());
        assert!(!send_event(&mut tree, &mut env, window, &drag(Point::new(5, 5))));

        let released = WidgetEvent::MouseDrag(MouseMotionEvent {
            pos: Point::ZERO,
            rel: Point::new(5, 5),
            buttons: MouseButtons::NONE,
            modifiers: KeyboardModifiers::NONE,
        });
        assert!(!send_event(&mut tree, &mut env, window, &released));
    }

    #[test]
    fn test_scroll_is_swallowed() {
        let (mut tree, mut env) = headless_tree();
        let root = tree.root();
        let window = tree.insert(root, Window::new("Tools")).unwrap();
        tree.base_mut(window).unwrap().set_size(Size::new(200, 150));
        let scroll = WidgetEvent::Scroll(ScrollEvent {
            pos: Point::new(50, 50),
            delta: Point::new(0, 1),
        });
        assert!(send_event(&mut tree, &mut env, window, &scroll));
    }

    #[test]
    fn test_preferred_width_covers_title() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let window = tree.insert(root, Window::new("A long window title")).unwrap();
        let cx = LayoutCtx::new(&tree, &env);
        // 19 graphemes at 9px (bold 18) plus 20 of padding.
        assert_eq!(cx.preferred_size(window), Size::new(19 * 9 + 20, 18));
    }
}
