//! Popup panels attached to a window.
//!
//! A [`Popup`] lives beside its parent window (usually as a child of the
//! screen root) but is positioned relative to it: every frame its position is
//! recomputed as the parent window's position plus the anchor, moved up by
//! the anchor height. Popups may be parented to other popups; placement
//! resolves the chain outermost first.

use trellis_core::{Point, Rect};
use trellis_render::Shadow;

use crate::widget::context::{EventCtx, LayoutCtx, PaintCtx, Placement};
use crate::widget::events::{MouseButton, WidgetEvent};
use crate::widget::traits::Widget;
use crate::widget::tree::{WidgetId, WidgetTree};

/// Default vertical distance between the anchor and the popup's top edge.
pub const DEFAULT_ANCHOR_HEIGHT: i32 = 30;

/// An overlay panel anchored to a parent window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    parent_window: Option<WidgetId>,
    anchor_pos: Point,
    anchor_height: i32,
}

impl Popup {
    pub fn new(parent_window: Option<WidgetId>) -> Self {
        Self {
            parent_window,
            anchor_pos: Point::ZERO,
            anchor_height: DEFAULT_ANCHOR_HEIGHT,
        }
    }

    /// The window (or popup) this popup is placed against.
    pub fn parent_window(&self) -> Option<WidgetId> {
        self.parent_window
    }

    pub fn set_parent_window(&mut self, window: Option<WidgetId>) {
        self.parent_window = window;
    }

    /// Anchor point in the parent window's coordinates.
    pub fn anchor_pos(&self) -> Point {
        self.anchor_pos
    }

    pub fn set_anchor_pos(&mut self, pos: Point) {
        self.anchor_pos = pos;
    }

    pub fn anchor_height(&self) -> i32 {
        self.anchor_height
    }

    pub fn set_anchor_height(&mut self, height: i32) {
        self.anchor_height = height;
    }

    /// Position `id` against its parent window.
    ///
    /// The popup is hidden when the parent window is not effectively visible.
    pub fn place(&self, tree: &mut WidgetTree, id: WidgetId) {
        self.place_in_chain(tree, id, &mut vec![id]);
    }

    /// `chain` holds the popups already being placed, so a popup parented
    /// to itself (directly or through others) stops the walk.
    fn place_in_chain(&self, tree: &mut WidgetTree, id: WidgetId, chain: &mut Vec<WidgetId>) {
        let Some(window) = self.parent_window else {
            return;
        };
        if !chain.contains(&window) {
            chain.push(window);
            if let Some(parent) = tree.downcast_ref::<Popup>(window).cloned() {
                parent.place_in_chain(tree, window, chain);
            }
        }

        let window_visible = tree.visible_recursive(window);
        let window_pos = tree.base(window).map_or(Point::ZERO, |b| b.pos());
        if let Some(base) = tree.base_mut(id) {
            base.set_visible(base.is_visible() && window_visible);
            base.set_pos(window_pos + self.anchor_pos - Point::new(0, self.anchor_height));
        }
    }
}

/// Re-place `id` if it is a popup; windows are positioned absolutely.
pub(crate) fn refresh_relative_placement(tree: &mut WidgetTree, id: WidgetId) {
    if let Some(popup) = tree.downcast_ref::<Popup>(id).cloned() {
        popup.place(tree, id);
    }
}

impl Widget for Popup {
    fn type_name(&self) -> &'static str {
        "Popup"
    }

    /// A single child without a layout fills the popup.
    fn arrange(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Vec<Placement> {
        let children = cx.tree().children(id);
        if cx.layout(id).is_none() && children.len() == 1 {
            return vec![Placement::new(children[0], Point::ZERO, cx.container_size(id))];
        }
        cx.default_arrange(id)
    }

    fn event(&mut self, cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
        match event {
            WidgetEvent::MouseButton(e) => {
                cx.default_event(event) || e.button == MouseButton::Left
            }
            WidgetEvent::Scroll(_) => {
                cx.default_event(event);
                true
            }
            _ => cx.default_event(event),
        }
    }

    fn refresh(&mut self, cx: &mut EventCtx<'_>) {
        let id = cx.id();
        self.place(cx.tree_mut(), id);
    }

    fn paint(&self, cx: &mut PaintCtx<'_>) {
        let size = cx.size();
        let theme = cx.theme();
        let corner = theme.window_corner_radius as f32;
        let bounds = Rect::from_size(size);
        let arrow_y = self.anchor_height;

        let renderer = cx.renderer();
        renderer.draw_shadow(&Shadow {
            rect: bounds,
            corner_radius: corner * 2.0,
            size: (theme.window_drop_shadow_size * 2) as f32,
            color: theme.drop_shadow,
        });
        renderer.fill_rounded_rect(bounds, corner, theme.window_popup);
        // Arrow pointing back at the anchor on the left edge.
        let tip = Point::new(-15, arrow_y);
        for end in [Point::new(0, arrow_y - 15), Point::new(0, arrow_y + 15)] {
            renderer.draw_line(tip, end, 1.0, theme.border_light);
        }

        cx.paint_children();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Size;
    use crate::widget::layout::perform_layout;
    use crate::widget::testing::{SizedBox, headless_tree};
    use crate::widget::widgets::Window;

    #[test]
    fn test_placement_follows_parent_window() {
        let (mut tree, _env) = headless_tree();
        let root = tree.root();
        let window = tree.insert(root, Window::new("Main")).unwrap();
        tree.base_mut(window).unwrap().set_pos(Point::new(100, 50));
        let popup = tree.insert(root, Popup::new(Some(window))).unwrap();
        tree.downcast_mut::<Popup>(popup)
            .unwrap()
            .set_anchor_pos(Point::new(215, 40));

        refresh_relative_placement(&mut tree, popup);
        assert_eq!(tree.base(popup).unwrap().pos(), Point::new(315, 60));

        tree.base_mut(window).unwrap().set_pos(Point::new(0, 0));
        refresh_relative_placement(&mut tree, popup);
        assert_eq!(tree.base(popup).unwrap().pos(), Point::new(215, 10));
    }

    #[test]
    fn test_nested_popups_resolve_outermost_first() {
        let (mut tree, _env) = headless_tree();
        let root = tree.root();
        let window = tree.insert(root, Window::new("Main")).unwrap();
        tree.base_mut(window).unwrap().set_pos(Point::new(100, 100));
        let outer = tree.insert(root, Popup::new(Some(window))).unwrap();
        tree.downcast_mut::<Popup>(outer)
            .unwrap()
            .set_anchor_pos(Point::new(200, 50));
        let inner = tree.insert(root, Popup::new(Some(outer))).unwrap();
        tree.downcast_mut::<Popup>(inner)
            .unwrap()
            .set_anchor_pos(Point::new(330, 40));

        refresh_relative_placement(&mut tree, inner);
        assert_eq!(tree.base(outer).unwrap().pos(), Point::new(300, 120));
        assert_eq!(tree.base(inner).unwrap().pos(), Point::new(630, 130));
    }

    #[test]
    fn test_hidden_with_parent_window() {
        let (mut tree, _env) = headless_tree();
        let root = tree.root();
        let window = tree.insert(root, Window::new("Main")).unwrap();
        let popup = tree.insert(root, Popup::new(Some(window))).unwrap();
        tree.base_mut(window).unwrap().set_visible(false);

        refresh_relative_placement(&mut tree, popup);
        assert!(!tree.base(popup).unwrap().is_visible());

        // Showing the window again does not resurrect the popup by itself.
        tree.base_mut(window).unwrap().set_visible(true);
        refresh_relative_placement(&mut tree, popup);
        assert!(!tree.base(popup).unwrap().is_visible());
    }

    #[test]
    fn test_single_child_fills_popup() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let popup = tree.insert(root, Popup::new(None)).unwrap();
        tree.base_mut(popup).unwrap().set_size(Size::new(320, 250));
        let child = tree.insert(popup, SizedBox::new(10, 10)).unwrap();

        perform_layout(&mut tree, &env, popup);
        let base = tree.base(child).unwrap();
        assert_eq!(base.pos(), Point::ZERO);
        assert_eq!(base.size(), Size::new(320, 250));
    }
}
