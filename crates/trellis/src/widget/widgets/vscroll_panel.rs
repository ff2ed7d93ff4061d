//! Vertically scrolling container.
//!
//! A [`VScrollPanel`] shows a window onto its first child. The child is laid
//! out at the panel's width and its own preferred height, then shifted up by
//! the scroll offset, so hit testing and event coordinates follow the
//! visible content without any translation in the dispatcher. Painting is
//! clipped to the panel, and a scrollbar is drawn on the right edge when the
//! content is taller than the panel.

use trellis_core::{Point, Rect, Size};
use trellis_render::Color;

use crate::widget::context::{EventCtx, LayoutCtx, PaintCtx, Placement};
use crate::widget::events::WidgetEvent;
use crate::widget::traits::Widget;
use crate::widget::tree::{WidgetId, WidgetTree};

/// Horizontal space reserved for the scrollbar.
pub const SCROLLBAR_WIDTH: i32 = 12;

/// Pixels moved per unit of scroll or drag delta.
const SCROLL_STEP: f32 = 2.0;

/// Smallest scrollbar thumb length.
const MIN_THUMB: f32 = 20.0;

/// A container that scrolls its first child vertically.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VScrollPanel {
    /// Scroll position as a fraction in `0.0..=1.0`.
    scroll: f32,
    /// Height the content was last laid out at.
    content_height: i32,
}

impl VScrollPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll position, 0 at the top and 1 at the bottom.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Set the scroll position; the content moves at the next layout pass.
    pub fn set_scroll(&mut self, scroll: f32) {
        self.scroll = scroll.clamp(0.0, 1.0);
    }

    /// Height of the content as of the last layout pass.
    pub fn content_height(&self) -> i32 {
        self.content_height
    }

    /// Pixels the content is shifted up for a panel `view_height` tall.
    pub fn offset(&self, view_height: i32) -> i32 {
        let range = (self.content_height - view_height).max(0);
        (self.scroll * range as f32).round() as i32
    }

    /// Move the content by `amount` pixels (positive scrolls up).
    fn scroll_by(&mut self, view_height: i32, amount: f32) {
        if view_height < self.content_height {
            let range = (self.content_height - view_height) as f32;
            let position = (self.scroll * range - amount).clamp(0.0, range);
            self.scroll = (position / range).clamp(0.0, 1.0);
        } else {
            self.scroll = 0.0;
        }
    }

    /// Move the first child of `id` to the current offset.
    fn apply_offset(&self, tree: &mut WidgetTree, id: WidgetId) {
        let view_height = tree.base(id).map_or(0, |b| b.height());
        let Some(&content) = tree.children(id).first() else {
            return;
        };
        let offset = self.offset(view_height);
        if let Some(base) = tree.base_mut(content) {
            base.set_pos(Point::new(0, -offset));
        }
    }
}

impl Widget for VScrollPanel {
    fn type_name(&self) -> &'static str {
        "VScrollPanel"
    }

    fn preferred_size(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Size {
        let Some(&content) = cx.tree().children(id).first() else {
            return Size::ZERO;
        };
        let inner = match cx.layout(id) {
            Some(_) => cx.default_preferred_size(id),
            None => cx.preferred_size(content),
        };
        Size::new(inner.width + SCROLLBAR_WIDTH, inner.height)
    }

    /// The first child spans the panel's width at its preferred height.
    fn arrange(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Vec<Placement> {
        let mut placements = cx.default_arrange(id);
        let Some(&content) = cx.tree().children(id).first() else {
            return placements;
        };
        let view = cx.container_size(id);
        let content_height = cx.preferred_size(content).height;
        let range = (content_height - view.height).max(0);
        let offset = (self.scroll * range as f32).round() as i32;
        let placement = Placement::new(
            content,
            Point::new(0, -offset),
            Size::new(view.width, content_height),
        );
        match placements.iter_mut().find(|p| p.widget == content) {
            Some(existing) => *existing = placement,
            None => placements.insert(0, placement),
        }
        placements
    }

    fn after_layout(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let Some(&content) = tree.children(id).first() else {
            self.content_height = 0;
            return;
        };
        self.content_height = tree.base(content).map_or(0, |b| b.height());
        let view_height = tree.base(id).map_or(0, |b| b.height());
        if self.content_height <= view_height {
            self.scroll = 0.0;
        }
    }

    fn event(&mut self, cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
        let amount = match event {
            WidgetEvent::Scroll(e) => e.delta.y as f32 * SCROLL_STEP,
            // Dragging moves the view like a scrollbar thumb.
            WidgetEvent::MouseDrag(e) => {
                if cx.tree().children(cx.id()).is_empty() {
                    return false;
                }
                -(e.rel.y as f32) * SCROLL_STEP
            }
            _ => return cx.default_event(event),
        };
        let id = cx.id();
        self.scroll_by(cx.size().height, amount);
        self.apply_offset(cx.tree_mut(), id);
        true
    }

    fn paint(&self, cx: &mut PaintCtx<'_>) {
        let size = cx.size();
        let renderer = cx.renderer();
        renderer.save();
        renderer.scissor(Rect::from_size(size));
        cx.paint_children();
        cx.renderer().restore();

        if self.content_height <= size.height {
            return;
        }
        let (w, h) = (size.width as f32, size.height as f32);
        let thumb = (h * (h / self.content_height as f32).min(1.0)).max(MIN_THUMB).min(h);
        let renderer = cx.renderer();
        renderer.fill_rounded_rect(
            Rect::new(size.width - SCROLLBAR_WIDTH, 4, 8, size.height - 8),
            3.0,
            Color::mono(0, 32),
        );
        let thumb_y = 4.0 + 1.0 + (h - 8.0 - thumb) * self.scroll;
        renderer.fill_rounded_rect(
            Rect::new(
                (w - SCROLLBAR_WIDTH as f32 + 1.0) as i32,
                thumb_y as i32,
                6,
                (thumb - 2.0) as i32,
            ),
            2.0,
            Color::mono(220, 100),
        );
    }
}
