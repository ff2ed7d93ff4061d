//! Contexts handed to widget behaviours.
//!
//! - [`LayoutCtx`]: shared access to the tree during measure/arrange.
//! - [`EventCtx`]: mutable access to the tree while handling an event.
//! - [`PaintCtx`]: shared access to the tree plus a renderer while painting.
//!
//! All three carry the [`Environment`]: theme, text metrics, clipboard and
//! clock of the owning screen.

use std::time::{Duration, Instant};

use trellis_core::{Point, Rect, Size};
use trellis_render::{FixedMetrics, Renderer, TextMetrics};

use super::base::WidgetBase;
use super::dispatcher;
use super::events::WidgetEvent;
use super::layout::{Layout, LayoutKind};
use super::theme::Theme;
use super::tree::{WidgetId, WidgetTree};
use crate::clipboard::{Clipboard, MemoryClipboard};

/// Source of the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Wall-clock time.
    System,
    /// A manually driven time, for deterministic tests and replays.
    Manual(Instant),
}

impl Clock {
    pub fn now(&self) -> Instant {
        match self {
            Clock::System => Instant::now(),
            Clock::Manual(t) => *t,
        }
    }
}

/// Runtime services shared by every widget of a screen.
pub struct Environment {
    pub theme: Theme,
    metrics: Box<dyn TextMetrics>,
    clipboard: Box<dyn Clipboard>,
    clock: Clock,
}

impl Environment {
    pub fn new(theme: Theme, metrics: Box<dyn TextMetrics>, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            theme,
            metrics,
            clipboard,
            clock: Clock::System,
        }
    }

    /// Default theme, [`FixedMetrics`] and an in-memory clipboard.
    pub fn headless() -> Self {
        Self::new(
            Theme::default(),
            Box::new(FixedMetrics),
            Box::new(MemoryClipboard::new()),
        )
    }

    pub fn metrics(&self) -> &dyn TextMetrics {
        self.metrics.as_ref()
    }

    pub fn set_metrics(&mut self, metrics: Box<dyn TextMetrics>) {
        self.metrics = metrics;
    }

    pub fn clipboard(&mut self) -> &mut dyn Clipboard {
        self.clipboard.as_mut()
    }

    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = clipboard;
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Advance a manual clock; no effect on the system clock.
    pub fn advance_clock(&mut self, by: Duration) {
        if let Clock::Manual(t) = &mut self.clock {
            *t += by;
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("theme", &self.theme)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Final geometry assigned to one child by an arrange step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub widget: WidgetId,
    /// Position and size in the container's coordinates.
    pub rect: Rect,
    /// Column width for table-like layouts, forwarded to
    /// [`Widget::set_column_width`](super::Widget::set_column_width).
    pub column_width: Option<i32>,
}

impl Placement {
    pub fn new(widget: WidgetId, pos: Point, size: Size) -> Self {
        Self {
            widget,
            rect: Rect::from_origin_size(pos, size),
            column_width: None,
        }
    }
}

// =============================================================================
// LayoutCtx
// =============================================================================

/// Read-only view of the tree used while measuring and arranging.
#[derive(Clone, Copy)]
pub struct LayoutCtx<'a> {
    tree: &'a WidgetTree,
    env: &'a Environment,
}

impl<'a> LayoutCtx<'a> {
    pub fn new(tree: &'a WidgetTree, env: &'a Environment) -> Self {
        Self { tree, env }
    }

    pub fn tree(&self) -> &'a WidgetTree {
        self.tree
    }

    pub fn theme(&self) -> &'a Theme {
        &self.env.theme
    }

    pub fn metrics(&self) -> &'a dyn TextMetrics {
        self.env.metrics()
    }

    pub fn base(&self, id: WidgetId) -> Option<&'a WidgetBase> {
        self.tree.base(id)
    }

    /// Visible children of `id`, in order.
    pub fn visible_children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.tree
            .children(id)
            .iter()
            .copied()
            .filter(|&c| self.tree.base(c).is_some_and(|b| b.is_visible()))
            .collect()
    }

    /// Preferred size of `id` as its behaviour reports it.
    pub fn preferred_size(&self, id: WidgetId) -> Size {
        match self.tree.widget(id) {
            Some(widget) => widget.preferred_size(self, id),
            None => self.default_preferred_size(id),
        }
    }

    /// Preferred size of `id` when placed in a column `column_width` wide.
    pub fn preferred_size_in_column(&self, id: WidgetId, column_width: i32) -> Size {
        match self.tree.widget(id) {
            Some(widget) => widget.preferred_size_in_column(self, id, column_width),
            None => self.default_preferred_size(id),
        }
    }

    /// Fixed size of `id` (zero components are unconstrained).
    pub fn fixed_size(&self, id: WidgetId) -> Size {
        self.tree.base(id).map_or(Size::ZERO, |b| b.fixed_size())
    }

    /// Preferred size with fixed components taking precedence.
    pub fn target_size(&self, id: WidgetId) -> Size {
        self.preferred_size(id).overridden_by(self.fixed_size(id))
    }

    /// Extent a layout distributes: the container's size with fixed
    /// components taking precedence.
    pub fn container_size(&self, id: WidgetId) -> Size {
        self.tree.base(id).map_or(Size::ZERO, |b| b.effective_size())
    }

    /// Header height if `id` is a window with a non-empty title.
    pub fn window_header(&self, id: WidgetId) -> Option<i32> {
        self.tree
            .window_title(id)
            .map(|_| self.env.theme.window_header_height)
    }

    /// The caption if `id` is a [`Label`](super::widgets::Label).
    pub fn label_caption(&self, id: WidgetId) -> Option<&'a str> {
        self.tree.label_caption(id)
    }

    /// Measure without a behaviour override: the layout's preferred size, or
    /// the current size when there is no layout.
    pub fn default_preferred_size(&self, id: WidgetId) -> Size {
        match self.tree.layout(id) {
            Some(layout) => layout.preferred_size(self, id),
            None => self.tree.base(id).map_or(Size::ZERO, |b| b.size()),
        }
    }

    /// Arrange without a behaviour override.
    ///
    /// With a layout, the layout decides. Without one, every visible child
    /// keeps its position and gets its target size.
    pub fn default_arrange(&self, id: WidgetId) -> Vec<Placement> {
        match self.tree.layout(id) {
            Some(layout) => layout.arrange(self, id),
            None => self
                .visible_children(id)
                .into_iter()
                .map(|child| {
                    let pos = self.tree.base(child).map_or(Point::ZERO, |b| b.pos());
                    Placement::new(child, pos, self.target_size(child))
                })
                .collect(),
        }
    }

    /// Arrange `id` through its behaviour.
    pub fn arrange(&self, id: WidgetId) -> Vec<Placement> {
        match self.tree.widget(id) {
            Some(widget) => widget.arrange(self, id),
            None => self.default_arrange(id),
        }
    }

    /// The layout of `id`, if any.
    pub fn layout(&self, id: WidgetId) -> Option<&'a LayoutKind> {
        self.tree.layout(id)
    }
}

// =============================================================================
// EventCtx
// =============================================================================

/// Mutable access to the tree for the widget currently handling an event.
pub struct EventCtx<'a> {
    tree: &'a mut WidgetTree,
    env: &'a mut Environment,
    id: WidgetId,
}

impl<'a> EventCtx<'a> {
    pub fn new(tree: &'a mut WidgetTree, env: &'a mut Environment, id: WidgetId) -> Self {
        Self { tree, env, id }
    }

    /// The widget this context belongs to.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn tree(&self) -> &WidgetTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut *self.tree
    }

    pub fn env(&self) -> &Environment {
        &*self.env
    }

    pub fn theme(&self) -> &Theme {
        &self.env.theme
    }

    pub fn metrics(&self) -> &dyn TextMetrics {
        self.env.metrics()
    }

    pub fn clipboard(&mut self) -> &mut dyn Clipboard {
        self.env.clipboard()
    }

    pub fn now(&self) -> Instant {
        self.env.now()
    }

    /// This widget's base, or `None` if it was removed during the handler.
    pub fn base(&self) -> Option<&WidgetBase> {
        self.tree.base(self.id)
    }

    pub fn base_mut(&mut self) -> Option<&mut WidgetBase> {
        self.tree.base_mut(self.id)
    }

    /// This widget's size (zero once removed).
    pub fn size(&self) -> Size {
        self.base().map_or(Size::ZERO, |b| b.size())
    }

    /// This widget's rectangle in its own coordinates.
    pub fn local_rect(&self) -> Rect {
        Rect::from_size(self.size())
    }

    pub fn is_enabled(&self) -> bool {
        self.base().is_some_and(|b| b.is_enabled())
    }

    pub fn is_focused(&self) -> bool {
        self.base().is_some_and(|b| b.is_focused())
    }

    /// A shared layout view, for measuring from inside a handler.
    pub fn layout_ctx(&self) -> LayoutCtx<'_> {
        LayoutCtx::new(&*self.tree, &*self.env)
    }

    /// Default handling of `event` for this widget.
    pub fn default_event(&mut self, event: &WidgetEvent) -> bool {
        dispatcher::default_event(self, event)
    }

    /// Deliver `event` to another widget through its behaviour.
    ///
    /// The event's position must already be in `target`'s coordinates.
    pub fn send(&mut self, target: WidgetId, event: &WidgetEvent) -> bool {
        dispatcher::send_event(&mut *self.tree, &mut *self.env, target, event)
    }

    /// Put this widget on the focus path.
    pub fn request_focus(&mut self) {
        self.tree.request_focus(self.id);
    }

    /// Run a layout pass before the next frame.
    pub fn request_layout(&mut self) {
        self.tree.request_layout();
    }
}

// =============================================================================
// PaintCtx
// =============================================================================

/// Shared access to the tree plus a renderer, for one widget being painted.
///
/// The renderer's origin is at the widget's top-left corner.
pub struct PaintCtx<'a> {
    tree: &'a WidgetTree,
    env: &'a Environment,
    renderer: &'a mut dyn Renderer,
    id: WidgetId,
}

impl<'a> PaintCtx<'a> {
    pub fn new(
        tree: &'a WidgetTree,
        env: &'a Environment,
        renderer: &'a mut dyn Renderer,
        id: WidgetId,
    ) -> Self {
        Self {
            tree,
            env,
            renderer,
            id,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn tree(&self) -> &'a WidgetTree {
        self.tree
    }

    pub fn theme(&self) -> &'a Theme {
        &self.env.theme
    }

    pub fn metrics(&self) -> &'a dyn TextMetrics {
        self.env.metrics()
    }

    pub fn now(&self) -> Instant {
        self.env.now()
    }

    pub fn renderer(&mut self) -> &mut dyn Renderer {
        &mut *self.renderer
    }

    pub fn base(&self) -> Option<&'a WidgetBase> {
        self.tree.base(self.id)
    }

    pub fn size(&self) -> Size {
        self.base().map_or(Size::ZERO, |b| b.size())
    }

    /// Paint every visible child, each translated to its own origin.
    pub fn paint_children(&mut self) {
        let children: Vec<WidgetId> = self.tree.children(self.id).to_vec();
        for child in children {
            let Some(base) = self.tree.base(child) else {
                continue;
            };
            if !base.is_visible() {
                continue;
            }
            let pos = base.pos();
            self.renderer.save();
            self.renderer.translate(pos.x, pos.y);
            self.paint_widget(child);
            self.renderer.restore();
        }
    }

    /// Paint `id` at the current origin.
    pub fn paint_widget(&mut self, id: WidgetId) {
        let mut cx = PaintCtx::new(self.tree, self.env, &mut *self.renderer, id);
        match self.tree.widget(id) {
            Some(widget) => widget.paint(&mut cx),
            None => cx.paint_children(),
        }
    }
}
