//! The root of a widget tree and its bridge to the host.
//!
//! A [`Screen`] owns one [`WidgetTree`] together with its [`Environment`] and
//! the pointer state the backend does not keep for us: the last pointer
//! position, the held buttons, the modifiers and the drag target. The host
//! feeds raw input into the `*_event` methods (positions in screen
//! coordinates) and calls [`Screen::draw_all`] once per frame.
//!
//! # Example
//!
//! ```ignore
//! let mut screen = Screen::new(Size::new(1024, 768), "Demo");
//! let window = screen.tree_mut().insert(screen.root(), Window::new("Tools"))?;
//! screen.perform_layout();
//! screen.center_window(window);
//!
//! // From the backend's callbacks:
//! screen.cursor_pos_event(Point::new(120, 80));
//! screen.mouse_button_event(MouseButton::Left, true, KeyboardModifiers::NONE);
//! screen.draw_all(&mut renderer);
//! ```

use std::time::{Duration, Instant};

use trellis_core::logging::{span_names, targets};
use trellis_core::{PerfSpan, Point, Rect, Size};
use trellis_render::{Color, Renderer};

use crate::error::TreeError;
use crate::widget::widgets::{Popup, SpinnerFilter, Window, refresh_relative_placement};
use crate::widget::{
    CharEvent, Clock, CursorShape, Environment, EventCtx, FocusEvent, ImePreeditEvent, KeyEvent,
    KeyboardModifiers, LayoutCtx, MouseButton, MouseButtonEvent, MouseButtons, MouseMotionEvent,
    PaintCtx, PendingNotice, ScrollEvent, Widget, WidgetEvent, WidgetId, WidgetTree, perform_layout,
    send_event,
};

/// Idle time before a tooltip starts to fade in.
const TOOLTIP_DELAY: Duration = Duration::from_millis(500);

/// Wrap width of tooltip text.
const TOOLTIP_WIDTH: i32 = 150;

const TOOLTIP_FONT_SIZE: i32 = 15;

/// Rounds of deferred notices handled per flush; focus handlers that keep
/// moving focus are cut off after this.
const MAX_NOTICE_ROUNDS: usize = 16;

/// Behaviour of the root node of a screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenRoot;

impl Widget for ScreenRoot {
    fn type_name(&self) -> &'static str {
        "Screen"
    }

    fn attached(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        if let Some(base) = tree.base_mut(id) {
            base.set_focusable(false);
        }
    }
}

/// One top-level surface: a widget tree plus its input state.
pub struct Screen {
    tree: WidgetTree,
    env: Environment,
    caption: String,
    background: Color,
    visible: bool,
    mouse_pos: Point,
    mouse_state: MouseButtons,
    modifiers: KeyboardModifiers,
    cursor: CursorShape,
    last_interaction: Instant,
    resize_callback: Option<Box<dyn FnMut(Size) -> bool>>,
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("caption", &self.caption)
            .field("size", &self.size())
            .field("visible", &self.visible)
            .field("mouse_pos", &self.mouse_pos)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl Screen {
    /// A screen of `size` with the headless environment.
    pub fn new(size: Size, caption: impl Into<String>) -> Self {
        Self::with_environment(size, caption, Environment::headless())
    }

    pub fn with_environment(size: Size, caption: impl Into<String>, env: Environment) -> Self {
        let mut tree = WidgetTree::new(ScreenRoot);
        let root = tree.root();
        if let Some(base) = tree.base_mut(root) {
            base.set_size(size);
        }
        let last_interaction = env.now();
        Self {
            tree,
            env,
            caption: caption.into(),
            background: Color::mono(77, 255),
            visible: true,
            mouse_pos: Point::ZERO,
            mouse_state: MouseButtons::NONE,
            modifiers: KeyboardModifiers::NONE,
            cursor: CursorShape::Arrow,
            last_interaction,
            resize_callback: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// The tree and environment together, for calls that need both.
    pub fn parts_mut(&mut self) -> (&mut WidgetTree, &mut Environment) {
        (&mut self.tree, &mut self.env)
    }

    pub fn root(&self) -> WidgetId {
        self.tree.root()
    }

    pub fn size(&self) -> Size {
        self.tree.base(self.tree.root()).map_or(Size::ZERO, |b| b.size())
    }

    pub fn set_size(&mut self, size: Size) {
        let root = self.tree.root();
        if let Some(base) = self.tree.base_mut(root) {
            base.set_size(size);
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Clear color; the alpha is forced to opaque.
    pub fn set_background(&mut self, color: Color) {
        self.background = color.with_alpha(1.0);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Last pointer position in screen coordinates.
    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    /// Buttons currently held.
    pub fn mouse_state(&self) -> MouseButtons {
        self.mouse_state
    }

    /// Cursor the backend should show.
    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    pub fn cursor_icon(&self) -> cursor_icon::CursorIcon {
        self.cursor.into()
    }

    /// The widget receiving drag events, if a drag is in progress.
    pub fn drag_target(&self) -> Option<WidgetId> {
        self.tree.drag_target()
    }

    /// Called with the new size after a resize; returns whether it handled it.
    pub fn set_resize_callback(&mut self, callback: impl FnMut(Size) -> bool + 'static) {
        self.resize_callback = Some(Box::new(callback));
    }

    // =========================================================================
    // Clock
    // =========================================================================

    pub fn now(&self) -> Instant {
        self.env.now()
    }

    /// Replace the clock; use [`Clock::Manual`] for deterministic timing.
    pub fn set_clock(&mut self, clock: Clock) {
        self.env.set_clock(clock);
        self.last_interaction = self.env.now();
    }

    /// Advance a manual clock.
    pub fn advance_clock(&mut self, by: Duration) {
        self.env.advance_clock(by);
    }

    fn touch(&mut self) {
        self.last_interaction = self.env.now();
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// The outermost focused widget, if it is a modal window that does not
    /// contain the pointer.
    fn blocked_by_modal(&self) -> bool {
        let Some(top) = self.tree.focus_path().top() else {
            return false;
        };
        let modal = self.tree.downcast_ref::<Window>(top).is_some_and(Window::is_modal);
        let blocked = modal && !self.tree.contains(top, self.root_local(self.mouse_pos));
        if blocked {
            tracing::trace!(target: targets::SCREEN, ?top, "pointer event outside modal window rejected");
        }
        blocked
    }

    /// Screen coordinates to root-local coordinates.
    fn root_local(&self, pos: Point) -> Point {
        pos - self.tree.base(self.tree.root()).map_or(Point::ZERO, |b| b.pos())
    }

    fn send_to_root(&mut self, event: &WidgetEvent) -> bool {
        let root = self.tree.root();
        let handled = send_event(&mut self.tree, &mut self.env, root, event);
        self.flush_pending();
        handled
    }

    fn update_cursor(&mut self, widget: Option<WidgetId>) {
        let shape = widget
            .and_then(|w| self.tree.base(w))
            .map_or(CursorShape::Arrow, |b| b.cursor());
        if shape != self.cursor {
            tracing::trace!(target: targets::SCREEN, ?shape, "cursor changed");
            self.cursor = shape;
        }
    }

    /// The pointer moved to `pos`.
    ///
    /// During a drag the drag target gets a [`WidgetEvent::MouseDrag`] first;
    /// if it does not consume it (or no drag is active) the motion is walked
    /// down the tree from the root.
    pub fn cursor_pos_event(&mut self, pos: Point) -> bool {
        self.touch();
        let rel = pos - self.mouse_pos;
        let mut handled = false;

        match self.tree.drag_target() {
            Some(target) => {
                let local = self.root_local(pos) - self.tree.absolute_position(target);
                let event = WidgetEvent::MouseDrag(MouseMotionEvent {
                    pos: local,
                    rel,
                    buttons: self.mouse_state,
                    modifiers: self.modifiers,
                });
                handled = send_event(&mut self.tree, &mut self.env, target, &event);
                self.flush_pending();
            }
            None => {
                let hovered = self.tree.find_widget_at(self.root_local(pos));
                self.update_cursor(hovered);
            }
        }

        if !handled {
            handled = self.send_to_root(&WidgetEvent::MouseMotion(MouseMotionEvent {
                pos: self.root_local(pos),
                rel,
                buttons: self.mouse_state,
                modifiers: self.modifiers,
            }));
        }
        self.mouse_pos = pos;
        handled
    }

    /// A mouse button went down or up at the last pointer position.
    pub fn mouse_button_event(
        &mut self,
        button: MouseButton,
        pressed: bool,
        modifiers: KeyboardModifiers,
    ) -> bool {
        self.modifiers = modifiers;
        self.touch();
        if self.blocked_by_modal() {
            return false;
        }

        if pressed {
            self.mouse_state.insert(button);
        } else {
            self.mouse_state.remove(button);
        }

        let local = self.root_local(self.mouse_pos);
        let drop_widget = self.tree.find_widget_at(local);
        if let Some(target) = self.tree.drag_target() {
            if !pressed && drop_widget != Some(target) {
                // The release happens elsewhere; the grabbing widget still
                // has to see it.
                let event = WidgetEvent::MouseButton(MouseButtonEvent {
                    pos: local - self.tree.absolute_position(target),
                    button,
                    pressed: false,
                    modifiers,
                });
                send_event(&mut self.tree, &mut self.env, target, &event);
                self.flush_pending();
            }
        }
        self.update_cursor(drop_widget);

        if pressed && button == MouseButton::Left {
            let target = drop_widget.filter(|&w| w != self.tree.root());
            self.tree.set_drag_target(target);
            match target {
                Some(target) => tracing::debug!(target: targets::SCREEN, ?target, "drag started"),
                None => self.update_focus(None),
            }
        } else if self.tree.drag_target().is_some() {
            tracing::debug!(target: targets::SCREEN, "drag ended");
            self.tree.set_drag_target(None);
        }

        self.send_to_root(&WidgetEvent::MouseButton(MouseButtonEvent {
            pos: local,
            button,
            pressed,
            modifiers,
        }))
    }

    /// The wheel scrolled by `delta` at the last pointer position.
    pub fn scroll_event(&mut self, delta: Point) -> bool {
        self.touch();
        if self.blocked_by_modal() {
            return false;
        }
        self.send_to_root(&WidgetEvent::Scroll(ScrollEvent {
            pos: self.root_local(self.mouse_pos),
            delta,
        }))
    }

    /// Offer `event` to the focus path, innermost first.
    fn send_to_focus_path(&mut self, event: &WidgetEvent) -> bool {
        let path: Vec<WidgetId> = self.tree.focus_path().iter().collect();
        let mut handled = false;
        for id in path {
            if !self.tree.base(id).is_some_and(|b| b.is_focused()) {
                continue;
            }
            if send_event(&mut self.tree, &mut self.env, id, event) {
                handled = true;
                break;
            }
        }
        self.flush_pending();
        handled
    }

    pub fn keyboard_event(&mut self, event: KeyEvent) -> bool {
        self.touch();
        self.send_to_focus_path(&WidgetEvent::Key(event))
    }

    pub fn char_event(&mut self, ch: char) -> bool {
        self.touch();
        self.send_to_focus_path(&WidgetEvent::Char(CharEvent { ch }))
    }

    pub fn ime_preedit_event(&mut self, event: ImePreeditEvent) -> bool {
        self.touch();
        self.send_to_focus_path(&WidgetEvent::ImePreedit(event))
    }

    pub fn ime_status_event(&mut self) -> bool {
        self.touch();
        self.send_to_focus_path(&WidgetEvent::ImeStatus)
    }

    /// The backend surface was resized. A zero size (minimized) is ignored.
    pub fn resize_event(&mut self, size: Size) -> bool {
        if size.is_empty() {
            return false;
        }
        self.touch();
        self.set_size(size);
        self.tree.request_layout();
        match self.resize_callback.as_mut() {
            Some(callback) => callback(size),
            None => false,
        }
    }

    // =========================================================================
    // Focus and windows
    // =========================================================================

    /// Focus `widget`, or clear the focus path with `None`.
    ///
    /// Focus events are delivered before this returns and the window that
    /// received focus is raised.
    pub fn update_focus(&mut self, widget: Option<WidgetId>) {
        match widget {
            Some(id) => {
                self.tree.request_focus(id);
            }
            None => self.tree.clear_focus(),
        }
        self.flush_pending();
    }

    /// Deliver queued focus events and window raises.
    fn flush_pending(&mut self) {
        for _ in 0..MAX_NOTICE_ROUNDS {
            let pending = self.tree.take_pending();
            if pending.is_empty() {
                return;
            }
            for notice in pending {
                match notice {
                    PendingNotice::Focus { widget, focused } => {
                        let event = WidgetEvent::Focus(FocusEvent { focused });
                        send_event(&mut self.tree, &mut self.env, widget, &event);
                    }
                    PendingNotice::Raise { widget } => {
                        if let Some(window) = self.outermost_window(widget) {
                            if let Err(err) = self.move_window_to_front(window) {
                                tracing::debug!(target: targets::SCREEN, %err, "raise skipped");
                            }
                        }
                    }
                }
            }
        }
        tracing::warn!(target: targets::SCREEN, "focus notices still pending after {MAX_NOTICE_ROUNDS} rounds");
    }

    /// The outermost window or popup containing `id`.
    fn outermost_window(&self, id: WidgetId) -> Option<WidgetId> {
        let mut found = None;
        let mut current = Some(id);
        while let Some(w) = current {
            if self.tree.downcast_ref::<Window>(w).is_some()
                || self.tree.downcast_ref::<Popup>(w).is_some()
            {
                found = Some(w);
            }
            current = self.tree.parent(w);
        }
        found
    }

    /// Raise `window` to the top of its siblings, followed by the popups and
    /// spinner covers placed against it (and theirs, recursively).
    pub fn move_window_to_front(&mut self, window: WidgetId) -> Result<(), TreeError> {
        let mut raised = Vec::new();
        self.raise_with_popups(window, &mut raised)
    }

    fn raise_with_popups(&mut self, window: WidgetId, raised: &mut Vec<WidgetId>) -> Result<(), TreeError> {
        self.tree.raise(window)?;
        raised.push(window);
        let parent = self.tree.parent(window).ok_or(TreeError::StaleWidget(window))?;
        loop {
            let siblings = self.tree.children(parent);
            let Some(index) = self.tree.child_index(parent, window) else {
                return Ok(());
            };
            let next = siblings[..index].iter().copied().find(|&sibling| {
                !raised.contains(&sibling) && self.overlay_owner(sibling) == Some(window)
            });
            match next {
                Some(popup) => self.raise_with_popups(popup, raised)?,
                None => return Ok(()),
            }
        }
    }

    /// The window a top-level overlay (popup or spinner cover) belongs to.
    fn overlay_owner(&self, id: WidgetId) -> Option<WidgetId> {
        if let Some(popup) = self.tree.downcast_ref::<Popup>(id) {
            return popup.parent_window();
        }
        self.tree
            .downcast_ref::<SpinnerFilter>(id)
            .and_then(SpinnerFilter::host)
            .and_then(|host| self.tree.find_window(host))
    }

    /// Remove `window`, dropping focus first if it holds it.
    pub fn dispose_window(&mut self, window: WidgetId) -> Result<(), TreeError> {
        if self.tree.focus_path().contains(window) {
            self.tree.clear_focus();
        }
        self.tree.remove(window)?;
        self.flush_pending();
        Ok(())
    }

    /// Center `window` on the screen, sizing and laying it out first if it
    /// has no size yet.
    pub fn center_window(&mut self, window: WidgetId) {
        let unsized_window = self.tree.base(window).is_some_and(|b| b.size() == Size::ZERO);
        if unsized_window {
            let preferred = LayoutCtx::new(&self.tree, &self.env).preferred_size(window);
            if let Some(base) = self.tree.base_mut(window) {
                base.set_size(preferred);
            }
            perform_layout(&mut self.tree, &self.env, window);
        }
        let screen = self.size();
        if let Some(base) = self.tree.base_mut(window) {
            let size = base.size();
            base.set_pos(Point::new(
                (screen.width - size.width) / 2,
                (screen.height - size.height) / 2,
            ));
        }
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Lay out the whole tree.
    pub fn perform_layout(&mut self) {
        let root = self.tree.root();
        perform_layout(&mut self.tree, &self.env, root);
    }

    /// Run the per-frame refresh hooks of every visible widget.
    fn refresh_all(&mut self) {
        let root = self.tree.root();
        for id in self.tree.subtree(root) {
            if !self.tree.base(id).is_some_and(|b| b.is_visible()) {
                continue;
            }
            let Some(mut widget) = self.tree.take_widget(id) else {
                continue;
            };
            widget.refresh(&mut EventCtx::new(&mut self.tree, &mut self.env, id));
            self.tree.restore_widget(id, widget);
            refresh_relative_placement(&mut self.tree, id);
        }
        self.flush_pending();
    }

    /// Draw one frame: pending layout, refresh hooks, the tree, then the
    /// tooltip of the widget under an idle pointer.
    pub fn draw_all(&mut self, renderer: &mut dyn Renderer) {
        if !self.visible {
            return;
        }
        let _frame = PerfSpan::new(span_names::FRAME);

        if self.tree.take_layout_request() {
            self.perform_layout();
        }
        self.refresh_all();

        let root = self.tree.root();
        let root_pos = self.tree.base(root).map_or(Point::ZERO, |b| b.pos());
        renderer.save();
        renderer.fill_rect(Rect::from_size(self.size()), self.background);
        renderer.translate(root_pos.x, root_pos.y);
        PaintCtx::new(&self.tree, &self.env, &mut *renderer, root).paint_widget(root);
        renderer.restore();

        self.draw_tooltip(renderer);
    }

    fn draw_tooltip(&self, renderer: &mut dyn Renderer) {
        let elapsed = self.env.now().saturating_duration_since(self.last_interaction);
        if elapsed <= TOOLTIP_DELAY {
            return;
        }
        let Some(widget) = self.tree.find_widget_at(self.root_local(self.mouse_pos)) else {
            return;
        };
        let Some(base) = self.tree.base(widget) else {
            return;
        };
        let tooltip = base.tooltip();
        if tooltip.is_empty() {
            return;
        }

        let theme = &self.env.theme;
        let font = theme.normal_font(TOOLTIP_FONT_SIZE);
        let anchor = self.tree.absolute_position(widget)
            + Point::new(base.width() / 2, base.height() + 10);
        let bounds = renderer.text_box_bounds(&font, TOOLTIP_WIDTH, tooltip);
        let half = bounds.size.width / 2;
        let top_left = Point::new(anchor.x - half, anchor.y);

        let fade = ((elapsed - TOOLTIP_DELAY).as_secs_f32() * 2.0).min(1.0) * 0.8;
        let fill = Color::BLACK.with_alpha(fade);
        let text = Color::WHITE.with_alpha(fade);

        renderer.fill_rounded_rect(
            Rect::new(
                top_left.x - 4,
                top_left.y - 4,
                bounds.size.width + 8,
                bounds.size.height + 8,
            ),
            3.0,
            fill,
        );
        let tip = Point::new(anchor.x, anchor.y - 10);
        renderer.draw_line(tip, Point::new(anchor.x + 7, anchor.y + 1), 1.0, fill);
        renderer.draw_line(tip, Point::new(anchor.x - 7, anchor.y + 1), 1.0, fill);
        renderer.draw_text_box(&font, top_left, TOOLTIP_WIDTH, text, tooltip);
    }
}
