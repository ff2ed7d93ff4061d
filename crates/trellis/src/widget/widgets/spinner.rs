//! Busy indicator overlay.
//!
//! A [`Spinner`] is an invisible marker placed inside the widget it should
//! cover. On insertion it creates a [`SpinnerFilter`] at the top level (next
//! to the enclosing window). While active the filter covers the spinner's
//! parent, dims it, draws a rotating ring of lines and swallows every input
//! event, so the covered widgets cannot be used.
//!
//! Activation fades the dimming in over one second before the ring appears;
//! deactivation fades it out over one second.
//!
//! ```ignore
//! let spinner = tree.insert(window, Spinner::new())?;
//! spinner::set_active(&mut tree, &env, spinner, true)?;
//! ```

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use trellis_core::logging::targets;
use trellis_core::{Point, Rect, Size};
use trellis_render::Color;

use crate::error::TreeError;
use crate::widget::context::{Environment, EventCtx, LayoutCtx, PaintCtx};
use crate::widget::events::WidgetEvent;
use crate::widget::traits::Widget;
use crate::widget::tree::{WidgetId, WidgetTree};

/// Length of the fade in either direction.
const FADE: Duration = Duration::from_secs(1);

/// Dimming alpha when fully faded in.
const DIM_ALPHA: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerState {
    #[default]
    Stopped,
    FadingIn,
    FadingOut,
}

/// Marker widget owning a [`SpinnerFilter`].
#[derive(Debug, Default)]
pub struct Spinner {
    filter: Option<WidgetId>,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The overlay; `None` until the spinner is inserted.
    pub fn filter(&self) -> Option<WidgetId> {
        self.filter
    }
}

/// The overlay drawn and hit-tested in place of the covered widget.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinnerFilter {
    host: Option<WidgetId>,
    state: SpinnerState,
    start: Option<Instant>,
    inner_radius: f32,
    outer_radius: f32,
    line_count: usize,
    speed: f32,
    line_width: f32,
}

impl SpinnerFilter {
    /// A stopped filter covering `host`.
    pub fn new(host: Option<WidgetId>) -> Self {
        Self {
            host,
            state: SpinnerState::Stopped,
            start: None,
            inner_radius: 18.0,
            outer_radius: 24.0,
            line_count: 25,
            speed: 1.0,
            line_width: 3.0,
        }
    }

    pub fn host(&self) -> Option<WidgetId> {
        self.host
    }

    pub fn state(&self) -> SpinnerState {
        self.state
    }

    fn elapsed(&self, now: Instant) -> Duration {
        self.start
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start))
    }

    /// Fading in, or fading out for less than a second.
    pub fn is_active(&self, now: Instant) -> bool {
        match self.state {
            SpinnerState::FadingIn => true,
            SpinnerState::FadingOut => self.elapsed(now) < FADE,
            SpinnerState::Stopped => false,
        }
    }

    /// Inner and outer radius of the ring.
    pub fn radius(&self) -> (f32, f32) {
        (self.inner_radius, self.outer_radius)
    }

    pub fn set_radius(&mut self, inner: f32, outer: f32) {
        self.inner_radius = inner;
        self.outer_radius = outer;
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn set_line_count(&mut self, count: usize) {
        self.line_count = count;
    }

    /// Revolutions per second.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    /// Current dimming alpha and whether the ring is shown.
    fn fade(&self, now: Instant) -> (f32, bool) {
        let t = self.elapsed(now).as_secs_f32();
        match self.state {
            SpinnerState::FadingIn if t > 1.0 => (DIM_ALPHA, true),
            SpinnerState::FadingIn => (t * DIM_ALPHA, false),
            SpinnerState::FadingOut if t <= 1.0 => ((1.0 - t) * DIM_ALPHA, false),
            _ => (DIM_ALPHA, false),
        }
    }
}

/// Rect covering `host` in the coordinates of `overlay`'s parent; the header
/// of a titled window stays uncovered.
fn cover_rect(tree: &WidgetTree, overlay: WidgetId, host: WidgetId, header_height: i32) -> Option<Rect> {
    let size = tree.base(host)?.size();
    let header = tree.window_title(host).map_or(0, |_| header_height);
    let origin = tree
        .parent(overlay)
        .map_or(Point::ZERO, |p| tree.absolute_position(p));
    let pos = tree.absolute_position(host) - origin + Point::new(0, header);
    Some(Rect::new(pos.x, pos.y, size.width, size.height - header))
}

fn apply_cover(tree: &mut WidgetTree, overlay: WidgetId, host: Option<WidgetId>, header_height: i32) {
    let Some(cover) = host.and_then(|h| cover_rect(tree, overlay, h, header_height)) else {
        return;
    };
    if let Some(base) = tree.base_mut(overlay) {
        base.set_pos(cover.origin);
        base.set_size(cover.size);
    }
}

/// Start or stop the spinner `spinner`.
///
/// Starting raises the overlay above its siblings and focuses it, so neither
/// pointer nor keyboard input reaches the covered widgets. Setting the
/// current state again is a no-op.
///
/// # Errors
///
/// Returns [`TreeError::StaleWidget`] if `spinner` is not a live spinner with
/// an overlay.
pub fn set_active(
    tree: &mut WidgetTree,
    env: &Environment,
    spinner: WidgetId,
    active: bool,
) -> Result<(), TreeError> {
    let now = env.now();
    let filter_id = tree
        .downcast_ref::<Spinner>(spinner)
        .and_then(Spinner::filter)
        .ok_or(TreeError::StaleWidget(spinner))?;
    let filter = tree
        .downcast_mut::<SpinnerFilter>(filter_id)
        .ok_or(TreeError::StaleWidget(filter_id))?;
    if filter.is_active(now) == active {
        return Ok(());
    }
    filter.start = Some(now);
    if active {
        filter.state = SpinnerState::FadingIn;
        let host = filter.host;
        apply_cover(tree, filter_id, host, env.theme.window_header_height);
        if let Some(base) = tree.base_mut(filter_id) {
            base.set_visible(true);
        }
        tree.raise(filter_id)?;
        tree.request_focus(filter_id);
    } else {
        filter.state = SpinnerState::FadingOut;
    }
    tracing::debug!(target: targets::WIDGET, ?spinner, active, "spinner toggled");
    Ok(())
}

/// Whether `spinner` is running (including its fade-out).
pub fn is_active(tree: &WidgetTree, spinner: WidgetId, now: Instant) -> bool {
    tree.downcast_ref::<Spinner>(spinner)
        .and_then(Spinner::filter)
        .and_then(|f| tree.downcast_ref::<SpinnerFilter>(f))
        .is_some_and(|f| f.is_active(now))
}

impl Widget for Spinner {
    fn type_name(&self) -> &'static str {
        "Spinner"
    }

    fn attached(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        if let Some(base) = tree.base_mut(id) {
            base.set_visible(false);
            base.set_focusable(false);
        }
        let host = tree.parent(id);
        let top = tree
            .find_window(id)
            .and_then(|w| tree.parent(w))
            .unwrap_or_else(|| tree.root());
        match tree.insert(top, SpinnerFilter::new(host)) {
            Ok(filter) => {
                if let Some(base) = tree.base_mut(filter) {
                    base.set_visible(false);
                }
                self.filter = Some(filter);
            }
            Err(err) => {
                tracing::warn!(target: targets::TREE, %err, "spinner overlay creation failed");
            }
        }
    }

    fn preferred_size(&self, _cx: &LayoutCtx<'_>, _id: WidgetId) -> Size {
        Size::ZERO
    }

    fn paint(&self, _cx: &mut PaintCtx<'_>) {}

    fn dependents(&self) -> Vec<WidgetId> {
        self.filter.into_iter().collect()
    }
}

impl Widget for SpinnerFilter {
    fn type_name(&self) -> &'static str {
        "SpinnerFilter"
    }

    /// Every input event stops here while the overlay is shown.
    fn event(&mut self, _cx: &mut EventCtx<'_>, _event: &WidgetEvent) -> bool {
        true
    }

    /// Follow the host, or hide once the fade-out has finished.
    fn refresh(&mut self, cx: &mut EventCtx<'_>) {
        let id = cx.id();
        if !self.is_active(cx.now()) {
            self.state = SpinnerState::Stopped;
            if let Some(base) = cx.base_mut() {
                base.set_visible(false);
                base.set_size(Size::ZERO);
            }
            return;
        }
        let header = cx.theme().window_header_height;
        apply_cover(cx.tree_mut(), id, self.host, header);
    }

    fn paint(&self, cx: &mut PaintCtx<'_>) {
        let now = cx.now();
        if !self.is_active(now) {
            return;
        }
        let size = cx.size();
        let (alpha, show_ring) = self.fade(now);
        let renderer = cx.renderer();
        renderer.fill_rect(Rect::from_size(size), Color::mono_f(0.0, alpha));
        if !show_ring || self.line_count == 0 {
            return;
        }

        let center = (size.width as f32 / 2.0, size.height as f32 / 2.0);
        let step = TAU / self.line_count as f32;
        let t = self.elapsed(now).as_secs_f32();
        let mut rotation = TAU * (t * self.speed).fract();
        for i in 0..self.line_count {
            let (sin, cos) = rotation.sin_cos();
            let at = |r: f32| Point::new((center.0 + cos * r) as i32, (center.1 + sin * r) as i32);
            renderer.draw_line(
                at(self.inner_radius),
                at(self.outer_radius),
                self.line_width,
                Color::mono_f(1.0, i as f32 / self.line_count as f32),
            );
            rotation += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::context::Clock;
    use crate::widget::dispatcher::send_event;
    use crate::widget::events::{CharEvent, KeyboardModifiers, MouseButton, MouseButtonEvent};
    use crate::widget::testing::headless_tree;
    use crate::widget::widgets::Window;
    use trellis_render::{DrawCommand, RecordingRenderer};

    fn refresh(tree: &mut WidgetTree, env: &mut Environment, id: WidgetId) {
        let mut widget = tree.take_widget(id).unwrap();
        widget.refresh(&mut EventCtx::new(tree, env, id));
        tree.restore_widget(id, widget);
    }

    fn setup() -> (WidgetTree, Environment, WidgetId, WidgetId, WidgetId) {
        let (mut tree, mut env) = headless_tree();
        env.set_clock(Clock::Manual(Instant::now()));
        let root = tree.root();
        let window = tree.insert(root, Window::new("Busy")).unwrap();
        {
            let base = tree.base_mut(window).unwrap();
            base.set_pos(Point::new(50, 40));
            base.set_size(Size::new(300, 200));
        }
        let spinner = tree.insert(window, Spinner::new()).unwrap();
        let filter = tree.downcast_ref::<Spinner>(spinner).unwrap().filter().unwrap();
        (tree, env, window, spinner, filter)
    }

    #[test]
    fn test_filter_created_hidden_at_top_level() {
        let (tree, _env, window, spinner, filter) = setup();
        assert_eq!(tree.parent(filter), Some(tree.root()));
        assert_eq!(tree.downcast_ref::<SpinnerFilter>(filter).unwrap().host(), Some(window));
        assert!(!tree.base(filter).unwrap().is_visible());
        assert!(!tree.base(spinner).unwrap().is_visible());
    }

    #[test]
    fn test_activation_covers_window_body_and_takes_focus() {
        let (mut tree, env, _window, spinner, filter) = setup();
        set_active(&mut tree, &env, spinner, true).unwrap();

        let base = tree.base(filter).unwrap();
        assert!(base.is_visible());
        assert_eq!(base.pos(), Point::new(50, 70));
        assert_eq!(base.size(), Size::new(300, 170));
        assert_eq!(tree.focused_widget(), Some(filter));
        assert!(is_active(&tree, spinner, env.now()));
    }

    #[test]
    fn test_filter_swallows_input() {
        let (mut tree, mut env, _window, spinner, filter) = setup();
        set_active(&mut tree, &env, spinner, true).unwrap();
        let press = WidgetEvent::MouseButton(MouseButtonEvent {
            pos: Point::new(10, 10),
            button: MouseButton::Right,
            pressed: true,
            modifiers: KeyboardModifiers::NONE,
        });
        assert!(send_event(&mut tree, &mut env, filter, &press));
        assert!(send_event(&mut tree, &mut env, filter, &WidgetEvent::Char(CharEvent { ch: 'q' })));
    }

    #[test]
    fn test_fade_out_lasts_one_second() {
        let (mut tree, mut env, _window, spinner, filter) = setup();
        set_active(&mut tree, &env, spinner, true).unwrap();
        env.advance_clock(Duration::from_secs(3));
        set_active(&mut tree, &env, spinner, false).unwrap();

        env.advance_clock(Duration::from_millis(500));
        assert!(is_active(&tree, spinner, env.now()));
        refresh(&mut tree, &mut env, filter);
        assert!(tree.base(filter).unwrap().is_visible());

        env.advance_clock(Duration::from_millis(600));
        assert!(!is_active(&tree, spinner, env.now()));
        refresh(&mut tree, &mut env, filter);
        assert!(!tree.base(filter).unwrap().is_visible());
        assert_eq!(
            tree.downcast_ref::<SpinnerFilter>(filter).unwrap().state(),
            SpinnerState::Stopped
        );
    }

    #[test]
    fn test_ring_drawn_after_fade_in() {
        let (mut tree, mut env, _window, spinner, filter) = setup();
        set_active(&mut tree, &env, spinner, true).unwrap();

        let lines = |tree: &WidgetTree, env: &Environment| {
            let mut renderer = RecordingRenderer::new();
            PaintCtx::new(tree, env, &mut renderer, filter).paint_widget(filter);
            renderer
                .commands()
                .iter()
                .filter(|c| matches!(c, DrawCommand::Line { .. }))
                .count()
        };
        env.advance_clock(Duration::from_millis(500));
        assert_eq!(lines(&tree, &env), 0);
        env.advance_clock(Duration::from_millis(600));
        assert_eq!(lines(&tree, &env), 25);
    }

    #[test]
    fn test_removing_host_removes_overlay() {
        let (mut tree, _env, window, _spinner, filter) = setup();
        tree.remove(window).unwrap();
        assert!(!tree.contains_widget(filter));
    }

    #[test]
    fn test_set_active_on_other_widget_fails() {
        let (mut tree, env, window, _spinner, _filter) = setup();
        assert_eq!(
            set_active(&mut tree, &env, window, true),
            Err(TreeError::StaleWidget(window))
        );
    }
}
