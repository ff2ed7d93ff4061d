//! Tests spanning the tree, the dispatcher and the focus path.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::Point;

use super::context::{EventCtx, LayoutCtx};
use super::dispatcher::send_event;
use super::events::{
    CharEvent, FocusEvent, Key, KeyAction, KeyEvent, KeyboardModifiers, MouseButton,
    MouseButtonEvent, MouseButtons, MouseMotionEvent, WidgetEvent,
};
use super::focus::PendingNotice;
use super::layout::{GroupLayout, GroupLayoutConfig, perform_layout};
use super::testing::headless_tree;
use super::traits::{Panel, Widget};
use super::tree::{WidgetId, WidgetTree};
use super::widgets::{Label, Window};
use crate::error::TreeError;

type Log = Rc<RefCell<Vec<String>>>;

/// Records every event it sees and optionally consumes presses.
struct Recorder {
    name: &'static str,
    log: Log,
    consume_presses: bool,
    owned: Vec<WidgetId>,
}

impl Recorder {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            consume_presses: false,
            owned: Vec::new(),
        }
    }

    fn owning(mut self, owned: Vec<WidgetId>) -> Self {
        self.owned = owned;
        self
    }

    fn consuming(mut self) -> Self {
        self.consume_presses = true;
        self
    }
}

impl Widget for Recorder {
    fn type_name(&self) -> &'static str {
        "Recorder"
    }

    fn event(&mut self, cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
        let entry = match event {
            WidgetEvent::MouseButton(e) => format!("{}:press@{},{}", self.name, e.pos.x, e.pos.y),
            WidgetEvent::MouseMotion(_) => format!("{}:motion", self.name),
            WidgetEvent::MouseEnter(e) => format!("{}:enter={}", self.name, e.entered),
            WidgetEvent::Key(_) => format!("{}:key", self.name),
            WidgetEvent::Char(_) => format!("{}:char", self.name),
            WidgetEvent::Focus(e) => format!("{}:focus={}", self.name, e.focused),
            _ => format!("{}:other", self.name),
        };
        self.log.borrow_mut().push(entry);
        if cx.default_event(event) {
            return true;
        }
        self.consume_presses && matches!(event, WidgetEvent::MouseButton(_))
    }

    fn dependents(&self) -> Vec<WidgetId> {
        self.owned.clone()
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().push(format!("{}:dispose", self.name));
    }
}

fn place(tree: &mut WidgetTree, id: WidgetId, pos: (i32, i32), size: (i32, i32)) {
    let base = tree.base_mut(id).unwrap();
    base.set_pos(pos.into());
    base.set_size(size.into());
}

fn press_at(x: i32, y: i32) -> WidgetEvent {
    WidgetEvent::MouseButton(MouseButtonEvent {
        pos: Point::new(x, y),
        button: MouseButton::Left,
        pressed: true,
        modifiers: KeyboardModifiers::NONE,
    })
}

fn motion(to: (i32, i32), from: (i32, i32)) -> WidgetEvent {
    WidgetEvent::MouseMotion(MouseMotionEvent {
        pos: to.into(),
        rel: Point::new(to.0 - from.0, to.1 - from.1),
        buttons: MouseButtons::NONE,
        modifiers: KeyboardModifiers::NONE,
    })
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

// =========================================================================
// Structure
// =========================================================================

#[test]
fn test_structural_errors() {
    let (mut tree, _env) = headless_tree();
    let root = tree.root();
    let a = tree.insert(root, Panel::new()).unwrap();
    let b = tree.insert(a, Panel::new()).unwrap();

    assert_eq!(tree.remove(root), Err(TreeError::RootRemoval));
    assert_eq!(
        tree.remove_child(root, b),
        Err(TreeError::NotAChild { parent: root, child: b })
    );
    assert_eq!(
        tree.remove_child_at(a, 3),
        Err(TreeError::IndexOutOfRange { parent: a, index: 3, len: 1 })
    );
    assert_eq!(tree.add_child(root, b), Err(TreeError::AlreadyAttached(b)));

    tree.detach(a).unwrap();
    assert_eq!(tree.parent(a), None);
    assert_eq!(
        tree.add_child(b, a),
        Err(TreeError::WouldCreateCycle { parent: b, child: a })
    );
    tree.add_child(root, a).unwrap();
    assert_eq!(tree.children(root), &[a]);
    assert_eq!(tree.child_index(a, b), Some(0));
}

#[test]
fn test_remove_child_at_returns_removed_id() {
    let (mut tree, _env) = headless_tree();
    let root = tree.root();
    let first = tree.insert(root, Panel::new()).unwrap();
    let second = tree.insert(root, Panel::new()).unwrap();

    assert_eq!(tree.remove_child_at(root, 0), Ok(first));
    assert_eq!(tree.children(root), &[second]);
    assert!(!tree.contains_widget(first));
    assert_eq!(tree.remove(first), Err(TreeError::StaleWidget(first)));
}

#[test]
fn test_remove_clears_focus_drag_and_disposes_subtree() {
    let (mut tree, _env) = headless_tree();
    let log = Log::default();
    let root = tree.root();
    let outer = tree.insert(root, Recorder::new("outer", &log)).unwrap();
    let inner = tree.insert(outer, Recorder::new("inner", &log)).unwrap();
    let other = tree.insert(root, Panel::new()).unwrap();

    assert!(tree.request_focus(inner));
    tree.set_drag_target(Some(inner));
    tree.take_pending();

    tree.remove(outer).unwrap();
    assert!(tree.focus_path().is_empty());
    assert_eq!(tree.drag_target(), None);
    assert!(tree.take_pending().is_empty());
    assert_eq!(tree.children(root), &[other]);
    assert_eq!(tree.len(), 2);

    let mut disposed = entries(&log);
    disposed.sort();
    assert_eq!(disposed, ["inner:dispose", "outer:dispose"]);
}

#[test]
fn test_remove_takes_dependents_and_skips_root_or_stale_ids() {
    let (mut tree, _env) = headless_tree();
    let log = Log::default();
    let root = tree.root();
    let overlay = tree.insert(root, Recorder::new("overlay", &log)).unwrap();
    let stale = tree.insert(root, Panel::new()).unwrap();
    tree.remove(stale).unwrap();
    let owner = tree
        .insert(
            root,
            Recorder::new("owner", &log).owning(vec![root, overlay, stale, overlay]),
        )
        .unwrap();

    tree.remove(owner).unwrap();
    assert!(tree.contains_widget(root));
    assert!(!tree.contains_widget(overlay));
    assert!(tree.children(root).is_empty());
    assert_eq!(entries(&log), ["owner:dispose", "overlay:dispose"]);
}

#[test]
fn test_absolute_position_and_effective_visibility() {
    let (mut tree, _env) = headless_tree();
    let root = tree.root();
    let a = tree.insert(root, Panel::new()).unwrap();
    let b = tree.insert(a, Panel::new()).unwrap();
    place(&mut tree, a, (10, 20), (100, 100));
    place(&mut tree, b, (5, 7), (10, 10));

    assert_eq!(tree.absolute_position(b), Point::new(15, 27));
    assert!(tree.visible_recursive(b));
    tree.base_mut(a).unwrap().set_visible(false);
    assert!(!tree.visible_recursive(b));
    assert!(tree.base(b).unwrap().is_visible());
}

// =========================================================================
// Hit testing
// =========================================================================

#[test]
fn test_hit_testing_prefers_topmost_and_is_idempotent() {
    let (mut tree, _env) = headless_tree();
    let root = tree.root();
    place(&mut tree, root, (0, 0), (200, 200));
    let bottom = tree.insert(root, Panel::new()).unwrap();
    let top = tree.insert(root, Panel::new()).unwrap();
    place(&mut tree, bottom, (0, 0), (100, 100));
    place(&mut tree, top, (50, 50), (100, 100));

    let point = Point::new(60, 60);
    assert_eq!(tree.find_widget_at(point), Some(top));
    assert_eq!(tree.find_widget_at(point), Some(top));

    // Boundaries are inclusive.
    assert_eq!(tree.find_widget_at(Point::new(150, 150)), Some(top));
    assert_eq!(tree.find_widget_at(Point::new(151, 151)), Some(root));

    tree.base_mut(top).unwrap().set_visible(false);
    assert_eq!(tree.find_widget_at(point), Some(bottom));
    assert_eq!(tree.find_widget_at(Point::new(300, 10)), None);
}

#[test]
fn test_find_widget_recurses_in_local_coordinates() {
    let (mut tree, _env) = headless_tree();
    let root = tree.root();
    place(&mut tree, root, (0, 0), (400, 400));
    let panel = tree.insert(root, Panel::new()).unwrap();
    let leaf = tree.insert(panel, Panel::new()).unwrap();
    place(&mut tree, panel, (100, 100), (200, 200));
    place(&mut tree, leaf, (10, 10), (20, 20));

    assert_eq!(tree.find_widget(panel, Point::new(15, 15)), Some(leaf));
    assert_eq!(tree.find_widget_at(Point::new(115, 115)), Some(leaf));
    assert_eq!(tree.find_widget_at(Point::new(150, 150)), Some(panel));
}

// =========================================================================
// Dispatch
// =========================================================================

#[test]
fn test_press_goes_to_topmost_consumer_only() {
    let (mut tree, mut env) = headless_tree();
    let log = Log::default();
    let root = tree.root();
    place(&mut tree, root, (0, 0), (200, 200));
    let bottom = tree.insert(root, Recorder::new("bottom", &log)).unwrap();
    let top = tree.insert(root, Recorder::new("top", &log).consuming()).unwrap();
    place(&mut tree, bottom, (0, 0), (100, 100));
    place(&mut tree, top, (50, 50), (100, 100));

    assert!(send_event(&mut tree, &mut env, root, &press_at(60, 70)));
    assert_eq!(entries(&log), ["top:press@10,20"]);
}

#[test]
fn test_unconsumed_press_falls_through_and_requests_focus() {
    let (mut tree, mut env) = headless_tree();
    let log = Log::default();
    let root = tree.root();
    place(&mut tree, root, (0, 0), (200, 200));
    tree.base_mut(root).unwrap().set_focusable(false);
    let bottom = tree.insert(root, Recorder::new("bottom", &log)).unwrap();
    let top = tree.insert(root, Recorder::new("top", &log)).unwrap();
    place(&mut tree, bottom, (0, 0), (100, 100));
    place(&mut tree, top, (50, 50), (100, 100));

    assert!(!send_event(&mut tree, &mut env, root, &press_at(60, 70)));
    assert_eq!(entries(&log), ["top:press@10,20", "bottom:press@60,70"]);
    // Each unconsumed handler asks for focus in turn; the last one wins.
    assert_eq!(tree.focused_widget(), Some(bottom));
    assert!(!tree.base(top).unwrap().is_focused());
}

#[test]
fn test_disabled_child_is_skipped_for_presses() {
    let (mut tree, mut env) = headless_tree();
    let log = Log::default();
    let root = tree.root();
    place(&mut tree, root, (0, 0), (200, 200));
    let child = tree.insert(root, Recorder::new("child", &log).consuming()).unwrap();
    place(&mut tree, child, (0, 0), (100, 100));
    tree.base_mut(child).unwrap().set_enabled(false);

    assert!(!send_event(&mut tree, &mut env, root, &press_at(10, 10)));
    assert!(entries(&log).is_empty());
}

#[test]
fn test_motion_fires_enter_and_leave() {
    let (mut tree, mut env) = headless_tree();
    let log = Log::default();
    let root = tree.root();
    place(&mut tree, root, (0, 0), (200, 200));
    let child = tree.insert(root, Recorder::new("child", &log)).unwrap();
    place(&mut tree, child, (50, 50), (50, 50));

    send_event(&mut tree, &mut env, root, &motion((60, 60), (10, 10)));
    assert!(tree.base(child).unwrap().is_hovered());
    send_event(&mut tree, &mut env, root, &motion((150, 150), (60, 60)));
    assert!(!tree.base(child).unwrap().is_hovered());

    assert_eq!(
        entries(&log),
        [
            "child:enter=true",
            "child:motion",
            "child:enter=false",
            "child:motion",
        ]
    );
}

#[test]
fn test_keyboard_events_are_not_walked() {
    let (mut tree, mut env) = headless_tree();
    let log = Log::default();
    let root = tree.root();
    place(&mut tree, root, (0, 0), (200, 200));
    let child = tree.insert(root, Recorder::new("child", &log)).unwrap();
    place(&mut tree, child, (0, 0), (200, 200));

    let key = WidgetEvent::Key(KeyEvent {
        key: Key::Character('a'),
        scancode: 0,
        action: KeyAction::Press,
        modifiers: KeyboardModifiers::NONE,
    });
    assert!(!send_event(&mut tree, &mut env, root, &key));
    assert!(!send_event(&mut tree, &mut env, root, &WidgetEvent::Char(CharEvent { ch: 'a' })));
    assert!(entries(&log).is_empty());
}

#[test]
fn test_event_for_removed_widget_is_dropped() {
    let (mut tree, mut env) = headless_tree();
    let log = Log::default();
    let root = tree.root();
    let child = tree.insert(root, Recorder::new("child", &log).consuming()).unwrap();
    place(&mut tree, child, (0, 0), (10, 10));
    tree.remove(child).unwrap();
    log.borrow_mut().clear();

    assert!(!send_event(&mut tree, &mut env, child, &press_at(1, 1)));
    assert!(entries(&log).is_empty());
}

// =========================================================================
// Focus
// =========================================================================

#[test]
fn test_focus_path_is_the_ancestor_chain() {
    let (mut tree, _env) = headless_tree();
    let root = tree.root();
    let window = tree.insert(root, Panel::new()).unwrap();
    let left = tree.insert(window, Panel::new()).unwrap();
    let left_leaf = tree.insert(left, Panel::new()).unwrap();
    let right = tree.insert(window, Panel::new()).unwrap();

    assert!(tree.request_focus(left_leaf));
    assert_eq!(tree.focus_path().as_slice(), &[left_leaf, left, window]);
    assert_eq!(tree.focus_path().top(), Some(window));
    for id in [left_leaf, left, window] {
        assert!(tree.base(id).unwrap().is_focused());
    }
    assert!(!tree.base(root).unwrap().is_focused());

    assert!(tree.request_focus(right));
    assert_eq!(tree.focus_path().as_slice(), &[right, window]);
    assert!(!tree.base(left_leaf).unwrap().is_focused());
    assert!(!tree.base(left).unwrap().is_focused());
    assert!(tree.base(window).unwrap().is_focused());
    assert!(tree.base(right).unwrap().is_focused());
}

#[test]
fn test_focus_notices_cover_only_the_delta() {
    let (mut tree, _env) = headless_tree();
    let root = tree.root();
    let window = tree.insert(root, Panel::new()).unwrap();
    let a = tree.insert(window, Panel::new()).unwrap();
    let b = tree.insert(window, Panel::new()).unwrap();

    tree.request_focus(a);
    tree.take_pending();
    tree.request_focus(b);
    assert_eq!(
        tree.take_pending(),
        vec![
            PendingNotice::Focus { widget: a, focused: false },
            PendingNotice::Focus { widget: b, focused: true },
            PendingNotice::Raise { widget: b },
        ]
    );
}

#[test]
fn test_focus_on_detached_widget_is_ignored() {
    let (mut tree, _env) = headless_tree();
    let root = tree.root();
    let a = tree.insert(root, Panel::new()).unwrap();
    let b = tree.insert(a, Panel::new()).unwrap();
    tree.request_focus(a);
    tree.detach(a).unwrap();
    assert!(tree.focus_path().is_empty());

    assert!(!tree.request_focus(b));
    assert!(tree.focus_path().is_empty());

    tree.add_child(root, a).unwrap();
    assert!(tree.request_focus(b));
    assert!(tree.request_focus(root));
    assert!(tree.focus_path().is_empty());
}

#[test]
fn test_focus_events_delivered_through_dispatch() {
    let (mut tree, mut env) = headless_tree();
    let log = Log::default();
    let root = tree.root();
    let child = tree.insert(root, Recorder::new("child", &log)).unwrap();
    tree.request_focus(child);
    for notice in tree.take_pending() {
        if let PendingNotice::Focus { widget, focused } = notice {
            let event = WidgetEvent::Focus(FocusEvent { focused });
            send_event(&mut tree, &mut env, widget, &event);
        }
    }
    assert_eq!(entries(&log), ["child:focus=true"]);
}

// =========================================================================
// Checkout
// =========================================================================

#[test]
fn test_header_and_headings_survive_behaviour_checkout() {
    let (mut tree, env) = headless_tree();
    let root = tree.root();
    let window = tree.insert(root, Window::new("Options")).unwrap();
    tree.set_layout(
        window,
        GroupLayout::new(GroupLayoutConfig::default().with_margin(10)),
    )
    .unwrap();
    let heading = tree.insert(window, Label::new("General")).unwrap();
    let field = tree.insert(window, Panel::new()).unwrap();
    place(&mut tree, field, (0, 0), (40, 20));
    tree.base_mut(window).unwrap().set_size((200, 120).into());

    perform_layout(&mut tree, &env, window);
    let field_placement = |tree: &WidgetTree| {
        LayoutCtx::new(tree, &env)
            .arrange(window)
            .into_iter()
            .find(|p| p.widget == field)
            .unwrap()
            .rect
    };
    let before = field_placement(&tree);
    assert_eq!(before.origin.x, 10 + 20);
    assert!(before.origin.y > 30);

    let window_behaviour = tree.take_widget(window).unwrap();
    let label_behaviour = tree.take_widget(heading).unwrap();
    assert_eq!(tree.window_title(window), Some("Options"));
    assert_eq!(tree.label_caption(heading), Some("General"));
    assert_eq!(field_placement(&tree), before);
    tree.restore_widget(heading, label_behaviour);
    tree.restore_widget(window, window_behaviour);

    // Edits made while checked in are read live; checkin refreshes the copy.
    tree.downcast_mut::<Window>(window).unwrap().set_title("");
    assert_eq!(tree.window_title(window), None);
    let window_behaviour = tree.take_widget(window).unwrap();
    assert_eq!(tree.window_title(window), Some("Options"));
    tree.restore_widget(window, window_behaviour);
    assert_eq!(tree.window_title(window), None);
    let window_behaviour = tree.take_widget(window).unwrap();
    assert_eq!(tree.window_title(window), None);
    tree.restore_widget(window, window_behaviour);
}
