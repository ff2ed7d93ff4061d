//! Event delivery and default propagation.
//!
//! [`send_event`] hands an event to one widget's behaviour. The default
//! behaviour ([`default_event`]) walks pointer events down the tree:
//!
//! - button presses/releases and scrolls go to the topmost visible, enabled
//!   child containing the pointer, depth first; the first handler that
//!   returns `true` stops the walk;
//! - an unconsumed primary press requests focus for the innermost focusable
//!   widget it reached;
//! - motion is offered to every child the pointer is in or just left, with
//!   enter/leave events fired when containment changes.
//!
//! Keyboard, text and IME events are not walked here; the screen sends them
//! along the focus path.

use trellis_core::logging::targets;

use super::context::{Environment, EventCtx};
use super::events::{
    MouseButton, MouseButtonEvent, MouseEnterEvent, MouseMotionEvent, ScrollEvent, WidgetEvent,
};
use super::tree::{WidgetId, WidgetTree};

/// Deliver `event` to `target`; returns whether it was consumed.
///
/// Positions in `event` must be in `target`'s own coordinates. Events for
/// removed widgets are dropped. If the target's behaviour is already
/// checked out (re-entrant delivery), the default handling runs instead.
pub fn send_event(
    tree: &mut WidgetTree,
    env: &mut Environment,
    target: WidgetId,
    event: &WidgetEvent,
) -> bool {
    if !tree.contains_widget(target) {
        tracing::trace!(target: targets::DISPATCH, ?target, "event for removed widget dropped");
        return false;
    }
    match tree.take_widget(target) {
        Some(mut widget) => {
            let handled = {
                let mut cx = EventCtx::new(tree, env, target);
                widget.event(&mut cx, event)
            };
            tree.restore_widget(target, widget);
            handled
        }
        None => {
            let mut cx = EventCtx::new(tree, env, target);
            default_event(&mut cx, event)
        }
    }
}

/// Default handling of `event` for the widget owning `cx`.
pub fn default_event(cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
    match event {
        WidgetEvent::MouseButton(e) => default_mouse_button(cx, e),
        WidgetEvent::MouseMotion(e) => default_mouse_motion(cx, e),
        WidgetEvent::MouseEnter(e) => {
            set_hovered(cx, e);
            false
        }
        WidgetEvent::Scroll(e) => default_scroll(cx, e),
        // Flags are maintained by the tree; the event is only a notification.
        WidgetEvent::Focus(_) => false,
        WidgetEvent::MouseDrag(_)
        | WidgetEvent::Key(_)
        | WidgetEvent::Char(_)
        | WidgetEvent::ImePreedit(_)
        | WidgetEvent::ImeStatus => false,
    }
}

fn set_hovered(cx: &mut EventCtx<'_>, e: &MouseEnterEvent) {
    if let Some(base) = cx.base_mut() {
        base.set_hovered(e.entered);
    }
}

/// Children of the current widget, topmost first, that are visible and
/// contain `pos` (in the current widget's coordinates).
fn hit_children(cx: &EventCtx<'_>, pos: trellis_core::Point, need_enabled: bool) -> Vec<WidgetId> {
    let tree = cx.tree();
    tree.children(cx.id())
        .iter()
        .rev()
        .copied()
        .filter(|&child| {
            tree.base(child).is_some_and(|b| {
                b.is_visible() && (!need_enabled || b.is_enabled()) && b.contains(pos)
            })
        })
        .collect()
}

fn default_mouse_button(cx: &mut EventCtx<'_>, e: &MouseButtonEvent) -> bool {
    for child in hit_children(cx, e.pos, true) {
        // The child may have moved or vanished during an earlier delivery.
        let Some(child_pos) = cx.tree().base(child).map(|b| b.pos()) else {
            continue;
        };
        let event = WidgetEvent::MouseButton(MouseButtonEvent {
            pos: e.pos - child_pos,
            ..*e
        });
        if cx.send(child, &event) {
            return true;
        }
    }

    if e.button == MouseButton::Left && e.pressed {
        let wants_focus = cx
            .base()
            .is_some_and(|b| b.is_focusable() && !b.is_focused());
        if wants_focus {
            cx.request_focus();
        }
    }
    false
}

fn default_mouse_motion(cx: &mut EventCtx<'_>, e: &MouseMotionEvent) -> bool {
    let children: Vec<WidgetId> = cx.tree().children(cx.id()).iter().rev().copied().collect();
    for child in children {
        let Some(base) = cx.tree().base(child) else {
            continue;
        };
        if !base.is_visible() {
            continue;
        }
        let contained = base.contains(e.pos);
        let prev_contained = base.contains(e.pos - e.rel);
        let child_pos = base.pos();

        if contained != prev_contained {
            let enter = WidgetEvent::MouseEnter(MouseEnterEvent {
                pos: e.pos - child_pos,
                entered: contained,
            });
            cx.send(child, &enter);
        }
        if contained || prev_contained {
            let motion = WidgetEvent::MouseMotion(MouseMotionEvent {
                pos: e.pos - child_pos,
                ..*e
            });
            if cx.send(child, &motion) {
                return true;
            }
        }
    }
    false
}

fn default_scroll(cx: &mut EventCtx<'_>, e: &ScrollEvent) -> bool {
    for child in hit_children(cx, e.pos, false) {
        let Some(child_pos) = cx.tree().base(child).map(|b| b.pos()) else {
            continue;
        };
        let event = WidgetEvent::Scroll(ScrollEvent {
            pos: e.pos - child_pos,
            ..*e
        });
        if cx.send(child, &event) {
            return true;
        }
    }
    false
}
