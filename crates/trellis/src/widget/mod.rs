//! Widget system for Trellis.
//!
//! This module provides the retained widget tree and everything that works on
//! it:
//!
//! - [`WidgetTree`]: the arena holding every widget of a screen
//! - [`WidgetBase`]: generic node attributes (geometry, flags, font size)
//! - [`Widget`] trait: kind-specific behaviour (measure, arrange, events, paint)
//! - [`layout`]: the layout strategies a container can own
//! - [`widgets`]: windows, popups, buttons, labels, text boxes, spinners
//!
//! # Overview
//!
//! Each node of the tree has a [`WidgetBase`], a parent, ordered children, an
//! optional layout and a boxed behaviour. The tree owns the nodes; widgets
//! refer to each other by [`WidgetId`], so a removed widget's id simply stops
//! resolving.
//!
//! ```ignore
//! use trellis::widget::{Panel, WidgetTree};
//! use trellis::widget::widgets::{Button, Window};
//!
//! let mut tree = WidgetTree::new(Panel::new());
//! let window = tree.insert(tree.root(), Window::new("Demo"))?;
//! let ok = tree.insert(window, Button::new("OK").on_click(|| println!("ok")))?;
//! ```
//!
//! # Coordinate Systems
//!
//! A widget's position is relative to its parent. Events are delivered in the
//! receiver's own coordinates; [`WidgetTree::absolute_position`] converts to
//! root coordinates.
//!
//! # Focus
//!
//! The focus path runs from the focused leaf up to the root's direct child.
//! Keyboard, text and IME input travel along it, innermost first.

mod base;
mod context;
pub mod cursor;
mod dispatcher;
pub mod edit;
mod events;
mod focus;
pub mod layout;
mod theme;
mod traits;
mod tree;
pub mod widgets;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use base::WidgetBase;
pub use context::{Clock, Environment, EventCtx, LayoutCtx, PaintCtx, Placement};
pub use cursor::CursorShape;
pub use dispatcher::{default_event, send_event};
pub use edit::EditAction;
pub use events::{
    CharEvent, FocusEvent, ImePreeditEvent, Key, KeyAction, KeyEvent, KeyboardModifiers,
    MouseButton, MouseButtonEvent, MouseButtons, MouseEnterEvent, MouseMotionEvent, ScrollEvent,
    WidgetEvent,
};
pub use focus::FocusPath;
pub(crate) use focus::PendingNotice;
pub use layout::{Layout, LayoutKind, perform_layout};
pub use theme::Theme;
pub use traits::{AsAny, LayoutRole, Panel, Widget};
pub use tree::{WidgetId, WidgetTree};
