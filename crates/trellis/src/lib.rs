//! Trellis - a retained-mode widget toolkit.
//!
//! Trellis keeps a tree of widgets, lays it out with pluggable layout
//! strategies, routes pointer, keyboard and IME input through it and paints
//! it through a backend-neutral [`Renderer`](trellis_render::Renderer).
//! Windowing and GPU work stay in the host: it feeds raw input into a
//! [`Screen`] and calls [`Screen::draw_all`] once per frame.
//!
//! # Example
//!
//! ```ignore
//! use trellis::prelude::*;
//!
//! let mut screen = Screen::new(Size::new(800, 600), "Demo");
//! let root = screen.root();
//! let window = screen.tree_mut().insert(root, Window::new("Hello"))?;
//! screen.tree_mut().set_layout(
//!     window,
//!     GroupLayout::new(GroupLayoutConfig::default()),
//! )?;
//! screen.tree_mut().insert(window, Button::new("Press me").on_click(|| println!("pressed")))?;
//! screen.perform_layout();
//! screen.center_window(window);
//! ```
//!
//! # Crates
//!
//! - [`trellis_core`]: geometry, errors, logging targets, refresh ticker
//! - [`trellis_render`]: colors, fonts, text metrics and the renderer trait
//! - this crate: the widget tree, layouts, dispatch, screens and widgets

pub use trellis_core as core;
pub use trellis_render as render;

pub mod application;
pub mod clipboard;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod screen;
pub mod widget;

pub use application::{Application, ScreenId};
pub use error::{Error, Result, TreeError};
pub use screen::{Screen, ScreenRoot};
pub use trellis_core::{Axis, LayoutError, Orientation, Point, Rect, Size};
