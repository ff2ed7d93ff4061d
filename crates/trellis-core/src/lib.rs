//! Core primitives for Trellis.
//!
//! This crate holds the pieces every other Trellis crate builds on:
//!
//! - [`geometry`]: integer points, sizes, rectangles and layout axes
//! - [`error`]: the configuration error taxonomy
//! - [`logging`]: tracing targets, span names and a timing guard
//! - [`ticker`]: the background thread that wakes the host event loop

pub mod error;
pub mod geometry;
pub mod logging;
pub mod ticker;

pub use error::{Error, LayoutError, Result, TickerError};
pub use geometry::{Axis, Orientation, Point, Rect, Size};
pub use logging::PerfSpan;
pub use ticker::{DEFAULT_REFRESH_INTERVAL, RefreshTicker, Tick};
