//! Rendering contract for Trellis.
//!
//! Trellis does not rasterize anything itself. A host supplies a render
//! backend implementing [`Renderer`] (drawing) and [`TextMetrics`]
//! (measurement). Layout only needs the metrics half, which is why the two are
//! separate traits.
//!
//! [`RecordingRenderer`] records draw calls and measures text with
//! [`FixedMetrics`]; it backs headless hosts and the test suites.
//!
//! ```
//! use trellis_render::{Color, Font, RecordingRenderer, Renderer, TextMetrics};
//! use trellis_core::Rect;
//!
//! let mut renderer = RecordingRenderer::new();
//! renderer.save();
//! renderer.translate(200, 100);
//! renderer.fill_rect(Rect::new(0, 0, 80, 80), Color::WHITE);
//! renderer.restore();
//!
//! let bounds = renderer.text_bounds(&Font::new("sans", 16.0), "Hi");
//! assert_eq!(bounds.advance, 16.0);
//! ```

pub mod metrics;
pub mod recording;
pub mod renderer;
pub mod types;

pub use metrics::{FixedMetrics, GlyphPosition, TextBounds, TextMetrics};
pub use recording::{DrawCommand, RecordingRenderer};
pub use renderer::{Renderer, Shadow};
pub use types::{Color, Font, HAlign, TextAlign, VAlign};
