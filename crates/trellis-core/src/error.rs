//! Error types for Trellis.

use crate::geometry::Axis;

/// A layout configuration error.
///
/// These describe programmer mistakes in how a layout was set up. A layout
/// pass that runs into one cannot produce meaningful geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// An anchor region extends past the configured tracks.
    #[error("anchor {anchor} is out of bounds: {tracks} tracks on the {axis:?} axis")]
    AnchorOutOfBounds {
        anchor: String,
        axis: Axis,
        tracks: usize,
    },
    /// An anchor needs more room than its tracks have, and none of them stretch.
    #[error("no space to place widget at anchor {anchor}: needs {required}, tracks provide {available} with zero stretch")]
    NoSpaceToPlace {
        anchor: String,
        required: i32,
        available: i32,
    },
    /// A child of an anchor-grid container was never given an anchor.
    #[error("child {widget} has no anchor in the advanced grid layout")]
    MissingAnchor { widget: String },
    /// Track sizes and stretch factors disagree in length.
    #[error("{axis:?} axis has {sizes} track sizes but {stretches} stretch factors")]
    TrackCountMismatch {
        axis: Axis,
        sizes: usize,
        stretches: usize,
    },
}

/// Errors from the background refresh ticker.
#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    /// The ticker thread could not be started.
    #[error("failed to spawn refresh ticker thread: {0}")]
    Spawn(#[from] std::io::Error),
    /// The ticker thread panicked before it could be joined.
    #[error("refresh ticker thread panicked")]
    Panicked,
}

/// The main error type for Trellis core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Layout configuration error.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    /// Refresh ticker error.
    #[error("ticker error: {0}")]
    Ticker(#[from] TickerError),
}

/// A specialized Result type for Trellis core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_messages() {
        let err = LayoutError::NoSpaceToPlace {
            anchor: "(1, 0, 2, 1)".into(),
            required: 120,
            available: 80,
        };
        assert!(err.to_string().starts_with("no space to place widget"));

        let wrapped: Error = err.into();
        assert!(wrapped.to_string().starts_with("layout error:"));
    }
}
