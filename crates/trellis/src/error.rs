//! Error types for widget tree operations.

use crate::widget::WidgetId;

/// Errors from structural operations on a [`WidgetTree`](crate::widget::WidgetTree).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The widget id does not name a live widget.
    #[error("widget {0:?} does not exist (removed or never created)")]
    StaleWidget(WidgetId),
    /// The widget is not a child of the given parent.
    #[error("widget {child:?} is not a child of {parent:?}")]
    NotAChild { parent: WidgetId, child: WidgetId },
    /// The root widget cannot be removed or reparented.
    #[error("the root widget cannot be removed or reparented")]
    RootRemoval,
    /// Attaching would make a widget its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle { parent: WidgetId, child: WidgetId },
    /// The widget already has a parent; detach it first.
    #[error("widget {0:?} is already attached to a parent")]
    AlreadyAttached(WidgetId),
    /// A child index was past the end of the children list.
    #[error("child index {index} out of range for {parent:?} with {len} children")]
    IndexOutOfRange {
        parent: WidgetId,
        index: usize,
        len: usize,
    },
}

/// Any error produced by Trellis.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] trellis_core::Error),
    #[error(transparent)]
    Layout(#[from] trellis_core::LayoutError),
    #[error("widget tree error: {0}")]
    Tree(#[from] TreeError),
    #[error("clipboard error: {0}")]
    Clipboard(String),
}

/// A specialized Result type for Trellis operations.
pub type Result<T> = std::result::Result<T, Error>;
