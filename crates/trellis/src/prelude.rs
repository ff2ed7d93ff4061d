//! Commonly used types, for glob import:
//!
//! ```ignore
//! use trellis::prelude::*;
//! ```

// ============================================================================
// Application and screens
// ============================================================================

pub use crate::application::{Application, ScreenId};
pub use crate::screen::Screen;

// ============================================================================
// Geometry and rendering
// ============================================================================

pub use trellis_core::{Orientation, Point, Rect, Size};
pub use trellis_render::{Color, Font, Renderer, TextAlign};

// ============================================================================
// Widget foundation
// ============================================================================

pub use crate::widget::{
    CursorShape, Environment, EventCtx, Key, KeyAction, KeyboardModifiers, LayoutCtx, MouseButton,
    PaintCtx, Panel, Theme, Widget, WidgetBase, WidgetEvent, WidgetId, WidgetTree,
};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widget::widgets::{
    Button, ButtonFlags, Label, Popup, PopupButton, Spinner, TextBox, VScrollPanel, Window,
};

// ============================================================================
// Layouts
// ============================================================================

pub use crate::widget::layout::{
    Alignment, AdvancedGridConfig, AdvancedGridLayout, Anchor, BoxLayout, BoxLayoutConfig,
    ExpandBoxConfig, ExpandBoxLayout, ExpandListConfig, ExpandListLayout, GridLayout,
    GridLayoutConfig, GroupLayout, GroupLayoutConfig,
};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{Error, TreeError};
