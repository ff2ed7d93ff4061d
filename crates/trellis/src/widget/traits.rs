//! The widget behaviour trait.
//!
//! A widget in Trellis is split in two: the generic node data
//! ([`WidgetBase`](super::WidgetBase), parent, children, layout) lives in the
//! [`WidgetTree`](super::WidgetTree) arena, and the kind-specific behaviour
//! lives in a boxed [`Widget`] stored in the same node.
//!
//! The trait groups four capabilities:
//!
//! - **Measurable**: [`preferred_size`](Widget::preferred_size)
//! - **Arrangeable**: [`arrange`](Widget::arrange),
//!   [`after_layout`](Widget::after_layout),
//!   [`set_column_width`](Widget::set_column_width)
//! - **Event target**: [`event`](Widget::event)
//! - **Drawable**: [`refresh`](Widget::refresh), [`paint`](Widget::paint)
//!
//! Every method has a default that gives plain-container behaviour, so a
//! custom widget only overrides what it changes and calls back into the
//! default (`cx.default_event(..)`, `cx.default_preferred_size(..)`) where it
//! extends rather than replaces.
//!
//! # Example
//!
//! ```ignore
//! struct ClickCounter { clicks: u32 }
//!
//! impl Widget for ClickCounter {
//!     fn type_name(&self) -> &'static str { "ClickCounter" }
//!
//!     fn event(&mut self, cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
//!         if let WidgetEvent::MouseButton(e) = event {
//!             if e.pressed {
//!                 self.clicks += 1;
//!                 return true;
//!             }
//!         }
//!         cx.default_event(event)
//!     }
//! }
//! ```

use std::any::Any;

use trellis_core::Size;

use super::context::{EventCtx, LayoutCtx, PaintCtx, Placement};
use super::events::WidgetEvent;
use super::tree::{WidgetId, WidgetTree};

/// Upcast to [`Any`] so behaviours can be downcast to their concrete type.
///
/// Implemented for every `'static` type; widget authors never implement it.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// How layouts treat a widget apart from its size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LayoutRole {
    #[default]
    Plain,
    /// A window; a non-empty title reserves the header.
    Window { title: String },
    /// A label; group layouts treat it as a section heading.
    Label { caption: String },
}

/// Behaviour of a widget kind.
pub trait Widget: AsAny {
    /// Short type name used in debug output.
    fn type_name(&self) -> &'static str {
        "Widget"
    }

    /// Called once, right after the node has been inserted under its parent.
    ///
    /// Widgets that own overlay widgets (popups, spinner filters) create them
    /// here. The behaviour is not yet stored in the node while this runs.
    fn attached(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    // =========================================================================
    // Measurable
    // =========================================================================

    /// Size needed to show this widget's content.
    ///
    /// The default asks the node's layout, or keeps the current size when
    /// there is none.
    fn preferred_size(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Size {
        cx.default_preferred_size(id)
    }

    /// Preferred size when laid out in a table column `column_width` wide.
    ///
    /// Only text that wraps needs to override this.
    fn preferred_size_in_column(&self, cx: &LayoutCtx<'_>, id: WidgetId, _column_width: i32) -> Size {
        self.preferred_size(cx, id)
    }

    // =========================================================================
    // Arrangeable
    // =========================================================================

    /// Compute the geometry of this widget's children.
    ///
    /// Called with the widget's own size already final. The layout pass
    /// applies the returned placements and then recurses into each placed
    /// child.
    fn arrange(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Vec<Placement> {
        cx.default_arrange(id)
    }

    /// Called after this widget's children were placed, before they are
    /// arranged in turn. Use it to position widgets outside the subtree.
    fn after_layout(&mut self, _tree: &mut WidgetTree, _id: WidgetId) {}

    /// Receive the column width assigned by a table-like layout.
    fn set_column_width(&mut self, _width: i32) {}

    // =========================================================================
    // Event target
    // =========================================================================

    /// Handle an event; return `true` if it was consumed.
    ///
    /// The default propagates pointer events to children and requests focus
    /// on an unconsumed primary press. See `EventCtx::default_event`.
    fn event(&mut self, cx: &mut EventCtx<'_>, event: &WidgetEvent) -> bool {
        cx.default_event(event)
    }

    // =========================================================================
    // Drawable
    // =========================================================================

    /// Per-frame update before painting (animation state, relative placement).
    fn refresh(&mut self, _cx: &mut EventCtx<'_>) {}

    /// Paint this widget. The renderer origin is at the widget's top-left.
    ///
    /// The default paints the visible children.
    fn paint(&self, cx: &mut PaintCtx<'_>) {
        cx.paint_children();
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// What layouts need to know about this widget besides its size.
    ///
    /// The tree keeps a copy, so layouts run while the behaviour is checked
    /// out still see it.
    fn layout_role(&self) -> LayoutRole {
        LayoutRole::Plain
    }

    /// Widgets outside this subtree that must be removed together with it.
    fn dependents(&self) -> Vec<WidgetId> {
        Vec::new()
    }

    /// Called when the widget is removed from the tree.
    fn dispose(&mut self) {}
}

/// Behaviour of a plain container with no kind-specific state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Panel;

impl Panel {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Panel {
    fn type_name(&self) -> &'static str {
        "Panel"
    }
}
