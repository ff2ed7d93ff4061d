//! Layout strategies for automatic widget positioning and sizing.
//!
//! A container owns at most one layout. Every strategy implements the same
//! two-phase contract:
//!
//! 1. **Measure** ([`Layout::preferred_size`]): the size needed to show all
//!    visible children with the configured margins and spacing. Pure; the
//!    tree is not touched.
//! 2. **Arrange** ([`Layout::arrange`]): given the container's final size,
//!    the position and size of every visible child, as [`Placement`]s.
//!
//! [`perform_layout`] drives a whole pass top-down: it applies the placements
//! of a container, then arranges each placed child in turn, so a child is
//! only arranged once its own size is fixed.
//!
//! # Built-in Layouts
//!
//! - [`BoxLayout`]: one row or column with uniform spacing
//! - [`GroupLayout`]: a column of sections headed by labels
//! - [`GridLayout`]: a fixed number of tracks along one axis
//! - [`AdvancedGridLayout`]: explicit tracks with stretch factors and anchors
//! - [`ExpandBoxLayout`]: a row or column whose children share the length
//! - [`ExpandListLayout`]: a table whose columns stretch to the width
//!
//! Invisible children are skipped entirely by every strategy. A container
//! that is a window with a non-empty title reserves its header.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::layout::{Alignment, BoxLayout, BoxLayoutConfig};
//! use trellis_core::Orientation;
//!
//! tree.set_layout(window, BoxLayout::new(
//!     BoxLayoutConfig::new(Orientation::Vertical)
//!         .with_alignment(Alignment::Fill)
//!         .with_margin(15)
//!         .with_spacing(6),
//! ))?;
//! ```

mod advanced_grid;
mod base;
mod box_layout;
mod expand;
mod grid;
mod group;

pub use advanced_grid::{AdvancedGridConfig, AdvancedGridLayout, Anchor};
pub use base::Alignment;
pub use box_layout::{BoxLayout, BoxLayoutConfig};
pub use expand::{ExpandBoxConfig, ExpandBoxLayout, ExpandListConfig, ExpandListLayout, ExpandPolicy};
pub use grid::{GridLayout, GridLayoutConfig};
pub use group::{GroupLayout, GroupLayoutConfig};

use trellis_core::Size;
use trellis_core::logging::{span_names, targets};

use super::context::{Environment, LayoutCtx, Placement};
use super::tree::{WidgetId, WidgetTree};

/// A layout strategy for the children of one container.
pub trait Layout {
    /// Minimum size of `container` that shows all visible children.
    fn preferred_size(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Size;

    /// Geometry of the visible children of `container`, whose own size is final.
    fn arrange(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<Placement>;

    /// Drop any per-widget state kept for `widget` (called when it leaves the container).
    fn forget(&mut self, _widget: WidgetId) {}
}

/// The layout strategies a container can own.
#[derive(Debug, Clone)]
pub enum LayoutKind {
    Box(BoxLayout),
    Group(GroupLayout),
    Grid(GridLayout),
    AdvancedGrid(AdvancedGridLayout),
    ExpandBox(ExpandBoxLayout),
    ExpandList(ExpandListLayout),
}

impl LayoutKind {
    fn as_layout(&self) -> &dyn Layout {
        match self {
            LayoutKind::Box(l) => l,
            LayoutKind::Group(l) => l,
            LayoutKind::Grid(l) => l,
            LayoutKind::AdvancedGrid(l) => l,
            LayoutKind::ExpandBox(l) => l,
            LayoutKind::ExpandList(l) => l,
        }
    }

    fn as_layout_mut(&mut self) -> &mut dyn Layout {
        match self {
            LayoutKind::Box(l) => l,
            LayoutKind::Group(l) => l,
            LayoutKind::Grid(l) => l,
            LayoutKind::AdvancedGrid(l) => l,
            LayoutKind::ExpandBox(l) => l,
            LayoutKind::ExpandList(l) => l,
        }
    }

    /// The anchor-grid layout, for setting anchors after installation.
    pub fn as_advanced_grid_mut(&mut self) -> Option<&mut AdvancedGridLayout> {
        match self {
            LayoutKind::AdvancedGrid(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_advanced_grid(&self) -> Option<&AdvancedGridLayout> {
        match self {
            LayoutKind::AdvancedGrid(l) => Some(l),
            _ => None,
        }
    }

    /// Short name for debug output.
    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Box(_) => "BoxLayout",
            LayoutKind::Group(_) => "GroupLayout",
            LayoutKind::Grid(_) => "GridLayout",
            LayoutKind::AdvancedGrid(_) => "AdvancedGridLayout",
            LayoutKind::ExpandBox(_) => "ExpandBoxLayout",
            LayoutKind::ExpandList(_) => "ExpandListLayout",
        }
    }
}

impl Layout for LayoutKind {
    fn preferred_size(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Size {
        self.as_layout().preferred_size(cx, container)
    }

    fn arrange(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<Placement> {
        self.as_layout().arrange(cx, container)
    }

    fn forget(&mut self, widget: WidgetId) {
        self.as_layout_mut().forget(widget);
    }
}

macro_rules! impl_from_layout {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for LayoutKind {
                fn from(layout: $ty) -> Self {
                    LayoutKind::$variant(layout)
                }
            }
        )*
    };
}

impl_from_layout! {
    BoxLayout => Box,
    GroupLayout => Group,
    GridLayout => Grid,
    AdvancedGridLayout => AdvancedGrid,
    ExpandBoxLayout => ExpandBox,
    ExpandListLayout => ExpandList,
}

/// Arrange the subtree under `id`, whose own size must already be final.
///
/// For each container, top-down: compute the placements of its children,
/// apply them, run the container's `after_layout` hook, then recurse into
/// the placed children.
///
/// # Panics
///
/// Panics if an [`AdvancedGridLayout`] in the subtree is misconfigured (see
/// [`AdvancedGridLayout::validate`]). Configuration errors are programmer
/// errors with no meaningful geometry to fall back to.
pub fn perform_layout(tree: &mut WidgetTree, env: &Environment, id: WidgetId) {
    let span = tracing::debug_span!(target: targets::LAYOUT, span_names::LAYOUT, ?id);
    let _guard = span.enter();

    let arranged = arrange_subtree(tree, env, id);
    tracing::trace!(target: targets::LAYOUT, arranged, "layout pass finished");
}

fn arrange_subtree(tree: &mut WidgetTree, env: &Environment, id: WidgetId) -> usize {
    let placements = LayoutCtx::new(tree, env).arrange(id);

    for placement in &placements {
        if let Some(base) = tree.base_mut(placement.widget) {
            base.set_pos(placement.rect.origin);
            base.set_size(placement.rect.size);
        }
        if let Some(width) = placement.column_width {
            if let Some(widget) = tree.widget_mut(placement.widget) {
                widget.set_column_width(width);
            }
        }
    }

    tree.with_widget(id, |widget, tree| widget.after_layout(tree, id));

    let mut arranged = 1;
    for placement in placements {
        if tree.contains_widget(placement.widget) {
            arranged += arrange_subtree(tree, env, placement.widget);
        }
    }
    arranged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::testing::{SizedBox, headless_tree};
    use trellis_core::{Orientation, Point};

    #[test]
    fn test_layout_kind_from() {
        let kind: LayoutKind = BoxLayout::new(BoxLayoutConfig::new(Orientation::Vertical)).into();
        assert_eq!(kind.name(), "BoxLayout");
        assert!(kind.as_advanced_grid().is_none());

        let mut kind: LayoutKind = AdvancedGridLayout::new(AdvancedGridConfig::default()).into();
        assert!(kind.as_advanced_grid_mut().is_some());
    }

    #[test]
    fn test_perform_layout_recurses_into_children() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let outer = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            outer,
            BoxLayout::new(BoxLayoutConfig::new(Orientation::Vertical).with_margin(5)),
        )
        .unwrap();
        let inner = tree.insert(outer, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            inner,
            BoxLayout::new(BoxLayoutConfig::new(Orientation::Horizontal).with_margin(2)),
        )
        .unwrap();
        let leaf = tree.insert(inner, SizedBox::new(10, 10)).unwrap();

        tree.base_mut(root).unwrap().set_size(Size::new(200, 200));
        perform_layout(&mut tree, &env, root);

        // Root has no layout: outer keeps its position and gets its preferred size.
        assert_eq!(tree.base(outer).unwrap().size(), Size::new(24, 24));
        assert_eq!(tree.base(inner).unwrap().pos(), Point::new(5, 5));
        assert_eq!(tree.base(inner).unwrap().size(), Size::new(14, 14));
        assert_eq!(tree.base(leaf).unwrap().pos(), Point::new(2, 2));
        assert_eq!(tree.absolute_position(leaf), Point::new(7, 7));
    }

    #[test]
    fn test_perform_layout_skips_invisible() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let hidden = tree.insert(root, SizedBox::new(30, 30)).unwrap();
        tree.base_mut(hidden).unwrap().set_visible(false);

        perform_layout(&mut tree, &env, root);
        assert_eq!(tree.base(hidden).unwrap().size(), Size::ZERO);
    }
}
