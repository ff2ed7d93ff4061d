//! Anchor-based grid layout with explicit tracks and stretch factors.
//!
//! Columns and rows have a configured base size (0 = size to content) and a
//! stretch factor. Every child is bound to an [`Anchor`]: a rectangular
//! region of tracks plus an alignment per axis.
//!
//! Track sizes are resolved per axis in two phases:
//!
//! 1. anchors spanning a single track grow a content-sized track to fit the
//!    child;
//! 2. anchors spanning several tracks that still lack room spread the
//!    shortfall over their tracks in proportion to the stretch factors.
//!
//! Finally, space left in the container is shared by all tracks in
//! proportion to their stretch factors. Children are visited in child order,
//! so the result does not depend on how anchors are stored.

use std::collections::HashMap;
use std::fmt;

use trellis_core::{Axis, LayoutError, Point, Size};

use super::Layout;
use super::base::{Alignment, align_in_cell, header_reserve, target_and_fixed};
use crate::widget::context::{LayoutCtx, Placement};
use crate::widget::tree::WidgetId;

/// The grid region and per-axis alignment of one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// First column and row.
    pub pos: [usize; 2],
    /// Number of columns and rows spanned.
    pub span: [usize; 2],
    /// Horizontal and vertical alignment.
    pub align: [Alignment; 2],
}

impl Anchor {
    /// A single cell, filled on both axes.
    pub fn new(col: usize, row: usize) -> Self {
        Self::spanning(col, row, 1, 1)
    }

    /// A region of `cols` x `rows` cells starting at (`col`, `row`).
    pub fn spanning(col: usize, row: usize, cols: usize, rows: usize) -> Self {
        Self {
            pos: [col, row],
            span: [cols, rows],
            align: [Alignment::Fill, Alignment::Fill],
        }
    }

    pub fn with_alignment(mut self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.align = [horizontal, vertical];
        self
    }

    fn end(&self, axis: Axis) -> usize {
        self.pos[axis.index()] + self.span[axis.index()]
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos=({}, {}) span=({}, {}) align=({:?}, {:?})",
            self.pos[0], self.pos[1], self.span[0], self.span[1], self.align[0], self.align[1]
        )
    }
}

/// Track configuration of an [`AdvancedGridLayout`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvancedGridConfig {
    /// Base column widths; 0 sizes the column to its content.
    pub cols: Vec<i32>,
    /// Base row heights; 0 sizes the row to its content.
    pub rows: Vec<i32>,
    pub col_stretch: Vec<f32>,
    pub row_stretch: Vec<f32>,
    pub margin: i32,
}

impl AdvancedGridConfig {
    /// Tracks with the given base sizes and no stretch.
    pub fn new(cols: Vec<i32>, rows: Vec<i32>) -> Self {
        let col_stretch = vec![0.0; cols.len()];
        let row_stretch = vec![0.0; rows.len()];
        Self {
            cols,
            rows,
            col_stretch,
            row_stretch,
            margin: 0,
        }
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_col_stretch(mut self, stretch: Vec<f32>) -> Self {
        self.col_stretch = stretch;
        self
    }

    pub fn with_row_stretch(mut self, stretch: Vec<f32>) -> Self {
        self.row_stretch = stretch;
        self
    }

    fn tracks(&self, axis: Axis) -> (&[i32], &[f32]) {
        match axis {
            Axis::X => (&self.cols, &self.col_stretch),
            Axis::Y => (&self.rows, &self.row_stretch),
        }
    }
}

/// Grid of explicitly configured tracks with anchored children.
#[derive(Debug, Clone, Default)]
pub struct AdvancedGridLayout {
    config: AdvancedGridConfig,
    anchors: HashMap<WidgetId, Anchor>,
}

impl AdvancedGridLayout {
    pub fn new(config: AdvancedGridConfig) -> Self {
        Self {
            config,
            anchors: HashMap::new(),
        }
    }

    pub fn config(&self) -> &AdvancedGridConfig {
        &self.config
    }

    pub fn margin(&self) -> i32 {
        self.config.margin
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.config.margin = margin;
    }

    pub fn col_count(&self) -> usize {
        self.config.cols.len()
    }

    pub fn row_count(&self) -> usize {
        self.config.rows.len()
    }

    pub fn append_col(&mut self, size: i32, stretch: f32) {
        self.config.cols.push(size);
        self.config.col_stretch.push(stretch);
    }

    pub fn append_row(&mut self, size: i32, stretch: f32) {
        self.config.rows.push(size);
        self.config.row_stretch.push(stretch);
    }

    /// Set the stretch factor of an existing column; out-of-range indices are ignored.
    pub fn set_col_stretch(&mut self, index: usize, stretch: f32) {
        if let Some(s) = self.config.col_stretch.get_mut(index) {
            *s = stretch;
        }
    }

    /// Set the stretch factor of an existing row; out-of-range indices are ignored.
    pub fn set_row_stretch(&mut self, index: usize, stretch: f32) {
        if let Some(s) = self.config.row_stretch.get_mut(index) {
            *s = stretch;
        }
    }

    pub fn set_anchor(&mut self, widget: WidgetId, anchor: Anchor) {
        self.anchors.insert(widget, anchor);
    }

    pub fn anchor(&self, widget: WidgetId) -> Option<Anchor> {
        self.anchors.get(&widget).copied()
    }

    pub fn remove_anchor(&mut self, widget: WidgetId) -> Option<Anchor> {
        self.anchors.remove(&widget)
    }

    /// Number of widgets with an anchor.
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Check the configuration against the current children of `container`.
    ///
    /// Reports the error a layout pass would otherwise panic with: mismatched
    /// stretch vectors, a visible child without an anchor, an anchor outside
    /// the tracks, or a multi-track anchor that needs more room than its
    /// tracks provide when none of them stretch.
    pub fn validate(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Result<(), LayoutError> {
        self.compute_tracks(cx, container).map(|_| ())
    }

    /// Visible children with their anchors, in child order.
    fn anchored_children(
        &self,
        cx: &LayoutCtx<'_>,
        container: WidgetId,
    ) -> Result<Vec<(WidgetId, Anchor)>, LayoutError> {
        cx.visible_children(container)
            .into_iter()
            .map(|widget| {
                self.anchor(widget)
                    .map(|anchor| (widget, anchor))
                    .ok_or_else(|| LayoutError::MissingAnchor {
                        widget: format!("{widget:?} ({})", cx.tree().type_name(widget)),
                    })
            })
            .collect()
    }

    /// Resolved track sizes, `[columns, rows]`.
    fn compute_tracks(
        &self,
        cx: &LayoutCtx<'_>,
        container: WidgetId,
    ) -> Result<[Vec<i32>; 2], LayoutError> {
        for axis in Axis::BOTH {
            let (sizes, stretch) = self.config.tracks(axis);
            if sizes.len() != stretch.len() {
                return Err(LayoutError::TrackCountMismatch {
                    axis,
                    sizes: sizes.len(),
                    stretches: stretch.len(),
                });
            }
        }

        let children = self.anchored_children(cx, container)?;
        let margin = self.config.margin;
        let mut available = cx.container_size(container);
        available.width -= 2 * margin;
        available.height -= 2 * margin + header_reserve(cx, container, margin);

        let mut grids = [Vec::new(), Vec::new()];
        for axis in Axis::BOTH {
            let (sizes, stretch) = self.config.tracks(axis);
            let mut grid = sizes.to_vec();

            for single_track_phase in [true, false] {
                for &(widget, anchor) in &children {
                    let span = anchor.span[axis.index()];
                    if (span == 1) != single_track_phase {
                        continue;
                    }
                    if anchor.end(axis) > grid.len() {
                        return Err(LayoutError::AnchorOutOfBounds {
                            anchor: anchor.to_string(),
                            axis,
                            tracks: grid.len(),
                        });
                    }
                    let (target, _) = target_and_fixed(cx, widget);
                    let target = target.get(axis);
                    let range = anchor.pos[axis.index()]..anchor.end(axis);

                    let mut current = 0;
                    let mut total_stretch = 0.0_f32;
                    for i in range.clone() {
                        if sizes[i] == 0 && span == 1 {
                            grid[i] = grid[i].max(target);
                        }
                        current += grid[i];
                        total_stretch += stretch[i];
                    }
                    if target <= current {
                        continue;
                    }
                    if total_stretch == 0.0 {
                        return Err(LayoutError::NoSpaceToPlace {
                            anchor: anchor.to_string(),
                            required: target,
                            available: current,
                        });
                    }
                    let amount = (target - current) as f32 / total_stretch;
                    for i in range {
                        grid[i] += (amount * stretch[i]) as i32;
                    }
                }
            }

            let current: i32 = grid.iter().sum();
            let total_stretch: f32 = stretch.iter().sum();
            let space = available.get(axis);
            if current < space && total_stretch > 0.0 {
                let amount = (space - current) as f32 / total_stretch;
                for (track, s) in grid.iter_mut().zip(stretch) {
                    *track += (amount * s + 0.5) as i32;
                }
            }
            grids[axis.index()] = grid;
        }
        Ok(grids)
    }

    fn tracks_or_panic(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> [Vec<i32>; 2] {
        match self.compute_tracks(cx, container) {
            Ok(grids) => grids,
            Err(err) => panic!("advanced grid layout: {err}"),
        }
    }
}

impl Layout for AdvancedGridLayout {
    /// # Panics
    ///
    /// Panics on a configuration error; see [`AdvancedGridLayout::validate`].
    fn preferred_size(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Size {
        let grids = self.tracks_or_panic(cx, container);
        let margin = self.config.margin;
        Size::new(
            2 * margin + grids[0].iter().sum::<i32>(),
            2 * margin + grids[1].iter().sum::<i32>() + header_reserve(cx, container, margin),
        )
    }

    /// # Panics
    ///
    /// Panics on a configuration error; see [`AdvancedGridLayout::validate`].
    fn arrange(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<Placement> {
        let grids = self.tracks_or_panic(cx, container);
        let margin = self.config.margin;
        let top = match cx.window_header(container) {
            Some(header) => header + margin / 2,
            None => margin,
        };

        // Track start offsets, with one trailing entry for the far edge.
        let offsets: [Vec<i32>; 2] = [(margin, &grids[0]), (top, &grids[1])].map(|(start, grid)| {
            let mut acc = start;
            let mut out = Vec::with_capacity(grid.len() + 1);
            out.push(acc);
            for size in grid {
                acc += size;
                out.push(acc);
            }
            out
        });

        let mut placements = Vec::new();
        for widget in cx.visible_children(container) {
            let Some(anchor) = self.anchor(widget) else {
                continue;
            };
            let (mut target, fixed) = target_and_fixed(cx, widget);
            let mut pos = Point::ZERO;
            for axis in Axis::BOTH {
                let lines = &offsets[axis.index()];
                let start = lines[anchor.pos[axis.index()]];
                let cell = lines[anchor.end(axis)] - start;
                let (offset, size) =
                    align_in_cell(anchor.align[axis.index()], cell, target.get(axis), fixed.get(axis));
                pos.set(axis, start + offset);
                target.set(axis, size);
            }
            placements.push(Placement::new(widget, pos, target));
        }
        placements
    }

    fn forget(&mut self, widget: WidgetId) {
        self.anchors.remove(&widget);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::layout::LayoutKind;
    use crate::widget::testing::{SizedBox, headless_tree};
    use crate::widget::{Environment, WidgetTree};

    fn grid_container(
        tree: &mut WidgetTree,
        config: AdvancedGridConfig,
    ) -> WidgetId {
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(container, AdvancedGridLayout::new(config)).unwrap();
        container
    }

    fn add_anchored(
        tree: &mut WidgetTree,
        container: WidgetId,
        size: (i32, i32),
        anchor: Anchor,
    ) -> WidgetId {
        let child = tree.insert(container, SizedBox::new(size.0, size.1)).unwrap();
        grid_mut(tree, container).set_anchor(child, anchor);
        child
    }

    fn grid_mut(tree: &mut WidgetTree, container: WidgetId) -> &mut AdvancedGridLayout {
        tree.layout_mut(container)
            .and_then(LayoutKind::as_advanced_grid_mut)
            .unwrap()
    }

    fn validate(tree: &WidgetTree, env: &Environment, container: WidgetId) -> Result<(), LayoutError> {
        let cx = LayoutCtx::new(tree, env);
        tree.layout(container)
            .and_then(LayoutKind::as_advanced_grid)
            .unwrap()
            .validate(&cx, container)
    }

    #[test]
    fn test_content_sized_tracks() {
        let (mut tree, env) = headless_tree();
        let container = grid_container(
            &mut tree,
            AdvancedGridConfig::new(vec![0, 10, 0], vec![0]).with_margin(5),
        );
        let a = add_anchored(&mut tree, container, (30, 20), Anchor::new(0, 0));
        let b = add_anchored(&mut tree, container, (40, 12), Anchor::new(2, 0));

        let cx = LayoutCtx::new(&tree, &env);
        assert_eq!(cx.preferred_size(container), Size::new(10 + 30 + 10 + 40, 10 + 20));

        tree.base_mut(container).unwrap().set_size(Size::new(90, 30));
        let placements = LayoutCtx::new(&tree, &env).arrange(container);
        assert_eq!(placements[0].widget, a);
        assert_eq!(placements[0].rect, trellis_core::Rect::new(5, 5, 30, 20));
        assert_eq!(placements[1].widget, b);
        assert_eq!(placements[1].rect, trellis_core::Rect::new(45, 5, 40, 20));
    }

    #[test]
    fn test_slack_goes_to_stretching_tracks() {
        let (mut tree, env) = headless_tree();
        let container = grid_container(
            &mut tree,
            AdvancedGridConfig::new(vec![20, 20], vec![10]).with_col_stretch(vec![1.0, 3.0]),
        );
        let a = add_anchored(
            &mut tree,
            container,
            (5, 5),
            Anchor::new(0, 0).with_alignment(Alignment::Fill, Alignment::Minimum),
        );
        let b = add_anchored(&mut tree, container, (5, 5), Anchor::new(1, 0));
        tree.base_mut(container).unwrap().set_size(Size::new(80, 10));

        let placements = LayoutCtx::new(&tree, &env).arrange(container);
        // 40 spare: 10 to the first column, 30 to the second.
        assert_eq!(placements[0].widget, a);
        assert_eq!(placements[0].rect.size, Size::new(30, 5));
        assert_eq!(placements[1].widget, b);
        assert_eq!(placements[1].rect.origin.x, 30);
        assert_eq!(placements[1].rect.size, Size::new(50, 10));
    }

    #[test]
    fn test_multi_span_grows_by_stretch() {
        let (mut tree, env) = headless_tree();
        let container = grid_container(
            &mut tree,
            AdvancedGridConfig::new(vec![10, 10], vec![0]).with_col_stretch(vec![1.0, 1.0]),
        );
        add_anchored(&mut tree, container, (60, 8), Anchor::spanning(0, 0, 2, 1));

        // Measured against a zero-sized container: only the shortfall is added.
        let cx = LayoutCtx::new(&tree, &env);
        assert_eq!(cx.preferred_size(container), Size::new(60, 8));
        assert_eq!(validate(&tree, &env, container), Ok(()));
    }

    #[test]
    #[should_panic(expected = "no space to place widget")]
    fn test_no_stretch_overflow_is_fatal() {
        let (mut tree, env) = headless_tree();
        let container = grid_container(&mut tree, AdvancedGridConfig::new(vec![10, 10], vec![10]));
        add_anchored(&mut tree, container, (60, 8), Anchor::spanning(0, 0, 2, 1));

        let cx = LayoutCtx::new(&tree, &env);
        cx.preferred_size(container);
    }

    #[test]
    fn test_validate_reports_errors() {
        let (mut tree, env) = headless_tree();
        let container = grid_container(&mut tree, AdvancedGridConfig::new(vec![10, 10], vec![10]));
        let child = add_anchored(&mut tree, container, (60, 8), Anchor::spanning(0, 0, 2, 1));
        assert!(matches!(
            validate(&tree, &env, container),
            Err(LayoutError::NoSpaceToPlace { required: 60, available: 20, .. })
        ));

        grid_mut(&mut tree, container).set_anchor(child, Anchor::new(5, 0));
        assert!(matches!(
            validate(&tree, &env, container),
            Err(LayoutError::AnchorOutOfBounds { axis: Axis::X, tracks: 2, .. })
        ));

        grid_mut(&mut tree, container).remove_anchor(child);
        assert!(matches!(
            validate(&tree, &env, container),
            Err(LayoutError::MissingAnchor { .. })
        ));

        let mismatched = grid_container(
            &mut tree,
            AdvancedGridConfig::new(vec![10], vec![10]).with_row_stretch(vec![1.0, 2.0]),
        );
        assert!(matches!(
            validate(&tree, &env, mismatched),
            Err(LayoutError::TrackCountMismatch { axis: Axis::Y, sizes: 1, stretches: 2 })
        ));
    }

    #[test]
    fn test_removed_widget_anchor_is_forgotten() {
        let (mut tree, _env) = headless_tree();
        let container = grid_container(&mut tree, AdvancedGridConfig::new(vec![0], vec![0]));
        let child = add_anchored(&mut tree, container, (5, 5), Anchor::new(0, 0));
        assert_eq!(grid_mut(&mut tree, container).anchor_count(), 1);

        tree.remove(child).unwrap();
        assert_eq!(grid_mut(&mut tree, container).anchor_count(), 0);
    }

    #[test]
    fn test_append_tracks() {
        let mut layout = AdvancedGridLayout::new(AdvancedGridConfig::default());
        layout.append_col(0, 1.0);
        layout.append_col(30, 0.0);
        layout.append_row(0, 0.0);
        layout.set_col_stretch(1, 2.0);
        layout.set_row_stretch(7, 2.0);
        assert_eq!(layout.col_count(), 2);
        assert_eq!(layout.row_count(), 1);
        assert_eq!(layout.config().col_stretch, vec![1.0, 2.0]);
        assert_eq!(layout.config().row_stretch, vec![0.0]);
    }
}
