//! Grid layout with a fixed number of tracks along one axis.
//!
//! With horizontal orientation and resolution `R`, children fill rows of `R`
//! columns left to right, top to bottom; with vertical orientation they fill
//! columns of `R` rows. Each track is as large as its largest cell. When the
//! container is larger than the grid, the extra space is shared evenly by
//! the tracks of each axis, the first tracks taking the remainder.

use trellis_core::{Axis, Orientation, Point, Size};

use super::Layout;
use super::base::{Alignment, align_in_cell, header_reserve, target_and_fixed, tracks_extent};
use crate::widget::context::{LayoutCtx, Placement};
use crate::widget::tree::WidgetId;

/// Configuration of a [`GridLayout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayoutConfig {
    pub orientation: Orientation,
    /// Number of tracks along the orientation's main axis.
    pub resolution: usize,
    pub margin: i32,
    /// Spacing between tracks, per axis (`[x, y]`).
    pub spacing: [i32; 2],
    /// Alignment used for tracks without an explicit entry, per axis.
    pub default_alignment: [Alignment; 2],
    /// Per-track alignment overrides, per axis.
    pub alignment: [Vec<Alignment>; 2],
}

impl Default for GridLayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            resolution: 2,
            margin: 0,
            spacing: [0, 0],
            default_alignment: [Alignment::Middle, Alignment::Middle],
            alignment: [Vec::new(), Vec::new()],
        }
    }
}

impl GridLayoutConfig {
    pub fn new(orientation: Orientation, resolution: usize) -> Self {
        Self {
            orientation,
            resolution,
            ..Self::default()
        }
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    /// Same spacing on both axes.
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = [spacing, spacing];
        self
    }

    pub fn with_axis_spacing(mut self, axis: Axis, spacing: i32) -> Self {
        self.spacing[axis.index()] = spacing;
        self
    }

    /// Same default alignment on both axes.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.default_alignment = [alignment, alignment];
        self
    }

    pub fn with_track_alignment(mut self, axis: Axis, alignment: Vec<Alignment>) -> Self {
        self.alignment[axis.index()] = alignment;
        self
    }
}

/// Row-major (or column-major) grid of uniformly sized tracks.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    config: GridLayoutConfig,
}

impl GridLayout {
    pub fn new(config: GridLayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridLayoutConfig {
        &self.config
    }

    pub fn resolution(&self) -> usize {
        self.config.resolution
    }

    pub fn set_resolution(&mut self, resolution: usize) {
        self.config.resolution = resolution;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.config.orientation = orientation;
    }

    pub fn set_spacing(&mut self, axis: Axis, spacing: i32) {
        self.config.spacing[axis.index()] = spacing;
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.config.margin = margin;
    }

    pub fn set_track_alignment(&mut self, axis: Axis, alignment: Vec<Alignment>) {
        self.config.alignment[axis.index()] = alignment;
    }

    /// Alignment of track `index` on `axis`.
    pub fn alignment(&self, axis: Axis, index: usize) -> Alignment {
        let i = axis.index();
        self.config.alignment[i]
            .get(index)
            .copied()
            .unwrap_or(self.config.default_alignment[i])
    }

    /// Visible children in fill order, grouped into lines along the main axis.
    fn lines(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<Vec<WidgetId>> {
        let resolution = self.config.resolution.max(1);
        cx.visible_children(container)
            .chunks(resolution)
            .map(<[WidgetId]>::to_vec)
            .collect()
    }

    /// Track sizes per axis (`[columns, rows]`): the largest target extent
    /// in each track.
    fn compute_tracks(&self, cx: &LayoutCtx<'_>, lines: &[Vec<WidgetId>]) -> [Vec<i32>; 2] {
        let main = self.config.orientation.main_axis();
        let cross = main.cross();
        let mut tracks = [Vec::new(), Vec::new()];
        if lines.is_empty() {
            return tracks;
        }
        tracks[main.index()] = vec![0; self.config.resolution.max(1)];
        tracks[cross.index()] = vec![0; lines.len()];

        for (i2, line) in lines.iter().enumerate() {
            for (i1, &child) in line.iter().enumerate() {
                let (target, _) = target_and_fixed(cx, child);
                let m = &mut tracks[main.index()][i1];
                *m = (*m).max(target.get(main));
                let c = &mut tracks[cross.index()][i2];
                *c = (*c).max(target.get(cross));
            }
        }
        tracks
    }
}

impl Layout for GridLayout {
    fn preferred_size(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Size {
        let lines = self.lines(cx, container);
        let tracks = self.compute_tracks(cx, &lines);
        let margin = self.config.margin;

        Size::new(
            2 * margin + tracks_extent(&tracks[0], self.config.spacing[0]),
            2 * margin
                + tracks_extent(&tracks[1], self.config.spacing[1])
                + header_reserve(cx, container, margin),
        )
    }

    fn arrange(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<Placement> {
        let lines = self.lines(cx, container);
        let mut tracks = self.compute_tracks(cx, &lines);
        let margin = self.config.margin;
        let container_size = cx.container_size(container);
        let extra = [0, header_reserve(cx, container, margin)];

        for axis in Axis::BOTH {
            let i = axis.index();
            let count = tracks[i].len() as i32;
            if count == 0 {
                continue;
            }
            let grid_size = 2 * margin + extra[i] + tracks_extent(&tracks[i], self.config.spacing[i]);
            let available = container_size.get(axis);
            if grid_size < available {
                let gap = available - grid_size;
                let share = gap / count;
                let rest = (gap - share * count) as usize;
                for (j, track) in tracks[i].iter_mut().enumerate() {
                    *track += share + i32::from(j < rest);
                }
            }
        }

        let main = self.config.orientation.main_axis();
        let cross = main.cross();
        let start = Point::new(margin + extra[0], margin + extra[1]);
        let mut pos = start;
        let mut placements = Vec::new();

        for (i2, line) in lines.iter().enumerate() {
            pos.set(main, start.get(main));
            for (i1, &child) in line.iter().enumerate() {
                let (mut target, fixed) = target_and_fixed(cx, child);
                let mut item_pos = pos;
                for (axis, index) in [(main, i1), (cross, i2)] {
                    let cell = tracks[axis.index()][index];
                    let (offset, size) =
                        align_in_cell(self.alignment(axis, index), cell, target.get(axis), fixed.get(axis));
                    item_pos.set(axis, item_pos.get(axis) + offset);
                    target.set(axis, size);
                }
                placements.push(Placement::new(child, item_pos, target));
                pos.set(
                    main,
                    pos.get(main) + tracks[main.index()][i1] + self.config.spacing[main.index()],
                );
            }
            pos.set(
                cross,
                pos.get(cross) + tracks[cross.index()][i2] + self.config.spacing[cross.index()],
            );
        }
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::testing::{SizedBox, headless_tree, titled_window};

    #[test]
    fn test_alignment_fallback() {
        let layout = GridLayout::new(
            GridLayoutConfig::new(Orientation::Horizontal, 2)
                .with_alignment(Alignment::Fill)
                .with_track_alignment(Axis::X, vec![Alignment::Maximum]),
        );
        assert_eq!(layout.alignment(Axis::X, 0), Alignment::Maximum);
        assert_eq!(layout.alignment(Axis::X, 1), Alignment::Fill);
        assert_eq!(layout.alignment(Axis::Y, 0), Alignment::Fill);
    }

    #[test]
    fn test_five_children_resolution_two() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            container,
            GridLayout::new(
                GridLayoutConfig::new(Orientation::Horizontal, 2)
                    .with_alignment(Alignment::Minimum)
                    .with_spacing(5),
            ),
        )
        .unwrap();
        let children: Vec<_> = (0..5)
            .map(|_| tree.insert(container, SizedBox::new(20, 10)).unwrap())
            .collect();

        let cx = LayoutCtx::new(&tree, &env);
        // 2 columns, 3 rows
        assert_eq!(cx.preferred_size(container), Size::new(20 * 2 + 5, 10 * 3 + 5 * 2));

        tree.base_mut(container).unwrap().set_size(Size::new(45, 40));
        let placements = LayoutCtx::new(&tree, &env).arrange(container);
        assert_eq!(placements.len(), 5);
        let origins: Vec<_> = placements.iter().map(|p| p.rect.origin).collect();
        assert_eq!(
            origins,
            vec![
                Point::new(0, 0),
                Point::new(25, 0),
                Point::new(0, 15),
                Point::new(25, 15),
                Point::new(0, 30),
            ]
        );
        assert_eq!(placements[4].widget, children[4]);
    }

    #[test]
    fn test_vertical_orientation_fills_columns() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            container,
            GridLayout::new(
                GridLayoutConfig::new(Orientation::Vertical, 2).with_alignment(Alignment::Minimum),
            ),
        )
        .unwrap();
        for _ in 0..3 {
            tree.insert(container, SizedBox::new(20, 10)).unwrap();
        }
        let cx = LayoutCtx::new(&tree, &env);
        assert_eq!(cx.preferred_size(container), Size::new(40, 20));

        tree.base_mut(container).unwrap().set_size(Size::new(40, 20));
        let placements = LayoutCtx::new(&tree, &env).arrange(container);
        let origins: Vec<_> = placements.iter().map(|p| p.rect.origin).collect();
        assert_eq!(origins, vec![Point::new(0, 0), Point::new(0, 10), Point::new(20, 0)]);
    }

    #[test]
    fn test_invisible_child_is_as_if_absent() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            container,
            GridLayout::new(GridLayoutConfig::new(Orientation::Horizontal, 2)),
        )
        .unwrap();
        let a = tree.insert(container, SizedBox::new(20, 10)).unwrap();
        let hidden = tree.insert(container, SizedBox::new(90, 90)).unwrap();
        let b = tree.insert(container, SizedBox::new(20, 10)).unwrap();
        tree.base_mut(hidden).unwrap().set_visible(false);
        tree.base_mut(container).unwrap().set_size(Size::new(40, 10));

        let cx = LayoutCtx::new(&tree, &env);
        assert_eq!(cx.preferred_size(container), Size::new(40, 10));
        let placements = cx.arrange(container);
        assert_eq!(placements.len(), 2);
        assert_eq!((placements[0].widget, placements[1].widget), (a, b));
        assert_eq!(placements[1].rect.origin, Point::new(20, 0));
    }

    #[test]
    fn test_extra_space_distributed_with_remainder_first() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            container,
            GridLayout::new(
                GridLayoutConfig::new(Orientation::Horizontal, 3).with_alignment(Alignment::Fill),
            ),
        )
        .unwrap();
        for _ in 0..3 {
            tree.insert(container, SizedBox::new(10, 10)).unwrap();
        }
        // 32 available, 30 used: two extra pixels go to the first two columns.
        tree.base_mut(container).unwrap().set_size(Size::new(32, 13));

        let placements = LayoutCtx::new(&tree, &env).arrange(container);
        let widths: Vec<_> = placements.iter().map(|p| p.rect.size.width).collect();
        assert_eq!(widths, vec![11, 11, 10]);
        let xs: Vec<_> = placements.iter().map(|p| p.rect.origin.x).collect();
        assert_eq!(xs, vec![0, 11, 22]);
        assert!(placements.iter().all(|p| p.rect.size.height == 13));
    }

    #[test]
    fn test_titled_window_offsets_rows() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let window = titled_window(&mut tree, root, "Grid");
        tree.set_layout(
            window,
            GridLayout::new(
                GridLayoutConfig::new(Orientation::Horizontal, 1)
                    .with_margin(10)
                    .with_alignment(Alignment::Minimum),
            ),
        )
        .unwrap();
        tree.insert(window, SizedBox::new(50, 10)).unwrap();

        let cx = LayoutCtx::new(&tree, &env);
        assert_eq!(cx.preferred_size(window).height, 20 + 10 + 25);
        tree.base_mut(window).unwrap().set_size(Size::new(70, 55));
        let placements = LayoutCtx::new(&tree, &env).arrange(window);
        assert_eq!(placements[0].rect.origin, Point::new(10, 35));
    }

    #[test]
    fn test_all_invisible_children_measure_margins_only() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            container,
            GridLayout::new(
                GridLayoutConfig::new(Orientation::Horizontal, 3)
                    .with_margin(4)
                    .with_spacing(8),
            ),
        )
        .unwrap();
        let hidden = tree.insert(container, SizedBox::new(10, 10)).unwrap();
        tree.base_mut(hidden).unwrap().set_visible(false);

        let cx = LayoutCtx::new(&tree, &env);
        assert_eq!(cx.preferred_size(container), Size::new(8, 8));
        assert!(cx.arrange(container).is_empty());
    }
}
