//! Layouts that expand their children to the container.
//!
//! - [`ExpandBoxLayout`]: a box whose non-fixed children share the main-axis
//!   length equally.
//! - [`ExpandListLayout`]: a table with base column widths that stretch to
//!   the container width; wrapping children are measured at their column
//!   width.

use trellis_core::{Axis, Orientation, Point, Size};

use super::Layout;
use super::base::{Alignment, header_reserve, target_and_fixed};
use crate::widget::context::{LayoutCtx, Placement};
use crate::widget::tree::WidgetId;

// =============================================================================
// ExpandBoxLayout
// =============================================================================

/// Configuration of an [`ExpandBoxLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandBoxConfig {
    pub orientation: Orientation,
    pub alignment: Alignment,
    pub margin: i32,
    pub spacing: i32,
}

impl ExpandBoxConfig {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            alignment: Alignment::Fill,
            margin: 0,
            spacing: 0,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }
}

impl Default for ExpandBoxConfig {
    fn default() -> Self {
        Self::new(Orientation::Horizontal)
    }
}

/// A box layout that fills the container's main axis.
///
/// Children with a fixed main-axis size keep it; the remaining length, after
/// margins and spacing, is split evenly among the others. The layout does
/// not ask for more room than the container already has.
#[derive(Debug, Clone, Default)]
pub struct ExpandBoxLayout {
    config: ExpandBoxConfig,
}

impl ExpandBoxLayout {
    pub fn new(config: ExpandBoxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExpandBoxConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ExpandBoxConfig) {
        self.config = config;
    }
}

impl Layout for ExpandBoxLayout {
    fn preferred_size(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Size {
        cx.container_size(container)
    }

    fn arrange(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<Placement> {
        let ExpandBoxConfig {
            orientation,
            alignment,
            margin,
            spacing,
        } = self.config;
        let main = orientation.main_axis();
        let cross = orientation.cross_axis();
        let container_size = cx.container_size(container);

        let mut position = margin;
        let mut y_offset = 0;
        if let Some(header) = cx.window_header(container) {
            match orientation {
                Orientation::Vertical => position += header_reserve(cx, container, margin),
                Orientation::Horizontal => y_offset = header,
            }
        }
        let cross_space = container_size.get(cross) - y_offset;

        let children = cx.visible_children(container);
        let mut remaining = container_size.get(main) - position - margin + spacing;
        let mut flexible = 0;
        for &child in &children {
            remaining -= spacing;
            let fixed = cx.fixed_size(child).get(main);
            if fixed > 0 {
                remaining -= fixed;
            } else {
                flexible += 1;
            }
        }
        let share = if flexible > 0 { remaining / flexible } else { 0 };

        let mut placements = Vec::with_capacity(children.len());
        for child in children {
            let (preferred, fixed) = target_and_fixed(cx, child);
            let mut target = preferred;
            target.set(main, if fixed.get(main) > 0 { fixed.get(main) } else { share });

            let mut pos = Point::new(0, y_offset);
            pos.set(main, position);
            let cross_offset = match alignment {
                Alignment::Minimum => margin,
                Alignment::Middle => (cross_space - target.get(cross)) / 2,
                Alignment::Maximum => cross_space - target.get(cross) - 2 * margin,
                Alignment::Fill => {
                    let fixed_cross = fixed.get(cross);
                    target.set(
                        cross,
                        if fixed_cross > 0 {
                            fixed_cross
                        } else {
                            cross_space - 2 * margin
                        },
                    );
                    margin
                }
            };
            pos.set(cross, pos.get(cross) + cross_offset);

            placements.push(Placement::new(child, pos, target));
            position += target.get(main) + spacing;
        }
        placements
    }
}

// =============================================================================
// ExpandListLayout
// =============================================================================

/// Default stretch distribution of an [`ExpandListLayout`] without explicit
/// stretch factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandPolicy {
    /// Every column stretches equally.
    #[default]
    All,
    /// Only the last column stretches.
    Last,
}

/// Configuration of an [`ExpandListLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandListConfig {
    /// Base column widths; the number of entries is the column count.
    pub widths: Vec<i32>,
    /// Stretch per column. Missing entries count as zero; if no column has a
    /// positive stretch, `policy` decides.
    pub stretches: Vec<f32>,
    pub policy: ExpandPolicy,
    /// Column and row alignment of each cell.
    pub alignment: [Alignment; 2],
    pub margin: i32,
    /// Spacing between columns and between rows (`[x, y]`).
    pub spacing: [i32; 2],
}

impl ExpandListConfig {
    pub fn new(widths: Vec<i32>) -> Self {
        Self {
            widths,
            stretches: Vec::new(),
            policy: ExpandPolicy::All,
            alignment: [Alignment::Minimum, Alignment::Minimum],
            margin: 0,
            spacing: [0, 0],
        }
    }

    pub fn with_stretches(mut self, stretches: Vec<f32>) -> Self {
        self.stretches = stretches;
        self
    }

    pub fn with_policy(mut self, policy: ExpandPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_alignment(mut self, column: Alignment, row: Alignment) -> Self {
        self.alignment = [column, row];
        self
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    /// Same spacing between columns and rows.
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = [spacing, spacing];
        self
    }
}

impl Default for ExpandListConfig {
    fn default() -> Self {
        Self::new(vec![0])
    }
}

/// Table of fixed columns whose widths stretch to the container.
///
/// Each child receives its column's final width through
/// [`Widget::set_column_width`](crate::widget::Widget::set_column_width) and
/// is measured with [`Widget::preferred_size_in_column`](crate::widget::Widget::preferred_size_in_column),
/// so wrapping text grows downward instead of sideways. A row is as tall as
/// its tallest child. A child with more preferred size than its cell gets
/// the whole cell.
#[derive(Debug, Clone, Default)]
pub struct ExpandListLayout {
    config: ExpandListConfig,
}

/// Resolved table geometry.
struct Table {
    widths: Vec<i32>,
    heights: Vec<i32>,
    size: Size,
}

impl ExpandListLayout {
    pub fn new(config: ExpandListConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExpandListConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ExpandListConfig) {
        self.config = config;
    }

    pub fn column_count(&self) -> usize {
        self.config.widths.len()
    }

    /// Stretch factors after applying the policy.
    pub fn effective_stretches(&self) -> Vec<f32> {
        let count = self.column_count();
        let mut stretches: Vec<f32> = (0..count)
            .map(|i| self.config.stretches.get(i).copied().unwrap_or(0.0))
            .collect();
        if stretches.iter().all(|&s| s <= 0.0) {
            match self.config.policy {
                ExpandPolicy::All => stretches.fill(1.0),
                ExpandPolicy::Last => {
                    if let Some(last) = stretches.last_mut() {
                        *last = 100.0;
                    }
                }
            }
        }
        stretches
    }

    fn compute(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Table {
        let children = cx.visible_children(container);
        let columns = self.column_count();
        let margin = self.config.margin;
        if children.is_empty() || columns == 0 {
            return Table {
                widths: Vec::new(),
                heights: Vec::new(),
                size: Size::new(2 * margin, 2 * margin + header_reserve(cx, container, margin)),
            };
        }
        let [col_spacing, row_spacing] = self.config.spacing;
        let stretches = self.effective_stretches();
        let total_stretch: f32 = stretches.iter().sum();

        let base_width =
            2 * margin + (columns as i32 - 1) * col_spacing + self.config.widths.iter().sum::<i32>();
        let table_width = cx.container_size(container).width;
        let (remaining, total_width) = if table_width >= base_width {
            (table_width - base_width, table_width)
        } else {
            (0, base_width)
        };
        let widths: Vec<i32> = self
            .config
            .widths
            .iter()
            .zip(&stretches)
            .map(|(&width, &stretch)| width + (remaining as f32 * stretch / total_stretch) as i32)
            .collect();

        let heights: Vec<i32> = children
            .chunks(columns)
            .map(|row| {
                row.iter()
                    .zip(&widths)
                    .map(|(&child, &width)| cx.preferred_size_in_column(child, width).height)
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rows = heights.len() as i32;
        let total_height = 2 * margin
            + (rows - 1) * row_spacing
            + heights.iter().sum::<i32>()
            + header_reserve(cx, container, margin);

        Table {
            widths,
            heights,
            size: Size::new(total_width, total_height),
        }
    }
}

/// Offset and extent of a cell entry, falling back to fill when the space
/// is smaller than the preferred size.
fn cell_alignment(align: Alignment, space: i32, preferred: i32) -> (i32, i32) {
    let align = if space < preferred { Alignment::Fill } else { align };
    match align {
        Alignment::Minimum => (0, preferred),
        Alignment::Middle => ((space - preferred) / 2, preferred),
        Alignment::Maximum => (space - preferred, preferred),
        Alignment::Fill => (0, space),
    }
}

impl Layout for ExpandListLayout {
    fn preferred_size(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Size {
        self.compute(cx, container).size
    }

    fn arrange(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<Placement> {
        let table = self.compute(cx, container);
        let columns = table.widths.len();
        if columns == 0 {
            return Vec::new();
        }
        let margin = self.config.margin;
        let [col_spacing, row_spacing] = self.config.spacing;
        let [col_align, row_align] = self.config.alignment;

        let mut y = margin + header_reserve(cx, container, margin);
        let mut placements = Vec::new();
        for (row, height) in cx
            .visible_children(container)
            .chunks(columns)
            .zip(table.heights)
        {
            let mut x = margin;
            for (&child, &width) in row.iter().zip(&table.widths) {
                let preferred = cx.preferred_size_in_column(child, width);
                let (dx, w) = cell_alignment(col_align, width, preferred.get(Axis::X));
                let (dy, h) = cell_alignment(row_align, height, preferred.get(Axis::Y));
                placements.push(Placement {
                    column_width: Some(width),
                    ..Placement::new(child, Point::new(x + dx, y + dy), Size::new(w, h))
                });
                x += width + col_spacing;
            }
            y += height + row_spacing;
        }
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::testing::{SizedBox, headless_tree};
    use crate::widget::widgets::Label;

    #[test]
    fn test_expand_box_splits_remaining_length() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            container,
            ExpandBoxLayout::new(
                ExpandBoxConfig::new(Orientation::Horizontal)
                    .with_margin(5)
                    .with_spacing(10),
            ),
        )
        .unwrap();
        let a = tree.insert(container, SizedBox::new(10, 10)).unwrap();
        let fixed = tree.insert(container, SizedBox::new(10, 10)).unwrap();
        tree.base_mut(fixed).unwrap().set_fixed_width(30);
        let b = tree.insert(container, SizedBox::new(10, 10)).unwrap();
        tree.base_mut(container).unwrap().set_size(Size::new(200, 40));

        let cx = LayoutCtx::new(&tree, &env);
        assert_eq!(cx.preferred_size(container), Size::new(200, 40));

        // 200 - 2*5 - 2*10 - 30 = 140, split over two flexible children.
        let placements = cx.arrange(container);
        assert_eq!(placements[0].widget, a);
        assert_eq!(placements[0].rect, trellis_core::Rect::new(5, 5, 70, 30));
        assert_eq!(placements[1].widget, fixed);
        assert_eq!(placements[1].rect, trellis_core::Rect::new(85, 5, 30, 30));
        assert_eq!(placements[2].widget, b);
        assert_eq!(placements[2].rect, trellis_core::Rect::new(125, 5, 70, 30));
    }

    #[test]
    fn test_expand_box_skips_invisible() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            container,
            ExpandBoxLayout::new(ExpandBoxConfig::new(Orientation::Vertical)),
        )
        .unwrap();
        let hidden = tree.insert(container, SizedBox::new(10, 10)).unwrap();
        tree.base_mut(hidden).unwrap().set_visible(false);
        let shown = tree.insert(container, SizedBox::new(10, 10)).unwrap();
        tree.base_mut(container).unwrap().set_size(Size::new(50, 90));

        let placements = LayoutCtx::new(&tree, &env).arrange(container);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].widget, shown);
        assert_eq!(placements[0].rect.size, Size::new(50, 90));
    }

    #[test]
    fn test_effective_stretches() {
        let all = ExpandListLayout::new(ExpandListConfig::new(vec![10, 10, 10]));
        assert_eq!(all.effective_stretches(), vec![1.0, 1.0, 1.0]);

        let last = ExpandListLayout::new(
            ExpandListConfig::new(vec![10, 10]).with_policy(ExpandPolicy::Last),
        );
        assert_eq!(last.effective_stretches(), vec![0.0, 100.0]);

        let explicit = ExpandListLayout::new(
            ExpandListConfig::new(vec![10, 10, 10]).with_stretches(vec![2.0]),
        );
        assert_eq!(explicit.effective_stretches(), vec![2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cell_alignment_falls_back_to_fill() {
        assert_eq!(cell_alignment(Alignment::Middle, 10, 20), (0, 10));
        assert_eq!(cell_alignment(Alignment::Middle, 30, 20), (5, 20));
        assert_eq!(cell_alignment(Alignment::Maximum, 30, 20), (10, 20));
    }

    #[test]
    fn test_expand_list_stretches_columns_to_width() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            container,
            ExpandListLayout::new(
                ExpandListConfig::new(vec![20, 40])
                    .with_policy(ExpandPolicy::Last)
                    .with_margin(5)
                    .with_spacing(10),
            ),
        )
        .unwrap();
        let cells: Vec<_> = [(10, 12), (10, 8), (10, 20)]
            .into_iter()
            .map(|(w, h)| tree.insert(container, SizedBox::new(w, h)).unwrap())
            .collect();
        tree.base_mut(container).unwrap().set_size(Size::new(200, 0));

        let cx = LayoutCtx::new(&tree, &env);
        // Rows: max(12, 8) and 20 (a partial last row still counts).
        assert_eq!(cx.preferred_size(container), Size::new(200, 10 + 12 + 10 + 20));

        let placements = cx.arrange(container);
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0].widget, cells[0]);
        assert_eq!(placements[0].rect, trellis_core::Rect::new(5, 5, 10, 12));
        assert_eq!(placements[0].column_width, Some(20));
        // 200 - 10 - 10 - 60 = 120 spare, all to the last column.
        assert_eq!(placements[1].rect.origin, Point::new(35, 5));
        assert_eq!(placements[1].column_width, Some(160));
        assert_eq!(placements[2].rect.origin, Point::new(5, 27));
    }

    #[test]
    fn test_all_invisible_children_measure_margins_only() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(
            container,
            ExpandListLayout::new(
                ExpandListConfig::new(vec![20, 40])
                    .with_margin(5)
                    .with_spacing(10),
            ),
        )
        .unwrap();
        for _ in 0..3 {
            let c = tree.insert(container, SizedBox::new(10, 10)).unwrap();
            tree.base_mut(c).unwrap().set_visible(false);
        }

        let cx = LayoutCtx::new(&tree, &env);
        assert_eq!(cx.preferred_size(container), Size::new(10, 10));
        assert!(cx.arrange(container).is_empty());
    }

    #[test]
    fn test_expand_list_wraps_labels_at_column_width() {
        let (mut tree, env) = headless_tree();
        let root = tree.root();
        let container = tree.insert(root, SizedBox::new(0, 0)).unwrap();
        tree.set_layout(container, ExpandListLayout::new(ExpandListConfig::new(vec![40])))
            .unwrap();
        let label = tree
            .insert(container, Label::new("several words that wrap"))
            .unwrap();
        tree.base_mut(container).unwrap().set_size(Size::new(40, 0));

        let cx = LayoutCtx::new(&tree, &env);
        let single_line = env.theme.standard_font_size;
        assert!(cx.preferred_size(container).height > single_line);
        let placements = cx.arrange(container);
        assert_eq!(placements[0].widget, label);
        assert_eq!(placements[0].rect.size.width, 40);
    }
}
