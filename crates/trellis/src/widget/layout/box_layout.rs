//! Box layout for arranging widgets in a row or column.
//!
//! `BoxLayout` stacks the visible children along one axis with uniform
//! spacing and aligns each of them on the other axis.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::layout::{Alignment, BoxLayout, BoxLayoutConfig};
//! use trellis_core::Orientation;
//!
//! let layout = BoxLayout::new(
//!     BoxLayoutConfig::new(Orientation::Horizontal)
//!         .with_alignment(Alignment::Middle)
//!         .with_spacing(6),
//! );
//! ```

use trellis_core::{Orientation, Point, Size};

use super::Layout;
use super::base::{Alignment, header_reserve, target_and_fixed};
use crate::widget::context::{LayoutCtx, Placement};
use crate::widget::tree::WidgetId;

/// Configuration of a [`BoxLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayoutConfig {
    pub orientation: Orientation,
    /// Cross-axis alignment of every child.
    pub alignment: Alignment,
    pub margin: i32,
    pub spacing: i32,
}

impl BoxLayoutConfig {
    /// Middle alignment, no margin, no spacing.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            alignment: Alignment::Middle,
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

impl Default for BoxLayoutConfig {
    fn default() -> Self {
        Self::new(Orientation::Horizontal)
    }
}

/// Stacks children along the main axis.
///
/// A titled window container reserves its header: on a vertical box the
/// first child starts `header - margin / 2` lower; on a horizontal box every
/// child is shifted down by the full header height and the cross-axis space
/// shrinks accordingly.
#[derive(Debug, Clone, Default)]
pub struct BoxLayout {
    config: BoxLayoutConfig,
}

impl BoxLayout {
    pub fn new(config: BoxLayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BoxLayoutConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BoxLayoutConfig) {
        self.config = config;
    }

    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.config.orientation = orientation;
    }

    pub fn alignment(&self) -> Alignment {
        self.config.alignment
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.config.alignment = alignment;
    }

    pub fn margin(&self) -> i32 {
        self.config.margin
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.config.margin = margin;
    }

    pub fn spacing(&self) -> i32 {
        self.config.spacing
    }

    pub fn set_spacing(&mut self, spacing: i32) {
        self.config.spacing = spacing;
    }

    /// Main-axis start offset and cross-axis (downward) header offset.
    fn header_offsets(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> (i32, i32) {
        let Some(header) = cx.window_header(container) else {
            return (0, 0);
        };
        match self.config.orientation {
            Orientation::Vertical => (header_reserve(cx, container, self.config.margin), 0),
            Orientation::Horizontal => (0, header),
        }
    }
}

impl Layout for BoxLayout {
    fn preferred_size(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Size {
        let BoxLayoutConfig {
            orientation,
            margin,
            spacing,
            ..
        } = self.config;
        let main = orientation.main_axis();
        let cross = orientation.cross_axis();
        let (main_offset, y_offset) = self.header_offsets(cx, container);

        let mut size = Size::new(2 * margin, 2 * margin);
        size.set(main, size.get(main) + main_offset);

        for (i, child) in cx.visible_children(container).into_iter().enumerate() {
            if i > 0 {
                size.set(main, size.get(main) + spacing);
            }
            let (target, _) = target_and_fixed(cx, child);
            size.set(main, size.get(main) + target.get(main));
            size.set(cross, size.get(cross).max(target.get(cross) + 2 * margin));
        }

        size.height += y_offset;
        size
    }

    fn arrange(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<Placement> {
        let BoxLayoutConfig {
            orientation,
            alignment,
            margin,
            spacing,
        } = self.config;
        let main = orientation.main_axis();
        let cross = orientation.cross_axis();
        let (main_offset, y_offset) = self.header_offsets(cx, container);

        let container_size = cx.container_size(container);
        // Only non-zero for horizontal boxes, where the cross axis is vertical.
        let cross_space = container_size.get(cross) - y_offset;
        let mut position = margin + main_offset;

        let mut placements = Vec::new();
        for (i, child) in cx.visible_children(container).into_iter().enumerate() {
            if i > 0 {
                position += spacing;
            }
            let (mut target, fixed) = target_and_fixed(cx, child);

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
            position += target.get(main);
        }
        placements
    }
}
