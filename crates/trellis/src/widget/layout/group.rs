//! Group layout: a column of labelled sections.
//!
//! Labels act as section headings. A label with a non-empty caption indents
//! the widgets that follow it by `group_indent` until the next label; the
//! gap before a label is `group_spacing`, the gap before anything else is
//! `spacing`. Every child is stretched to the available width unless it has
//! a fixed width.

use trellis_core::{Point, Size};

use super::Layout;
use super::base::{header_reserve, target_and_fixed};
use crate::widget::context::{LayoutCtx, Placement};
use crate::widget::tree::WidgetId;

/// Configuration of a [`GroupLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupLayoutConfig {
    pub margin: i32,
    pub spacing: i32,
    pub group_spacing: i32,
    pub group_indent: i32,
}

impl Default for GroupLayoutConfig {
    fn default() -> Self {
        Self {
            margin: 15,
            spacing: 6,
            group_spacing: 14,
            group_indent: 20,
        }
    }
}

impl GroupLayoutConfig {
    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_group_spacing(mut self, group_spacing: i32) -> Self {
        self.group_spacing = group_spacing;
        self
    }

    pub fn with_group_indent(mut self, group_indent: i32) -> Self {
        self.group_indent = group_indent;
        self
    }
}

/// Vertical stack with label-driven indentation.
#[derive(Debug, Clone, Default)]
pub struct GroupLayout {
    config: GroupLayoutConfig,
}

/// One visible child as the group walk sees it.
struct GroupEntry {
    widget: WidgetId,
    /// Gap above this child.
    gap: i32,
    /// Horizontal indent of this child.
    indent: i32,
}

impl GroupLayout {
    pub fn new(config: GroupLayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GroupLayoutConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GroupLayoutConfig) {
        self.config = config;
    }

    /// Walk the visible children, resolving gaps and indentation.
    fn entries(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<GroupEntry> {
        let mut entries = Vec::new();
        let mut indent = false;
        for (i, widget) in cx.visible_children(container).into_iter().enumerate() {
            let caption = cx.label_caption(widget);
            let gap = match (i, caption) {
                (0, _) => 0,
                (_, Some(_)) => self.config.group_spacing,
                (_, None) => self.config.spacing,
            };
            let indented = indent && caption.is_none();
            entries.push(GroupEntry {
                widget,
                gap,
                indent: if indented { self.config.group_indent } else { 0 },
            });
            if let Some(caption) = caption {
                indent = !caption.is_empty();
            }
        }
        entries
    }
}

impl Layout for GroupLayout {
    fn preferred_size(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Size {
        let margin = self.config.margin;
        let mut height = margin + header_reserve(cx, container, margin);
        let mut width = 2 * margin;

        for entry in self.entries(cx, container) {
            let (target, _) = target_and_fixed(cx, entry.widget);
            height += entry.gap + target.height;
            width = width.max(target.width + 2 * margin + entry.indent);
        }

        Size::new(width, height + margin)
    }

    fn arrange(&self, cx: &LayoutCtx<'_>, container: WidgetId) -> Vec<Placement> {
        let margin = self.config.margin;
        let available_width = cx.container_size(container).width - 2 * margin;
        let mut height = margin + header_reserve(cx, container, margin);

        let mut placements = Vec::new();
        for entry in self.entries(cx, container) {
            height += entry.gap;
            let stretched = Size::new(
                available_width - entry.indent,
                cx.preferred_size(entry.widget).height,
            );
            let target = stretched.overridden_by(cx.fixed_size(entry.widget));
            placements.push(Placement::new(
                entry.widget,
                Point::new(margin + entry.indent, height),
                target,
            ));
            height += target.height;
        }
        placements
    }
}
