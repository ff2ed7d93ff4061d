//! Widget tree visualization for debugging.
//!
//! Tracing targets and span names live in [`trellis_core::logging`]; this
//! module adds a formatter that renders a [`WidgetTree`] as text.
//!
//! ```ignore
//! use trellis::logging::{TreeFormatOptions, WidgetTreeDebug};
//!
//! let debug = WidgetTreeDebug::with_options(TreeFormatOptions::detailed());
//! tracing::debug!("{}", debug.format_tree(screen.tree()));
//! ```

use std::fmt::{self, Write};

use crate::widget::{WidgetId, WidgetTree};

pub use trellis_core::logging::{PerfSpan, span_names, targets};

/// Branch drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// One dash per level, no branch lines.
    Compact,
}

/// What [`WidgetTreeDebug`] prints for each widget.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Print widget ids.
    pub show_ids: bool,
    /// Print behaviour type names.
    pub show_types: bool,
    /// Print position and size.
    pub show_geometry: bool,
    /// Print hidden/disabled/focused flags.
    pub show_flags: bool,
    /// Deepest level printed; `None` for unlimited.
    pub max_depth: Option<usize>,
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_types: true,
            show_geometry: false,
            show_flags: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Everything, including geometry and flags.
    pub fn detailed() -> Self {
        Self {
            show_geometry: true,
            show_flags: true,
            ..Default::default()
        }
    }

    /// Names only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_types: false,
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Formats widget subtrees as indented text.
#[derive(Debug, Clone, Default)]
pub struct WidgetTreeDebug {
    options: TreeFormatOptions,
}

impl WidgetTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TreeFormatOptions {
        &self.options
    }

    /// The whole tree, with a header line.
    pub fn format_tree(&self, tree: &WidgetTree) -> String {
        let mut output = format!("Widget Tree ({} widgets):\n", tree.len());
        output.push_str(&self.format_subtree(tree, tree.root()));
        output
    }

    /// `root` and its descendants. A stale id formats as an empty string.
    pub fn format_subtree(&self, tree: &WidgetTree, root: WidgetId) -> String {
        Subtree {
            debug: self,
            tree,
            root,
        }
        .to_string()
    }

    fn write_node(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
        depth: usize,
        is_last: bool,
        out: &mut impl Write,
    ) -> fmt::Result {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }
        let Some(base) = tree.base(id) else {
            return Ok(());
        };

        out.write_str(&self.build_prefix(depth, is_last))?;
        out.write_str(if base.name().is_empty() {
            "(unnamed)"
        } else {
            base.name()
        })?;
        if self.options.show_ids {
            write!(out, " [{id:?}]")?;
        }
        if self.options.show_types {
            write!(out, " ({})", tree.type_name(id))?;
        }
        if self.options.show_geometry {
            let (pos, size) = (base.pos(), base.size());
            write!(out, " @({}, {}) {}x{}", pos.x, pos.y, size.width, size.height)?;
        }
        if self.options.show_flags {
            if !base.is_visible() {
                out.write_str(" hidden")?;
            }
            if !base.is_enabled() {
                out.write_str(" disabled")?;
            }
            if base.is_focused() {
                out.write_str(" focused")?;
            }
        }
        out.write_char('\n')?;

        let children = tree.children(id);
        for (i, &child) in children.iter().enumerate() {
            self.write_node(tree, child, depth + 1, i + 1 == children.len(), out)?;
        }
        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }
        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "- ", "- "),
        };

        let mut prefix = String::new();
        for _ in 0..depth - 1 {
            prefix.push_str(branch);
            prefix.extend(std::iter::repeat_n(' ', self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}

struct Subtree<'a> {
    debug: &'a WidgetTreeDebug,
    tree: &'a WidgetTree,
    root: WidgetId,
}

impl fmt::Display for Subtree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.debug.write_node(self.tree, self.root, 0, true, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::widgets::{Button, Window};
    use crate::widget::Panel;
    use trellis_core::{Point, Size};

    fn sample() -> (WidgetTree, WidgetId, WidgetId) {
        let mut tree = WidgetTree::new(Panel::new());
        let root = tree.root();
        tree.base_mut(root).unwrap().set_name("screen");
        let window = tree.insert(root, Window::new("Main")).unwrap();
        tree.base_mut(window).unwrap().set_name("main");
        let button = tree.insert(window, Button::new("OK")).unwrap();
        {
            let base = tree.base_mut(button).unwrap();
            base.set_name("ok");
            base.set_pos(Point::new(5, 6));
            base.set_size(Size::new(40, 20));
            base.set_enabled(false);
        }
        (tree, window, button)
    }

    #[test]
    fn test_tree_format_hierarchy() {
        let (tree, _, _) = sample();
        let output = WidgetTreeDebug::new().format_tree(&tree);
        assert!(output.starts_with("Widget Tree (3 widgets):"));
        assert!(output.contains("screen"));
        assert!(output.contains("\u{2514}\u{2500}\u{2500} main"));
        assert!(output.contains("(Window)"));
        assert!(output.contains("ok"));
    }

    #[test]
    fn test_tree_format_minimal() {
        let (tree, window, _) = sample();
        let output =
            WidgetTreeDebug::with_options(TreeFormatOptions::minimal()).format_subtree(&tree, window);
        assert!(output.starts_with("main\n"));
        assert!(!output.contains("Button"));
        assert!(!output.contains('['));
    }

    #[test]
    fn test_tree_format_detailed_ascii() {
        let (tree, window, _) = sample();
        let options = TreeFormatOptions::detailed().with_style(TreeStyle::Ascii);
        let output = WidgetTreeDebug::with_options(options).format_subtree(&tree, window);
        assert!(output.contains("`-- ok"));
        assert!(output.contains("@(5, 6) 40x20 disabled"));
    }

    #[test]
    fn test_tree_format_max_depth() {
        let (tree, _, _) = sample();
        let options = TreeFormatOptions::minimal().with_max_depth(1);
        let output = WidgetTreeDebug::with_options(options).format_tree(&tree);
        assert!(output.contains("main"));
        assert!(!output.contains("ok"));
    }

    #[test]
    fn test_stale_id_formats_empty() {
        let (mut tree, window, _) = sample();
        tree.remove(window).unwrap();
        assert_eq!(WidgetTreeDebug::new().format_subtree(&tree, window), "");
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new(span_names::FRAME);
    }
}
