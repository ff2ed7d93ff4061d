//! Helpers shared by the unit tests.

use trellis_core::Size;

use super::context::{Environment, LayoutCtx};
use super::traits::{Panel, Widget};
use super::tree::{WidgetId, WidgetTree};
use super::widgets::Window;

/// A leaf with a fixed preferred size, or a container measured by its layout.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SizedBox {
    size: Size,
}

impl SizedBox {
    pub(crate) fn new(width: i32, height: i32) -> Self {
        Self {
            size: Size::new(width, height),
        }
    }
}

impl Widget for SizedBox {
    fn type_name(&self) -> &'static str {
        "SizedBox"
    }

    fn preferred_size(&self, cx: &LayoutCtx<'_>, id: WidgetId) -> Size {
        if cx.layout(id).is_some() {
            cx.default_preferred_size(id)
        } else {
            self.size
        }
    }
}

/// A tree with a plain root and a headless environment.
pub(crate) fn headless_tree() -> (WidgetTree, Environment) {
    (WidgetTree::new(Panel::new()), Environment::headless())
}

pub(crate) fn titled_window(tree: &mut WidgetTree, parent: WidgetId, title: &str) -> WidgetId {
    tree.insert(parent, Window::new(title))
        .expect("parent is live")
}
