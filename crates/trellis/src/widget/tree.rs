//! The widget arena.
//!
//! Widgets are stored in a [`SlotMap`] keyed by [`WidgetId`]. A node owns its
//! children through the id list in `children`; the `parent` field is a plain
//! back-reference. Removing a node removes its whole subtree from the arena,
//! so ids of removed widgets simply stop resolving.
//!
//! # Behaviour checkout
//!
//! While a widget's event handler runs, its behaviour is taken out of the
//! node ("checked out") so the handler can hold `&mut self` and `&mut
//! WidgetTree` at the same time. Nested dispatch checks out one node per
//! level. Operations that need another widget's behaviour (downcasts, hooks)
//! see `None` for checked-out nodes and fall back to default behaviour. The
//! node keeps a copy of the behaviour's [`LayoutRole`], refreshed on every
//! checkin, so window headers and group headings survive a checkout.

use slotmap::{SlotMap, new_key_type};
use trellis_core::Point;
use trellis_core::logging::targets;

use super::base::WidgetBase;
use super::focus::{FocusPath, PendingNotice};
use super::layout::{Layout, LayoutKind};
use super::traits::{LayoutRole, Widget};
use super::widgets::{Label, Popup, Window};
use crate::error::TreeError;

new_key_type! {
    /// A unique identifier for a widget in a [`WidgetTree`].
    pub struct WidgetId;
}

static_assertions::assert_impl_all!(WidgetId: Copy, Send, Sync);

/// A node of the widget arena.
pub(crate) struct WidgetNode {
    pub(crate) base: WidgetBase,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) layout: Option<LayoutKind>,
    pub(crate) widget: Option<Box<dyn Widget>>,
    pub(crate) role: LayoutRole,
}

impl WidgetNode {
    fn new(parent: Option<WidgetId>) -> Self {
        Self {
            base: WidgetBase::new(),
            parent,
            children: Vec::new(),
            layout: None,
            widget: None,
            role: LayoutRole::Plain,
        }
    }

    fn store_widget(&mut self, widget: Box<dyn Widget>) {
        self.role = widget.layout_role();
        self.widget = Some(widget);
    }
}

/// Arena of widget nodes rooted at a single root widget.
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, WidgetNode>,
    root: WidgetId,
    pub(crate) focus: FocusPath,
    pub(crate) pending: Vec<PendingNotice>,
    drag_target: Option<WidgetId>,
    layout_requested: bool,
}

impl WidgetTree {
    /// Create a tree whose root has the given behaviour.
    pub fn new(root: impl Widget) -> Self {
        let mut nodes = SlotMap::with_key();
        let root_id = nodes.insert(WidgetNode::new(None));
        let mut tree = Self {
            nodes,
            root: root_id,
            focus: FocusPath::default(),
            pending: Vec::new(),
            drag_target: None,
            layout_requested: false,
        };
        let mut behaviour: Box<dyn Widget> = Box::new(root);
        behaviour.attached(&mut tree, root_id);
        if let Some(node) = tree.nodes.get_mut(root_id) {
            node.store_widget(behaviour);
        }
        tree
    }

    /// The root widget.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Number of live widgets, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a live widget.
    pub fn contains_widget(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Create a widget as the last child of `parent`.
    pub fn insert<W: Widget>(&mut self, parent: WidgetId, widget: W) -> Result<WidgetId, TreeError> {
        self.insert_boxed(parent, Box::new(widget))
    }

    /// Create a widget from an already boxed behaviour.
    pub fn insert_boxed(
        &mut self,
        parent: WidgetId,
        mut widget: Box<dyn Widget>,
    ) -> Result<WidgetId, TreeError> {
        if !self.nodes.contains_key(parent) {
            return Err(TreeError::StaleWidget(parent));
        }
        let id = self.nodes.insert(WidgetNode::new(Some(parent)));
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id);
        }
        tracing::trace!(target: targets::TREE, ?id, ?parent, kind = widget.type_name(), "widget created");

        widget.attached(self, id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.store_widget(widget);
        }
        Ok(id)
    }

    /// Append a detached widget to `parent`'s children.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), TreeError> {
        if child == self.root {
            return Err(TreeError::RootRemoval);
        }
        let Some(child_node) = self.nodes.get(child) else {
            return Err(TreeError::StaleWidget(child));
        };
        if child_node.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if !self.nodes.contains_key(parent) {
            return Err(TreeError::StaleWidget(parent));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::WouldCreateCycle { parent, child });
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach `child` from its parent without destroying it.
    ///
    /// The widget keeps its subtree and can be attached elsewhere with
    /// [`add_child`](Self::add_child). Layout anchors, focus and drag
    /// references to the subtree are cleared.
    pub fn detach(&mut self, child: WidgetId) -> Result<(), TreeError> {
        if child == self.root {
            return Err(TreeError::RootRemoval);
        }
        let Some(parent) = self.nodes.get(child).map(|n| n.parent) else {
            return Err(TreeError::StaleWidget(child));
        };
        if let Some(parent) = parent {
            self.unlink(parent, child);
        }
        let subtree = self.subtree(child);
        self.forget_references(&subtree);
        Ok(())
    }

    /// Destroy `child`, which must be a child of `parent`.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), TreeError> {
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        self.remove(child)
    }

    /// Destroy the child of `parent` at `index`.
    pub fn remove_child_at(&mut self, parent: WidgetId, index: usize) -> Result<WidgetId, TreeError> {
        let Some(node) = self.nodes.get(parent) else {
            return Err(TreeError::StaleWidget(parent));
        };
        let Some(&child) = node.children.get(index) else {
            return Err(TreeError::IndexOutOfRange {
                parent,
                index,
                len: node.children.len(),
            });
        };
        self.remove(child)?;
        Ok(child)
    }

    /// Destroy a widget and its whole subtree.
    ///
    /// Within this one call the widget is unlinked from its parent, removed
    /// from the parent's layout anchors, dropped from the focus path and the
    /// drag target, and every removed behaviour is disposed. Overlay widgets
    /// named by a behaviour's [`dependents`](Widget::dependents) are removed
    /// as well.
    pub fn remove(&mut self, id: WidgetId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootRemoval);
        }
        let Some(parent) = self.nodes.get(id).map(|n| n.parent) else {
            return Err(TreeError::StaleWidget(id));
        };
        if let Some(parent) = parent {
            self.unlink(parent, id);
        }

        let subtree = self.subtree(id);
        self.forget_references(&subtree);

        let mut dependents = Vec::new();
        for &widget_id in &subtree {
            if let Some(node) = self.nodes.remove(widget_id) {
                if let Some(mut widget) = node.widget {
                    dependents.extend(widget.dependents());
                    widget.dispose();
                }
            }
        }
        tracing::debug!(target: targets::TREE, ?id, removed = subtree.len(), "widget removed");

        self.remove_dependents(dependents);
        Ok(())
    }

    fn remove_dependents(&mut self, dependents: Vec<WidgetId>) {
        for dependent in dependents {
            if self.nodes.contains_key(dependent) && dependent != self.root {
                if let Err(err) = self.remove(dependent) {
                    tracing::warn!(target: targets::TREE, ?dependent, %err, "dependent removal failed");
                }
            }
        }
    }

    /// Remove `child` from `parent`'s children and layout, and clear its parent.
    fn unlink(&mut self, parent: WidgetId, child: WidgetId) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != child);
            if let Some(layout) = node.layout.as_mut() {
                layout.forget(child);
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
    }

    /// Drop focus-path entries and the drag target that point into `subtree`.
    fn forget_references(&mut self, subtree: &[WidgetId]) {
        self.focus.retain(|id| !subtree.contains(&id));
        for &id in subtree {
            if let Some(node) = self.nodes.get_mut(id) {
                node.base.set_focused(false);
            }
        }
        if self.drag_target.is_some_and(|d| subtree.contains(&d)) {
            tracing::debug!(target: targets::TREE, "drag target removed mid-drag");
            self.drag_target = None;
        }
        self.pending.retain(|notice| !subtree.contains(&notice.widget()));
    }

    /// `id` and all its descendants, parents before children.
    pub fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Move `child` to the end of its parent's children (top of the z-order).
    pub fn raise(&mut self, child: WidgetId) -> Result<(), TreeError> {
        let Some(parent) = self.parent(child) else {
            return Err(TreeError::StaleWidget(child));
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&c| c != child);
            node.children.push(child);
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Children in paint order; empty for unknown ids.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_count(&self, id: WidgetId) -> usize {
        self.children(id).len()
    }

    pub fn child_index(&self, parent: WidgetId, child: WidgetId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(w) = current {
            if w == ancestor {
                return true;
            }
            current = self.parent(w);
        }
        false
    }

    pub fn base(&self, id: WidgetId) -> Option<&WidgetBase> {
        self.nodes.get(id).map(|n| &n.base)
    }

    pub fn base_mut(&mut self, id: WidgetId) -> Option<&mut WidgetBase> {
        self.nodes.get_mut(id).map(|n| &mut n.base)
    }

    /// The widget's behaviour, unless it is checked out.
    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.nodes.get(id).and_then(|n| n.widget.as_deref())
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut dyn Widget> {
        match self.nodes.get_mut(id) {
            Some(node) => match node.widget.as_mut() {
                Some(widget) => Some(widget.as_mut()),
                None => None,
            },
            None => None,
        }
    }

    /// The behaviour downcast to a concrete widget type.
    pub fn downcast_ref<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.widget(id)?.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.widget_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Short type name of the behaviour, `"?"` while checked out.
    pub fn type_name(&self, id: WidgetId) -> &'static str {
        self.widget(id).map_or("?", |w| w.type_name())
    }

    /// Position of `id` in root coordinates.
    ///
    /// Recomputed on every call; it changes whenever any ancestor moves.
    pub fn absolute_position(&self, id: WidgetId) -> Point {
        let mut pos = Point::ZERO;
        let mut current = Some(id);
        while let Some(w) = current {
            if let Some(node) = self.nodes.get(w) {
                pos += node.base.pos();
                current = node.parent;
            } else {
                break;
            }
        }
        pos
    }

    /// Visible and every ancestor visible.
    pub fn visible_recursive(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        let mut seen = false;
        while let Some(w) = current {
            let Some(node) = self.nodes.get(w) else {
                return false;
            };
            if !node.base.is_visible() {
                return false;
            }
            seen = true;
            current = node.parent;
        }
        seen
    }

    /// Inclusive hit test of `point` given in `id`'s parent coordinates.
    pub fn contains(&self, id: WidgetId, point: Point) -> bool {
        self.base(id).is_some_and(|b| b.contains(point))
    }

    /// Deepest visible widget under `point`, given in `id`'s own coordinates.
    ///
    /// Children are tested topmost first (reverse paint order). Returns `id`
    /// itself when no child matches and the point is inside it, `None` when
    /// the point is outside.
    pub fn find_widget(&self, id: WidgetId, point: Point) -> Option<WidgetId> {
        let node = self.nodes.get(id)?;
        for &child in node.children.iter().rev() {
            let Some(child_node) = self.nodes.get(child) else {
                continue;
            };
            if child_node.base.is_visible() && child_node.base.contains(point) {
                return self.find_widget(child, point - child_node.base.pos());
            }
        }
        if node.base.local_rect().contains(point) {
            Some(id)
        } else {
            None
        }
    }

    /// [`find_widget`](Self::find_widget) from the root, in root coordinates.
    pub fn find_widget_at(&self, point: Point) -> Option<WidgetId> {
        let root_pos = self.base(self.root).map_or(Point::ZERO, |b| b.pos());
        self.find_widget(self.root, point - root_pos)
    }

    /// The nearest [`Window`] or [`Popup`] at or above `id`.
    pub fn find_window(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = Some(id);
        while let Some(w) = current {
            if self.downcast_ref::<Window>(w).is_some() || self.downcast_ref::<Popup>(w).is_some() {
                return Some(w);
            }
            current = self.parent(w);
        }
        None
    }

    /// The title of `id` if it is a [`Window`] with a non-empty title.
    pub fn window_title(&self, id: WidgetId) -> Option<&str> {
        let title = match self.downcast_ref::<Window>(id) {
            Some(window) => window.title(),
            None => match self.nodes.get(id).map(|n| &n.role) {
                Some(LayoutRole::Window { title }) => title.as_str(),
                _ => return None,
            },
        };
        Some(title).filter(|t| !t.is_empty())
    }

    /// The caption of `id` if it is a [`Label`].
    pub fn label_caption(&self, id: WidgetId) -> Option<&str> {
        match self.downcast_ref::<Label>(id) {
            Some(label) => Some(label.caption()),
            None => match self.nodes.get(id).map(|n| &n.role) {
                Some(LayoutRole::Label { caption }) => Some(caption.as_str()),
                _ => None,
            },
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn layout(&self, id: WidgetId) -> Option<&LayoutKind> {
        self.nodes.get(id).and_then(|n| n.layout.as_ref())
    }

    pub fn layout_mut(&mut self, id: WidgetId) -> Option<&mut LayoutKind> {
        self.nodes.get_mut(id).and_then(|n| n.layout.as_mut())
    }

    /// Give `id` a layout strategy, replacing any previous one.
    pub fn set_layout(&mut self, id: WidgetId, layout: impl Into<LayoutKind>) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(id).ok_or(TreeError::StaleWidget(id))?;
        node.layout = Some(layout.into());
        self.layout_requested = true;
        Ok(())
    }

    pub fn clear_layout(&mut self, id: WidgetId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.layout = None;
        }
    }

    /// Ask the owner of the tree to run a layout pass before the next frame.
    pub fn request_layout(&mut self) {
        self.layout_requested = true;
    }

    pub(crate) fn take_layout_request(&mut self) -> bool {
        std::mem::take(&mut self.layout_requested)
    }

    // =========================================================================
    // Pointer grab
    // =========================================================================

    /// The widget that receives drag events until the button is released.
    pub fn drag_target(&self) -> Option<WidgetId> {
        self.drag_target.filter(|&id| self.nodes.contains_key(id))
    }

    pub(crate) fn set_drag_target(&mut self, target: Option<WidgetId>) {
        self.drag_target = target;
    }

    // =========================================================================
    // Behaviour checkout
    // =========================================================================

    /// Take the behaviour out of its node.
    pub(crate) fn take_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(id).and_then(|n| n.widget.take())
    }

    /// Put a checked-out behaviour back.
    ///
    /// If the node was removed while the behaviour was out, the behaviour is
    /// disposed and its dependents are removed instead.
    pub(crate) fn restore_widget(&mut self, id: WidgetId, mut widget: Box<dyn Widget>) {
        match self.nodes.get_mut(id) {
            Some(node) => node.store_widget(widget),
            None => {
                let dependents = widget.dependents();
                widget.dispose();
                self.remove_dependents(dependents);
            }
        }
    }

    /// Run `f` with the behaviour of `id` checked out.
    ///
    /// Returns `None` if the widget does not exist or is already checked out.
    pub fn with_widget<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetTree) -> R,
    ) -> Option<R> {
        let mut widget = self.take_widget(id)?;
        let result = f(widget.as_mut(), self);
        self.restore_widget(id, widget);
        Some(result)
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("root", &self.root)
            .field("len", &self.nodes.len())
            .field("focus", &self.focus)
            .field("drag_target", &self.drag_target)
            .finish()
    }
}
