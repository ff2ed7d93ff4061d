//! Focus path management.
//!
//! The focus path is the chain of widgets from the focused leaf up to, but
//! not including, the root. Every widget on the path has its focused flag
//! set; every other widget has it cleared. Keyboard, text and IME input is
//! routed along this path.
//!
//! Focus changes update the flags immediately. The matching focus events are
//! queued as [`PendingNotice`]s and delivered by the screen once the current
//! dispatch has unwound, because the widgets involved may be in the middle
//! of handling an event themselves.

use trellis_core::logging::targets;

use super::tree::{WidgetId, WidgetTree};

/// The current focus chain, leaf first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusPath {
    entries: Vec<WidgetId>,
}

impl FocusPath {
    /// The focused leaf.
    pub fn leaf(&self) -> Option<WidgetId> {
        self.entries.first().copied()
    }

    /// The outermost entry (a direct child of the root).
    pub fn top(&self) -> Option<WidgetId> {
        self.entries.last().copied()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.entries.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries from the leaf outward.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = WidgetId> + '_ {
        self.entries.iter().copied()
    }

    pub fn as_slice(&self) -> &[WidgetId] {
        &self.entries
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(WidgetId) -> bool) {
        self.entries.retain(|&id| keep(id));
    }
}

/// Work deferred until the current dispatch has unwound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PendingNotice {
    /// Deliver a focus event.
    Focus { widget: WidgetId, focused: bool },
    /// Bring the top-level window containing `widget` to the front.
    Raise { widget: WidgetId },
}

impl PendingNotice {
    pub(crate) fn widget(&self) -> WidgetId {
        match *self {
            PendingNotice::Focus { widget, .. } | PendingNotice::Raise { widget } => widget,
        }
    }
}

impl WidgetTree {
    /// The current focus path.
    pub fn focus_path(&self) -> &FocusPath {
        &self.focus
    }

    /// The focused leaf widget.
    pub fn focused_widget(&self) -> Option<WidgetId> {
        self.focus.leaf()
    }

    /// Focus `id`, rebuilding the focus path to the chain from the root to it.
    ///
    /// Widgets leaving the path are unflagged and receive a focus-lost event;
    /// widgets joining it are flagged and receive a focus-gained event, outer
    /// widgets first. Widgets on both the old and the new path are untouched.
    /// Requesting focus on the root clears the path.
    ///
    /// Returns `false` if `id` is not attached under the root.
    pub fn request_focus(&mut self, id: WidgetId) -> bool {
        let mut chain = Vec::new();
        let mut current = Some(id);
        let mut reached_root = false;
        while let Some(w) = current {
            if w == self.root() {
                reached_root = true;
                break;
            }
            if !self.contains_widget(w) {
                break;
            }
            chain.push(w);
            current = self.parent(w);
        }
        if !reached_root {
            tracing::debug!(target: targets::FOCUS, ?id, "focus request on detached widget ignored");
            return false;
        }
        self.apply_focus_path(chain);
        true
    }

    /// Clear the focus path.
    pub fn clear_focus(&mut self) {
        self.apply_focus_path(Vec::new());
    }

    fn apply_focus_path(&mut self, chain: Vec<WidgetId>) {
        let old = std::mem::take(&mut self.focus.entries);

        for &w in &old {
            if !chain.contains(&w) {
                if let Some(base) = self.base_mut(w) {
                    base.set_focused(false);
                }
                self.pending.push(PendingNotice::Focus {
                    widget: w,
                    focused: false,
                });
            }
        }
        for &w in chain.iter().rev() {
            if let Some(base) = self.base_mut(w) {
                base.set_focused(true);
            }
            if !old.contains(&w) {
                self.pending.push(PendingNotice::Focus {
                    widget: w,
                    focused: true,
                });
            }
        }

        if let Some(&leaf) = chain.first() {
            self.pending.push(PendingNotice::Raise { widget: leaf });
        }
        tracing::debug!(target: targets::FOCUS, leaf = ?chain.first(), depth = chain.len(), "focus path updated");
        self.focus.entries = chain;
    }

    pub(crate) fn take_pending(&mut self) -> Vec<PendingNotice> {
        std::mem::take(&mut self.pending)
    }
}
