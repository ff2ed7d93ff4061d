//! Per-node state shared by every widget kind.
//!
//! [`WidgetBase`] holds the attributes the tree, the layout engine and the
//! dispatcher read and write directly: geometry, fixed-size overrides and the
//! visibility/enabled/focus/hover flags. Kind-specific state (a button's
//! caption, a window's title) lives in the widget behaviour instead.

use trellis_core::{Point, Rect, Size};

use super::cursor::CursorShape;

/// Generic attributes of a widget node.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetBase {
    pos: Point,
    size: Size,
    fixed_size: Size,
    visible: bool,
    enabled: bool,
    focusable: bool,
    focused: bool,
    hovered: bool,
    font_size: Option<i32>,
    cursor: CursorShape,
    name: String,
    tooltip: String,
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetBase {
    /// Create a visible, enabled, focusable base at the origin with zero size.
    pub fn new() -> Self {
        Self {
            pos: Point::ZERO,
            size: Size::ZERO,
            fixed_size: Size::ZERO,
            visible: true,
            enabled: true,
            focusable: true,
            focused: false,
            hovered: false,
            font_size: None,
            cursor: CursorShape::Arrow,
            name: String::new(),
            tooltip: String::new(),
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Position relative to the parent.
    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    /// Fixed-size overrides; a zero component means "let layout decide".
    pub fn fixed_size(&self) -> Size {
        self.fixed_size
    }

    pub fn set_fixed_size(&mut self, size: Size) {
        self.fixed_size = size;
    }

    pub fn set_fixed_width(&mut self, width: i32) {
        self.fixed_size.width = width;
    }

    pub fn set_fixed_height(&mut self, height: i32) {
        self.fixed_size.height = height;
    }

    /// The node's rectangle in its parent's coordinate space.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    /// The node's rectangle in its own coordinate space.
    pub fn local_rect(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Inclusive hit test of a point given in the parent's coordinate space.
    pub fn contains(&self, point: Point) -> bool {
        self.rect().contains(point)
    }

    /// The current size with any fixed components applied.
    ///
    /// Layouts use this as the container extent they distribute.
    pub fn effective_size(&self) -> Size {
        self.size.overridden_by(self.fixed_size)
    }

    // =========================================================================
    // Flags
    // =========================================================================

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether an unconsumed primary press on this widget requests focus.
    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn set_focusable(&mut self, focusable: bool) {
        self.focusable = focusable;
    }

    /// Whether this widget is on the focus path.
    ///
    /// Maintained by the tree's focus handling; see `WidgetTree::request_focus`.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Whether the pointer is over this widget.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    // =========================================================================
    // Appearance & identity
    // =========================================================================

    /// Font size override, if any.
    pub fn font_size(&self) -> Option<i32> {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: Option<i32>) {
        self.font_size = size;
    }

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor = cursor;
    }

    /// Opaque string id, for lookups and debug output.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = tooltip.into();
    }
}
