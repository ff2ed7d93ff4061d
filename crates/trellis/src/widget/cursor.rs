//! Cursor shapes widgets can ask for.
//!
//! The screen reports the shape of the widget under the pointer (or of the
//! drag target during a drag); the windowing backend turns it into a system
//! cursor through [`CursorShape::to_cursor_icon`].

use cursor_icon::CursorIcon;

/// The shape (icon) of the mouse cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorShape {
    /// The default arrow cursor.
    #[default]
    Arrow,
    /// An I-beam cursor, for text.
    IBeam,
    /// A crosshair cursor, for precise picking.
    Crosshair,
    /// A pointing hand, for clickable elements.
    Hand,
    /// Horizontal resize arrows.
    HResize,
    /// Vertical resize arrows.
    VResize,
}

impl CursorShape {
    /// Convert to the platform-neutral cursor icon.
    pub fn to_cursor_icon(self) -> CursorIcon {
        match self {
            CursorShape::Arrow => CursorIcon::Default,
            CursorShape::IBeam => CursorIcon::Text,
            CursorShape::Crosshair => CursorIcon::Crosshair,
            CursorShape::Hand => CursorIcon::Pointer,
            CursorShape::HResize => CursorIcon::EwResize,
            CursorShape::VResize => CursorIcon::NsResize,
        }
    }
}

impl From<CursorShape> for CursorIcon {
    fn from(shape: CursorShape) -> Self {
        shape.to_cursor_icon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_icon_mapping() {
        assert_eq!(CursorShape::default().to_cursor_icon(), CursorIcon::Default);
        assert_eq!(CursorIcon::from(CursorShape::IBeam), CursorIcon::Text);
        assert_eq!(CursorShape::HResize.to_cursor_icon(), CursorIcon::EwResize);
    }
}
