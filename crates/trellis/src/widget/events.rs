//! Input events delivered to widgets.
//!
//! Every positional event carries its position in the *receiving widget's
//! own* coordinate space. The dispatcher translates positions as it walks
//! down the tree, so a handler never has to subtract ancestor offsets.

use trellis_core::Point;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Super key is held (Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// The platform shortcut modifier (Control, or Super on macOS).
    pub fn command(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta
        } else {
            self.control
        }
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Secondary button (usually right).
    Right = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
    /// Additional button 1.
    Button4 = 3,
    /// Additional button 2.
    Button5 = 4,
}

impl MouseButton {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Bitmask of the mouse buttons currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MouseButtons(u8);

impl MouseButtons {
    pub const NONE: Self = Self(0);

    pub fn contains(self, button: MouseButton) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn insert(&mut self, button: MouseButton) {
        self.0 |= button.bit();
    }

    pub fn remove(&mut self, button: MouseButton) {
        self.0 &= !button.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        Self(button.bit())
    }
}

/// Keys the built-in widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Delete,
    Enter,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    /// A key that produces a character, reported in lowercase.
    Character(char),
    /// Any other key; the scancode identifies it.
    Unknown,
}

/// Whether a key went down, came up or auto-repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

impl KeyAction {
    /// Press or repeat.
    pub fn is_down(self) -> bool {
        !matches!(self, KeyAction::Release)
    }
}

/// A mouse button went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonEvent {
    /// Pointer position in the receiver's coordinates.
    pub pos: Point,
    pub button: MouseButton,
    /// `true` on press, `false` on release.
    pub pressed: bool,
    pub modifiers: KeyboardModifiers,
}

/// The pointer moved (also used for drag events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseMotionEvent {
    /// Pointer position in the receiver's coordinates.
    pub pos: Point,
    /// Movement since the previous event.
    pub rel: Point,
    /// Buttons held during the move.
    pub buttons: MouseButtons,
    pub modifiers: KeyboardModifiers,
}

/// The pointer entered or left a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEnterEvent {
    pub pos: Point,
    pub entered: bool,
}

/// A scroll wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    pub pos: Point,
    pub delta: Point,
}

/// A widget joined or left the focus path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    pub focused: bool,
}

/// A key changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub scancode: i32,
    pub action: KeyAction,
    pub modifiers: KeyboardModifiers,
}

/// A character was typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharEvent {
    pub ch: char,
}

/// An input method is composing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImePreeditEvent {
    /// The composition string.
    pub text: String,
    /// Byte lengths of the clause blocks in `text`.
    pub blocks: Vec<usize>,
    /// Index of the block being edited.
    pub focused_block: usize,
}

/// A widget event.
///
/// Handlers return `true` when they consumed the event, which stops further
/// propagation.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    MouseButton(MouseButtonEvent),
    MouseMotion(MouseMotionEvent),
    /// Motion delivered exclusively to the drag target.
    MouseDrag(MouseMotionEvent),
    MouseEnter(MouseEnterEvent),
    Scroll(ScrollEvent),
    Focus(FocusEvent),
    Key(KeyEvent),
    Char(CharEvent),
    ImePreedit(ImePreeditEvent),
    /// The input method was switched on or off; the host queries state itself.
    ImeStatus,
}

impl WidgetEvent {
    /// Pointer position for positional events.
    pub fn pos(&self) -> Option<Point> {
        match self {
            Self::MouseButton(e) => Some(e.pos),
            Self::MouseMotion(e) | Self::MouseDrag(e) => Some(e.pos),
            Self::MouseEnter(e) => Some(e.pos),
            Self::Scroll(e) => Some(e.pos),
            _ => None,
        }
    }

    /// The same event with its position moved by `-offset`.
    ///
    /// Used to re-express an event in a child's coordinates, where `offset`
    /// is the child's position.
    pub fn translated(&self, offset: Point) -> Self {
        let mut event = self.clone();
        match &mut event {
            Self::MouseButton(e) => e.pos -= offset,
            Self::MouseMotion(e) | Self::MouseDrag(e) => e.pos -= offset,
            Self::MouseEnter(e) => e.pos -= offset,
            Self::Scroll(e) => e.pos -= offset,
            _ => {}
        }
        event
    }

    /// Whether the event is keyboard, text or IME input.
    pub fn is_text_input(&self) -> bool {
        matches!(
            self,
            Self::Key(_) | Self::Char(_) | Self::ImePreedit(_) | Self::ImeStatus
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_button_mask() {
        let mut buttons = MouseButtons::NONE;
        buttons.insert(MouseButton::Left);
        buttons.insert(MouseButton::Middle);
        assert!(buttons.contains(MouseButton::Left));
        assert!(!buttons.contains(MouseButton::Right));
        assert_eq!(buttons.bits(), 0b101);
        buttons.remove(MouseButton::Left);
        assert_eq!(buttons, MouseButtons::from(MouseButton::Middle));
    }

    #[test]
    fn test_translate_event() {
        let event = WidgetEvent::MouseButton(MouseButtonEvent {
            pos: Point::new(50, 40),
            button: MouseButton::Left,
            pressed: true,
            modifiers: KeyboardModifiers::NONE,
        });
        assert_eq!(
            event.translated(Point::new(10, 15)).pos(),
            Some(Point::new(40, 25))
        );
        assert!(WidgetEvent::ImeStatus.translated(Point::new(1, 1)).pos().is_none());
    }
}
