//! Mapping of key presses to text-editing actions.
//!
//! Besides the usual navigation keys, the Emacs-style control bindings found
//! in most platform text fields are recognized (`Ctrl+B`/`Ctrl+F` to move,
//! `Ctrl+K` to cut to the end of the line, `Ctrl+Y` to yank it back).
//! Clipboard shortcuts use the platform command modifier: Control, or Super
//! on macOS, where `Ctrl+A` moves to the line start instead of selecting all.

use super::events::{Key, KeyboardModifiers};

/// An editing operation requested from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditAction {
    MoveLeft,
    MoveRight,
    MoveLineStart,
    MoveLineEnd,
    Backspace,
    Delete,
    /// Cut from the caret to the end of the line into the yank buffer.
    CutToLineEnd,
    /// Insert the yank buffer at the caret.
    Yank,
    DeleteWordLeft,
    Enter,
    SelectAll,
    Copy,
    Cut,
    Paste,
}

impl EditAction {
    /// The action bound to `key` with `modifiers` held, if any.
    pub fn detect(key: Key, modifiers: KeyboardModifiers) -> Option<Self> {
        Self::detect_for(key, modifiers, cfg!(target_os = "macos"))
    }

    fn detect_for(key: Key, modifiers: KeyboardModifiers, mac: bool) -> Option<Self> {
        let control = modifiers == KeyboardModifiers::CTRL;
        let meta = modifiers
            == KeyboardModifiers {
                meta: true,
                ..KeyboardModifiers::NONE
            };
        let alt = modifiers
            == KeyboardModifiers {
                alt: true,
                ..KeyboardModifiers::NONE
            };
        let command = if mac { meta } else { control };

        let action = match key {
            Key::Left => Self::MoveLeft,
            Key::Right => Self::MoveRight,
            Key::Home => Self::MoveLineStart,
            Key::End => Self::MoveLineEnd,
            Key::Backspace => Self::Backspace,
            Key::Delete if alt => Self::DeleteWordLeft,
            Key::Delete => Self::Delete,
            Key::Enter => Self::Enter,
            Key::Character(c) => match c {
                'b' if control => Self::MoveLeft,
                'f' if control => Self::MoveRight,
                'a' if control && mac => Self::MoveLineStart,
                'a' if control || meta => Self::SelectAll,
                'e' if control => Self::MoveLineEnd,
                'h' if control => Self::Backspace,
                'd' if control => Self::Delete,
                'k' if control => Self::CutToLineEnd,
                'y' if control => Self::Yank,
                'c' if command => Self::Copy,
                'x' if command => Self::Cut,
                'v' if command => Self::Paste,
                _ => return None,
            },
            _ => return None,
        };
        Some(action)
    }
}
