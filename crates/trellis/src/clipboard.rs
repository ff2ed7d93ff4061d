//! Clipboard access for text-editing widgets.
//!
//! Widgets reach the clipboard through the screen environment, so the backend
//! can be swapped: [`MemoryClipboard`] keeps text in process (headless hosts,
//! tests), [`SystemClipboard`] wraps the `arboard` crate when the
//! `system-clipboard` feature is enabled.

/// Error type for clipboard operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("clipboard error: {message}")]
pub struct ClipboardError {
    message: String,
}

impl ClipboardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ClipboardError> for crate::error::Error {
    fn from(err: ClipboardError) -> Self {
        crate::error::Error::Clipboard(err.message)
    }
}

/// String get/set access to a clipboard.
pub trait Clipboard {
    /// Current text content.
    fn get_text(&mut self) -> Result<String, ClipboardError>;

    /// Replace the content with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// An in-process clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.text
            .clone()
            .ok_or_else(|| ClipboardError::new("clipboard is empty"))
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text = Some(text.to_owned());
        Ok(())
    }
}

#[cfg(feature = "system-clipboard")]
mod system {
    use super::{Clipboard, ClipboardError};

    impl From<arboard::Error> for ClipboardError {
        fn from(err: arboard::Error) -> Self {
            Self::new(err.to_string())
        }
    }

    /// The operating system clipboard.
    pub struct SystemClipboard {
        inner: arboard::Clipboard,
    }

    impl SystemClipboard {
        /// Open the system clipboard.
        ///
        /// # Errors
        ///
        /// Returns an error if the clipboard cannot be accessed, for example
        /// when no display server is available.
        pub fn new() -> Result<Self, ClipboardError> {
            Ok(Self {
                inner: arboard::Clipboard::new()?,
            })
        }
    }

    impl Clipboard for SystemClipboard {
        fn get_text(&mut self) -> Result<String, ClipboardError> {
            self.inner.get_text().map_err(Into::into)
        }

        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.inner.set_text(text).map_err(Into::into)
        }
    }
}

#[cfg(feature = "system-clipboard")]
pub use system::SystemClipboard;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::new();
        assert!(clipboard.get_text().is_err());
        clipboard.set_text("copied").unwrap();
        assert_eq!(clipboard.get_text().unwrap(), "copied");
    }
}
