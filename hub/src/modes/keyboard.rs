//! Typed text buffer owned by Keyboard mode.

use super::regions::Key;

/// Append-only character buffer with backspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedText {
    buffer: String,
}

impl TypedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one fired key.
    pub fn apply(&mut self, key: Key) {
        match key {
            Key::Char(c) => self.buffer.push(c),
            Key::Space => self.buffer.push(' '),
            Key::Backspace => {
                self.buffer.pop();
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
