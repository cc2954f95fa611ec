//! Character storage for a document.
//!
//! `TextBuffer` wraps a `ropey::Rope` and adds the two guarantees the rest of
//! the core relies on: every write is line-ending normalized, and every
//! offset is validated before anything is touched.

use ropey::Rope;
use std::borrow::Cow;

use crate::error::{TextError, TextResult};
use crate::util::text::{char_len, normalize_line_endings};

/// Growable text storage addressed by char offsets. Never contains `\r`.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a buffer from initial text (normalized)
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_endings(text)),
        }
    }

    /// Total length in chars
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The underlying rope. Cloning it is O(1), which makes it a cheap snapshot.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Text in `start..end`
    pub fn substring(&self, start: usize, end: usize) -> TextResult<String> {
        self.check_range(start, end)?;
        Ok(self.rope.slice(start..end).to_string())
    }

    /// Replace the whole content
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(&normalize_line_endings(text));
    }

    /// Insert `text` at `offset`, returning the number of chars stored
    pub fn insert(&mut self, offset: usize, text: &str) -> TextResult<usize> {
        self.check_offset(offset)?;
        let text = normalize_line_endings(text);
        self.rope.insert(offset, &text);
        Ok(char_len(&text))
    }

    /// Remove `start..end`, returning the removed text
    pub fn delete(&mut self, start: usize, end: usize) -> TextResult<String> {
        self.check_range(start, end)?;
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        Ok(removed)
    }

    /// Replace `start..end` with `replacement`, returning the replaced text
    pub fn replace(&mut self, start: usize, end: usize, replacement: &str) -> TextResult<String> {
        self.check_range(start, end)?;
        let replacement: Cow<'_, str> = normalize_line_endings(replacement);
        let replaced = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.rope.insert(start, &replacement);
        Ok(replaced)
    }

    /// Fail with a bounds error unless `offset <= len`
    pub fn check_offset(&self, offset: usize) -> TextResult<()> {
        let len = self.len();
        if offset > len {
            return Err(TextError::OffsetOutOfBounds { offset, len });
        }
        Ok(())
    }

    /// Fail with a bounds error unless `start <= end <= len`
    pub fn check_range(&self, start: usize, end: usize) -> TextResult<()> {
        let len = self.len();
        if end < start || end > len {
            return Err(TextError::InvalidRange { start, end, len });
        }
        Ok(())
    }
}

impl std::fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
