//! Edit history (undo/redo) built from invertible edit commands.

use std::borrow::Cow;

use crate::error::{TextError, TextResult};
use crate::text::TextBuffer;
use crate::util::text::{char_len, normalize_line_endings};

/// Default maximum number of undoable commands
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// A single invertible edit.
///
/// Inserted text is stored with normalized line endings, the same form the
/// buffer keeps, so undo removes exactly what apply inserted. Text removed
/// by `Delete`/`Replace` is captured the first time the command is applied
/// and reused by every later redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Insert {
        offset: usize,
        text: String,
    },
    Delete {
        start: usize,
        end: usize,
        captured: Option<String>,
    },
    Replace {
        start: usize,
        end: usize,
        replacement: String,
        captured_original: Option<String>,
    },
    /// Children apply in order and undo in reverse order
    Compound(Vec<EditCommand>),
}

impl EditCommand {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        EditCommand::Insert {
            offset,
            text: normalized(text.into()),
        }
    }

    pub fn delete(start: usize, end: usize) -> Self {
        EditCommand::Delete {
            start,
            end,
            captured: None,
        }
    }

    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        EditCommand::Replace {
            start,
            end,
            replacement: normalized(replacement.into()),
            captured_original: None,
        }
    }

    /// Apply the command to `buffer`.
    ///
    /// On error the buffer is left as it was, including for compounds whose
    /// later children fail.
    pub fn apply(&mut self, buffer: &mut TextBuffer) -> TextResult<()> {
        match self {
            EditCommand::Insert { offset, text } => {
                normalize_in_place(text);
                buffer.insert(*offset, text)?;
            }
            EditCommand::Delete {
                start,
                end,
                captured,
            } => {
                let removed = buffer.delete(*start, *end)?;
                if captured.is_none() {
                    *captured = Some(removed);
                }
            }
            EditCommand::Replace {
                start,
                end,
                replacement,
                captured_original,
            } => {
                normalize_in_place(replacement);
                let original = buffer.replace(*start, *end, replacement)?;
                if captured_original.is_none() {
                    *captured_original = Some(original);
                }
            }
            EditCommand::Compound(children) => {
                for i in 0..children.len() {
                    if let Err(err) = children[i].apply(buffer) {
                        for applied in children[..i].iter().rev() {
                            applied.undo(buffer)?;
                        }
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }

    /// Revert a previously applied command
    pub fn undo(&self, buffer: &mut TextBuffer) -> TextResult<()> {
        match self {
            EditCommand::Insert { offset, text } => {
                buffer.delete(*offset, offset + char_len(text))?;
            }
            EditCommand::Delete {
                start, captured, ..
            } => {
                let captured = captured.as_deref().ok_or(TextError::CommandNotApplied)?;
                buffer.insert(*start, captured)?;
            }
            EditCommand::Replace {
                start,
                replacement,
                captured_original,
                ..
            } => {
                let original = captured_original
                    .as_deref()
                    .ok_or(TextError::CommandNotApplied)?;
                buffer.replace(*start, start + char_len(replacement), original)?;
            }
            EditCommand::Compound(children) => {
                for child in children.iter().rev() {
                    child.undo(buffer)?;
                }
            }
        }
        Ok(())
    }
}

fn normalized(text: String) -> String {
    match normalize_line_endings(&text) {
        Cow::Borrowed(_) => text,
        Cow::Owned(normalized) => normalized,
    }
}

// Variants are public, so a command built by hand may still carry `\r`
fn normalize_in_place(text: &mut String) {
    if text.contains('\r') {
        *text = normalize_line_endings(text).into_owned();
    }
}

/// Bounded undo/redo stacks
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
    max_size: usize,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record a new edit (clears the redo stack)
    pub fn record(&mut self, command: EditCommand) {
        self.redo_stack.clear();
        self.push_undo(command);
    }

    /// Take the most recent undoable command
    pub fn pop_undo(&mut self) -> Option<EditCommand> {
        self.undo_stack.pop()
    }

    /// Take the most recent redoable command
    pub fn pop_redo(&mut self) -> Option<EditCommand> {
        self.redo_stack.pop()
    }

    /// Park a command that was just undone
    pub fn push_redo(&mut self, command: EditCommand) {
        self.redo_stack.push(command);
    }

    /// Return a redone command to the undo stack without touching redo
    pub fn push_undo(&mut self, command: EditCommand) {
        self.undo_stack.push(command);

        if self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}
