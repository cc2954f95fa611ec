//! Document model - the sole mutation entry point for a text buffer
//!
//! Owns the buffer, its line index, the undo/redo history and the change
//! listeners. Every mutation runs synchronously on the caller's thread and
//! notifies listeners before returning.

use ropey::Rope;
use std::panic::{self, AssertUnwindSafe};

use super::event::{ChangeEvent, ChangeKind, ChangeListener, ListenerId};
use super::history::{EditCommand, EditHistory};
use crate::config::CoreConfig;
use crate::error::TextResult;
use crate::text::{LineIndex, TextBuffer};
use crate::util::text::{char_len, normalize_line_endings};

struct ListenerEntry {
    id: ListenerId,
    callback: ChangeListener,
}

/// Open compound edit: buffered commands plus nesting depth
#[derive(Debug, Default)]
struct CompoundEdit {
    depth: usize,
    commands: Vec<EditCommand>,
}

/// An editable text unit with undo/redo and change notification
pub struct Document {
    buffer: TextBuffer,
    index: LineIndex,
    history: EditHistory,
    compound: Option<CompoundEdit>,
    listeners: Vec<ListenerEntry>,
    next_listener_id: u64,
    /// Incremented on every mutation
    revision: u64,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document with initial text
    pub fn with_text(text: &str) -> Self {
        let buffer = TextBuffer::from_text(text);
        let index = LineIndex::from_text(&buffer.to_string());
        Self {
            buffer,
            index,
            history: EditHistory::new(),
            compound: None,
            listeners: Vec::new(),
            next_listener_id: 0,
            revision: 0,
        }
    }

    /// Create a document whose history honours the configured limit
    pub fn with_config(text: &str, config: &CoreConfig) -> Self {
        let mut doc = Self::with_text(text);
        doc.history = EditHistory::with_max_size(config.history_limit);
        doc
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Full text (allocates)
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Cheap snapshot of the current text
    pub fn rope(&self) -> &Rope {
        self.buffer.rope()
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    /// Text of `line` without its newline
    pub fn line(&self, line: usize) -> TextResult<String> {
        let len = self.buffer.len();
        let start = self.index.line_start_offset(line)?;
        let end = self.index.line_end_offset(line, len)?;
        self.buffer.substring(start, end)
    }

    /// Length of `line` in chars, excluding its newline
    pub fn line_length(&self, line: usize) -> TextResult<usize> {
        self.index.line_length(line, self.buffer.len())
    }

    /// Text in `start..end`
    pub fn substring(&self, start: usize, end: usize) -> TextResult<String> {
        self.buffer.substring(start, end)
    }

    /// Convert a char offset to `(line, column)`
    pub fn offset_to_position(&self, offset: usize) -> TextResult<(usize, usize)> {
        let len = self.buffer.len();
        let line = self.index.line_for_offset(offset, len)?;
        let column = self.index.column_for_offset(offset, len)?;
        Ok((line, column))
    }

    /// Convert `(line, column)` to a char offset, clamping the column
    pub fn position_to_offset(&self, line: usize, column: usize) -> TextResult<usize> {
        self.index.to_offset(line, column, self.buffer.len())
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_compound_edit_open(&self) -> bool {
        self.compound.is_some()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert `text` at `offset`. Empty text is a no-op.
    pub fn insert(&mut self, offset: usize, text: &str) -> TextResult<()> {
        self.buffer.check_offset(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        let text = normalize_line_endings(text).into_owned();
        let new_len = char_len(&text);

        let mut command = EditCommand::insert(offset, text.clone());
        command.apply(&mut self.buffer)?;
        self.index.apply_edit(offset, 0, &text);

        self.record(command);
        self.notify(ChangeEvent::new(offset, 0, new_len, ChangeKind::Insert));
        Ok(())
    }

    /// Delete `start..end`. An empty range is a no-op.
    pub fn delete(&mut self, start: usize, end: usize) -> TextResult<()> {
        self.buffer.check_range(start, end)?;
        if start == end {
            return Ok(());
        }

        let mut command = EditCommand::delete(start, end);
        command.apply(&mut self.buffer)?;
        self.index.apply_edit(start, end - start, "");

        self.record(command);
        self.notify(ChangeEvent::new(start, end - start, 0, ChangeKind::Delete));
        Ok(())
    }

    /// Replace `start..end` with `replacement`.
    ///
    /// An empty range degenerates to an insert and an empty replacement to a
    /// delete.
    pub fn replace(&mut self, start: usize, end: usize, replacement: &str) -> TextResult<()> {
        self.buffer.check_range(start, end)?;
        if start == end {
            return self.insert(start, replacement);
        }
        if replacement.is_empty() {
            return self.delete(start, end);
        }

        let replacement = normalize_line_endings(replacement).into_owned();
        let new_len = char_len(&replacement);

        let mut command = EditCommand::replace(start, end, replacement.clone());
        command.apply(&mut self.buffer)?;
        self.index.apply_edit(start, end - start, &replacement);

        self.record(command);
        self.notify(ChangeEvent::new(
            start,
            end - start,
            new_len,
            ChangeKind::Replace,
        ));
        Ok(())
    }

    /// Replace all content. Clears both history stacks.
    pub fn set_text(&mut self, text: &str) {
        self.compound = None;
        let old_len = self.buffer.len();
        self.buffer.set_text(text);
        self.rebuild_index();
        self.history.clear();
        self.revision = self.revision.wrapping_add(1);
        self.notify(ChangeEvent::whole_buffer(
            old_len,
            self.buffer.len(),
            ChangeKind::SetText,
        ));
    }

    /// Undo the most recent command. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.close_compound();
        let Some(command) = self.history.pop_undo() else {
            return false;
        };

        let old_len = self.buffer.len();
        if let Err(err) = command.undo(&mut self.buffer) {
            tracing::error!("Dropping edit command that failed to undo: {}", err);
            self.rebuild_index();
            return false;
        }
        self.rebuild_index();
        self.history.push_redo(command);
        self.revision = self.revision.wrapping_add(1);

        self.notify(ChangeEvent::whole_buffer(
            old_len,
            self.buffer.len(),
            ChangeKind::Undo,
        ));
        true
    }

    /// Reapply the most recently undone command. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.close_compound();
        let Some(mut command) = self.history.pop_redo() else {
            return false;
        };

        let old_len = self.buffer.len();
        if let Err(err) = command.apply(&mut self.buffer) {
            tracing::error!("Dropping edit command that failed to redo: {}", err);
            self.rebuild_index();
            return false;
        }
        self.rebuild_index();
        self.history.push_undo(command);
        self.revision = self.revision.wrapping_add(1);

        self.notify(ChangeEvent::whole_buffer(
            old_len,
            self.buffer.len(),
            ChangeKind::Redo,
        ));
        true
    }

    /// Start grouping edits into one undoable unit. Calls nest.
    pub fn begin_compound_edit(&mut self) {
        self.compound.get_or_insert_with(CompoundEdit::default).depth += 1;
    }

    /// Close the group opened by the matching `begin_compound_edit`.
    ///
    /// Closing the outermost group records the buffered edits as one
    /// compound command; an empty group records nothing.
    pub fn end_compound_edit(&mut self) {
        let Some(compound) = self.compound.as_mut() else {
            return;
        };
        compound.depth -= 1;
        if compound.depth == 0 {
            self.close_compound();
        }
    }

    /// Empty both history stacks without touching content
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Register a change listener. Listeners run in registration order.
    pub fn add_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent, &Rope) -> anyhow::Result<()> + Send + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push(ListenerEntry {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn record(&mut self, command: EditCommand) {
        self.revision = self.revision.wrapping_add(1);
        match self.compound.as_mut() {
            Some(compound) => compound.commands.push(command),
            None => self.history.record(command),
        }
    }

    fn close_compound(&mut self) {
        let Some(compound) = self.compound.take() else {
            return;
        };
        if compound.commands.is_empty() {
            return;
        }
        tracing::trace!("Recording compound edit of {} commands", compound.commands.len());
        self.history.record(EditCommand::Compound(compound.commands));
    }

    fn rebuild_index(&mut self) {
        self.index.rebuild(self.buffer.rope().chars());
    }

    /// Fan the event out to every listener, isolating failures
    fn notify(&mut self, event: ChangeEvent) {
        let rope = self.buffer.rope();
        for entry in &mut self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (entry.callback)(&event, rope)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(
                        listener = entry.id.0,
                        kind = ?event.kind,
                        "Change listener failed: {:#}",
                        err
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        listener = entry.id.0,
                        kind = ?event.kind,
                        "Change listener panicked"
                    );
                }
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len_chars", &self.buffer.len())
            .field("line_count", &self.index.line_count())
            .field("revision", &self.revision)
            .field("undo_count", &self.history.undo_count())
            .field("redo_count", &self.history.redo_count())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
