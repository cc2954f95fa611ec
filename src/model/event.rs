//! Change notifications emitted by [`Document`](super::Document)

use ropey::Rope;

/// What kind of mutation produced a change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Insert,
    Delete,
    Replace,
    /// Whole-buffer change (offset 0) from undoing a command
    Undo,
    /// Whole-buffer change (offset 0) from redoing a command
    Redo,
    /// Whole-buffer change (offset 0) from replacing all content
    SetText,
}

/// Describes the text range a mutation touched.
///
/// `old_len` chars starting at `offset` were replaced by `new_len` chars.
/// Undo, redo and set-text events report the whole buffer: offset 0, the
/// old buffer length and the new buffer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub offset: usize,
    pub old_len: usize,
    pub new_len: usize,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(offset: usize, old_len: usize, new_len: usize, kind: ChangeKind) -> Self {
        Self {
            offset,
            old_len,
            new_len,
            kind,
        }
    }

    /// Event for a whole-buffer change
    pub fn whole_buffer(old_len: usize, new_len: usize, kind: ChangeKind) -> Self {
        Self::new(0, old_len, new_len, kind)
    }
}

/// Handle returned by [`Document::add_listener`](super::Document::add_listener)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A change listener.
///
/// Receives the event and a snapshot of the text after the change. Errors
/// and panics are contained by the document and never reach the caller of
/// the mutation.
pub type ChangeListener = Box<dyn FnMut(&ChangeEvent, &Rope) -> anyhow::Result<()> + Send>;
