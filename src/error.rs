//! Error types for the text core.
//!
//! Bounds errors are surfaced synchronously to whoever passed the bad
//! offset. Lexer faults are raised by the engine and contained by the
//! pipeline.

use thiserror::Error;

/// Invalid offsets, ranges or line numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// Offset past the end of the text.
    #[error("offset {offset} out of bounds (length {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },

    /// Range with `end < start` or `end` past the end of the text.
    #[error("invalid range {start}..{end} (length {len})")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Line number not in `0..line_count`.
    #[error("line {line} out of bounds (line count {line_count})")]
    LineOutOfBounds { line: usize, line_count: usize },

    /// An edit command was undone before it was ever applied.
    #[error("edit command undone before it was applied")]
    CommandNotApplied,
}

/// A lexer failed while tokenizing a line.
#[derive(Debug, Error)]
#[error("lexer failed on line {line}")]
pub struct LexError {
    /// Line that was being lexed
    pub line: usize,
    #[source]
    pub source: anyhow::Error,
}

impl LexError {
    pub fn new(line: usize, source: anyhow::Error) -> Self {
        Self { line, source }
    }
}

pub type TextResult<T> = Result<T, TextError>;
