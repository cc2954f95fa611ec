//! The lexer contract
//!
//! A lexer classifies one line at a time. The state it ends a line in is fed
//! back as the entry state of the next line, which is how block comments and
//! multi-line strings carry across lines.
//!
//! Lexers must be deterministic: the same `(line, entry state)` must always
//! yield the same result. The incremental engine depends on this to skip
//! lines whose text and entry state did not change.

use super::tokens::Token;

/// Suspended lexer state at a line boundary.
///
/// An opaque code; two states are equal iff their codes are equal. Built-in
/// lexers use the associated constants, custom lexers may use any code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LexState(pub u16);

impl LexState {
    pub const DEFAULT: LexState = LexState(0);
    /// Inside a block comment
    pub const COMMENT: LexState = LexState(1);
    /// Inside a string that continues onto the next line
    pub const STRING: LexState = LexState(2);
    /// Inside an unterminated markup tag
    pub const TAG: LexState = LexState(3);
}

/// Output of lexing a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub exit_state: LexState,
}

impl LexResult {
    pub fn new(tokens: Vec<Token>, exit_state: LexState) -> Self {
        Self { tokens, exit_state }
    }
}

/// A per-language line tokenizer
pub trait Lexer: Send + Sync {
    /// State for the first line of a document
    fn initial_state(&self) -> LexState {
        LexState::DEFAULT
    }

    /// Tokenize one line (without its newline) starting in `entry`
    fn lex_line(&self, line: &str, entry: LexState) -> anyhow::Result<LexResult>;
}

/// Emits no tokens and never changes state
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextLexer;

impl Lexer for PlainTextLexer {
    fn lex_line(&self, _line: &str, entry: LexState) -> anyhow::Result<LexResult> {
        Ok(LexResult::new(Vec::new(), entry))
    }
}
