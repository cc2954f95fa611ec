//! Token data structures
//!
//! Defines token kinds, per-line token lists and the document-level token map.

use std::sync::Arc;

use super::lexer::LexState;

/// Classification of a token span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Type,
    /// Built-in constants (`true`, `null`, `None`)
    Constant,
    Function,
    Number,
    String,
    Comment,
    Operator,
    Punctuation,
    /// Lifetimes, labels, YAML anchors
    Label,
    Tag,
    Attribute,
    /// Character entities and escape-like spans in markup
    Escape,
}

/// Every kind, in declaration order
pub const TOKEN_KINDS: &[TokenKind] = &[
    TokenKind::Keyword,
    TokenKind::Type,
    TokenKind::Constant,
    TokenKind::Function,
    TokenKind::Number,
    TokenKind::String,
    TokenKind::Comment,
    TokenKind::Operator,
    TokenKind::Punctuation,
    TokenKind::Label,
    TokenKind::Tag,
    TokenKind::Attribute,
    TokenKind::Escape,
];

impl TokenKind {
    /// Capture-style name used by themes
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Type => "type",
            TokenKind::Constant => "constant",
            TokenKind::Function => "function",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Comment => "comment",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Label => "label",
            TokenKind::Tag => "tag",
            TokenKind::Attribute => "attribute",
            TokenKind::Escape => "escape",
        }
    }

    /// Look up a kind by name.
    ///
    /// Hierarchical names fall back to their parents, so
    /// `"keyword.control.import"` resolves to `Keyword`.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        let mut current = name;
        loop {
            if let Some(kind) = TOKEN_KINDS.iter().find(|k| k.name() == current) {
                return Some(*kind);
            }

            let dot_pos = current.rfind('.')?;
            current = &current[..dot_pos];
        }
    }
}

/// A classified span within one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Start column in chars (0-indexed, inclusive)
    pub start_col: usize,
    /// Length in chars
    pub len: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(start_col: usize, len: usize, kind: TokenKind) -> Self {
        Self {
            start_col,
            len,
            kind,
        }
    }

    /// End column (exclusive)
    pub fn end_col(&self) -> usize {
        self.start_col + self.len
    }
}

/// Tokenization result for a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    /// Snapshot of the line text (without newline)
    pub text: String,
    /// Tokens sorted by start column, non-overlapping
    pub tokens: Vec<Token>,
    /// State the line was lexed with
    pub entry_state: LexState,
    /// State the line ended in
    pub exit_state: LexState,
}

impl LineTokens {
    /// A line with no tokens whose state passes through unchanged
    pub fn plain(text: impl Into<String>, state: LexState) -> Self {
        Self {
            text: text.into(),
            tokens: Vec::new(),
            entry_state: state,
            exit_state: state,
        }
    }

    /// Token kind covering `col`, if any
    pub fn kind_at(&self, col: usize) -> Option<TokenKind> {
        for token in &self.tokens {
            if col >= token.start_col && col < token.end_col() {
                return Some(token.kind);
            }
            if token.start_col > col {
                break; // tokens are sorted
            }
        }
        None
    }
}

/// Per-line tokens for one document snapshot.
///
/// Lines are shared through `Arc` so a relex can hand unchanged lines from
/// the previous map to the new one without copying. A map is never mutated
/// after it is published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    pub lines: Vec<Arc<LineTokens>>,
    /// Pipeline revision this map was produced for (0 outside a pipeline)
    pub revision: u64,
}

impl TokenMap {
    pub fn new(lines: Vec<Arc<LineTokens>>) -> Self {
        Self { lines, revision: 0 }
    }

    /// Plain-text map for `text`: one empty-token line per document line
    pub fn plain(text: &str, state: LexState) -> Self {
        Self::new(
            crate::util::text::split_lines(text)
                .map(|line| Arc::new(LineTokens::plain(line, state)))
                .collect(),
        )
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, line: usize) -> Option<&Arc<LineTokens>> {
        self.lines.get(line)
    }

    /// Tokens for `line`, or an empty slice if the line is absent
    pub fn tokens(&self, line: usize) -> &[Token] {
        self.lines
            .get(line)
            .map(|lt| lt.tokens.as_slice())
            .unwrap_or(&[])
    }

    /// Exit state of every line, in order
    pub fn exit_states(&self) -> Vec<LexState> {
        self.lines.iter().map(|lt| lt.exit_state).collect()
    }

    /// Total number of tokens across all lines
    pub fn token_count(&self) -> usize {
        self.lines.iter().map(|lt| lt.tokens.len()).sum()
    }
}
