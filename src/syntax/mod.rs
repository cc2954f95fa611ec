//! Syntax tokenization module
//!
//! Provides line-oriented lexing with:
//! - A small [`Lexer`] contract (line text + entry state → tokens + exit state)
//! - Built-in lexers for C-family, hash-comment, data and markup languages
//! - Incremental relexing that reuses unchanged lines
//! - A background pipeline that coalesces edits and drops stale results
//!
//! ## Architecture
//!
//! ```text
//! Document edit → LexerPipeline listener (revision++, dirty line)
//!              → worker executor: engine::relex
//!              → apply executor: callback(Arc<TokenMap>)
//! ```

pub mod engine;
pub mod executor;
pub mod languages;
pub mod lexer;
pub mod lexers;
pub mod pipeline;
mod scan;
pub mod tokens;

pub use engine::{lex_all, relex};
pub use executor::{Executor, InlineExecutor, Job, QueuedExecutor, ThreadExecutor};
pub use languages::{
    display_name, language_for_extension, language_for_path, LanguageRegistry, LexerFactory,
    PLAIN_TEXT,
};
pub use lexer::{LexResult, LexState, Lexer, PlainTextLexer};
pub use pipeline::{
    Executors, LexerPipeline, PipelineConfig, PipelineStatus, DEFAULT_DEBOUNCE_MS,
};
pub use tokens::{LineTokens, Token, TokenKind, TokenMap, TOKEN_KINDS};
