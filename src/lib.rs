//! textcore - editable text core
//!
//! This crate provides an undoable, line-indexed [`Document`] and an
//! incremental line lexer that keeps a [`TokenMap`] current in the
//! background while the document is edited.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod model;
pub mod syntax;
pub mod text;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::CoreConfig;
pub use error::{LexError, TextError, TextResult};
pub use model::{ChangeEvent, ChangeKind, Document, EditCommand};
pub use syntax::{LanguageRegistry, LexerPipeline, TokenMap};
pub use text::{LineIndex, TextBuffer};
