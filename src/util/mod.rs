//! Utility modules

pub mod text;

pub use text::{char_len, normalize_line_endings, split_lines};
