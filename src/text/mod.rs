//! Text storage and line addressing

mod buffer;
mod line_index;

pub use buffer::TextBuffer;
pub use line_index::LineIndex;
