//! Document model - text, history and change notification
//!
//! [`Document`] is the only way to mutate text. It keeps the buffer and line
//! index consistent, records every edit as an invertible [`EditCommand`] and
//! fans a [`ChangeEvent`] out to registered listeners.

pub mod document;
pub mod event;
pub mod history;

pub use document::Document;
pub use event::{ChangeEvent, ChangeKind, ChangeListener, ListenerId};
pub use history::{EditCommand, EditHistory, DEFAULT_HISTORY_LIMIT};
