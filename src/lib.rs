//! Wordsift - vocabulary extraction and review core
//!
//! Extracts a frequency-ranked word list from raw text, groups words that
//! share prefixes as candidates for manual merging, and tracks every edit
//! in an undoable action log persisted to local storage.

pub mod edit_log;
pub mod error;
pub mod migrations;
pub mod session;
pub mod similar;
pub mod storage;
pub mod tokenizer;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Re-export the main components for convenience
pub use edit_log::{EditLog, apply_action};
pub use session::Session;
pub use similar::find_similar;
pub use storage::{DEFAULT_FLUSH_INTERVAL, DebouncedWriter, Storage, default_db_path};
pub use tokenizer::{is_stop_word, sort_by_usage, tokenize};
