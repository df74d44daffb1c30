//! Error types for wordsift

use thiserror::Error;

/// Result type alias using wordsift's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in wordsift
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}
