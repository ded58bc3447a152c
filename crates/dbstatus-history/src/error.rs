//! Error types for history persistence

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing a history file
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Reading or writing the file failed
    #[error("Failed to access history file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a valid history
    #[error("Malformed history file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;
