//! Error types for document analysis

use std::path::PathBuf;

use dbstatus_dom::DomError;
use thiserror::Error;

/// Errors that can occur while analyzing a document
#[derive(Error, Debug)]
pub enum StatusError {
    /// The document (or an included document) could not be read or parsed
    #[error(transparent)]
    Dom(#[from] DomError),

    /// The document does not declare the DocBook 5 default namespace
    #[error("{} is apparently not DocBook 5", .path.display())]
    NotDocBook { path: PathBuf },

    /// An included file includes itself, directly or indirectly
    #[error("Inclusion cycle detected at {}", .path.display())]
    IncludeCycle { path: PathBuf },

    /// Reading a text include failed
    #[error("Failed to read included file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operation needs a source file but none was given
    #[error("No source file given")]
    NoSource,
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, StatusError>;
