//! Error types for node tree construction

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a node tree
#[derive(Error, Debug)]
pub enum DomError {
    /// Error reading the source file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML
    #[error("XML error at line {line}: {source}")]
    Xml {
        line: usize,
        #[source]
        source: quick_xml::Error,
    },

    /// Source is not valid UTF-8
    #[error("Invalid UTF-8 in document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A prefix was used without a matching `xmlns:` declaration
    #[error("Unbound namespace prefix '{prefix}' at line {line}")]
    UnboundPrefix { prefix: String, line: usize },

    /// The document has no root element
    #[error("Document has no root element")]
    NoRoot,
}

/// Result type for node tree operations
pub type Result<T> = std::result::Result<T, DomError>;
