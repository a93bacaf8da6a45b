//! Unified error types for ywodt.
//!
//! Decoding either completes over its bounded input or fails fast with one of
//! these variants. Style resolution and missing metadata are never errors.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ywodt operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The notification stream is structurally unbalanced
    #[error("Malformed structure: {0}")]
    MalformedStructure(String),

    /// The document container cannot be opened or lacks its content part
    #[error("Cannot read {}: {reason}", path.display())]
    UnreadableSource { path: PathBuf, reason: String },

    /// A required part was not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),
}

impl Error {
    /// Shorthand for an unmatched element close.
    pub(crate) fn unmatched_close(name: &str, expected: Option<&str>) -> Self {
        match expected {
            Some(open) => Error::MalformedStructure(format!(
                "closing </{}> while <{}> is still open",
                name, open
            )),
            None => Error::MalformedStructure(format!(
                "closing </{}> without a matching open",
                name
            )),
        }
    }

    /// Whether this error aborted a decode because of unbalanced structure.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedStructure(_))
    }
}

/// Result type for ywodt operations.
pub type Result<T> = std::result::Result<T, Error>;
