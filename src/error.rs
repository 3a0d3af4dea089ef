//! Error types for docflat.

use std::io;
use thiserror::Error;

/// Result type alias for docflat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ingesting parsed documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Parser output could not be decoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parser reported corruption or an error status.
    #[error("Failed to parse document {uri}: {reason}")]
    DocumentParseFailure {
        /// Document the failure belongs to
        uri: String,
        /// Corruption flag and/or error status text
        reason: String,
    },

    /// An element record is missing structural fields it must carry.
    #[error("Malformed element {index} in {uri}: {reason}")]
    MalformedElementShape {
        /// Document the element belongs to
        uri: String,
        /// Position of the element in the source `elements` array
        index: usize,
        /// What was wrong with the element
        reason: String,
    },

    /// The document parser could not produce a result at all.
    #[error("Parser error: {0}")]
    Parser(String),

    /// The file format is not one the corpus filter accepts.
    #[error("Unknown document format")]
    UnknownFormat,

    /// A corpus file-name pattern could not be compiled.
    #[error("Invalid file pattern: {0}")]
    InvalidPattern(String),

    /// Error enumerating the corpus.
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Error during rendering (text, rows, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Short, stable name of the error kind, used in outcome records.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::DocumentParseFailure { .. } => "document_parse_failure",
            Error::MalformedElementShape { .. } => "malformed_element_shape",
            Error::Parser(_) => "parser",
            Error::UnknownFormat => "unknown_format",
            Error::InvalidPattern(_) => "invalid_pattern",
            Error::Corpus(_) => "corpus",
            Error::Render(_) => "render",
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        match err.into_io_error() {
            Some(e) => Error::Io(e),
            None => Error::Corpus("filesystem loop detected".to_string()),
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidPattern(err.to_string())
    }
}
