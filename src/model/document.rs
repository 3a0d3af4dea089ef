//! Document-level types.

use crate::detect::{detect_format_from_bytes, DocumentFormat};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A source file handed to the document parser.
///
/// The raw bytes are consumed by the parser and are never copied into
/// downstream records.
#[derive(Debug, Clone)]
pub struct Document {
    /// Storage path, unique within a corpus
    pub uri: String,

    /// Raw file content
    pub content: Vec<u8>,

    /// Format detected from the file header, if recognised
    pub format: Option<DocumentFormat>,
}

impl Document {
    /// Create a document from a uri and its bytes.
    pub fn new(uri: impl Into<String>, content: Vec<u8>) -> Self {
        let format = detect_format_from_bytes(&content).ok();
        Self {
            uri: uri.into(),
            content,
            format,
        }
    }

    /// Read a document from disk, using the path as its uri.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        Ok(Self::new(path.to_string_lossy(), content))
    }

    /// Size of the raw content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the document has no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Assembled text of one document, ready for chunking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    /// Uri of the source document
    pub uri: String,

    /// Newline-joined element texts
    pub text: String,
}

impl DocumentText {
    /// Create a new document text record.
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            text: text.into(),
        }
    }

    /// Check if no element contributed text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines in the text (0 for an empty document).
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            0
        } else {
            self.text.split('\n').count()
        }
    }
}
