//! Document format detection from magic bytes.
//!
//! The managed parser accepts PDF, JPEG, PNG and PowerPoint files. Corpus
//! filtering uses these checks when a format tag narrows the accepted files.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Formats recognised from file headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Portable Document Format
    Pdf,
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// Office Open XML package (PPTX, DOCX, ...)
    Ooxml,
}

impl DocumentFormat {
    /// Lowercase name used in CLI flags and outcome records.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Png => "png",
            DocumentFormat::Jpeg => "jpeg",
            DocumentFormat::Ooxml => "ooxml",
        }
    }

    /// Parse a format name ("pdf", "png", "jpg"/"jpeg", "pptx"/"ooxml").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "png" => Some(DocumentFormat::Png),
            "jpg" | "jpeg" => Some(DocumentFormat::Jpeg),
            "pptx" | "docx" | "ooxml" => Some(DocumentFormat::Ooxml),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Number of header bytes needed to detect every supported format.
pub const HEADER_LEN: usize = 8;

/// Detect the document format from the leading bytes of a file.
///
/// # Returns
/// * `Ok(DocumentFormat)` if the header matches a known format
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocumentFormat> {
    if data.starts_with(PDF_MAGIC) {
        Ok(DocumentFormat::Pdf)
    } else if data.starts_with(PNG_MAGIC) {
        Ok(DocumentFormat::Png)
    } else if data.starts_with(JPEG_MAGIC) {
        Ok(DocumentFormat::Jpeg)
    } else if data.starts_with(ZIP_MAGIC) {
        Ok(DocumentFormat::Ooxml)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Detect the document format of a file on disk by reading its header.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocumentFormat> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.by_ref()
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Check if bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(DocumentFormat::Pdf))
}
