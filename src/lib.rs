//! # docflat
//!
//! Flatten document-parser output into elements and per-document text for
//! retrieval pipelines.
//!
//! Layout analysis and OCR happen in an external document parser (such as a
//! managed `ai_parse_document` function). This library takes the parser's
//! nested output, reshapes it into ordered elements with page ids and
//! bounding boxes, and assembles those elements into one text blob per
//! source document, ready for chunking.
//!
//! ## Quick Start
//!
//! ```
//! use docflat::{assemble_json, flatten_json};
//!
//! fn main() -> docflat::Result<()> {
//!     let json = r#"{
//!         "document": {
//!             "elements": [
//!                 {"type": "text", "content": "Hello",
//!                  "bbox": [{"page_id": 1, "coord": [0, 0, 10, 10]}]},
//!                 {"type": "figure", "content": null, "description": "A chart"}
//!             ]
//!         },
//!         "corrupted_data": false,
//!         "error_status": null
//!     }"#;
//!
//!     let elements = flatten_json("report.pdf", json)?;
//!     assert_eq!(elements.len(), 2);
//!
//!     let doc = assemble_json("report.pdf", json)?;
//!     assert_eq!(doc.text, "Hello\nA chart");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Order-preserving flattening**: reading order is never changed
//! - **Explicit failure**: corrupted or errored parser output is an error,
//!   never an empty document
//! - **Malformed element isolation**: bad records are skipped (or rejected
//!   in strict mode) without losing the rest of the document
//! - **Parallel batches**: documents are processed independently with Rayon
//! - **Corpus loading**: glob patterns and format filters over local volumes

pub mod corpus;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use corpus::{CorpusOptions, CorpusSource, FilePattern, FormatFilter, LocalCorpus, VolumeLocation};
pub use detect::{detect_format_from_bytes, detect_format_from_path, DocumentFormat};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, Document, DocumentText, Element, ElementRow, ErrorStatus, ParseResult,
    PrimaryPagePolicy,
};
pub use parser::{
    DocumentParser, ErrorMode, FlattenOptions, Flattened, Flattener, FnParser, SidecarParser,
};
pub use pipeline::{BatchReport, DocumentOutcome, OutcomeStatus, Pipeline, PipelineOptions};
pub use render::{
    assemble, element_rows, AssembleOptions, Assembler, AssemblyStats, CleanupOptions,
    CleanupPreset, JsonFormat,
};

use std::path::Path;
use std::sync::Arc;

/// Flatten parser output given as JSON into elements.
///
/// # Arguments
///
/// * `uri` - Uri of the source document, used in errors and logs
/// * `json` - Parser output as a JSON string
///
/// # Example
///
/// ```
/// use docflat::flatten_json;
///
/// let elements = flatten_json("a.pdf", r#"{"corrupted_data": true}"#);
/// assert!(elements.is_err());
/// ```
pub fn flatten_json(uri: &str, json: &str) -> Result<Vec<Element>> {
    let result = ParseResult::from_json(json)?;
    parser::flatten(uri, &result)
}

/// Flatten and assemble parser output given as JSON.
pub fn assemble_json(uri: &str, json: &str) -> Result<DocumentText> {
    let elements = flatten_json(uri, json)?;
    Ok(DocumentText::new(uri, assemble(&elements)))
}

/// Flatten and assemble parser output saved in a JSON file.
///
/// The file path is used as the document uri.
///
/// # Example
///
/// ```no_run
/// use docflat::assemble_file;
///
/// let doc = assemble_file("report.pdf.parsed.json").unwrap();
/// println!("{}", doc.text);
/// ```
pub fn assemble_file<P: AsRef<Path>>(path: P) -> Result<DocumentText> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let result = ParseResult::from_slice(&data)?;
    let uri = path.to_string_lossy();
    let elements = parser::flatten(&uri, &result)?;
    Ok(DocumentText::new(uri, assemble(&elements)))
}

/// Builder for flattening and assembling parsed documents.
///
/// # Example
///
/// ```
/// use docflat::{Docflat, PrimaryPagePolicy};
///
/// let json = r#"{"document": {"elements": [
///     {"type": "text", "content": "ﬁrst   line",
///      "bbox": [{"page_id": 3, "coord": [0, 0, 1, 1]}, {"page_id": 2, "coord": [0, 0, 1, 1]}]}
/// ]}}"#;
///
/// let parsed = Docflat::new()
///     .strict()
///     .with_primary_page(PrimaryPagePolicy::LowestPage)
///     .with_cleanup(docflat::CleanupPreset::Standard)
///     .parse_json("a.pdf", json)?;
///
/// assert_eq!(parsed.to_text().text, "first line");
/// assert_eq!(parsed.rows()[0].page_id, Some(2));
/// # Ok::<(), docflat::Error>(())
/// ```
pub struct Docflat {
    flatten_options: FlattenOptions,
    assemble_options: AssembleOptions,
    parallel: bool,
}

impl Docflat {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            flatten_options: FlattenOptions::default(),
            assemble_options: AssembleOptions::default(),
            parallel: true,
        }
    }

    /// Fail documents that contain malformed elements.
    pub fn strict(mut self) -> Self {
        self.flatten_options = self.flatten_options.strict();
        self
    }

    /// Skip malformed elements (default).
    pub fn lenient(mut self) -> Self {
        self.flatten_options = self.flatten_options.lenient();
        self
    }

    /// Set the primary page policy.
    pub fn with_primary_page(mut self, policy: PrimaryPagePolicy) -> Self {
        self.flatten_options = self.flatten_options.with_primary_page(policy);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.assemble_options = self.assemble_options.with_cleanup_preset(preset);
        self
    }

    /// Set the separator between element texts.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.assemble_options = self.assemble_options.with_separator(separator);
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self) -> Self {
        self.assemble_options = self.assemble_options.with_stats(true);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Flatten one parse result.
    pub fn parse(self, uri: &str, result: &ParseResult) -> Result<DocflatResult> {
        let flattened = Flattener::with_options(self.flatten_options.clone()).flatten(uri, result)?;
        Ok(DocflatResult {
            uri: uri.to_string(),
            flattened,
            flatten_options: self.flatten_options,
            assemble_options: self.assemble_options,
        })
    }

    /// Flatten parser output given as JSON.
    pub fn parse_json(self, uri: &str, json: &str) -> Result<DocflatResult> {
        let result = ParseResult::from_json(json)?;
        self.parse(uri, &result)
    }

    /// Build a pipeline around a document parser.
    pub fn pipeline(self, parser: Arc<dyn DocumentParser>) -> Pipeline {
        let options = PipelineOptions::new()
            .with_flatten_options(self.flatten_options)
            .with_assemble_options(self.assemble_options)
            .with_parallel(self.parallel);
        Pipeline::new(parser).with_options(options)
    }
}

impl Default for Docflat {
    fn default() -> Self {
        Self::new()
    }
}

/// A flattened document with the options used to render it.
pub struct DocflatResult {
    uri: String,
    flattened: Flattened,
    flatten_options: FlattenOptions,
    assemble_options: AssembleOptions,
}

impl DocflatResult {
    /// Uri of the source document.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Elements in source order.
    pub fn elements(&self) -> &[Element] {
        &self.flattened.elements
    }

    /// Indices of element records skipped as malformed.
    pub fn skipped(&self) -> Vec<usize> {
        self.flattened.skipped.iter().map(|s| s.index).collect()
    }

    /// Assemble the document text.
    pub fn to_text(&self) -> DocumentText {
        Assembler::with_options(self.assemble_options.clone())
            .assemble_document(&self.uri, &self.flattened.elements)
    }

    /// One row per element.
    pub fn rows(&self) -> Vec<ElementRow> {
        Flattener::with_options(self.flatten_options.clone())
            .rows(&self.uri, &self.flattened.elements)
    }

    /// Element rows as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.rows(), format)
    }

    /// Statistics for this document.
    pub fn stats(&self) -> AssemblyStats {
        AssemblyStats::from_elements(&self.flattened.elements, self.flattened.skipped.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUND_TRIP: &str = r#"{
        "document": {"elements": [
            {"type": "text", "content": "Hello", "boundingBoxes": [{"pageId": 1, "coords": [0, 0, 10, 10]}]},
            {"type": "figure", "content": null, "description": "A chart"}
        ]},
        "corrupted_data": false,
        "error_status": null
    }"#;

    #[test]
    fn test_round_trip_scenario() {
        let elements = flatten_json("doc.pdf", ROUND_TRIP).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].primary_page(PrimaryPagePolicy::FirstBox), Some(1));

        let doc = assemble_json("doc.pdf", ROUND_TRIP).unwrap();
        assert_eq!(doc, DocumentText::new("doc.pdf", "Hello\nA chart"));
    }

    #[test]
    fn test_corrupted_json_fails() {
        let err = assemble_json("doc.pdf", r#"{"corrupted_data": true}"#).unwrap_err();
        assert!(matches!(err, Error::DocumentParseFailure { .. }));
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(matches!(
            flatten_json("doc.pdf", "not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_builder_result() {
        let result = Docflat::new().with_stats().parse_json("doc.pdf", ROUND_TRIP).unwrap();
        assert_eq!(result.uri(), "doc.pdf");
        assert_eq!(result.rows().len(), 2);
        assert_eq!(result.stats().description_count, 1);
        assert!(result.skipped().is_empty());
        assert!(result.to_json(JsonFormat::Compact).unwrap().starts_with('['));
    }

    #[test]
    fn test_builder_strict_rejects_malformed() {
        let json = r#"{"document": {"elements": [{"content": "no type"}]}}"#;
        assert!(Docflat::new().lenient().parse_json("a", json).is_ok());
        assert!(matches!(
            Docflat::new().strict().parse_json("a", json),
            Err(Error::MalformedElementShape { index: 0, .. })
        ));
    }

    #[test]
    fn test_assemble_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf.parsed.json");
        std::fs::write(&path, ROUND_TRIP).unwrap();
        let doc = assemble_file(&path).unwrap();
        assert_eq!(doc.text, "Hello\nA chart");
    }
}
