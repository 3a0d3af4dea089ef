//! Document parser abstraction layer.
//!
//! The actual layout analysis happens in an external service. This module
//! isolates it behind a trait so the pipeline only depends on the contract:
//! bytes in, [`ParseResult`] out.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Document, ParseResult};

/// Default suffix of saved parser output next to a source document.
pub const DEFAULT_SIDECAR_SUFFIX: &str = ".parsed.json";

/// Abstract interface for a document-parsing capability.
///
/// Implementations must be safe to call concurrently for distinct
/// documents.
pub trait DocumentParser: Send + Sync {
    /// Name of the parser, used in logs.
    fn name(&self) -> &str;

    /// Parse one document.
    ///
    /// Returning `Err` means no result could be obtained at all. A result
    /// flagged as corrupted or carrying an error status is returned as `Ok`
    /// and rejected later by the flattener.
    fn parse(&self, document: &Document) -> Result<ParseResult>;
}

/// Reads parser output that was saved to disk as JSON.
///
/// For a document `dir/report.pdf` the sidecar is `dir/report.pdf.parsed.json`
/// by default, or `<output_dir>/report.pdf.parsed.json` when an output
/// directory is configured.
#[derive(Debug, Clone)]
pub struct SidecarParser {
    suffix: String,
    output_dir: Option<PathBuf>,
}

impl SidecarParser {
    /// Create a sidecar parser using the default suffix.
    pub fn new() -> Self {
        Self {
            suffix: DEFAULT_SIDECAR_SUFFIX.to_string(),
            output_dir: None,
        }
    }

    /// Set the sidecar file suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Look for sidecars in a separate directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Path of the sidecar for a document uri.
    pub fn sidecar_path(&self, uri: &str) -> PathBuf {
        let source = Path::new(uri);
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sidecar = format!("{}{}", file_name, self.suffix);

        match (&self.output_dir, source.parent()) {
            (Some(dir), _) => dir.join(sidecar),
            (None, Some(parent)) => parent.join(sidecar),
            (None, None) => PathBuf::from(sidecar),
        }
    }
}

impl Default for SidecarParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for SidecarParser {
    fn name(&self) -> &str {
        "sidecar"
    }

    fn parse(&self, document: &Document) -> Result<ParseResult> {
        let path = self.sidecar_path(&document.uri);
        let data = std::fs::read(&path).map_err(|e| {
            Error::Parser(format!(
                "no parser output for {} at {}: {}",
                document.uri,
                path.display(),
                e
            ))
        })?;
        log::debug!("{}: loaded parser output from {}", document.uri, path.display());
        ParseResult::from_slice(&data)
    }
}

/// Adapts a closure into a [`DocumentParser`].
pub struct FnParser<F> {
    name: String,
    f: F,
}

impl<F> FnParser<F>
where
    F: Fn(&Document) -> Result<ParseResult> + Send + Sync,
{
    /// Wrap a closure under the given parser name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> DocumentParser for FnParser<F>
where
    F: Fn(&Document) -> Result<ParseResult> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, document: &Document) -> Result<ParseResult> {
        (self.f)(document)
    }
}
