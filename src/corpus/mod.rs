//! Corpus enumeration.
//!
//! A corpus source yields `(uri, bytes)` pairs for the files under a storage
//! location that match a file name pattern and a format tag.
//!
//! # Example
//!
//! ```no_run
//! use docflat::corpus::{CorpusOptions, CorpusSource, LocalCorpus};
//!
//! fn main() -> docflat::Result<()> {
//!     let corpus = LocalCorpus::new("/mnt/lake/Volumes/main/docs/pdfs")
//!         .with_options(CorpusOptions::new().with_pattern("*.pdf")?.with_limit(2));
//!     for doc in corpus.documents()? {
//!         println!("{} ({} bytes)", doc.uri, doc.len());
//!     }
//!     Ok(())
//! }
//! ```

mod location;
mod pattern;

pub use location::{VolumeLocation, DEFAULT_VOLUME};
pub use pattern::FilePattern;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::detect::{detect_format_from_path, DocumentFormat};
use crate::error::{Error, Result};
use crate::model::Document;

/// A capability that enumerates the documents of a corpus.
pub trait CorpusSource: Send + Sync {
    /// Human-readable location of the corpus, used in logs.
    fn location(&self) -> String;

    /// Load every matching document.
    fn documents(&self) -> Result<Vec<Document>>;
}

/// Which file formats a corpus accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormatFilter {
    /// Any file, read as raw bytes
    #[default]
    BinaryFile,
    /// Only files whose header matches one of these formats
    Only(Vec<DocumentFormat>),
}

impl FormatFilter {
    /// Parse a format tag: `binaryFile` or a comma-separated list of
    /// format names such as `pdf,png`.
    pub fn parse(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("binaryfile") || tag.eq_ignore_ascii_case("binary") {
            return Ok(FormatFilter::BinaryFile);
        }

        let formats = tag
            .split(',')
            .map(|name| {
                DocumentFormat::from_name(name)
                    .ok_or_else(|| Error::Corpus(format!("unknown format tag: {}", name.trim())))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(FormatFilter::Only(formats))
    }

    /// Check whether a detected format passes the filter.
    pub fn accepts(&self, format: Option<DocumentFormat>) -> bool {
        match self {
            FormatFilter::BinaryFile => true,
            FormatFilter::Only(formats) => format.is_some_and(|f| formats.contains(&f)),
        }
    }
}

/// Options for enumerating a local corpus.
#[derive(Debug, Clone)]
pub struct CorpusOptions {
    /// File name pattern
    pub pattern: FilePattern,

    /// Format filter
    pub format: FormatFilter,

    /// Maximum number of documents (None = unlimited)
    pub limit: Option<usize>,

    /// Descend into subdirectories
    pub recursive: bool,
}

impl CorpusOptions {
    /// Create new corpus options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file name pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = FilePattern::new(pattern)?;
        Ok(self)
    }

    /// Set the format filter.
    pub fn with_format(mut self, format: FormatFilter) -> Self {
        self.format = format;
        self
    }

    /// Limit the number of documents.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Enable or disable recursion into subdirectories.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            pattern: FilePattern::any(),
            format: FormatFilter::BinaryFile,
            limit: None,
            recursive: true,
        }
    }
}

/// A corpus stored in a local (or locally mounted) directory.
#[derive(Debug, Clone)]
pub struct LocalCorpus {
    root: PathBuf,
    options: CorpusOptions,
}

impl LocalCorpus {
    /// Create a corpus rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: CorpusOptions::default(),
        }
    }

    /// Create a corpus for a volume location under a local mount point.
    pub fn from_volume(location: &VolumeLocation, mount: &Path) -> Self {
        Self::new(location.resolve(mount))
    }

    /// Set corpus options.
    pub fn with_options(mut self, options: CorpusOptions) -> Self {
        self.options = options;
        self
    }

    /// The corpus root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths of matching files, sorted by name.
    pub fn paths(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(Error::Corpus(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let max_depth = if self.options.recursive { usize::MAX } else { 1 };
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.root)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            if self.options.limit.is_some_and(|limit| paths.len() >= limit) {
                break;
            }

            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if !self
                .options
                .pattern
                .matches(&entry.file_name().to_string_lossy())
            {
                continue;
            }
            if self.options.format != FormatFilter::BinaryFile {
                let format = detect_format_from_path(entry.path()).ok();
                if !self.options.format.accepts(format) {
                    log::debug!("skipping {}: format not accepted", entry.path().display());
                    continue;
                }
            }

            paths.push(entry.into_path());
        }

        log::debug!(
            "{}: {} files match {}",
            self.root.display(),
            paths.len(),
            self.options.pattern.as_str()
        );
        Ok(paths)
    }
}

impl CorpusSource for LocalCorpus {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn documents(&self) -> Result<Vec<Document>> {
        self.paths()?.iter().map(Document::from_path).collect()
    }
}
