//! Document pipeline: parse, flatten and assemble, one document at a time.
//!
//! Documents are independent of each other. A failure in one document is
//! recorded in its [`DocumentOutcome`] and never aborts the rest of a batch.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use docflat::corpus::LocalCorpus;
//! use docflat::parser::SidecarParser;
//! use docflat::pipeline::Pipeline;
//!
//! fn main() -> docflat::Result<()> {
//!     let pipeline = Pipeline::new(Arc::new(SidecarParser::new()));
//!     let report = pipeline.process_corpus(&LocalCorpus::new("./pdfs"))?;
//!     println!("{} ok, {} failed", report.succeeded, report.failed);
//!     Ok(())
//! }
//! ```

mod report;

pub use report::{BatchReport, DocumentOutcome, OutcomeStatus};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use crossbeam_channel::{SendError, Sender};
use rayon::prelude::*;

use crate::corpus::CorpusSource;
use crate::error::Result;
use crate::model::{Document, ParseResult};
use crate::parser::{DocumentParser, FlattenOptions, Flattener};
use crate::render::{AssembleOptions, Assembler, AssemblyStats};

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Flattening options
    pub flatten: FlattenOptions,

    /// Assembly options
    pub assemble: AssembleOptions,

    /// Process documents in parallel
    pub parallel: bool,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set flattening options.
    pub fn with_flatten_options(mut self, options: FlattenOptions) -> Self {
        self.flatten = options;
        self
    }

    /// Set assembly options.
    pub fn with_assemble_options(mut self, options: AssembleOptions) -> Self {
        self.assemble = options;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            flatten: FlattenOptions::default(),
            assemble: AssembleOptions::default(),
            parallel: true,
        }
    }
}

/// Runs documents through parser, flattener and assembler.
pub struct Pipeline {
    parser: Arc<dyn DocumentParser>,
    flattener: Flattener,
    assembler: Assembler,
    parallel: bool,
}

impl Pipeline {
    /// Create a pipeline with default options.
    pub fn new(parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            parser,
            flattener: Flattener::new(),
            assembler: Assembler::new(),
            parallel: true,
        }
    }

    /// Set pipeline options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.flattener = Flattener::with_options(options.flatten);
        self.assembler = Assembler::with_options(options.assemble);
        self.parallel = options.parallel;
        self
    }

    /// The parser in use.
    pub fn parser(&self) -> &dyn DocumentParser {
        self.parser.as_ref()
    }

    /// Flatten and assemble an already-obtained parse result.
    pub fn process_parsed(&self, uri: &str, result: &ParseResult) -> Result<DocumentOutcome> {
        let flattened = self.flattener.flatten(uri, result)?;
        let text = self.assembler.assemble(&flattened.elements);

        let stats = self.assembler.options().collect_stats.then(|| {
            AssemblyStats::from_elements(&flattened.elements, flattened.skipped.len())
        });

        Ok(DocumentOutcome {
            uri: uri.to_string(),
            status: OutcomeStatus::Succeeded {
                text,
                skipped_elements: flattened.skipped.iter().map(|s| s.index).collect(),
                stats,
            },
        })
    }

    /// Process one document. Failures are captured in the outcome.
    pub fn process(&self, document: &Document) -> DocumentOutcome {
        let result = self
            .parser
            .parse(document)
            .and_then(|parsed| self.process_parsed(&document.uri, &parsed));

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("{}: {}", document.uri, e);
                DocumentOutcome::failed(document.uri.clone(), &e)
            }
        }
    }

    /// Process a batch of documents, returning outcomes in input order.
    pub fn process_batch(&self, documents: &[Document]) -> BatchReport {
        let started_at = Utc::now();
        log::debug!(
            "processing {} documents with parser '{}'",
            documents.len(),
            self.parser.name()
        );

        let outcomes: Vec<DocumentOutcome> = if self.parallel {
            documents.par_iter().map(|doc| self.process(doc)).collect()
        } else {
            documents.iter().map(|doc| self.process(doc)).collect()
        };

        let report = BatchReport::from_outcomes(outcomes, started_at);
        log::info!(
            "processed {} documents: {} succeeded, {} failed",
            report.total(),
            report.succeeded,
            report.failed
        );
        report
    }

    /// Process documents and send each outcome as soon as it is ready.
    ///
    /// Outcomes arrive in completion order. Returns the number of outcomes
    /// sent. Once the receiver is dropped no further documents are started;
    /// in parallel mode documents already in flight still finish.
    pub fn process_streaming(&self, documents: &[Document], sender: &Sender<DocumentOutcome>) -> usize {
        if self.parallel {
            let sent = AtomicUsize::new(0);
            let delivered = documents
                .par_iter()
                .try_for_each_with(sender.clone(), |tx, doc| {
                    tx.send(self.process(doc))?;
                    sent.fetch_add(1, Ordering::Relaxed);
                    Ok::<(), SendError<DocumentOutcome>>(())
                });
            if delivered.is_err() {
                log::debug!("outcome receiver dropped, stopping early");
            }
            sent.into_inner()
        } else {
            documents
                .iter()
                .map(|doc| sender.send(self.process(doc)))
                .take_while(|sent| sent.is_ok())
                .count()
        }
    }

    /// Load every document of a corpus and process them as a batch.
    pub fn process_corpus(&self, corpus: &dyn CorpusSource) -> Result<BatchReport> {
        let documents = corpus.documents()?;
        log::debug!("{}: loaded {} documents", corpus.location(), documents.len());
        Ok(self.process_batch(&documents))
    }
}
