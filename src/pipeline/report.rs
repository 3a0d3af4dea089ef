//! Per-document outcomes and batch reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::DocumentText;
use crate::render::AssemblyStats;

/// The result of running one document through the pipeline.
///
/// Failed documents keep their reason so consumers can tell "no text"
/// apart from "failed to parse".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutcome {
    /// Uri of the source document
    pub uri: String,

    /// Success or failure details
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

/// Success or failure of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Text was assembled (possibly empty)
    Succeeded {
        /// Assembled text
        text: String,
        /// Indices of element records skipped as malformed
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        skipped_elements: Vec<usize>,
        /// Assembly statistics, when collected
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stats: Option<AssemblyStats>,
    },
    /// The document could not be processed
    Failed {
        /// Error kind, see [`Error::kind`]
        error_kind: String,
        /// Human-readable failure reason
        reason: String,
    },
}

impl DocumentOutcome {
    /// Create a successful outcome.
    pub fn succeeded(text: DocumentText) -> Self {
        Self {
            uri: text.uri,
            status: OutcomeStatus::Succeeded {
                text: text.text,
                skipped_elements: Vec::new(),
                stats: None,
            },
        }
    }

    /// Create a failed outcome from an error.
    pub fn failed(uri: impl Into<String>, error: &Error) -> Self {
        let reason = match error {
            Error::DocumentParseFailure { reason, .. } => reason.clone(),
            other => other.to_string(),
        };
        Self {
            uri: uri.into(),
            status: OutcomeStatus::Failed {
                error_kind: error.kind().to_string(),
                reason,
            },
        }
    }

    /// Check if the document was processed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded { .. })
    }

    /// The assembled text, if successful.
    pub fn text(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Succeeded { text, .. } => Some(text),
            OutcomeStatus::Failed { .. } => None,
        }
    }

    /// The failure reason, if failed.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Failed { reason, .. } => Some(reason),
            OutcomeStatus::Succeeded { .. } => None,
        }
    }

    /// Statistics, if collected.
    pub fn stats(&self) -> Option<&AssemblyStats> {
        match &self.status {
            OutcomeStatus::Succeeded { stats, .. } => stats.as_ref(),
            OutcomeStatus::Failed { .. } => None,
        }
    }

    /// Convert a successful outcome into a [`DocumentText`].
    pub fn to_document_text(&self) -> Option<DocumentText> {
        self.text().map(|text| DocumentText::new(self.uri.clone(), text))
    }
}

/// Outcomes of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Outcomes in input order
    pub outcomes: Vec<DocumentOutcome>,

    /// Number of successful documents
    pub succeeded: usize,

    /// Number of failed documents
    pub failed: usize,

    /// Statistics merged across successful documents
    pub stats: AssemblyStats,

    /// When the batch started
    pub started_at: DateTime<Utc>,

    /// When the batch finished
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    /// Build a report from outcomes.
    pub fn from_outcomes(outcomes: Vec<DocumentOutcome>, started_at: DateTime<Utc>) -> Self {
        let mut stats = AssemblyStats::new();
        let mut succeeded = 0;
        for outcome in &outcomes {
            if outcome.is_success() {
                succeeded += 1;
            }
            if let Some(s) = outcome.stats() {
                stats.merge(s);
            }
        }
        let failed = outcomes.len() - succeeded;

        Self {
            outcomes,
            succeeded,
            failed,
            stats,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Total number of documents.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if every document succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Texts of the successful documents.
    pub fn texts(&self) -> Vec<DocumentText> {
        self.outcomes
            .iter()
            .filter_map(DocumentOutcome::to_document_text)
            .collect()
    }

    /// The failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Wall-clock duration of the batch.
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let ok = DocumentOutcome::succeeded(DocumentText::new("a.pdf", "Hello"));
        let json = serde_json::to_string(&ok).unwrap();
        assert_eq!(json, r#"{"uri":"a.pdf","status":"succeeded","text":"Hello"}"#);

        let err = Error::DocumentParseFailure {
            uri: "b.pdf".to_string(),
            reason: "parser flagged the document as corrupted".to_string(),
        };
        let failed = DocumentOutcome::failed("b.pdf", &err);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error_kind"], "document_parse_failure");
        assert_eq!(json["reason"], "parser flagged the document as corrupted");
    }

    #[test]
    fn test_outcome_round_trip() {
        let json = r#"{"uri":"a.pdf","status":"succeeded","text":"","skipped_elements":[2]}"#;
        let outcome: DocumentOutcome = serde_json::from_str(json).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.text(), Some(""));
    }

    #[test]
    fn test_batch_report_counts() {
        let outcomes = vec![
            DocumentOutcome::succeeded(DocumentText::new("a", "x")),
            DocumentOutcome::failed("b", &Error::Parser("missing".to_string())),
            DocumentOutcome::succeeded(DocumentText::new("c", "")),
        ];
        let report = BatchReport::from_outcomes(outcomes, Utc::now());

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.all_succeeded());
        assert_eq!(report.texts().len(), 2);
        assert_eq!(report.failures().next().unwrap().uri, "b");
        assert!(report.duration() >= chrono::Duration::zero());
    }
}
