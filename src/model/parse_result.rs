//! Parser output types.
//!
//! `ParseResult` mirrors the variant returned by the managed
//! `ai_parse_document` function:
//!
//! ```json
//! {
//!   "document": { "pages": [...], "elements": [...] },
//!   "corrupted_data": false,
//!   "error_status": null,
//!   "metadata": { "id": "...", "version": "..." }
//! }
//! ```
//!
//! Element records are kept as raw JSON values so the flattener can reject
//! a single malformed element without losing the rest of the document.

use crate::error::Result;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The structured output of the document parser for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Parsed document body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<ParsedDocument>,

    /// Top-level pages, for parsers that do not nest under `document`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<Value>>,

    /// Top-level elements, for parsers that do not nest under `document`
    #[serde(
        default,
        deserialize_with = "deserialize_elements",
        skip_serializing_if = "Option::is_none"
    )]
    pub elements: Option<Vec<Value>>,

    /// Whether the parser flagged the input as corrupted
    #[serde(
        default,
        rename = "corrupted_data",
        alias = "corrupted",
        deserialize_with = "null_as_default"
    )]
    pub corrupted: bool,

    /// Error reported by the parser, if any
    #[serde(
        default,
        rename = "error_status",
        alias = "errorStatus",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_status: Option<ErrorStatus>,

    /// Parser metadata (opaque)
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
}

impl ParseResult {
    /// Decode parser output from JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Decode parser output from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode parser output from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Create a successful result holding the given raw elements.
    pub fn with_elements(elements: Vec<Value>) -> Self {
        Self {
            document: Some(ParsedDocument {
                pages: Vec::new(),
                elements: Some(elements),
            }),
            ..Default::default()
        }
    }

    /// Create a result flagged as corrupted.
    pub fn corrupted() -> Self {
        Self {
            corrupted: true,
            ..Default::default()
        }
    }

    /// Attach an error status.
    pub fn with_error_status(mut self, status: ErrorStatus) -> Self {
        self.error_status = Some(status);
        self
    }

    /// Raw element records, `None` when the parser supplied none.
    pub fn elements(&self) -> Option<&[Value]> {
        self.document
            .as_ref()
            .and_then(|d| d.elements.as_deref())
            .or(self.elements.as_deref())
    }

    /// Raw page records.
    pub fn pages(&self) -> &[Value] {
        match self.document.as_ref() {
            Some(doc) if !doc.pages.is_empty() => &doc.pages,
            _ => self.pages.as_deref().unwrap_or(&[]),
        }
    }

    /// Number of pages reported by the parser.
    pub fn page_count(&self) -> usize {
        self.pages().len()
    }

    /// Check if the parser reported corruption or an error status.
    pub fn is_failed(&self) -> bool {
        self.corrupted || self.error_status.as_ref().is_some_and(ErrorStatus::is_set)
    }

    /// Human-readable reason for a failed result, `None` on success.
    pub fn failure_reason(&self) -> Option<String> {
        let mut reasons = Vec::new();
        if self.corrupted {
            reasons.push("parser flagged the document as corrupted".to_string());
        }
        if let Some(status) = self.error_status.as_ref().filter(|s| s.is_set()) {
            reasons.push(format!("error status: {}", status.describe()));
        }
        if reasons.is_empty() {
            None
        } else {
            Some(reasons.join("; "))
        }
    }
}

/// The `document` body of a parse result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Page records (opaque)
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<Value>,

    /// Element records in reading order
    #[serde(
        default,
        deserialize_with = "deserialize_elements",
        skip_serializing_if = "Option::is_none"
    )]
    pub elements: Option<Vec<Value>>,
}

/// Error descriptor reported by the parser.
///
/// The managed function reports an array of `{error_message, page_id}`
/// entries; bare strings and single objects are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorStatus {
    /// Free-form message
    Message(String),
    /// List of per-page errors
    Entries(Vec<ErrorEntry>),
    /// A single error
    Entry(ErrorEntry),
}

impl ErrorStatus {
    /// Create an error status from a message.
    pub fn message(message: impl Into<String>) -> Self {
        ErrorStatus::Message(message.into())
    }

    /// Empty strings and empty lists do not count as errors.
    pub fn is_set(&self) -> bool {
        match self {
            ErrorStatus::Message(m) => !m.trim().is_empty(),
            ErrorStatus::Entries(entries) => !entries.is_empty(),
            ErrorStatus::Entry(_) => true,
        }
    }

    /// Render the status as a single line.
    pub fn describe(&self) -> String {
        match self {
            ErrorStatus::Message(m) => m.trim().to_string(),
            ErrorStatus::Entries(entries) => entries
                .iter()
                .map(ErrorEntry::describe)
                .collect::<Vec<_>>()
                .join("; "),
            ErrorStatus::Entry(entry) => entry.describe(),
        }
    }
}

/// One error reported by the parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Error message
    #[serde(default, alias = "errorMessage", alias = "message")]
    pub error_message: Option<String>,

    /// Page the error refers to
    #[serde(default, alias = "pageId")]
    pub page_id: Option<i64>,
}

impl ErrorEntry {
    fn describe(&self) -> String {
        let message = self.error_message.as_deref().unwrap_or("unspecified error");
        match self.page_id {
            Some(page) => format!("{} (page {})", message, page),
            None => message.to_string(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Elements arrive either as an array or, when projected through a string
/// column, as a JSON-encoded array.
fn deserialize_elements<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(&encoded) {
            Ok(Value::Array(items)) => Ok(Some(items)),
            Ok(Value::Null) => Ok(None),
            Ok(other) => Err(de::Error::custom(format!(
                "encoded elements must be an array, found {}",
                json_kind(&other)
            ))),
            Err(e) => Err(de::Error::custom(format!("invalid encoded elements: {}", e))),
        },
        Some(other) => Err(de::Error::custom(format!(
            "elements must be an array, found {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_managed_shape() {
        let result = ParseResult::from_value(json!({
            "document": {
                "pages": [{"id": 0, "image_uri": null}, {"id": 1, "image_uri": null}],
                "elements": [{"id": 0, "type": "text", "content": "Hi", "bbox": []}]
            },
            "corrupted_data": null,
            "error_status": null,
            "metadata": {"id": "abc", "version": "2.0"}
        }))
        .unwrap();

        assert!(!result.is_failed());
        assert_eq!(result.page_count(), 2);
        assert_eq!(result.elements().map(|e| e.len()), Some(1));
        assert_eq!(result.metadata.get("version"), Some(&json!("2.0")));
    }

    #[test]
    fn test_decode_top_level_shape() {
        let result = ParseResult::from_json(
            r#"{"elements": [{"type": "text"}], "pages": [{}], "corrupted": false}"#,
        )
        .unwrap();
        assert_eq!(result.elements().map(|e| e.len()), Some(1));
        assert_eq!(result.page_count(), 1);
    }

    #[test]
    fn test_decode_string_encoded_elements() {
        let result = ParseResult::from_value(json!({
            "document": {"elements": "[{\"type\": \"text\", \"content\": \"a\"}]"}
        }))
        .unwrap();
        assert_eq!(result.elements().map(|e| e.len()), Some(1));

        let err = ParseResult::from_value(json!({"document": {"elements": 42}}));
        assert!(err.is_err());
    }

    #[test]
    fn test_absent_elements() {
        let result = ParseResult::from_json(r#"{"document": {"pages": []}}"#).unwrap();
        assert!(result.elements().is_none());

        let result = ParseResult::from_json(r#"{"document": {"elements": null}}"#).unwrap();
        assert!(result.elements().is_none());
    }

    #[test]
    fn test_error_status_shapes() {
        let result = ParseResult::from_value(json!({
            "error_status": [{"error_message": "timeout", "page_id": 4}]
        }))
        .unwrap();
        assert!(result.is_failed());
        assert_eq!(
            result.failure_reason().unwrap(),
            "error status: timeout (page 4)"
        );

        let result = ParseResult::from_value(json!({"error_status": "quota exceeded"})).unwrap();
        assert!(result.is_failed());

        let result = ParseResult::from_value(json!({"error_status": {"message": "bad"}})).unwrap();
        assert!(result.is_failed());

        let result = ParseResult::from_value(json!({"error_status": []})).unwrap();
        assert!(!result.is_failed());

        let result = ParseResult::from_value(json!({"error_status": "  "})).unwrap();
        assert!(!result.is_failed());
    }

    #[test]
    fn test_failure_reason_combines_flags() {
        let result = ParseResult::corrupted().with_error_status(ErrorStatus::message("unreadable"));
        let reason = result.failure_reason().unwrap();
        assert!(reason.contains("corrupted"));
        assert!(reason.contains("unreadable"));

        assert!(ParseResult::default().failure_reason().is_none());
    }
}
