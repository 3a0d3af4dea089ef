//! Element flattening.
//!
//! Walks the parser's nested `elements` array and turns each record into an
//! [`Element`], keeping source order. Failed parse results are rejected up
//! front so a corrupted document never looks like an empty one.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{json_kind, BoundingBox, Element, ElementRow, ParseResult};

use super::options::{ErrorMode, FlattenOptions};

/// Output of flattening one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    /// Elements in source order
    pub elements: Vec<Element>,

    /// Element records that were skipped as malformed
    pub skipped: Vec<SkippedElement>,
}

impl Flattened {
    /// Number of elements kept.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if no elements were kept.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Consume and return the elements.
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

/// A malformed element record that was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedElement {
    /// Position in the parser's `elements` array
    pub index: usize,
    /// What was wrong with the record
    pub reason: String,
}

/// Flattens parser output into ordered elements.
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    options: FlattenOptions,
}

impl Flattener {
    /// Create a flattener with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flattener with custom options.
    pub fn with_options(options: FlattenOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    /// Flatten one document's parse result.
    ///
    /// # Errors
    ///
    /// * `Error::DocumentParseFailure` if the parser flagged the document as
    ///   corrupted or reported an error status.
    /// * `Error::MalformedElementShape` in strict mode, for the first element
    ///   record that does not have the expected shape.
    pub fn flatten(&self, uri: &str, result: &ParseResult) -> Result<Flattened> {
        if let Some(reason) = result.failure_reason() {
            return Err(Error::DocumentParseFailure {
                uri: uri.to_string(),
                reason,
            });
        }

        let Some(raw) = result.elements() else {
            log::debug!("{}: parser returned no elements", uri);
            return Ok(Flattened::default());
        };

        log::debug!("{}: flattening {} element records", uri, raw.len());

        let mut flattened = Flattened {
            elements: Vec::with_capacity(raw.len()),
            skipped: Vec::new(),
        };

        for (index, value) in raw.iter().enumerate() {
            match decode_element(index, value) {
                Ok(element) => flattened.elements.push(element),
                Err(reason) => match self.options.error_mode {
                    ErrorMode::Strict => {
                        return Err(Error::MalformedElementShape {
                            uri: uri.to_string(),
                            index,
                            reason,
                        });
                    }
                    ErrorMode::Lenient => {
                        log::warn!("{}: skipping element {}: {}", uri, index, reason);
                        flattened.skipped.push(SkippedElement { index, reason });
                    }
                },
            }
        }

        Ok(flattened)
    }

    /// Project flattened elements onto rows, locating each element on the
    /// page chosen by the configured primary page policy.
    pub fn rows(&self, uri: &str, elements: &[Element]) -> Vec<ElementRow> {
        elements
            .iter()
            .map(|e| ElementRow::from_element(uri, e, self.options.primary_page))
            .collect()
    }
}

/// Flatten a parse result with default options, returning only the elements.
pub fn flatten(uri: &str, result: &ParseResult) -> Result<Vec<Element>> {
    Flattener::new()
        .flatten(uri, result)
        .map(Flattened::into_elements)
}

#[derive(Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    element_type: Option<String>,
    content: Option<String>,
    description: Option<String>,
    #[serde(default, alias = "boundingBoxes", alias = "bounding_boxes")]
    bbox: Option<Vec<RawBoundingBox>>,
}

#[derive(Deserialize)]
struct RawBoundingBox {
    #[serde(default, alias = "pageId")]
    page_id: Option<i64>,
    #[serde(default, alias = "coords")]
    coord: Option<Vec<f64>>,
}

fn decode_element(index: usize, value: &Value) -> std::result::Result<Element, String> {
    if !value.is_object() {
        return Err(format!("expected an object, found {}", json_kind(value)));
    }

    let raw = RawElement::deserialize(value).map_err(|e| e.to_string())?;
    let element_type = raw.element_type.ok_or("missing type")?;

    let bounding_boxes = raw
        .bbox
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, b)| decode_box(i, b))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Element {
        index,
        element_type,
        content: raw.content,
        description: raw.description,
        bounding_boxes,
    })
}

fn decode_box(i: usize, raw: RawBoundingBox) -> std::result::Result<BoundingBox, String> {
    let page_id = raw
        .page_id
        .ok_or_else(|| format!("bounding box {} is missing page_id", i))?;
    let coord = raw
        .coord
        .ok_or_else(|| format!("bounding box {} is missing coordinates", i))?;
    let coord: [f64; 4] = coord.try_into().map_err(|c: Vec<f64>| {
        format!("bounding box {} has {} coordinates, expected 4", i, c.len())
    })?;
    Ok(BoundingBox::new(page_id, coord))
}
