//! Element and bounding-box types.

use serde::{Deserialize, Serialize};

/// One rectangular region on one page.
///
/// Page ids and coordinates are passed through exactly as the parser
/// supplied them; nothing is renormalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Page id as reported by the parser
    pub page_id: i64,
    /// Left
    pub x0: f64,
    /// Top
    pub y0: f64,
    /// Right
    pub x1: f64,
    /// Bottom
    pub y1: f64,
}

impl BoundingBox {
    /// Create a bounding box from a page id and `[x0, y0, x1, y1]`.
    pub fn new(page_id: i64, coord: [f64; 4]) -> Self {
        Self {
            page_id,
            x0: coord[0],
            y0: coord[1],
            x1: coord[2],
            y1: coord[3],
        }
    }

    /// Coordinates as `[x0, y0, x1, y1]`.
    pub fn coord(&self) -> [f64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// Width of the box (may be negative if the parser flips axes).
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// How the primary page of a multi-box element is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryPagePolicy {
    /// The first bounding box in source order
    #[default]
    FirstBox,
    /// The bounding box with the lowest page id (first of ties)
    LowestPage,
}

/// One semantic unit of a parsed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Position in the parser's `elements` array
    pub index: usize,

    /// Element type tag as supplied by the parser
    #[serde(rename = "type")]
    pub element_type: String,

    /// Raw extracted text
    pub content: Option<String>,

    /// Generated description (figures, images)
    pub description: Option<String>,

    /// Regions covered by the element, in source order
    pub bounding_boxes: Vec<BoundingBox>,
}

impl Element {
    /// Create an element with no text and no boxes.
    pub fn new(index: usize, element_type: impl Into<String>) -> Self {
        Self {
            index,
            element_type: element_type.into(),
            content: None,
            description: None,
            bounding_boxes: Vec::new(),
        }
    }

    /// Set the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a bounding box.
    pub fn with_box(mut self, bbox: BoundingBox) -> Self {
        self.bounding_boxes.push(bbox);
        self
    }

    /// The element's text: content if present, otherwise description.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().or(self.description.as_deref())
    }

    /// Check if the element carries content or a description.
    pub fn has_text(&self) -> bool {
        self.content.is_some() || self.description.is_some()
    }

    /// Whether the text comes from the description rather than content.
    pub fn is_described(&self) -> bool {
        self.content.is_none() && self.description.is_some()
    }

    /// The bounding box selected by `policy`.
    pub fn primary_box(&self, policy: PrimaryPagePolicy) -> Option<&BoundingBox> {
        match policy {
            PrimaryPagePolicy::FirstBox => self.bounding_boxes.first(),
            PrimaryPagePolicy::LowestPage => self
                .bounding_boxes
                .iter()
                .reduce(|best, b| if b.page_id < best.page_id { b } else { best }),
        }
    }

    /// The page id of the primary bounding box.
    pub fn primary_page(&self, policy: PrimaryPagePolicy) -> Option<i64> {
        self.primary_box(policy).map(|b| b.page_id)
    }

    /// Distinct page ids the element touches, in first-seen order.
    pub fn pages(&self) -> Vec<i64> {
        let mut pages = Vec::new();
        for b in &self.bounding_boxes {
            if !pages.contains(&b.page_id) {
                pages.push(b.page_id);
            }
        }
        pages
    }

    /// Check if the element spans more than one page.
    pub fn spans_pages(&self) -> bool {
        self.pages().len() > 1
    }
}

/// A flat, tabular view of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRow {
    /// Uri of the source document
    pub doc_uri: String,
    /// Position in the parser's `elements` array
    pub element_index: usize,
    /// Primary page id
    pub page_id: Option<i64>,
    /// Raw extracted text
    pub content: Option<String>,
    /// Generated description
    pub description: Option<String>,
    /// Element type tag
    #[serde(rename = "type")]
    pub element_type: String,
    pub x0: Option<f64>,
    pub y0: Option<f64>,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
}

impl ElementRow {
    /// Project an element onto a row using its primary bounding box.
    pub fn from_element(doc_uri: &str, element: &Element, policy: PrimaryPagePolicy) -> Self {
        let bbox = element.primary_box(policy);
        Self {
            doc_uri: doc_uri.to_string(),
            element_index: element.index,
            page_id: bbox.map(|b| b.page_id),
            content: element.content.clone(),
            description: element.description.clone(),
            element_type: element.element_type.clone(),
            x0: bbox.map(|b| b.x0),
            y0: bbox.map(|b| b.y0),
            x1: bbox.map(|b| b.x1),
            y1: bbox.map(|b| b.y1),
        }
    }
}
