//! Tabular element rows.

use crate::model::{Element, ElementRow, PrimaryPagePolicy};

/// Project elements onto one row each, keyed by document uri.
///
/// Page id and coordinates come from the primary bounding box selected by
/// `policy`; elements without boxes get empty geometry.
pub fn element_rows(uri: &str, elements: &[Element], policy: PrimaryPagePolicy) -> Vec<ElementRow> {
    elements
        .iter()
        .map(|e| ElementRow::from_element(uri, e, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    #[test]
    fn test_rows_follow_element_order() {
        let elements = vec![
            Element::new(0, "text")
                .with_content("Hello")
                .with_box(BoundingBox::new(1, [0.0, 0.0, 10.0, 10.0])),
            Element::new(1, "figure").with_description("A chart"),
        ];

        let rows = element_rows("a.pdf", &elements, PrimaryPagePolicy::FirstBox);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].page_id, Some(1));
        assert_eq!(rows[0].x1, Some(10.0));
        assert_eq!(rows[1].element_type, "figure");
        assert!(rows[1].page_id.is_none());
        assert!(rows.iter().all(|r| r.doc_uri == "a.pdf"));
    }
}
