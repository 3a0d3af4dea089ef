//! Assembly statistics.

use crate::model::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics collected while flattening and assembling documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    /// Number of documents covered
    pub document_count: usize,

    /// Elements produced by the flattener
    pub element_count: usize,

    /// Elements that contributed a line of text
    pub text_element_count: usize,

    /// Lines sourced from element content
    pub content_count: usize,

    /// Lines sourced from element descriptions
    pub description_count: usize,

    /// Element records skipped as malformed
    pub skipped_count: usize,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: usize,

    /// Character count (excluding whitespace)
    pub char_count: usize,

    /// Element count per type tag
    pub type_counts: BTreeMap<String, usize>,
}

impl AssemblyStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics for one document's elements.
    pub fn from_elements(elements: &[Element], skipped: usize) -> Self {
        let mut stats = Self {
            document_count: 1,
            skipped_count: skipped,
            ..Default::default()
        };
        for element in elements {
            stats.add_element(element);
        }
        stats
    }

    /// Account for one element.
    pub fn add_element(&mut self, element: &Element) {
        self.element_count += 1;
        *self
            .type_counts
            .entry(element.element_type.clone())
            .or_insert(0) += 1;

        if let Some(text) = element.text() {
            self.text_element_count += 1;
            if element.is_described() {
                self.description_count += 1;
            } else {
                self.content_count += 1;
            }
            self.count_text(text);
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count();
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count();
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &AssemblyStats) {
        self.document_count += other.document_count;
        self.element_count += other.element_count;
        self.text_element_count += other.text_element_count;
        self.content_count += other.content_count;
        self.description_count += other.description_count;
        self.skipped_count += other.skipped_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
        for (kind, count) in &other.type_counts {
            *self.type_counts.entry(kind.clone()).or_insert(0) += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_elements() {
        let elements = vec![
            Element::new(0, "text").with_content("Hello, world!"),
            Element::new(1, "figure").with_description("A chart"),
            Element::new(2, "page_footer"),
            Element::new(3, "text").with_content("x").with_description("ignored words"),
        ];
        let stats = AssemblyStats::from_elements(&elements, 2);

        assert_eq!(stats.document_count, 1);
        assert_eq!(stats.element_count, 4);
        assert_eq!(stats.text_element_count, 3);
        assert_eq!(stats.content_count, 2);
        assert_eq!(stats.description_count, 1);
        assert_eq!(stats.skipped_count, 2);
        assert_eq!(stats.word_count, 5);
        assert_eq!(stats.type_counts.get("text"), Some(&2));
    }

    #[test]
    fn test_stats_merge() {
        let mut a = AssemblyStats::from_elements(&[Element::new(0, "text").with_content("a")], 0);
        let b = AssemblyStats::from_elements(&[Element::new(0, "table").with_content("b c")], 1);
        a.merge(&b);

        assert_eq!(a.document_count, 2);
        assert_eq!(a.word_count, 3);
        assert_eq!(a.skipped_count, 1);
        assert_eq!(a.type_counts.len(), 2);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_skipped_count_is_not_truncated() {
        let skipped = u32::MAX as usize + 7;
        let stats = AssemblyStats::from_elements(&[], skipped);
        assert_eq!(stats.skipped_count, skipped);
    }
}
