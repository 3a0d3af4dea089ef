//! Document text assembly.
//!
//! Elements with content or a description each contribute exactly one
//! entry, content first; elements with neither contribute nothing.

use crate::model::{DocumentText, Element};

use super::{AssembleOptions, CleanupPipeline};

/// Assemble element texts into one newline-joined string.
///
/// ```
/// use docflat::model::Element;
/// use docflat::render::assemble;
///
/// let elements = vec![
///     Element::new(0, "text").with_content("a"),
///     Element::new(1, "page_footer"),
///     Element::new(2, "figure").with_description("b"),
/// ];
/// assert_eq!(assemble(&elements), "a\nb");
/// ```
pub fn assemble(elements: &[Element]) -> String {
    elements
        .iter()
        .filter_map(Element::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assembles element sequences with configurable cleanup and separator.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    options: AssembleOptions,
    cleanup: Option<CleanupPipeline>,
}

impl Assembler {
    /// Create an assembler with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler with custom options.
    pub fn with_options(options: AssembleOptions) -> Self {
        let cleanup = options.cleanup.clone().map(CleanupPipeline::new);
        Self { options, cleanup }
    }

    /// The options in use.
    pub fn options(&self) -> &AssembleOptions {
        &self.options
    }

    /// Assemble elements into a single text.
    pub fn assemble(&self, elements: &[Element]) -> String {
        let texts = elements.iter().filter_map(Element::text);
        match self.cleanup {
            Some(ref pipeline) => texts
                .map(|t| pipeline.process(t))
                .collect::<Vec<_>>()
                .join(self.options.separator.as_str()),
            None => texts.collect::<Vec<_>>().join(self.options.separator.as_str()),
        }
    }

    /// Assemble elements into a [`DocumentText`] record.
    pub fn assemble_document(&self, uri: &str, elements: &[Element]) -> DocumentText {
        DocumentText::new(uri, self.assemble(elements))
    }
}
