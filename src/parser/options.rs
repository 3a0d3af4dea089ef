//! Flattening options and configuration.

use crate::model::PrimaryPagePolicy;

/// Options for flattening parser output into elements.
#[derive(Debug, Clone, Default)]
pub struct FlattenOptions {
    /// How malformed element records are handled
    pub error_mode: ErrorMode,

    /// How the primary page of a multi-box element is chosen.
    ///
    /// Flattening always keeps every box; the policy only selects the page
    /// and coordinates of the rows built by [`Flattener::rows`].
    ///
    /// [`Flattener::rows`]: super::Flattener::rows
    pub primary_page: PrimaryPagePolicy,
}

impl FlattenOptions {
    /// Create new flatten options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the whole document on the first malformed element.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Skip malformed elements and keep going.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the primary page policy.
    pub fn with_primary_page(mut self, policy: PrimaryPagePolicy) -> Self {
        self.primary_page = policy;
        self
    }
}

/// Error handling mode for malformed element records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on any malformed element
    Strict,
    /// Skip malformed elements with a warning and continue
    #[default]
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_options_builder() {
        let options = FlattenOptions::new()
            .strict()
            .with_primary_page(PrimaryPagePolicy::LowestPage);

        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.primary_page, PrimaryPagePolicy::LowestPage);
    }

    #[test]
    fn test_default_options() {
        let options = FlattenOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.primary_page, PrimaryPagePolicy::FirstBox);
    }
}
