//! Assembly options and configuration.

use super::{CleanupOptions, CleanupPreset};

/// Separator placed between element texts.
pub const DEFAULT_SEPARATOR: &str = "\n";

/// Options for assembling element texts into document text.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Separator between element texts
    pub separator: String,

    /// Per-element text cleanup
    pub cleanup: Option<CleanupOptions>,

    /// Collect assembly statistics
    pub collect_stats: bool,
}

impl AssembleOptions {
    /// Create new assemble options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            cleanup: None,
            collect_stats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_options_defaults() {
        let options = AssembleOptions::default();
        assert_eq!(options.separator, "\n");
        assert!(options.cleanup.is_none());
        assert!(!options.collect_stats);
    }

    #[test]
    fn test_assemble_options_builder() {
        let options = AssembleOptions::new()
            .with_separator("\n\n")
            .with_cleanup_preset(CleanupPreset::Minimal)
            .with_stats(true);

        assert_eq!(options.separator, "\n\n");
        assert!(options.cleanup.is_some_and(|c| !c.fix_ligatures));
        assert!(options.collect_stats);
    }
}
