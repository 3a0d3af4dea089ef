//! Storage locations for corpora.

use std::path::{Path, PathBuf};

/// Default volume holding the source documents.
pub const DEFAULT_VOLUME: &str = "pdfs";

/// A catalog/schema/volume triple naming where a corpus lives.
///
/// Renders as `/Volumes/{catalog}/{schema}/{volume}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeLocation {
    /// Catalog name
    pub catalog: String,
    /// Schema name
    pub schema: String,
    /// Volume name
    pub volume: String,
}

impl VolumeLocation {
    /// Create a location in the default `pdfs` volume.
    pub fn new(catalog: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            volume: DEFAULT_VOLUME.to_string(),
        }
    }

    /// Use a different volume.
    pub fn with_volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = volume.into();
        self
    }

    /// The storage path, with a trailing slash.
    pub fn path(&self) -> String {
        format!("/Volumes/{}/{}/{}/", self.catalog, self.schema, self.volume)
    }

    /// Resolve the location under a local mount point.
    ///
    /// A mount at `/mnt/lake` maps this location to
    /// `/mnt/lake/Volumes/{catalog}/{schema}/{volume}`.
    pub fn resolve(&self, mount: &Path) -> PathBuf {
        mount
            .join("Volumes")
            .join(&self.catalog)
            .join(&self.schema)
            .join(&self.volume)
    }
}

impl std::fmt::Display for VolumeLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
