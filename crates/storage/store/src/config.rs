use serde::Deserialize;
use std::path::PathBuf;

/// Configuration for opening a file-backed store, loadable from a TOML
/// document via `toml::from_str`. This is an ambient convenience layered
/// on top of the programmatic `FileStore::open` constructor, not part of
/// the core store contract.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the backing file. Created if it does not already exist.
    pub path: PathBuf,
    /// When `true`, the store is opened read-only and every mutating
    /// operation (`write`, `new`, `append`, `wipe`) fails with
    /// [`crate::errors::StoreError::ReadOnlyViolation`].
    #[serde(default)]
    pub read_only: bool,
    /// Unix file mode used when creating a new backing file.
    #[serde(default = "default_mode")]
    pub mode: u32,
}

fn default_mode() -> u32 {
    0o644
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            read_only: false,
            mode: default_mode(),
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}
