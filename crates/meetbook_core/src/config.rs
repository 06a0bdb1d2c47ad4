//! Store configuration.
//!
//! # Invariants
//! - Without overrides the snapshot lives at `calendar.bin` relative to the
//!   process working directory.

use std::path::{Path, PathBuf};

/// Default snapshot file name.
pub const DEFAULT_STORE_FILE_NAME: &str = "calendar.bin";

/// Where the meeting snapshot is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    store_path: PathBuf,
}

impl StoreConfig {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
        }
    }

    /// Returns a copy pointing at `store_path`.
    pub fn with_store_path(mut self, store_path: impl Into<PathBuf>) -> Self {
        self.store_path = store_path.into();
        self
    }

    /// Places the default file name inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_STORE_FILE_NAME))
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_FILE_NAME)
    }
}
