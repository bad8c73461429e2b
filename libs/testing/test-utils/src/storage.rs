//! Temporary storage slot for persistence tests
//!
//! Provides a `TestStorage` helper backed by a fresh temporary directory.

use core_config::StorageConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary data directory with a storage config pointing into it
///
/// The directory and everything in it is removed when this struct is dropped.
pub struct TestStorage {
    dir: TempDir,
    pub config: StorageConfig,
}

impl TestStorage {
    /// Create an empty storage slot using the default key
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestStorage;
    ///
    /// let storage = TestStorage::new();
    /// assert!(!storage.slot_path().exists());
    /// ```
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary data directory");
        let config = StorageConfig::in_dir(dir.path());

        tracing::debug!(path = %dir.path().display(), "Test storage ready");

        Self { dir, config }
    }

    /// Create a slot that already holds `raw` (valid or not)
    pub fn with_raw(raw: &str) -> Self {
        let storage = Self::new();
        storage.write_raw(raw);
        storage
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn slot_path(&self) -> PathBuf {
        self.config.slot_path()
    }

    pub fn write_raw(&self, raw: &str) {
        std::fs::write(self.slot_path(), raw).expect("Failed to write storage slot");
    }

    /// Stored content, `None` if nothing has been written yet
    pub fn read_raw(&self) -> Option<String> {
        std::fs::read_to_string(self.slot_path()).ok()
    }

    /// Stored content parsed as JSON
    pub fn read_json(&self) -> serde_json::Value {
        let raw = self.read_raw().expect("Storage slot is empty");
        serde_json::from_str(&raw).expect("Storage slot does not hold JSON")
    }
}

impl Default for TestStorage {
    fn default() -> Self {
        Self::new()
    }
}
