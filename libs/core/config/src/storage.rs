use crate::{env_or_default, ConfigError, FromEnv};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = ".smart-tasks";
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Local storage configuration for the task snapshot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub key: String,
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            key: key.into(),
        }
    }

    /// Storage config rooted at `data_dir` using the default key
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref(), DEFAULT_STORAGE_KEY)
    }

    /// Path of the file backing the storage slot: `<data_dir>/<key>.json`
    pub fn slot_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.key))
    }
}

impl FromEnv for StorageConfig {
    /// Reads from environment variables with defaults:
    /// - SMART_TASKS_DATA_DIR: defaults to ".smart-tasks"
    /// - SMART_TASKS_STORAGE_KEY: defaults to "tasks"
    fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env_or_default("SMART_TASKS_DATA_DIR", DEFAULT_DATA_DIR);
        let key = env_or_default("SMART_TASKS_STORAGE_KEY", DEFAULT_STORAGE_KEY);

        if key.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "SMART_TASKS_STORAGE_KEY".to_string(),
                details: "storage key must not be blank".to_string(),
            });
        }

        Ok(Self::new(data_dir, key))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, DEFAULT_STORAGE_KEY)
    }
}
