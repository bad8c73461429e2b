use async_trait::async_trait;
use core_config::StorageConfig;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{
    error::{TaskError, TaskResult},
    models::Task,
    repository::{decode_snapshot, encode_snapshot, TaskRepository},
};

/// Task snapshot stored as one JSON file: `<data_dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct JsonFileTaskRepository {
    path: PathBuf,
}

impl JsonFileTaskRepository {
    pub fn new(config: &StorageConfig) -> Self {
        Self::at(config.slot_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        staging.into()
    }
}

#[async_trait]
impl TaskRepository for JsonFileTaskRepository {
    async fn load(&self) -> TaskResult<Option<Vec<Task>>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No stored task snapshot");
                return Ok(None);
            }
            Err(e) => {
                return Err(TaskError::Storage(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let tasks = decode_snapshot(&raw)?;
        tracing::debug!(
            path = %self.path.display(),
            tasks = tasks.as_ref().map_or(0, Vec::len),
            "Loaded task snapshot"
        );
        Ok(tasks)
    }

    async fn save(&self, tasks: &[Task]) -> TaskResult<()> {
        let raw = encode_snapshot(tasks)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        // The slot only ever holds a complete snapshot: stage, then rename over it
        let staging = self.staging_path();
        fs::write(&staging, raw).await?;
        fs::rename(&staging, &self.path).await?;

        tracing::debug!(path = %self.path.display(), tasks = tasks.len(), "Saved task snapshot");
        Ok(())
    }
}
