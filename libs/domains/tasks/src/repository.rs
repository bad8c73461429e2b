use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TaskResult;
use crate::models::Task;

/// Repository trait for the persisted task snapshot
///
/// The whole ordered list is the unit of persistence: it is read once at
/// startup and written back after every mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Read the stored snapshot; `None` when nothing has been saved yet
    async fn load(&self) -> TaskResult<Option<Vec<Task>>>;

    /// Replace the stored snapshot with `tasks`
    async fn save(&self, tasks: &[Task]) -> TaskResult<()>;
}

/// Decode a stored payload. Blank content counts as "nothing saved".
pub(crate) fn decode_snapshot(raw: &str) -> TaskResult<Option<Vec<Task>>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(raw)?))
}

pub(crate) fn encode_snapshot(tasks: &[Task]) -> TaskResult<String> {
    Ok(serde_json::to_string(tasks)?)
}

/// In-memory implementation of TaskRepository (for development/testing)
///
/// Holds the serialized JSON text, so it goes through the same encoding as the
/// file-backed slot.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    slot: Arc<RwLock<Option<String>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored content, e.g. a corrupt payload
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(raw.into()))),
        }
    }

    pub async fn raw(&self) -> Option<String> {
        self.slot.read().await.clone()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn load(&self) -> TaskResult<Option<Vec<Task>>> {
        match self.slot.read().await.as_deref() {
            Some(raw) => decode_snapshot(raw),
            None => Ok(None),
        }
    }

    async fn save(&self, tasks: &[Task]) -> TaskResult<()> {
        let raw = encode_snapshot(tasks)?;
        *self.slot.write().await = Some(raw);
        tracing::debug!(tasks = tasks.len(), "Saved task snapshot in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::models::{Subtask, SubtaskId, TaskId};

    fn sample() -> Vec<Task> {
        vec![
            Task {
                id: TaskId::from("b"),
                name: "Plan trip".to_string(),
                subtasks: vec![
                    Subtask {
                        id: SubtaskId::from("b1"),
                        text: "Book flights".to_string(),
                        completed: true,
                    },
                    Subtask::new(SubtaskId::from("b2"), "Reserve hotel"),
                ],
            },
            Task {
                id: TaskId::from("a"),
                name: "Groceries".to_string(),
                subtasks: vec![],
            },
        ]
    }

    #[tokio::test]
    async fn test_empty_repository_loads_none() {
        let repo = InMemoryTaskRepository::new();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let repo = InMemoryTaskRepository::new();
        let tasks = sample();

        repo.save(&tasks).await.unwrap();
        let loaded = repo.load().await.unwrap().unwrap();

        assert_eq!(loaded, tasks);
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_a_serialization_error() {
        let repo = InMemoryTaskRepository::with_raw("{not json");
        let result = repo.load().await;
        assert!(matches!(result, Err(TaskError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_structurally_incompatible_payload_is_rejected() {
        let repo = InMemoryTaskRepository::with_raw(r#"{"tasks": []}"#);
        assert!(repo.load().await.is_err());

        let repo = InMemoryTaskRepository::with_raw(r#"[{"id": "x", "name": "No subtasks field"}]"#);
        assert!(repo.load().await.is_err());
    }

    #[test]
    fn test_blank_payload_decodes_as_nothing_saved() {
        assert!(decode_snapshot("  \n").unwrap().is_none());
    }
}
