use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::error::{SuggestionError, SuggestionResult};
use crate::id::{IdGenerator, UuidIdGenerator};
use crate::models::{SubtaskId, Task, TaskId};
use crate::repository::TaskRepository;
use crate::store::{self, Snapshot, TaskStore};
use crate::suggestions::SubtaskSuggester;

/// Result of the most recent save
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PersistenceStatus {
    /// Nothing saved yet in this session
    #[default]
    Idle,
    Saved,
    /// The last save failed; in-memory state is ahead of storage
    Failed(String),
}

impl PersistenceStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, PersistenceStatus::Failed(_))
    }
}

/// Whether an operation produced a different snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

impl Outcome {
    fn between(before: &Snapshot, after: &Snapshot) -> Self {
        if store::is_same(before, after) {
            Outcome::Unchanged
        } else {
            Outcome::Changed
        }
    }

    pub fn is_changed(self) -> bool {
        self == Outcome::Changed
    }
}

/// Owns the task list for one session
///
/// Construct it with [`TaskService::load`], render [`TaskService::tasks`], and
/// feed user intents to the mutation methods. Each mutation replaces the
/// snapshot and writes it to the repository; storage failures are logged and
/// reported through [`TaskService::persistence_status`], never returned.
pub struct TaskService<R: TaskRepository, G: IdGenerator = UuidIdGenerator> {
    repository: Arc<R>,
    store: TaskStore<G>,
    suggester: Option<Arc<dyn SubtaskSuggester>>,
    tasks: Snapshot,
    persistence: PersistenceStatus,
}

impl<R: TaskRepository> TaskService<R> {
    /// Load with random UUID identifiers
    pub async fn load_default(repository: R) -> Self {
        Self::load(repository, UuidIdGenerator).await
    }
}

impl<R: TaskRepository, G: IdGenerator> TaskService<R, G> {
    /// Restore the stored snapshot, or start empty if there is none or it is unreadable
    #[instrument(skip_all)]
    pub async fn load(repository: R, ids: G) -> Self {
        let tasks: Snapshot = match repository.load().await {
            Ok(Some(tasks)) => {
                info!(tasks = tasks.len(), "Restored tasks");
                tasks.into()
            }
            Ok(None) => store::empty_snapshot(),
            Err(e) => {
                warn!(error = %e, "Failed to load tasks, starting with an empty list");
                store::empty_snapshot()
            }
        };

        Self {
            repository: Arc::new(repository),
            store: TaskStore::new(ids),
            suggester: None,
            tasks,
            persistence: PersistenceStatus::Idle,
        }
    }

    pub fn with_suggester(mut self, suggester: Arc<dyn SubtaskSuggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn tasks(&self) -> &Snapshot {
        &self.tasks
    }

    /// Task at a zero-based display position
    pub fn task_at(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        store::find_task(&self.tasks, id)
    }

    pub fn persistence_status(&self) -> &PersistenceStatus {
        &self.persistence
    }

    pub fn suggestions_enabled(&self) -> bool {
        self.suggester.is_some()
    }

    #[instrument(skip(self, subtask_texts))]
    pub async fn create_task(&mut self, name: &str, subtask_texts: Vec<String>) -> Task {
        let (next, task) = self.store.create_task(&self.tasks, name, subtask_texts);
        self.commit(next).await;
        info!(task_id = %task.id, subtasks = task.subtasks.len(), "Created task");
        task
    }

    #[instrument(skip(self), fields(task_id = %task_id))]
    pub async fn delete_task(&mut self, task_id: &TaskId) -> Outcome {
        let next = self.store.delete_task(&self.tasks, task_id);
        self.commit(next).await
    }

    #[instrument(skip(self, text), fields(task_id = %task_id))]
    pub async fn add_subtask(&mut self, task_id: &TaskId, text: &str) -> Outcome {
        let next = self.store.add_subtask(&self.tasks, task_id, text);
        self.commit(next).await
    }

    #[instrument(skip(self), fields(task_id = %task_id, subtask_id = %subtask_id))]
    pub async fn toggle_subtask(&mut self, task_id: &TaskId, subtask_id: &SubtaskId) -> Outcome {
        let next = self.store.toggle_subtask(&self.tasks, task_id, subtask_id);
        self.commit(next).await
    }

    /// Ask the configured suggester for subtasks; fails if none is configured
    #[instrument(skip(self))]
    pub async fn suggest_subtasks(&self, task_name: &str) -> SuggestionResult<Vec<String>> {
        let Some(suggester) = &self.suggester else {
            warn!("Subtask suggestions requested but no suggester is configured");
            return Err(SuggestionError::GenerationFailed);
        };
        suggester.suggest_subtasks(task_name).await
    }

    /// Create a task pre-populated with suggested subtasks
    ///
    /// Nothing is created when the suggestion fails.
    #[instrument(skip(self))]
    pub async fn create_task_with_suggestions(&mut self, name: &str) -> SuggestionResult<Task> {
        let subtasks = self.suggest_subtasks(name).await?;
        Ok(self.create_task(name, subtasks).await)
    }

    /// Install `next` and persist it, whether or not it differs from the current list
    async fn commit(&mut self, next: Snapshot) -> Outcome {
        let outcome = Outcome::between(&self.tasks, &next);
        self.tasks = next;

        self.persistence = match self.repository.save(&self.tasks).await {
            Ok(()) => PersistenceStatus::Saved,
            Err(e) => {
                error!(error = %e, "Failed to save tasks");
                PersistenceStatus::Failed(e.to_string())
            }
        };

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::id::SequentialIdGenerator;
    use crate::models::Subtask;
    use crate::repository::MockTaskRepository;
    use crate::suggestions::MockSubtaskSuggester;

    fn stored_task() -> Task {
        Task {
            id: TaskId::from("stored"),
            name: "Groceries".to_string(),
            subtasks: vec![Subtask::new(SubtaskId::from("stored-sub"), "Buy milk")],
        }
    }

    fn ids() -> SequentialIdGenerator {
        SequentialIdGenerator::new("new")
    }

    #[tokio::test]
    async fn test_load_restores_stored_tasks() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load().times(1).returning(|| Ok(Some(vec![stored_task()])));

        let service = TaskService::load(repo, ids()).await;

        assert_eq!(service.tasks().len(), 1);
        assert_eq!(service.tasks()[0], stored_task());
        assert_eq!(service.persistence_status(), &PersistenceStatus::Idle);
    }

    #[tokio::test]
    async fn test_load_failure_starts_empty() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load()
            .returning(|| Err(TaskError::Serialization("expected value".to_string())));

        let service = TaskService::load(repo, ids()).await;

        assert!(service.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_every_operation_saves_even_when_nothing_changes() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load().returning(|| Ok(None));
        repo.expect_save().times(4).returning(|_| Ok(()));

        let mut service = TaskService::load(repo, ids()).await;
        let task = service.create_task("Plan trip", vec![]).await;

        assert_eq!(service.add_subtask(&task.id, "   ").await, Outcome::Unchanged);
        assert_eq!(
            service.delete_task(&TaskId::from("missing")).await,
            Outcome::Unchanged
        );
        assert_eq!(
            service.toggle_subtask(&task.id, &SubtaskId::from("missing")).await,
            Outcome::Unchanged
        );
        assert_eq!(service.persistence_status(), &PersistenceStatus::Saved);
    }

    #[tokio::test]
    async fn test_saved_snapshot_mirrors_memory() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load().returning(|| Ok(None));
        repo.expect_save()
            .withf(|tasks: &[Task]| tasks.len() == 1 && tasks[0].subtasks.is_empty())
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_save()
            .withf(|tasks: &[Task]| tasks.len() == 1 && tasks[0].subtasks.len() == 1)
            .times(1)
            .returning(|_| Ok(()));

        let mut service = TaskService::load(repo, ids()).await;
        let task = service.create_task("Plan trip", vec![]).await;
        let outcome = service.add_subtask(&task.id, "Book flights").await;

        assert!(outcome.is_changed());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_in_memory_state() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load().returning(|| Ok(None));
        repo.expect_save()
            .returning(|_| Err(TaskError::Storage("disk full".to_string())));

        let mut service = TaskService::load(repo, ids()).await;
        let task = service.create_task("Plan trip", vec!["Book flights".to_string()]).await;

        assert_eq!(service.tasks().len(), 1);
        assert_eq!(service.find_task(&task.id), Some(&task));
        assert!(service.persistence_status().is_failed());
        assert!(matches!(
            service.persistence_status(),
            PersistenceStatus::Failed(msg) if msg.contains("disk full")
        ));
    }

    #[tokio::test]
    async fn test_status_recovers_after_successful_save() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load().returning(|| Ok(None));
        let mut calls = 0;
        repo.expect_save().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(TaskError::Storage("busy".to_string()))
            } else {
                Ok(())
            }
        });

        let mut service = TaskService::load(repo, ids()).await;
        let task = service.create_task("Plan trip", vec![]).await;
        assert!(service.persistence_status().is_failed());

        service.add_subtask(&task.id, "Book flights").await;
        assert_eq!(service.persistence_status(), &PersistenceStatus::Saved);
    }

    #[tokio::test]
    async fn test_suggestions_disabled_fail_generically() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load().returning(|| Ok(None));
        repo.expect_save().never();

        let mut service = TaskService::load(repo, ids()).await;

        assert!(!service.suggestions_enabled());
        assert_eq!(
            service.suggest_subtasks("Plan trip").await,
            Err(SuggestionError::GenerationFailed)
        );
        assert!(service.create_task_with_suggestions("Plan trip").await.is_err());
        assert!(service.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_create_task_with_suggestions_prepopulates_subtasks() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load().returning(|| Ok(None));
        repo.expect_save().times(1).returning(|_| Ok(()));

        let mut suggester = MockSubtaskSuggester::new();
        suggester
            .expect_suggest_subtasks()
            .withf(|name: &str| name == "Plan trip")
            .times(1)
            .returning(|_| Ok(vec!["Book flights".to_string(), "Reserve hotel".to_string()]));

        let mut service = TaskService::load(repo, ids())
            .await
            .with_suggester(Arc::new(suggester));

        let task = service.create_task_with_suggestions("Plan trip").await.unwrap();

        let texts: Vec<&str> = task.subtasks.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["Book flights", "Reserve hotel"]);
        assert!(task.subtasks.iter().all(|s| !s.completed));
        assert_eq!(service.tasks()[0].id, task.id);
    }

    #[tokio::test]
    async fn test_failed_suggestion_creates_nothing() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load().returning(|| Ok(None));
        repo.expect_save().never();

        let mut suggester = MockSubtaskSuggester::new();
        suggester
            .expect_suggest_subtasks()
            .returning(|_| Err(SuggestionError::GenerationFailed));

        let mut service = TaskService::load(repo, ids())
            .await
            .with_suggester(Arc::new(suggester));

        let result = service.create_task_with_suggestions("Plan trip").await;

        assert_eq!(result, Err(SuggestionError::GenerationFailed));
        assert!(service.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_task_at_follows_display_order() {
        let mut repo = MockTaskRepository::new();
        repo.expect_load().returning(|| Ok(Some(vec![stored_task()])));
        repo.expect_save().returning(|_| Ok(()));

        let mut service = TaskService::load(repo, ids()).await;
        service.create_task("Plan trip", vec![]).await;

        assert_eq!(service.task_at(0).map(|t| t.name.as_str()), Some("Plan trip"));
        assert_eq!(service.task_at(1).map(|t| t.name.as_str()), Some("Groceries"));
        assert!(service.task_at(2).is_none());
    }
}
