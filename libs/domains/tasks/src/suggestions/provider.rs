use async_trait::async_trait;

use crate::error::SuggestionResult;

/// Turns a task name into candidate subtask texts
///
/// One request per call: no retry, no caching. Implementations log the cause
/// of a failure and return [`SuggestionError::GenerationFailed`](crate::error::SuggestionError).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubtaskSuggester: Send + Sync {
    async fn suggest_subtasks(&self, task_name: &str) -> SuggestionResult<Vec<String>>;
}
