use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl From<std::io::Error> for TaskError {
    fn from(err: std::io::Error) -> Self {
        TaskError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(err: serde_json::Error) -> Self {
        TaskError::Serialization(err.to_string())
    }
}

/// The only failure a subtask suggestion surfaces to callers.
///
/// Transport, API and parsing problems are logged where they happen and
/// collapse into this variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuggestionError {
    #[error("Failed to generate subtasks with AI. Please try again.")]
    GenerationFailed,
}

pub type SuggestionResult<T> = Result<T, SuggestionError>;
