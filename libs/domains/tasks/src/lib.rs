//! Tasks Domain
//!
//! Tasks with ordered, checkable subtasks, a local snapshot store and optional
//! AI-suggested subtasks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐      ┌──────────────────┐
//! │   Service   │ ───► │ SubtaskSuggester │  ← Gemini (optional)
//! └──────┬──────┘      └──────────────────┘
//!        │
//! ┌──────▼──────┐      ┌──────────────────┐
//! │  TaskStore  │      │  TaskRepository  │  ← JSON file / in-memory slot
//! └──────┬──────┘      └──────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Task, Subtask, Progress
//! └─────────────┘
//! ```
//!
//! The store is a pure reducer over an immutable [`Snapshot`]; the service owns
//! the current snapshot, saves it after every operation and calls the suggester.
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::StorageConfig;
//! use domain_tasks::{JsonFileTaskRepository, TaskService};
//!
//! # async fn example() {
//! let repository = JsonFileTaskRepository::new(&StorageConfig::default());
//! let mut service = TaskService::load_default(repository).await;
//!
//! let task = service.create_task("Plan trip", vec![]).await;
//! service.add_subtask(&task.id, "Book flights").await;
//! # }
//! ```

pub mod error;
pub mod id;
pub mod json_file;
pub mod models;
pub mod repository;
pub mod service;
pub mod store;
pub mod suggestions;

// Re-export commonly used types
pub use error::{SuggestionError, SuggestionResult, TaskError, TaskResult};
pub use id::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use json_file::JsonFileTaskRepository;
pub use models::{Progress, Subtask, SubtaskId, Task, TaskId};
pub use repository::{InMemoryTaskRepository, TaskRepository};
pub use service::{Outcome, PersistenceStatus, TaskService};
pub use store::{Snapshot, TaskStore};
pub use suggestions::{GeminiConfig, GeminiProvider, SubtaskSuggester};
