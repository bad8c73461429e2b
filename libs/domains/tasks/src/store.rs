//! Pure operations over the task list.
//!
//! Every operation takes the current [`Snapshot`] and returns the next one. When an
//! operation has nothing to do it hands back a clone of the same `Arc`, so
//! `Arc::ptr_eq(&before, &after)` tells the caller nothing changed.
//!
//! Generated ids that already appear in the snapshot are skipped, so a generator
//! restarted against a restored list never hands out an id twice.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

use crate::id::{IdGenerator, UuidIdGenerator};
use crate::models::{Subtask, SubtaskId, Task, TaskId};

/// Immutable, ordered task list (most recently created first)
pub type Snapshot = Arc<[Task]>;

pub fn empty_snapshot() -> Snapshot {
    Arc::from(Vec::new())
}

pub fn find_task<'a>(tasks: &'a [Task], id: &TaskId) -> Option<&'a Task> {
    tasks.iter().find(|task| &task.id == id)
}

/// Whether two snapshots are the same list instance
pub fn is_same(before: &Snapshot, after: &Snapshot) -> bool {
    Arc::ptr_eq(before, after)
}

/// Every task and subtask id present in `tasks`
fn used_ids(tasks: &[Task]) -> HashSet<String> {
    tasks
        .iter()
        .flat_map(|task| {
            let subtask_ids = task.subtasks.iter().map(|s| s.id.as_str());
            std::iter::once(task.id.as_str()).chain(subtask_ids)
        })
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Default)]
pub struct TaskStore<G: IdGenerator = UuidIdGenerator> {
    ids: G,
}

impl<G: IdGenerator> TaskStore<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    /// Next generated id that is not in `used`, recorded there before returning
    fn fresh_id(&self, used: &mut HashSet<String>) -> String {
        loop {
            let id = self.ids.next_id();
            if used.insert(id.clone()) {
                return id;
            }
            trace!(%id, "generated id already in use");
        }
    }

    /// Prepend a new task, one fresh subtask per entry of `subtask_texts`
    ///
    /// Neither the name nor the texts are validated here.
    pub fn create_task<I, S>(
        &self,
        tasks: &Snapshot,
        name: impl Into<String>,
        subtask_texts: I,
    ) -> (Snapshot, Task)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut used = used_ids(tasks);
        let id = TaskId::new(self.fresh_id(&mut used));
        let subtasks = subtask_texts
            .into_iter()
            .map(|text| Subtask::new(SubtaskId::new(self.fresh_id(&mut used)), text))
            .collect();
        let task = Task {
            id,
            name: name.into(),
            subtasks,
        };

        let next: Vec<Task> = std::iter::once(task.clone())
            .chain(tasks.iter().cloned())
            .collect();

        trace!(task_id = %task.id, subtasks = task.subtasks.len(), "task created");
        (Arc::from(next), task)
    }

    pub fn delete_task(&self, tasks: &Snapshot, task_id: &TaskId) -> Snapshot {
        if find_task(tasks, task_id).is_none() {
            return Arc::clone(tasks);
        }

        tasks
            .iter()
            .filter(|task| &task.id != task_id)
            .cloned()
            .collect::<Vec<_>>()
            .into()
    }

    /// Append a subtask with the trimmed `text`; blank text is a no-op
    pub fn add_subtask(&self, tasks: &Snapshot, task_id: &TaskId, text: &str) -> Snapshot {
        let text = text.trim();
        if text.is_empty() || find_task(tasks, task_id).is_none() {
            return Arc::clone(tasks);
        }

        let id = self.fresh_id(&mut used_ids(tasks));
        let subtask = Subtask::new(SubtaskId::new(id), text);
        trace!(task_id = %task_id, subtask_id = %subtask.id, "subtask added");

        tasks
            .iter()
            .map(|task| {
                if &task.id != task_id {
                    return task.clone();
                }
                let mut task = task.clone();
                task.subtasks.push(subtask.clone());
                task
            })
            .collect::<Vec<_>>()
            .into()
    }

    pub fn toggle_subtask(
        &self,
        tasks: &Snapshot,
        task_id: &TaskId,
        subtask_id: &SubtaskId,
    ) -> Snapshot {
        let exists =
            find_task(tasks, task_id).is_some_and(|task| task.subtask(subtask_id).is_some());
        if !exists {
            return Arc::clone(tasks);
        }

        tasks
            .iter()
            .map(|task| {
                if &task.id != task_id {
                    return task.clone();
                }
                Task {
                    subtasks: task
                        .subtasks
                        .iter()
                        .map(|subtask| {
                            if &subtask.id == subtask_id {
                                subtask.toggled()
                            } else {
                                subtask.clone()
                            }
                        })
                        .collect(),
                    ..task.clone()
                }
            })
            .collect::<Vec<_>>()
            .into()
    }
}
