use domain_tasks::{PersistenceStatus, Progress, Task};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

pub const EMPTY_LIST: &str = "All Clear! Add a new task to get started (try: add <name>).";

pub fn progress_bar(progress: Progress) -> String {
    let filled = (progress.percent() / 100.0 * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.rounded_percent()
    )
}

/// One task card: header, progress and numbered subtasks
pub fn render_task(out: &mut String, position: usize, task: &Task) {
    let progress = task.progress();

    let _ = writeln!(out, "{position}. {}", task.name);
    if task.subtasks.is_empty() {
        let _ = writeln!(out, "   No subtasks yet.");
        return;
    }

    let _ = writeln!(out, "   Progress {}  {progress}", progress_bar(progress));
    for (i, subtask) in task.subtasks.iter().enumerate() {
        let mark = if subtask.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "   {}. [{mark}] {}", i + 1, subtask.text);
    }
}

pub fn render_tasks(tasks: &[Task], status: &PersistenceStatus) -> String {
    let mut out = String::new();

    if tasks.is_empty() {
        out.push_str(EMPTY_LIST);
        out.push('\n');
    }

    for (i, task) in tasks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_task(&mut out, i + 1, task);
    }

    if let PersistenceStatus::Failed(reason) = status {
        let _ = writeln!(out, "\n! Changes are not saved: {reason}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_tasks::{Subtask, SubtaskId, TaskId};

    fn task(name: &str, flags: &[bool]) -> Task {
        Task {
            id: TaskId::new(name),
            name: name.to_string(),
            subtasks: flags
                .iter()
                .enumerate()
                .map(|(i, completed)| Subtask {
                    id: SubtaskId::new(format!("{name}-{i}")),
                    text: format!("Step {}", i + 1),
                    completed: *completed,
                })
                .collect(),
        }
    }

    fn bar(filled: usize) -> String {
        format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }

    #[test]
    fn test_progress_bar_bounds() {
        let empty = progress_bar(Progress::new(0, 0));
        let done = progress_bar(Progress::new(4, 4));
        let quarter = progress_bar(Progress::new(1, 4));

        assert_eq!(empty, format!("{}   0%", bar(0)));
        assert_eq!(done, format!("{} 100%", bar(20)));
        assert_eq!(quarter, format!("{}  25%", bar(5)));
    }

    #[test]
    fn test_progress_bar_overfull_is_clamped() {
        let out = progress_bar(Progress::new(5, 4));
        assert!(out.starts_with(&bar(20)));
        assert!(out.ends_with("125%"));
    }

    #[test]
    fn test_empty_list_message() {
        let out = render_tasks(&[], &PersistenceStatus::Idle);
        assert_eq!(out, format!("{EMPTY_LIST}\n"));
    }

    #[test]
    fn test_task_card_layout() {
        let tasks = [task("Plan trip", &[true, false])];
        let out = render_tasks(&tasks, &PersistenceStatus::Saved);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "1. Plan trip");
        assert!(lines[1].contains(" 50%"));
        assert!(lines[1].ends_with("1 / 2"));
        assert_eq!(lines[2], "   1. [x] Step 1");
        assert_eq!(lines[3], "   2. [ ] Step 2");
    }

    #[test]
    fn test_task_without_subtasks() {
        let out = render_tasks(&[task("Groceries", &[])], &PersistenceStatus::Saved);
        assert!(out.contains("No subtasks yet."));
        assert!(!out.contains("Progress"));
    }

    #[test]
    fn test_failed_save_is_shown() {
        let status = PersistenceStatus::Failed("disk full".to_string());
        let out = render_tasks(&[task("Groceries", &[])], &status);
        assert!(out.contains("Changes are not saved: disk full"));
    }
}
