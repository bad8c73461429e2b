mod gemini;
mod provider;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use provider::SubtaskSuggester;

#[cfg(test)]
pub use provider::MockSubtaskSuggester;

/// Instruction sent along with every task name
pub fn build_prompt(task_name: &str) -> String {
    format!(
        "Based on the main task \"{task_name}\", generate a list of 3 to 5 short, actionable subtasks. Each subtask should start with a verb."
    )
}
