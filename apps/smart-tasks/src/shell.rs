use domain_tasks::{IdGenerator, Outcome, SubtaskId, Task, TaskId, TaskRepository, TaskService};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument};

use crate::command::{Command, HELP};
use crate::render::render_tasks;

const PROMPT: &str = "> ";

/// What the loop does after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    Quit,
}

/// Terminal front-end: renders the task list and forwards commands to the service
pub struct Shell<R: TaskRepository, G: IdGenerator> {
    service: TaskService<R, G>,
}

impl<R: TaskRepository, G: IdGenerator> Shell<R, G> {
    pub fn new(service: TaskService<R, G>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &TaskService<R, G> {
        &self.service
    }

    fn render(&self) -> String {
        render_tasks(self.service.tasks(), self.service.persistence_status())
    }

    /// Task at a 1-based display position
    fn task_at(&self, position: usize) -> Option<&Task> {
        position
            .checked_sub(1)
            .and_then(|index| self.service.task_at(index))
    }

    fn task_id(&self, position: usize) -> Result<TaskId, String> {
        self.task_at(position)
            .map(|task| task.id.clone())
            .ok_or_else(|| format!("There is no task #{position}."))
    }

    fn subtask_id(&self, task: usize, subtask: usize) -> Result<(TaskId, SubtaskId), String> {
        let task_id = self.task_id(task)?;
        let subtask_id = self
            .task_at(task)
            .zip(subtask.checked_sub(1))
            .and_then(|(t, index)| t.subtasks.get(index))
            .map(|s| s.id.clone())
            .ok_or_else(|| format!("Task #{task} has no subtask #{subtask}."))?;
        Ok((task_id, subtask_id))
    }

    /// Apply one command and produce the text to show
    #[instrument(skip(self))]
    pub async fn execute(&mut self, command: Command) -> Step {
        let result = match command {
            Command::Nothing => return Step::Continue(String::new()),
            Command::Quit => return Step::Quit,
            Command::Help => return Step::Continue(format!("{HELP}\n")),
            Command::List => Ok(()),
            command => self.apply(command).await,
        };

        match result {
            Ok(()) => Step::Continue(self.render()),
            Err(message) => Step::Continue(format!("{message}\n")),
        }
    }

    async fn apply(&mut self, command: Command) -> Result<(), String> {
        match command {
            Command::Add { name } => {
                self.service.create_task(&name, Vec::new()).await;
            }
            Command::Suggest { name } => {
                let task = self
                    .service
                    .create_task_with_suggestions(&name)
                    .await
                    .map_err(|e| e.to_string())?;
                debug!(task_id = %task.id, "Created task from suggestions");
            }
            Command::AddSubtask { task, text } => {
                let id = self.task_id(task)?;
                if !self.service.add_subtask(&id, &text).await.is_changed() {
                    debug!(task, "Subtask not added");
                }
            }
            Command::Toggle { task, subtask } => {
                let (task_id, subtask_id) = self.subtask_id(task, subtask)?;
                self.service.toggle_subtask(&task_id, &subtask_id).await;
            }
            Command::Delete { task } => {
                let id = self.task_id(task)?;
                if self.service.delete_task(&id).await == Outcome::Changed {
                    debug!(task, "Task deleted");
                }
            }
            Command::List | Command::Help | Command::Quit | Command::Nothing => {}
        }
        Ok(())
    }

    /// Read commands line by line until `quit` or end of input
    pub async fn run<I, O>(&mut self, input: I, mut output: O) -> io::Result<()>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        output.write_all(b"Smart Task Manager\n").await?;
        if !self.service.suggestions_enabled() {
            output
                .write_all(b"(AI suggestions are off: set API_KEY to enable 'ai')\n")
                .await?;
        }
        output.write_all(b"\n").await?;
        output.write_all(self.render().as_bytes()).await?;

        let mut lines = input.lines();
        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    output.write_all(format!("{e}\n").as_bytes()).await?;
                    continue;
                }
            };

            if matches!(command, Command::Suggest { .. }) {
                output.write_all(b"Generating subtasks...\n").await?;
                output.flush().await?;
            }

            match self.execute(command).await {
                Step::Continue(text) => output.write_all(text.as_bytes()).await?,
                Step::Quit => break,
            }
        }

        output.write_all(b"Bye.\n").await?;
        output.flush().await
    }
}
