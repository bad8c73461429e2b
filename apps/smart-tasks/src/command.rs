use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;

/// First word of an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Verb {
    Add,
    Ai,
    #[strum(serialize = "sub", serialize = "subtask")]
    Sub,
    Toggle,
    #[strum(serialize = "delete", serialize = "rm")]
    Delete,
    #[strum(serialize = "list", serialize = "ls")]
    List,
    Help,
    #[strum(serialize = "quit", serialize = "exit")]
    Quit,
}

/// A parsed user intent. Positions are 1-based, as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { name: String },
    Suggest { name: String },
    AddSubtask { task: usize, text: String },
    Toggle { task: usize, subtask: usize },
    Delete { task: usize },
    List,
    Help,
    Quit,
    /// Blank line
    Nothing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    UnknownCommand(String),

    #[error("Missing {0}.")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a valid position. Use the numbers shown in the list.")]
    InvalidPosition(String),
}

pub const HELP: &str = "\
Commands:
  add <name>                  add a task
  ai <name>                   add a task with AI-suggested subtasks
  sub <task#> <text>          add a subtask
  toggle <task#> <subtask#>   mark a subtask done / not done
  delete <task#>              delete a task and its subtasks
  list                        show all tasks
  help                        show this help
  quit                        leave";

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn position(raw: &str, what: &'static str) -> Result<usize, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::MissingArgument(what));
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidPosition(raw.to_string())),
    }
}

/// Non-blank free text, trimmed
fn text(raw: &str, what: &'static str) -> Result<String, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseError::MissingArgument(what));
    }
    Ok(raw.to_string())
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_word(line);
        if word.is_empty() {
            return Ok(Command::Nothing);
        }

        let verb = Verb::from_str(word)
            .map_err(|_| ParseError::UnknownCommand(word.to_string()))?;

        match verb {
            Verb::Add => Ok(Command::Add {
                name: text(rest, "task name")?,
            }),
            Verb::Ai => Ok(Command::Suggest {
                name: text(rest, "task name")?,
            }),
            Verb::Sub => {
                let (task, rest) = split_word(rest);
                Ok(Command::AddSubtask {
                    task: position(task, "task number")?,
                    text: text(rest, "subtask text")?,
                })
            }
            Verb::Toggle => {
                let (task, rest) = split_word(rest);
                let (subtask, _) = split_word(rest);
                Ok(Command::Toggle {
                    task: position(task, "task number")?,
                    subtask: position(subtask, "subtask number")?,
                })
            }
            Verb::Delete => {
                let (task, _) = split_word(rest);
                Ok(Command::Delete {
                    task: position(task, "task number")?,
                })
            }
            Verb::List => Ok(Command::List),
            Verb::Help => Ok(Command::Help),
            Verb::Quit => Ok(Command::Quit),
        }
    }
}
