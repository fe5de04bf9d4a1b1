//! Line command parsing for the terminal front-end.

use std::error::Error;
use std::fmt::{Display, Formatter};
use tasklist_core::TaskId;

pub const HELP: &str = "commands: add <title> | toggle <id> | delete <id> | list | help | quit";

/// One user interaction with the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Form submission; raw text goes to the manager untrimmed.
    Add(String),
    Toggle(TaskId),
    Delete(TaskId),
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingId(&'static str),
    InvalidId(String),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(verb) => write!(f, "unknown command `{verb}`; {HELP}"),
            Self::MissingId(verb) => write!(f, "`{verb}` needs a task id"),
            Self::InvalidId(raw) => write!(f, "invalid task id `{raw}`"),
        }
    }
}

impl Error for CommandError {}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim_start();
        if line.trim().is_empty() {
            return Ok(None);
        }

        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let command = match verb.to_ascii_lowercase().as_str() {
            "add" | "a" => Self::Add(rest.to_string()),
            "toggle" | "t" => Self::Toggle(parse_id("toggle", rest)?),
            "delete" | "d" | "rm" => Self::Delete(parse_id("delete", rest)?),
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_id(verb: &'static str, raw: &str) -> Result<TaskId, CommandError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CommandError::MissingId(verb));
    }
    raw.parse::<TaskId>()
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{Command, CommandError};

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn add_keeps_the_rest_of_the_line() {
        assert_eq!(
            Command::parse("add Buy oat milk").unwrap(),
            Some(Command::Add("Buy oat milk".to_string()))
        );
        assert_eq!(
            Command::parse("add").unwrap(),
            Some(Command::Add(String::new()))
        );
    }

    #[test]
    fn toggle_and_delete_parse_ids() {
        assert_eq!(
            Command::parse("toggle 1700000000000").unwrap(),
            Some(Command::Toggle(1_700_000_000_000))
        );
        assert_eq!(
            Command::parse("RM 42").unwrap(),
            Some(Command::Delete(42))
        );
    }

    #[test]
    fn id_errors_are_reported() {
        assert_eq!(
            Command::parse("toggle").unwrap_err(),
            CommandError::MissingId("toggle")
        );
        assert_eq!(
            Command::parse("delete abc").unwrap_err(),
            CommandError::InvalidId("abc".to_string())
        );
    }

    #[test]
    fn unknown_verb_is_rejected() {
        assert!(matches!(
            Command::parse("frobnicate"),
            Err(CommandError::Unknown(verb)) if verb == "frobnicate"
        ));
    }
}
