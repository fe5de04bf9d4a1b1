//! Task record.
//!
//! # Responsibility
//! - Define the canonical to-do entry persisted inside a task list snapshot.
//! - Normalize and validate titles at construction and decode time.
//!
//! # Invariants
//! - `title` is trimmed and never empty.
//! - `completed` defaults to `false`, both on creation and when a stored
//!   record omits the field.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Task identifier, derived from Unix epoch milliseconds at creation time.
pub type TaskId = i64;

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming surrounding whitespace.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

impl Task {
    /// Creates an open task from raw user input.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyTitle` when `raw_title` is blank.
    pub fn new(id: TaskId, raw_title: &str) -> Result<Self, TaskValidationError> {
        let title = normalize_title(raw_title)?;
        Ok(Self {
            id,
            title,
            completed: false,
        })
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Trims a raw title and rejects blank input.
pub fn normalize_title(raw_title: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw_title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Stored shape of a task. Older snapshots may omit `completed`.
#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    title: String,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            title: normalize_title(&record.title)?,
            completed: record.completed,
        })
    }
}
