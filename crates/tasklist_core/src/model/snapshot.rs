//! Whole-list snapshot codec.
//!
//! The snapshot is a JSON array of `{ "id", "title", "completed" }` records.
//! Decoding is lenient towards missing `completed` and unknown fields, and
//! strict about shape, blank titles and duplicate ids.

use crate::model::task::Task;
use crate::model::task_list::{TaskList, TaskListError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot encode/decode failures.
#[derive(Debug)]
pub enum SnapshotError {
    /// Not JSON, wrong shape, or a record failed validation.
    Json(serde_json::Error),
    /// Records decoded but violate list invariants.
    InvalidList(TaskListError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed task snapshot: {err}"),
            Self::InvalidList(err) => write!(f, "invalid task snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidList(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<TaskListError> for SnapshotError {
    fn from(value: TaskListError) -> Self {
        Self::InvalidList(value)
    }
}

/// Serializes the full list in order.
pub fn encode_snapshot(list: &TaskList) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(list)?)
}

/// Parses a stored snapshot back into a list.
pub fn decode_snapshot(raw: &str) -> Result<TaskList, SnapshotError> {
    let tasks: Vec<Task> = serde_json::from_str(raw)?;
    Ok(TaskList::from_tasks(tasks)?)
}
