//! Ordered task list.
//!
//! # Responsibility
//! - Hold tasks in insertion order and apply add/toggle/remove transitions.
//!
//! # Invariants
//! - No two tasks share an id.
//! - `push` appends; `remove` keeps the relative order of the rest.

use crate::model::task::{Task, TaskId};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural violations of the task list invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListError {
    DuplicateId(TaskId),
}

impl Display for TaskListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate task id: {id}"),
        }
    }
}

impl Error for TaskListError {}

/// The whole to-do list; also the unit of persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from already-ordered tasks, rejecting duplicate ids.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, TaskListError> {
        let mut list = Self::new();
        for task in tasks {
            list.push(task)?;
        }
        Ok(list)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Largest id present, used to seed id generation after hydration.
    pub fn max_id(&self) -> Option<TaskId> {
        self.tasks.iter().map(|task| task.id).max()
    }

    /// Largest id at or below `ceiling` not used by any task.
    pub fn free_id_at_or_below(&self, ceiling: TaskId) -> Option<TaskId> {
        (TaskId::MIN..=ceiling)
            .rev()
            .find(|candidate| !self.contains(*candidate))
    }

    /// Appends one task at the end of the list.
    pub fn push(&mut self, task: Task) -> Result<(), TaskListError> {
        if self.contains(task.id) {
            return Err(TaskListError::DuplicateId(task.id));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Flips completion of the matching task. Returns `false` when absent.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        }
    }

    /// Removes the matching task. Returns `false` when absent.
    pub fn remove(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().position(|task| task.id == id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskList, TaskListError};
    use crate::model::task::Task;

    fn list_of(titles: &[(i64, &str)]) -> TaskList {
        let tasks = titles
            .iter()
            .map(|(id, title)| Task::new(*id, title).unwrap())
            .collect();
        TaskList::from_tasks(tasks).unwrap()
    }

    #[test]
    fn push_rejects_duplicate_id() {
        let mut list = list_of(&[(1, "A")]);
        let err = list.push(Task::new(1, "B").unwrap()).unwrap_err();
        assert_eq!(err, TaskListError::DuplicateId(1));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut list = list_of(&[(1, "A"), (2, "B"), (3, "C")]);
        assert!(list.remove(2));
        let ids: Vec<_> = list.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn toggle_and_remove_report_missing_ids() {
        let mut list = list_of(&[(1, "A")]);
        assert!(!list.toggle(9));
        assert!(!list.remove(9));
        assert_eq!(list, list_of(&[(1, "A")]));
    }

    #[test]
    fn max_id_tracks_largest_not_last() {
        let list = list_of(&[(5, "A"), (2, "B")]);
        assert_eq!(list.max_id(), Some(5));
        assert_eq!(TaskList::new().max_id(), None);
    }

    #[test]
    fn free_id_skips_taken_ids() {
        let list = list_of(&[(i64::MAX, "A"), (i64::MAX - 1, "B")]);
        assert_eq!(list.free_id_at_or_below(i64::MAX), Some(i64::MAX - 2));
    }
}
