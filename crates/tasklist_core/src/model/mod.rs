//! Task list domain model.
//!
//! # Responsibility
//! - Define the task record and the ordered task list.
//! - Own the snapshot codec used for whole-list persistence.
//!
//! # Invariants
//! - Every task has a non-empty, trimmed title.
//! - Task ids are unique within one list.
//! - List order is insertion order; nothing re-sorts it.

pub mod snapshot;
pub mod task;
pub mod task_list;
