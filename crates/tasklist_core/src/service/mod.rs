//! Task list use-case services.
//!
//! # Responsibility
//! - Orchestrate task list transitions with write-through persistence.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod id_gen;
pub mod task_list_manager;
