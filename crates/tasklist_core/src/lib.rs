//! Core domain logic for the task list.
//! This crate is the single source of truth for task list invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use model::task_list::{TaskList, TaskListError};
pub use mockable::{Clock, DefaultClock};
pub use service::id_gen::TaskIdGenerator;
pub use service::task_list_manager::{
    ManagerError, ManagerOptions, ManagerResult, SubscriptionId, TaskListManager,
    DEFAULT_STORAGE_KEY,
};
pub use store::memory::MemoryStore;
pub use store::sqlite::SqliteStore;
pub use store::{KeyValueStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
