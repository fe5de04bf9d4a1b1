//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list form/list interactions as sync functions via FRB.
//! - Convert core errors into response envelopes with readable messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the store, hydrates, applies one operation and returns
//!   the committed list; no manager outlives a call.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use tasklist_core::db::open_db;
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ManagerResult, SqliteStore, Task, TaskListManager,
};

const STORE_DB_FILE_NAME: &str = "tasklist.sqlite3";
const STORE_PATH_ENV: &str = "TASKLIST_DB_PATH";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Sets the SQLite file backing the task list.
///
/// Must run before the first task call; afterwards only the already active
/// path is accepted. Without it, `TASKLIST_DB_PATH` or a temp-dir default is
/// used.
///
/// # FFI contract
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "store path cannot be empty".to_string();
    }

    let requested = PathBuf::from(trimmed);
    let active = STORE_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "store path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One row of the rendered task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Full list snapshot for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    /// Whether the store could be opened.
    pub ok: bool,
    /// Tasks in insertion order (empty on failure).
    pub items: Vec<TaskItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Result of one add/toggle/delete interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the operation (and its write) succeeded.
    pub ok: bool,
    /// Created task id for `task_add`, target id for toggle/delete.
    pub task_id: Option<i64>,
    /// Whether the list content changed.
    pub changed: bool,
    /// Committed list after the operation (empty on failure).
    pub items: Vec<TaskItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl TaskActionResponse {
    fn success(
        message: impl Into<String>,
        task_id: Option<i64>,
        changed: bool,
        items: Vec<TaskItem>,
    ) -> Self {
        Self {
            ok: true,
            task_id,
            changed,
            items,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            changed: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

/// Returns the current list.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list() -> TaskListResponse {
    match with_manager(|_| Ok(())) {
        Ok(((), items)) => TaskListResponse {
            ok: true,
            message: format!("{} task(s).", items.len()),
            items,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("tasks_list failed: {err}"),
        },
    }
}

/// Submits the add-task form.
///
/// Blank input is accepted as a no-op: `ok = true`, `changed = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String) -> TaskActionResponse {
    match with_manager(|manager| manager.add(&title)) {
        Ok((Some(id), items)) => {
            TaskActionResponse::success("Task added.", Some(id), true, items)
        }
        Ok((None, items)) => {
            TaskActionResponse::success("Empty title ignored.", None, false, items)
        }
        Err(err) => TaskActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Flips the completion checkbox of one task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64) -> TaskActionResponse {
    match with_manager(|manager| manager.toggle(id)) {
        Ok((changed, items)) => TaskActionResponse::success(
            matched_message("Task toggled.", changed),
            Some(id),
            changed,
            items,
        ),
        Err(err) => TaskActionResponse::failure(format!("task_toggle failed: {err}")),
    }
}

/// Removes one task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> TaskActionResponse {
    match with_manager(|manager| manager.delete(id)) {
        Ok((changed, items)) => TaskActionResponse::success(
            matched_message("Task deleted.", changed),
            Some(id),
            changed,
            items,
        ),
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

fn matched_message(done: &'static str, matched: bool) -> &'static str {
    if matched {
        done
    } else {
        "No matching task."
    }
}

fn resolve_store_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_manager<T>(
    f: impl FnOnce(&mut TaskListManager<SqliteStore<'_>>) -> ManagerResult<T>,
) -> Result<(T, Vec<TaskItem>), String> {
    let db_path = resolve_store_path();
    let conn = open_db(&db_path).map_err(|err| format!("store open failed: {err}"))?;
    let store = SqliteStore::try_new(&conn).map_err(|err| format!("store init failed: {err}"))?;
    let mut manager = TaskListManager::load(store);
    if manager.is_read_only() {
        return Err("stored task list could not be read".to_string());
    }
    let value = f(&mut manager).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error error={err}");
        err.to_string()
    })?;
    let items = manager.tasks().iter().map(to_task_item).collect();
    Ok((value, items))
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id,
        title: task.title.clone(),
        completed: task.completed,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_store_path, core_version, init_logging, ping, task_add, task_delete,
        task_toggle, tasks_list,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_store_path_rejects_blank_path() {
        assert!(!configure_store_path("   ".to_string()).is_empty());
    }

    // Only test touching the store: the path is process-wide.
    #[test]
    fn form_and_list_flow_round_trips_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.sqlite3");
        let path_str = path.to_str().unwrap().to_string();
        let other = dir.path().join("other.sqlite3");

        assert_eq!(configure_store_path(path_str.clone()), "");
        assert_eq!(configure_store_path(path_str), "");
        assert!(configure_store_path(other.to_str().unwrap().to_string())
            .contains("refusing to switch"));

        let listed = tasks_list();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.is_empty());

        let blank = task_add("   ".to_string());
        assert!(blank.ok);
        assert!(!blank.changed);
        assert!(blank.task_id.is_none());

        let added = task_add("  Buy milk ".to_string());
        assert!(added.ok, "{}", added.message);
        let id = added.task_id.unwrap();
        assert_eq!(added.items.len(), 1);
        assert_eq!(added.items[0].title, "Buy milk");

        let toggled = task_toggle(id);
        assert!(toggled.ok && toggled.changed);
        assert!(tasks_list().items[0].completed);

        let missing = task_delete(id + 1);
        assert!(missing.ok);
        assert!(!missing.changed);
        assert_eq!(missing.items.len(), 1);

        let deleted = task_delete(id);
        assert!(deleted.ok && deleted.changed);
        assert!(tasks_list().items.is_empty());
    }
}
