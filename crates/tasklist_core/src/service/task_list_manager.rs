//! Task list manager: in-memory list with write-through persistence.
//!
//! # Responsibility
//! - Hydrate the list from the key-value store once at startup.
//! - Apply add/toggle/delete and write the full list after each of them.
//! - Notify subscribers with the committed list after every write.
//!
//! # Invariants
//! - The in-memory list always equals the last snapshot written to the store.
//!   A mutation is committed in memory only after its write succeeded.
//! - Every toggle, delete and accepted add performs exactly one write.
//! - A blank add performs no write and notifies nobody.
//! - A missing or corrupt snapshot hydrates to an empty list; load never fails.
//! - A failed read never leads to a write: the manager stays read-only until
//!   it is loaded again, so a stored list it could not see is not replaced.

use crate::model::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
use crate::model::task::{Task, TaskId};
use crate::model::task_list::{TaskList, TaskListError};
use crate::service::id_gen::TaskIdGenerator;
use crate::store::{KeyValueStore, StoreError};
use log::{debug, info, warn};
use mockable::{Clock, DefaultClock};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key the list is written under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Failures surfaced by task list mutations.
#[derive(Debug)]
pub enum ManagerError {
    /// Writing the snapshot failed; the in-memory list is unchanged.
    Store(StoreError),
    /// The list could not be serialized.
    Snapshot(SnapshotError),
    /// Reading the stored list failed at load time; writes are refused.
    ReadOnly,
    /// Internal consistency mismatch.
    InconsistentState(TaskListError),
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "task list write failed: {err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::ReadOnly => write!(
                f,
                "stored task list could not be read; refusing to overwrite it"
            ),
            Self::InconsistentState(err) => write!(f, "inconsistent task list state: {err}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::ReadOnly => None,
            Self::InconsistentState(err) => Some(err),
        }
    }
}

impl From<StoreError> for ManagerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SnapshotError> for ManagerError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<TaskListError> for ManagerError {
    fn from(value: TaskListError) -> Self {
        Self::InconsistentState(value)
    }
}

/// Manager configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Key the whole list snapshot is stored under.
    pub storage_key: String,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&TaskList)>;

/// What load found under the storage key.
enum Hydration {
    Restored(TaskList),
    Missing,
    Malformed,
    ReadFailed,
}

/// Owns the task list and keeps the store in lockstep with it.
pub struct TaskListManager<S: KeyValueStore, C: Clock = DefaultClock> {
    store: S,
    options: ManagerOptions,
    ids: TaskIdGenerator<C>,
    tasks: TaskList,
    read_only: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStore> TaskListManager<S> {
    /// Hydrates from `store` under the default key using the system clock.
    pub fn load(store: S) -> Self {
        Self::load_with(store, ManagerOptions::default(), DefaultClock)
    }
}

impl<S: KeyValueStore, C: Clock> TaskListManager<S, C> {
    /// Hydrates from `store` and writes the hydrated list back.
    ///
    /// Never fails. A missing or malformed snapshot becomes an empty list
    /// and a failed write-back is only logged. When the read itself fails the
    /// manager starts empty and read-only, and nothing is written.
    pub fn load_with(store: S, options: ManagerOptions, clock: C) -> Self {
        let (tasks, read_only) = match hydrate(&store, &options.storage_key) {
            Hydration::Restored(tasks) => (tasks, false),
            Hydration::Missing | Hydration::Malformed => (TaskList::new(), false),
            Hydration::ReadFailed => (TaskList::new(), true),
        };
        let manager = Self {
            store,
            options,
            ids: TaskIdGenerator::new(clock),
            tasks,
            read_only,
            listeners: Vec::new(),
            next_subscription: 0,
        };

        if manager.read_only {
            warn!("event=task_list_load module=service status=read_only count=0");
            return manager;
        }

        match manager.persist() {
            Ok(()) => info!(
                "event=task_list_load module=service status=ok count={}",
                manager.tasks.len()
            ),
            Err(err) => warn!(
                "event=task_list_load module=service status=degraded count={} error={err}",
                manager.tasks.len()
            ),
        }
        manager
    }

    /// Current list in insertion order.
    pub fn list(&self) -> &TaskList {
        &self.tasks
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether load could not read the store and mutations are refused.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends a new open task.
    ///
    /// Returns `Ok(None)` without writing when `raw_title` is blank.
    pub fn add(&mut self, raw_title: &str) -> ManagerResult<Option<TaskId>> {
        let id = self.fresh_id()?;
        let Ok(task) = Task::new(id, raw_title) else {
            debug!("event=task_add module=service status=skipped reason=empty_title");
            return Ok(None);
        };
        let mut next = self.tasks.clone();
        next.push(task)?;
        self.commit(next)?;

        info!(
            "event=task_add module=service status=ok task_id={id} count={}",
            self.tasks.len()
        );
        Ok(Some(id))
    }

    /// Flips completion of the task with `id`. Returns whether it existed.
    ///
    /// The list is written even when no task matches.
    pub fn toggle(&mut self, id: TaskId) -> ManagerResult<bool> {
        let mut next = self.tasks.clone();
        let matched = next.toggle(id);
        self.commit(next)?;

        info!("event=task_toggle module=service status=ok task_id={id} matched={matched}");
        Ok(matched)
    }

    /// Removes the task with `id`. Returns whether it existed.
    ///
    /// The list is written even when no task matches.
    pub fn delete(&mut self, id: TaskId) -> ManagerResult<bool> {
        let mut next = self.tasks.clone();
        let matched = next.remove(id);
        self.commit(next)?;

        info!(
            "event=task_delete module=service status=ok task_id={id} matched={matched} count={}",
            self.tasks.len()
        );
        Ok(matched)
    }

    /// Writes the current list under the storage key.
    pub fn persist(&self) -> ManagerResult<()> {
        if self.read_only {
            return Err(ManagerError::ReadOnly);
        }
        write_snapshot(&self.store, &self.options.storage_key, &self.tasks)
    }

    /// Registers a callback run with the committed list after every write.
    pub fn subscribe(&mut self, listener: impl Fn(&TaskList) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a callback. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn fresh_id(&mut self) -> ManagerResult<TaskId> {
        if let Some(id) = self.ids.next_id(self.tasks.max_id()) {
            return Ok(id);
        }
        // Ids reached i64::MAX; reuse the highest gap instead.
        self.tasks
            .free_id_at_or_below(TaskId::MAX)
            .ok_or(ManagerError::InconsistentState(TaskListError::DuplicateId(
                TaskId::MAX,
            )))
    }

    fn commit(&mut self, next: TaskList) -> ManagerResult<()> {
        if self.read_only {
            return Err(ManagerError::ReadOnly);
        }
        if let Err(err) = write_snapshot(&self.store, &self.options.storage_key, &next) {
            warn!("event=task_list_write module=service status=error error={err}");
            return Err(err);
        }
        self.tasks = next;
        for (_, listener) in &self.listeners {
            listener(&self.tasks);
        }
        Ok(())
    }
}

fn hydrate<S: KeyValueStore>(store: &S, key: &str) -> Hydration {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=task_list_hydrate module=service status=empty reason=no_snapshot");
            return Hydration::Missing;
        }
        Err(err) => {
            warn!("event=task_list_hydrate module=service status=degraded reason=read_failed error={err}");
            return Hydration::ReadFailed;
        }
    };

    match decode_snapshot(&raw) {
        Ok(tasks) => Hydration::Restored(tasks),
        Err(err) => {
            warn!("event=task_list_hydrate module=service status=degraded reason=malformed_snapshot error={err}");
            Hydration::Malformed
        }
    }
}

fn write_snapshot<S: KeyValueStore>(store: &S, key: &str, list: &TaskList) -> ManagerResult<()> {
    let encoded = encode_snapshot(list)?;
    store.write(key, &encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ManagerOptions, TaskListManager};
    use crate::store::memory::MemoryStore;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockable::Clock;

    struct FrozenClock(i64);

    impl Clock for FrozenClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.timestamp_millis_opt(self.0).unwrap()
        }
    }

    #[test]
    fn add_trims_and_uses_clock_id() {
        let store = MemoryStore::new();
        let mut manager =
            TaskListManager::load_with(&store, ManagerOptions::default(), FrozenClock(42));

        let id = manager.add("  Buy milk  ").unwrap();
        assert_eq!(id, Some(42));
        assert_eq!(manager.tasks()[0].title, "Buy milk");
    }

    #[test]
    fn custom_storage_key_is_used() {
        let store = MemoryStore::new();
        let options = ManagerOptions {
            storage_key: "todo.v1".to_string(),
        };
        let mut manager = TaskListManager::load_with(&store, options, FrozenClock(1));
        manager.add("A").unwrap();

        assert!(store.raw("todo.v1").unwrap().contains("\"A\""));
        assert_eq!(store.raw("tasks"), None);
    }

    #[test]
    fn unsubscribe_reports_unknown_handle() {
        let store = MemoryStore::new();
        let mut manager = TaskListManager::load(&store);
        let id = manager.subscribe(|_| {});
        assert!(manager.unsubscribe(id));
        assert!(!manager.unsubscribe(id));
    }
}
