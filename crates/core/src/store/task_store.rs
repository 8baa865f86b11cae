//! Observable task store
//!
//! Every mutation goes through the repository; the store mirrors the result
//! into its state and pushes the new snapshot to observers.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch, RwLock};
use tracing::{debug, info, warn};

use super::sequencer::IdSequencer;
use super::state::{Operation, TaskChange, TaskState, Transition};
use crate::task::{Task, TaskFormData, TaskId, TaskPatch, TaskRepository};
use crate::Result;

const EVENT_CAPACITY: usize = 256;

/// Single source of task state for the UI layer
#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<TaskStoreInner>,
}

struct TaskStoreInner {
    repository: Arc<dyn TaskRepository>,
    state: watch::Sender<TaskState>,
    events: broadcast::Sender<TaskState>,
    next_operation: AtomicU64,
    sequencer: IdSequencer,
    // Loads hold this exclusively, every other operation shares it
    barrier: RwLock<()>,
}

impl TaskStore {
    /// Create an empty store over `repository`; call [`load_tasks`](Self::load_tasks) to fill it
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        let (state, _) = watch::channel(TaskState::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(TaskStoreInner {
                repository,
                state,
                events,
                next_operation: AtomicU64::new(0),
                sequencer: IdSequencer::default(),
                barrier: RwLock::new(()),
            }),
        }
    }

    pub fn repository(&self) -> &Arc<dyn TaskRepository> {
        &self.inner.repository
    }

    /// Current snapshot
    pub fn state(&self) -> TaskState {
        self.inner.state.borrow().clone()
    }

    /// Live view of the latest state
    pub fn watch(&self) -> watch::Receiver<TaskState> {
        self.inner.state.subscribe()
    }

    /// Every state produced from now on, in the order transitions are applied
    pub fn subscribe(&self) -> broadcast::Receiver<TaskState> {
        self.inner.events.subscribe()
    }

    /// Replace the task list with the repository's.
    ///
    /// Waits for mutations already in flight and holds back new ones until
    /// the snapshot is applied.
    pub async fn load_tasks(&self) -> bool {
        self.dispatch(
            Operation::Load,
            None,
            |repo| async move { repo.list().await },
            |tasks: &Vec<Task>| TaskChange::Replaced(tasks.clone()),
        )
        .await
        .is_some()
    }

    pub async fn create_task(&self, data: TaskFormData) -> Option<Task> {
        self.dispatch(
            Operation::Create,
            None,
            |repo| async move { repo.create(data).await },
            |task: &Task| TaskChange::Added(task.clone()),
        )
        .await
    }

    pub async fn update_task(&self, id: TaskId, data: TaskFormData) -> Option<Task> {
        self.dispatch(
            Operation::Update,
            Some(id),
            |repo| async move { repo.update(id, data).await },
            |task: &Task| TaskChange::Updated(task.clone()),
        )
        .await
    }

    pub async fn delete_task(&self, id: TaskId) -> bool {
        self.dispatch(
            Operation::Delete,
            Some(id),
            |repo| async move { repo.delete(id).await },
            |_: &()| TaskChange::Removed(id),
        )
        .await
        .is_some()
    }

    pub async fn clone_task(&self, id: TaskId) -> Option<Task> {
        self.dispatch(
            Operation::Clone,
            Some(id),
            |repo| async move { repo.clone_task(id).await },
            |task: &Task| TaskChange::Added(task.clone()),
        )
        .await
    }

    pub async fn clone_task_with(&self, id: TaskId, overrides: TaskPatch) -> Option<Task> {
        self.dispatch(
            Operation::Clone,
            Some(id),
            |repo| async move { repo.clone_with_modifications(id, overrides).await },
            |task: &Task| TaskChange::Added(task.clone()),
        )
        .await
    }

    /// Run one repository call and fold its outcome into the state.
    ///
    /// Failures end up in `error`; they are never returned to the caller.
    async fn dispatch<T, F, Fut>(
        &self,
        operation: Operation,
        target: Option<TaskId>,
        call: F,
        change: impl FnOnce(&T) -> TaskChange,
    ) -> Option<T>
    where
        F: FnOnce(Arc<dyn TaskRepository>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let id = self.inner.next_operation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(operation = %operation, op = id, task = ?target, "Starting task operation");
        self.apply(Transition::Started { operation: id });

        let (_shared, _exclusive) = match operation {
            Operation::Load => (None, Some(self.inner.barrier.write().await)),
            _ => (Some(self.inner.barrier.read().await), None),
        };
        let _guard = match target {
            Some(task_id) => Some(self.inner.sequencer.acquire(task_id).await),
            None => None,
        };

        match call(Arc::clone(&self.inner.repository)).await {
            Ok(value) => {
                info!(operation = %operation, op = id, "Task operation succeeded");
                self.apply(Transition::Succeeded {
                    operation: id,
                    change: change(&value),
                });
                Some(value)
            }
            Err(e) => {
                warn!(operation = %operation, op = id, "Task operation failed: {}", e);
                self.apply(Transition::Failed {
                    operation: id,
                    message: format!("Failed to {} task: {}", operation, e),
                });
                None
            }
        }
    }

    fn apply(&self, transition: Transition) {
        let events = &self.inner.events;
        self.inner.state.send_modify(|state| {
            *state = std::mem::take(state).reduce(&transition);
            // Sent under the watch lock so subscribers see transitions in apply order
            let _ = events.send(state.clone());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{sample_tasks, InMemoryTaskRepository, Latency, Status};
    use chrono::NaiveDate;
    use std::time::Duration;
    use uuid::Uuid;

    fn store_with(latency: Latency) -> TaskStore {
        TaskStore::new(Arc::new(InMemoryTaskRepository::new(sample_tasks(), latency)))
    }

    async fn loaded_store() -> TaskStore {
        let store = store_with(Latency::none());
        assert!(store.load_tasks().await);
        store
    }

    fn form(title: &str) -> TaskFormData {
        TaskFormData::new(title, NaiveDate::from_ymd_opt(2030, 5, 1).unwrap())
    }

    #[tokio::test]
    async fn test_load_tasks() {
        let store = store_with(Latency::none());
        assert!(store.state().tasks.is_empty());

        assert!(store.load_tasks().await);
        let state = store.state();
        assert_eq!(state.tasks, sample_tasks());
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_create_appends() {
        let store = loaded_store().await;
        let task = store.create_task(form("New event")).await.unwrap();

        let state = store.state();
        assert_eq!(state.tasks.last(), Some(&task));
        assert_eq!(state.tasks.len(), 6);
        assert_eq!(store.repository().list().await.unwrap(), state.tasks);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let store = loaded_store().await;
        let id = sample_tasks()[2].id;

        let updated = store.update_task(id, form("Renamed")).await.unwrap();
        let state = store.state();
        assert_eq!(state.tasks[2], updated);
        assert_eq!(state.tasks[2].title, "Renamed");
        assert_eq!(state.tasks.len(), 5);
    }

    #[tokio::test]
    async fn test_update_nonexistent_sets_error() {
        let store = loaded_store().await;
        let missing = Uuid::new_v4();

        assert!(store.update_task(missing, form("Nope")).await.is_none());
        let state = store.state();
        assert_eq!(
            state.error,
            Some(format!("Failed to update task: Task not found: {}", missing))
        );
        assert!(!state.loading);
        assert_eq!(state.tasks, sample_tasks());
    }

    #[tokio::test]
    async fn test_delete_and_clone() {
        let store = loaded_store().await;
        let first = sample_tasks()[0].clone();

        let copy = store.clone_task(first.id).await.unwrap();
        assert_eq!(copy.status, Status::Draft);
        assert!(store.delete_task(first.id).await);

        let state = store.state();
        assert!(state.tasks.iter().all(|t| t.id != first.id));
        assert_eq!(state.tasks.last(), Some(&copy));

        assert!(!store.delete_task(first.id).await);
        assert!(store.state().error.unwrap().starts_with("Failed to delete task"));
    }

    #[tokio::test]
    async fn test_clone_with_overrides() {
        let store = loaded_store().await;
        let patch = TaskPatch {
            location: Some("Annex".to_string()),
            ..TaskPatch::default()
        };
        let copy = store.clone_task_with(sample_tasks()[1].id, patch).await.unwrap();
        assert_eq!(copy.location, "Annex");
        assert_eq!(store.state().tasks.last(), Some(&copy));
    }

    #[tokio::test]
    async fn test_error_cleared_by_next_operation() {
        let store = loaded_store().await;
        store.delete_task(Uuid::new_v4()).await;
        assert!(store.state().error.is_some());

        store.load_tasks().await;
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let store = store_with(Latency::uniform(Duration::from_millis(50)));
        let mut rx = store.watch();

        let handle = {
            let store = store.clone();
            tokio::spawn(async move { store.load_tasks().await })
        };

        rx.wait_for(|state| state.loading).await.unwrap();
        assert!(handle.await.unwrap());

        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.tasks.len(), 5);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_transition() {
        let store = store_with(Latency::none());
        let mut events = store.subscribe();

        store.load_tasks().await;
        store.delete_task(Uuid::new_v4()).await;

        let started = events.recv().await.unwrap();
        assert!(started.loading);
        assert!(started.tasks.is_empty());

        let loaded = events.recv().await.unwrap();
        assert!(!loaded.loading);
        assert_eq!(loaded.tasks.len(), 5);

        assert!(events.recv().await.unwrap().loading);
        let failed = events.recv().await.unwrap();
        assert!(failed.error.is_some());
        assert_eq!(failed.tasks.len(), 5);
    }

    #[tokio::test]
    async fn test_same_id_operations_apply_in_issue_order() {
        let store = store_with(Latency::uniform(Duration::from_millis(20)));
        store.load_tasks().await;
        let id = sample_tasks()[0].id;

        let (updated, deleted) =
            futures::future::join(store.update_task(id, form("Last edit")), store.delete_task(id))
                .await;

        assert!(updated.is_some());
        assert!(deleted);
        let state = store.state();
        assert!(state.tasks.iter().all(|t| t.id != id));
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_update_after_delete_reports_latest_failure() {
        let store = store_with(Latency::uniform(Duration::from_millis(20)));
        store.load_tasks().await;
        let id = sample_tasks()[0].id;

        let (deleted, updated) =
            futures::future::join(store.delete_task(id), store.update_task(id, form("Too late")))
                .await;

        assert!(deleted);
        assert!(updated.is_none());
        let state = store.state();
        assert!(state.error.unwrap().starts_with("Failed to update task"));
        assert_eq!(state.tasks.len(), 4);
    }

    #[tokio::test]
    async fn test_latest_operation_owns_status() {
        let store = store_with(Latency::uniform(Duration::from_millis(20)));
        store.load_tasks().await;

        // The create is still in flight when the later update fails
        let (created, updated) = futures::future::join(
            store.create_task(form("Fresh")),
            store.update_task(Uuid::new_v4(), form("Missing")),
        )
        .await;

        assert!(created.is_some());
        assert!(updated.is_none());
        let state = store.state();
        assert!(state.error.unwrap().starts_with("Failed to update task"));
        assert!(!state.loading);
        assert_eq!(state.tasks.len(), 6);
    }

    #[tokio::test]
    async fn test_load_overlapping_create_matches_repository() {
        let store = store_with(Latency::simulated());

        let (loaded, created) =
            futures::future::join(store.load_tasks(), store.create_task(form("Walk-in"))).await;

        assert!(loaded);
        let created = created.unwrap();
        let state = store.state();
        assert_eq!(state.tasks, store.repository().list().await.unwrap());
        assert_eq!(state.tasks.len(), 6);
        assert_eq!(state.tasks.last(), Some(&created));
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_mutations_overlapping_reload_match_repository() {
        let store = store_with(Latency::uniform(Duration::from_millis(20)));
        store.load_tasks().await;
        let first = sample_tasks()[0].id;
        let second = sample_tasks()[1].id;

        let (deleted, reloaded, updated) = futures::future::join3(
            store.delete_task(first),
            store.load_tasks(),
            store.update_task(second, form("Edited mid-load")),
        )
        .await;

        assert!(deleted);
        assert!(reloaded);
        assert!(updated.is_some());
        let state = store.state();
        assert_eq!(state.tasks, store.repository().list().await.unwrap());
        assert_eq!(state.tasks.len(), 4);
        assert!(state.tasks.iter().all(|t| t.id != first));
        assert_eq!(state.tasks[0].title, "Edited mid-load");
    }
}
