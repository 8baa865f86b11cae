//! In-memory task storage implementation
//!
//! Keeps tasks in a vector in insertion order and delays every completed
//! call by a fixed amount to emulate a remote service.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::model::{Category, Task, TaskFormData, TaskId, TaskPatch};
use super::repository::TaskRepository;
use crate::{Error, Result};

/// Simulated latency per kind of call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub list: Duration,
    pub get: Duration,
    pub mutate: Duration,
}

impl Latency {
    /// Delays used by the mock service: 500ms list, 200ms get, 300ms writes
    pub const fn simulated() -> Self {
        Self {
            list: Duration::from_millis(500),
            get: Duration::from_millis(200),
            mutate: Duration::from_millis(300),
        }
    }

    /// Complete immediately
    pub const fn none() -> Self {
        Self {
            list: Duration::ZERO,
            get: Duration::ZERO,
            mutate: Duration::ZERO,
        }
    }

    /// Same delay for every call
    pub const fn uniform(delay: Duration) -> Self {
        Self {
            list: delay,
            get: delay,
            mutate: delay,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::simulated()
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Mock task service that owns the canonical task list
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
    latency: Latency,
}

impl InMemoryTaskRepository {
    /// Create a repository preloaded with `tasks`
    pub fn new(tasks: Vec<Task>, latency: Latency) -> Self {
        Self {
            tasks: RwLock::new(tasks),
            latency,
        }
    }

    /// Repository seeded with the sample tasks and the simulated latency
    pub fn seeded() -> Self {
        Self::new(super::seed::sample_tasks(), Latency::simulated())
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Append a copy of `source`, apply overrides, and return it
    async fn insert_copy(&self, id: TaskId, overrides: Option<TaskPatch>) -> Result<Task> {
        let copy = {
            let mut tasks = self.tasks.write().await;
            let source = tasks
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

            let mut copy = source.draft_copy();
            if let Some(patch) = overrides {
                copy.apply_patch(patch);
            }
            tasks.push(copy.clone());
            copy
        };
        debug!("Cloned task {} as {}", id, copy.id);
        pause(self.latency.mutate).await;
        Ok(copy)
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new(Vec::new(), Latency::default())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list(&self) -> Result<Vec<Task>> {
        // Read after the delay so writes that land meanwhile are included
        pause(self.latency.list).await;
        Ok(self.tasks.read().await.clone())
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>> {
        let task = {
            let tasks = self.tasks.read().await;
            tasks.iter().find(|t| t.id == id).cloned()
        };
        pause(self.latency.get).await;
        Ok(task)
    }

    async fn create(&self, data: TaskFormData) -> Result<Task> {
        let task = {
            let mut tasks = self.tasks.write().await;
            let mut task = Task::new(data);
            // Ids stay unique across the whole collection
            while tasks.iter().any(|t| t.id == task.id) {
                task.id = uuid::Uuid::new_v4();
            }
            tasks.push(task.clone());
            task
        };
        debug!("Created task {}", task.id);
        pause(self.latency.mutate).await;
        Ok(task)
    }

    async fn update(&self, id: TaskId, data: TaskFormData) -> Result<Task> {
        let task = {
            let mut tasks = self.tasks.write().await;
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
            task.apply_form(data);
            task.clone()
        };
        debug!("Updated task {}", id);
        pause(self.latency.mutate).await;
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> Result<()> {
        {
            let mut tasks = self.tasks.write().await;
            let index = tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
            tasks.remove(index);
        }
        debug!("Deleted task {}", id);
        pause(self.latency.mutate).await;
        Ok(())
    }

    async fn clone_task(&self, id: TaskId) -> Result<Task> {
        self.insert_copy(id, None).await
    }

    async fn clone_with_modifications(&self, id: TaskId, overrides: TaskPatch) -> Result<Task> {
        self.insert_copy(id, Some(overrides)).await
    }

    async fn high_attendance(&self, min_attendees: u32) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = {
            let tasks = self.tasks.read().await;
            tasks
                .iter()
                .filter(|t| t.attendees >= min_attendees)
                .cloned()
                .collect()
        };
        pause(self.latency.mutate).await;
        Ok(tasks)
    }

    async fn attendees_by_category(&self) -> Result<Vec<(Category, u64)>> {
        let totals = {
            let tasks = self.tasks.read().await;
            let mut totals: Vec<(Category, u64)> = Vec::new();
            for task in tasks.iter() {
                match totals.iter_mut().find(|(category, _)| *category == task.category) {
                    Some((_, total)) => *total += u64::from(task.attendees),
                    None => totals.push((task.category, u64::from(task.attendees))),
                }
            }
            totals
        };
        pause(self.latency.get).await;
        Ok(totals)
    }
}
