//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;

use super::model::{Category, Task, TaskFormData, TaskId, TaskPatch};
use crate::Result;

/// Default threshold for [`TaskRepository::high_attendance`]
pub const DEFAULT_MIN_ATTENDEES: u32 = 50;

/// Repository interface for task CRUD and clone operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Get all tasks in insertion order
    async fn list(&self) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn get(&self, id: TaskId) -> Result<Option<Task>>;

    /// Create a new task, assigning its id and creation time
    async fn create(&self, data: TaskFormData) -> Result<Task>;

    /// Replace every editable field of an existing task
    async fn update(&self, id: TaskId, data: TaskFormData) -> Result<Task>;

    /// Delete a task by ID
    async fn delete(&self, id: TaskId) -> Result<()>;

    /// Append a draft copy of an existing task
    async fn clone_task(&self, id: TaskId) -> Result<Task>;

    /// Like [`clone_task`](Self::clone_task), then apply the overrides
    async fn clone_with_modifications(&self, id: TaskId, overrides: TaskPatch) -> Result<Task>;

    /// Tasks with at least `min_attendees` attendees
    async fn high_attendance(&self, min_attendees: u32) -> Result<Vec<Task>>;

    /// Total attendees per category, in order of first appearance
    async fn attendees_by_category(&self) -> Result<Vec<(Category, u64)>>;
}
