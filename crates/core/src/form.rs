//! Create/edit form state
//!
//! Holds raw user input, validates it into [`TaskFormData`] and hands the
//! result to the store.

use chrono::NaiveDate;
use tracing::debug;

use crate::store::TaskStore;
use crate::task::{
    validate_fields, Category, Field, FieldError, Priority, Status, Task, TaskFormData, TaskId,
    TaskRepository, ValidationErrors,
};
use crate::{Error, Result};

/// Whether submitting creates a new task or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    status: Status,
    pub due_date: Option<NaiveDate>,
    pub category: Category,
    pub location: String,
    pub attendees: u32,
    mode: FormMode,
    status_locked: bool,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// Blank form for a new task
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            status: Status::Todo,
            due_date: None,
            category: Category::default(),
            location: String::new(),
            attendees: 0,
            mode: FormMode::Create,
            status_locked: false,
        }
    }

    /// Form prefilled from an existing task.
    ///
    /// Completed tasks keep their status; [`set_status`](Self::set_status) is refused.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            status: task.status,
            due_date: Some(task.due_date),
            category: task.category,
            location: task.location.clone(),
            attendees: task.attendees,
            mode: FormMode::Edit(task.id),
            status_locked: task.status == Status::Completed,
        }
    }

    /// Load `id` for editing; `None` when no such task exists
    pub async fn edit(repository: &dyn TaskRepository, id: TaskId) -> Result<Option<Self>> {
        let task = repository.get(id).await?;
        debug!("Loaded task {} for editing: found={}", id, task.is_some());
        Ok(task.as_ref().map(Self::from_task))
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn status_locked(&self) -> bool {
        self.status_locked
    }

    /// Change the status unless it is locked; returns whether it changed
    pub fn set_status(&mut self, status: Status) -> bool {
        if self.status_locked {
            return false;
        }
        self.status = status;
        true
    }

    /// Validate against `today` and build the data to submit
    pub fn validate(&self, today: NaiveDate) -> std::result::Result<TaskFormData, ValidationErrors> {
        let due_date = validate_fields(&self.title, &self.description, self.due_date, today)?;

        let description = Some(self.description.clone()).filter(|d| !d.is_empty());
        Ok(TaskFormData {
            title: self.title.clone(),
            description,
            priority: self.priority,
            status: self.status,
            due_date,
            category: self.category,
            location: self.location.clone(),
            attendees: self.attendees,
        })
    }

    /// Error to show next to `field`, if any
    pub fn field_error(&self, field: Field, today: NaiveDate) -> Option<FieldError> {
        self.validate(today).err().and_then(|errors| errors.get(field))
    }

    /// Validate and dispatch to the store.
    ///
    /// Invalid input never reaches the store. A failed store operation yields
    /// `Ok(None)` and leaves its message in the store's `error`.
    pub async fn submit(&self, store: &TaskStore, today: NaiveDate) -> Result<Option<Task>> {
        let data = self.validate(today).map_err(Error::Validation)?;
        let task = match self.mode {
            FormMode::Create => store.create_task(data).await,
            FormMode::Edit(id) => store.update_task(id, data).await,
        };
        Ok(task)
    }
}
