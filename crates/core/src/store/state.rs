//! Task store state and its reducer

use std::fmt;

use serde::Serialize;

use crate::task::{Task, TaskId};
use crate::view::sort_tasks;

/// Sequence number handed to each store operation as it is issued
pub type OperationId = u64;

/// Kind of store operation, used in error messages and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
    Clone,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Clone => "clone",
        })
    }
}

/// How a successful operation changes the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    Replaced(Vec<Task>),
    Added(Task),
    Updated(Task),
    Removed(TaskId),
}

/// Input to [`TaskState::reduce`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Started { operation: OperationId },
    Succeeded { operation: OperationId, change: TaskChange },
    Failed { operation: OperationId, message: String },
}

/// Observable state of the task store
///
/// `tasks` is kept in repository order; use [`TaskState::sorted_tasks`] for
/// display order. `loading` and `error` describe the most recently issued
/// operation only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    #[serde(skip)]
    latest_operation: OperationId,
}

impl TaskState {
    /// Apply one transition to the previous snapshot
    pub fn reduce(mut self, transition: &Transition) -> Self {
        match transition {
            Transition::Started { operation } => {
                self.latest_operation = *operation;
                self.loading = true;
                self.error = None;
            }
            Transition::Succeeded { operation, change } => {
                self.apply_change(change);
                if *operation == self.latest_operation {
                    self.loading = false;
                    self.error = None;
                }
            }
            Transition::Failed { operation, message } => {
                if *operation == self.latest_operation {
                    self.loading = false;
                    self.error = Some(message.clone());
                }
            }
        }
        self
    }

    fn apply_change(&mut self, change: &TaskChange) {
        match change {
            TaskChange::Replaced(tasks) => self.tasks = tasks.clone(),
            TaskChange::Added(task) => self.tasks.push(task.clone()),
            TaskChange::Updated(updated) => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
                    *task = updated.clone();
                }
            }
            TaskChange::Removed(id) => self.tasks.retain(|t| t.id != *id),
        }
    }

    /// Tasks in display order
    pub fn sorted_tasks(&self) -> Vec<Task> {
        sort_tasks(&self.tasks)
    }

    pub fn latest_operation(&self) -> OperationId {
        self.latest_operation
    }
}
