//! Task store
//!
//! Observable state container that mediates every task operation through
//! the repository.

mod sequencer;
mod state;
mod task_store;

pub use state::{Operation, OperationId, TaskChange, TaskState, Transition};
pub use task_store::TaskStore;
