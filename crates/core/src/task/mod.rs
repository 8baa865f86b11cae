//! Task module
//!
//! This module contains task-related types, storage and validation.

mod memory_store;
mod model;
mod repository;
mod seed;
mod validation;

pub use memory_store::{InMemoryTaskRepository, Latency};
pub use model::*;
pub use repository::{TaskRepository, DEFAULT_MIN_ATTENDEES};
pub use seed::sample_tasks;
pub use validation::{
    validate_fields, Field, FieldError, ValidationErrors, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN,
};
