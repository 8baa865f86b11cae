//! Core library for Taskboard
//!
//! This crate contains the task management logic, including:
//! - Task model, validation and the in-memory repository
//! - The observable task store
//! - Derived list views and export

pub mod error;
pub mod export;
pub mod form;
pub mod store;
pub mod task;
pub mod view;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
