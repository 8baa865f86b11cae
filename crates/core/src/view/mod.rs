//! Derived list view
//!
//! Pure filter, search and sort over the store's tasks, plus a memoized
//! view that tracks the store.

mod filter;
mod list;

pub use filter::{derive_view, sort_tasks, Selection, TaskFilter};
pub use list::TaskListView;
