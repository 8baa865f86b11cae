//! Filtering, searching and sorting for the task list

use std::fmt;
use std::str::FromStr;

use crate::task::{Category, Priority, Status, Task};

/// Either every value or one exact value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => fmt::Display::fmt(value, f),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.trim().parse().map(Self::Only)
        }
    }
}

/// Criteria for the list view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Selection<Status>,
    pub priority: Selection<Priority>,
    pub category: Selection<Category>,
    /// Case-insensitive substring over title, description and location
    pub search: String,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(&task.status)
            && self.priority.matches(&task.priority)
            && self.category.matches(&task.category)
            && self.matches_search(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        let contains = |value: &str| value.to_lowercase().contains(&needle);

        contains(&task.title)
            || task.description.as_deref().is_some_and(contains)
            || contains(&task.location)
    }
}

/// Priority descending, then due date ascending; stable for ties
pub fn sort_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then_with(|| a.due_date.cmp(&b.due_date))
    });
    sorted
}

/// Sorted, filtered and searched projection of `tasks`
pub fn derive_view(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    let mut view = sort_tasks(tasks);
    view.retain(|task| filter.matches(task));
    view
}
