//! Memoized list view over the store
//!
//! Recomputes the derived list only when the store's tasks or the filter
//! criteria differ from the last computation.

use tokio::sync::watch;

use super::filter::{derive_view, Selection, TaskFilter};
use crate::store::TaskState;
use crate::task::{Category, Priority, Status, Task};

struct Memo {
    tasks: Vec<Task>,
    filter: TaskFilter,
    output: Vec<Task>,
}

/// Filtered, searched and sorted tasks for display
pub struct TaskListView {
    source: watch::Receiver<TaskState>,
    filter: TaskFilter,
    memo: Option<Memo>,
    recomputations: u64,
}

impl TaskListView {
    pub fn new(source: watch::Receiver<TaskState>) -> Self {
        Self::with_filter(source, TaskFilter::default())
    }

    pub fn with_filter(source: watch::Receiver<TaskState>, filter: TaskFilter) -> Self {
        Self {
            source,
            filter,
            memo: None,
            recomputations: 0,
        }
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn set_status(&mut self, status: Selection<Status>) {
        self.filter.status = status;
    }

    pub fn set_priority(&mut self, priority: Selection<Priority>) {
        self.filter.priority = priority;
    }

    pub fn set_category(&mut self, category: Selection<Category>) {
        self.filter.category = category;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn loading(&self) -> bool {
        self.source.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.source.borrow().error.clone()
    }

    /// How many times the list has been derived
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Current view, derived again only if an input changed
    pub fn tasks(&mut self) -> &[Task] {
        let current = self.source.borrow_and_update();
        let stale = match &self.memo {
            Some(memo) => memo.tasks != current.tasks || memo.filter != self.filter,
            None => true,
        };

        if stale {
            let output = derive_view(&current.tasks, &self.filter);
            self.memo = Some(Memo {
                tasks: current.tasks.clone(),
                filter: self.filter.clone(),
                output,
            });
            self.recomputations += 1;
        }
        drop(current);

        match &self.memo {
            Some(memo) => &memo.output,
            None => &[],
        }
    }

    /// Wait until the store publishes a new state
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.source.changed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use crate::task::{sample_tasks, InMemoryTaskRepository, Latency, TaskFormData};
    use std::sync::Arc;

    async fn loaded_store() -> TaskStore {
        let store = TaskStore::new(Arc::new(InMemoryTaskRepository::new(
            sample_tasks(),
            Latency::none(),
        )));
        store.load_tasks().await;
        store
    }

    #[tokio::test]
    async fn test_view_is_memoized() {
        let store = loaded_store().await;
        let mut view = TaskListView::new(store.watch());

        assert_eq!(view.tasks().len(), 5);
        assert_eq!(view.tasks().len(), 5);
        assert_eq!(view.recomputations(), 1);

        view.set_search("");
        view.tasks();
        assert_eq!(view.recomputations(), 1);
    }

    #[tokio::test]
    async fn test_filter_change_recomputes() {
        let store = loaded_store().await;
        let mut view = TaskListView::new(store.watch());
        view.tasks();

        view.set_priority(Selection::Only(Priority::Low));
        let titles: Vec<String> = view.tasks().iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, vec!["Team meeting preparation"]);
        assert_eq!(view.recomputations(), 2);

        view.set_priority(Selection::All);
        view.set_category(Selection::Only(Category::Social));
        view.set_status(Selection::Only(Status::Todo));
        assert_eq!(view.tasks()[0].title, "Annual Social Event");
    }

    #[tokio::test]
    async fn test_store_change_recomputes() {
        let store = loaded_store().await;
        let mut view = TaskListView::new(store.watch());
        view.tasks();

        let date = chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let created = store
            .create_task(TaskFormData::new("Urgent review", date).with_priority(Priority::High))
            .await
            .unwrap();

        assert_eq!(view.tasks().len(), 6);
        assert_eq!(view.recomputations(), 2);
        assert_eq!(view.tasks().iter().filter(|t| t.id == created.id).count(), 1);

        // Loading flips without touching tasks
        store.delete_task(uuid::Uuid::new_v4()).await;
        view.tasks();
        assert_eq!(view.recomputations(), 2);
        assert!(view.error().is_some());
        assert!(!view.loading());
    }

    #[tokio::test]
    async fn test_changed_wakes_on_store_update() {
        let store = loaded_store().await;
        let mut view = TaskListView::new(store.watch());
        view.tasks();

        let updater = {
            let store = store.clone();
            tokio::spawn(async move { store.delete_task(sample_tasks()[0].id).await })
        };

        view.changed().await.unwrap();
        assert!(updater.await.unwrap());
        assert_eq!(view.tasks().len(), 4);
    }
}
