//! Taskboard command-line entry point
//!
//! Seeds the mock service, loads the store and prints the filtered task
//! list as CSV or JSON. Configuration comes from `TASKBOARD_*` variables.

mod config;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskboard_core::export;
use taskboard_core::store::TaskStore;
use taskboard_core::task::{sample_tasks, InMemoryTaskRepository, Task, TaskRepository};
use taskboard_core::view::TaskListView;

use crate::config::{Config, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the export
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=info,taskboard_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    tracing::debug!("Using config: {:?}", config);

    let today = Local::now().date_naive();
    let tasks = visible_tasks(&config, today).await?;

    if let Some(path) = &config.export_path {
        let written = match config.format {
            OutputFormat::Csv => export::write_csv(path, &tasks).await,
            OutputFormat::Json => export::write_json(path, &tasks).await,
        };
        written.with_context(|| format!("Failed to write {}", path.display()))?;
    } else {
        println!("{}", render(config.format, &tasks)?);
    }

    Ok(())
}

/// Load the seeded store and return the tasks the filter lets through
async fn visible_tasks(config: &Config, today: NaiveDate) -> Result<Vec<Task>> {
    let repository = Arc::new(InMemoryTaskRepository::new(sample_tasks(), config.latency));
    let store = TaskStore::new(Arc::clone(&repository) as Arc<dyn TaskRepository>);

    if !store.load_tasks().await {
        let message = store.state().error.unwrap_or_default();
        return Err(anyhow!(message));
    }

    for (category, total) in repository.attendees_by_category().await? {
        tracing::debug!("{}: {} attendees", category, total);
    }

    let mut view = TaskListView::with_filter(store.watch(), config.filter.clone());
    let tasks = view.tasks().to_vec();
    let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();
    tracing::info!(
        "Showing {} of {} tasks ({} overdue)",
        tasks.len(),
        store.state().tasks.len(),
        overdue
    );

    Ok(tasks)
}

fn render(format: OutputFormat, tasks: &[Task]) -> Result<String> {
    Ok(match format {
        OutputFormat::Csv => export::to_csv(tasks),
        OutputFormat::Json => export::to_json(tasks)?,
    })
}
