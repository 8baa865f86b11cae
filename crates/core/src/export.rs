//! CSV and JSON export of task lists

use std::path::Path;

use crate::task::Task;
use crate::Result;

pub const CSV_HEADER: &str =
    "Title,Description,Priority,Status,Category,Location,Attendees,Due Date,Created At";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wrap in quotes and double any embedded quotes
fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_row(task: &Task) -> String {
    [
        csv_quote(&task.title),
        csv_quote(task.description.as_deref().unwrap_or_default()),
        task.priority.to_string(),
        task.status.to_string(),
        task.category.to_string(),
        csv_quote(&task.location),
        task.attendees.to_string(),
        task.due_date.format(DATE_FORMAT).to_string(),
        task.created_at.format(DATE_FORMAT).to_string(),
    ]
    .join(",")
}

/// Header plus one line per task, joined by `\n` without a trailing newline
pub fn to_csv(tasks: &[Task]) -> String {
    std::iter::once(CSV_HEADER.to_string())
        .chain(tasks.iter().map(csv_row))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn to_json(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Write the CSV export to `path`, creating parent directories
pub async fn write_csv(path: impl AsRef<Path>, tasks: &[Task]) -> Result<()> {
    write_file(path.as_ref(), to_csv(tasks)).await
}

pub async fn write_json(path: impl AsRef<Path>, tasks: &[Task]) -> Result<()> {
    write_file(path.as_ref(), to_json(tasks)?).await
}

async fn write_file(path: &Path, content: String) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    tracing::info!("Exported tasks to {}", path.display());
    Ok(())
}
