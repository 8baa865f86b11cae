//! Task model definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier assigned by the repository when a task is created
pub type TaskId = Uuid;

/// Returned when a label does not name any variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Lowercase and drop separators so "In Progress", "in_progress" and
/// "inprogress" all compare equal.
fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    /// Sort weight, higher first in the list view
    pub fn weight(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Only assigned to clones, pending review
    Draft,
    #[serde(rename = "To Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl Default for Status {
    fn default() -> Self {
        Self::Todo
    }
}

impl Status {
    pub const ALL: [Status; 4] = [Self::Draft, Self::Todo, Self::InProgress, Self::Completed];

    /// Statuses a user may pick on the edit form
    pub fn form_choices() -> [Status; 3] {
        [Self::Todo, Self::InProgress, Self::Completed]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Workshop,
    Seminar,
    Social,
    #[serde(rename = "Club Meetings")]
    ClubMeetings,
}

impl Default for Category {
    fn default() -> Self {
        Self::Workshop
    }
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Workshop, Self::Seminar, Self::Social, Self::ClubMeetings];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workshop => "Workshop",
            Self::Seminar => "Seminar",
            Self::Social => "Social",
            Self::ClubMeetings => "Club Meetings",
        }
    }
}

macro_rules! label_impls {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_label(s);
                $ty::ALL
                    .into_iter()
                    .find(|variant| normalize_label(variant.as_str()) == wanted)
                    .ok_or_else(|| UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

label_impls!(Priority, "priority");
label_impls!(Status, "status");
label_impls!(Category, "category");

/// The editable part of a task, accepted on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFormData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub due_date: NaiveDate,
    pub category: Category,
    pub location: String,
    pub attendees: u32,
}

impl TaskFormData {
    /// Create form data with defaults for everything but the title and due date
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            status: Status::default(),
            due_date,
            category: Category::default(),
            location: String::new(),
            attendees: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_attendees(mut self, attendees: u32) -> Self {
        self.attendees = attendees;
        self
    }
}

/// Field overrides applied when cloning a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Option<u32>,
}

/// A task (or event) on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    pub location: String,
    pub attendees: u32,
}

impl Task {
    /// Build a task from form data with a fresh id and creation time
    pub fn new(data: TaskFormData) -> Self {
        Self::from_parts(Uuid::new_v4(), Utc::now(), data)
    }

    pub fn from_parts(id: TaskId, created_at: DateTime<Utc>, data: TaskFormData) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            status: data.status,
            due_date: data.due_date,
            created_at,
            category: data.category,
            location: data.location,
            attendees: data.attendees,
        }
    }

    /// Extract the editable fields
    pub fn form_data(&self) -> TaskFormData {
        TaskFormData {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            status: self.status,
            due_date: self.due_date,
            category: self.category,
            location: self.location.clone(),
            attendees: self.attendees,
        }
    }

    /// Replace every editable field, keeping `id` and `created_at`
    pub fn apply_form(&mut self, data: TaskFormData) {
        let id = self.id;
        let created_at = self.created_at;
        *self = Self::from_parts(id, created_at, data);
    }

    /// Overwrite only the fields the patch sets
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(attendees) = patch.attendees {
            self.attendees = attendees;
        }
    }

    /// Derive a draft copy: new id and timestamp, due one week later
    pub fn draft_copy(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            status: Status::Draft,
            due_date: self
                .due_date
                .checked_add_days(Days::new(7))
                .unwrap_or(self.due_date),
            ..self.clone()
        }
    }

    /// Past due and not yet completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today && self.status != Status::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Task {
        Task::new(
            TaskFormData::new("Plan workshop", date(2025, 3, 10))
                .with_description("Book the room")
                .with_priority(Priority::High)
                .with_location("Lab 2")
                .with_attendees(12),
        )
    }

    #[test]
    fn test_priority_weight_orders_high_first() {
        assert!(Priority::High.weight() > Priority::Medium.weight());
        assert!(Priority::Medium.weight() > Priority::Low.weight());
    }

    #[test]
    fn test_labels_parse_loosely() {
        assert_eq!("in progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("To Do".parse::<Status>().unwrap(), Status::Todo);
        assert_eq!("todo".parse::<Status>().unwrap(), Status::Todo);
        assert_eq!("club_meetings".parse::<Category>().unwrap(), Category::ClubMeetings);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);

        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.kind, "priority");
    }

    #[test]
    fn test_serde_uses_display_labels() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let category: Category = serde_json::from_str("\"Club Meetings\"").unwrap();
        assert_eq!(category, Category::ClubMeetings);
    }

    #[test]
    fn test_form_choices_exclude_draft() {
        assert!(!Status::form_choices().contains(&Status::Draft));
    }

    #[test]
    fn test_apply_form_keeps_identity() {
        let mut task = sample();
        let id = task.id;
        let created_at = task.created_at;

        let data = TaskFormData::new("Renamed", date(2025, 4, 1)).with_status(Status::Completed);
        task.apply_form(data.clone());

        assert_eq!(task.id, id);
        assert_eq!(task.created_at, created_at);
        assert_eq!(task.form_data(), data);
        assert!(task.description.is_none());
    }

    #[test]
    fn test_draft_copy() {
        let task = sample();
        let copy = task.draft_copy();

        assert_ne!(copy.id, task.id);
        assert_eq!(copy.status, Status::Draft);
        assert_eq!(copy.due_date, date(2025, 3, 17));
        assert_eq!(copy.title, task.title);
        assert_eq!(copy.location, task.location);
        assert_eq!(copy.attendees, task.attendees);
    }

    #[test]
    fn test_apply_patch_only_touches_set_fields() {
        let mut task = sample();
        task.apply_patch(TaskPatch {
            title: Some("Patched".to_string()),
            attendees: Some(40),
            ..TaskPatch::default()
        });

        assert_eq!(task.title, "Patched");
        assert_eq!(task.attendees, 40);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.description.as_deref(), Some("Book the room"));
    }

    #[test]
    fn test_is_overdue() {
        let mut task = sample();
        assert!(task.is_overdue(date(2025, 3, 11)));
        assert!(!task.is_overdue(date(2025, 3, 10)));

        task.status = Status::Completed;
        assert!(!task.is_overdue(date(2025, 3, 11)));
    }
}
