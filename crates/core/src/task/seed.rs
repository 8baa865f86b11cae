//! Sample tasks the mock service starts with

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use super::model::{Category, Priority, Status, Task};

fn id(suffix: u8) -> Uuid {
    Uuid::from_u128(0x123e4567_e89b_12d3_a456_426614174000 + u128::from(suffix))
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn task(
    suffix: u8,
    title: &str,
    description: &str,
    priority: Priority,
    status: Status,
    due_date: NaiveDate,
    created_at: DateTime<Utc>,
    category: Category,
    location: &str,
    attendees: u32,
) -> Task {
    Task {
        id: id(suffix),
        title: title.to_string(),
        description: Some(description.to_string()),
        priority,
        status,
        due_date,
        created_at,
        category,
        location: location.to_string(),
        attendees,
    }
}

/// The fixed sample list, ids `123e4567-e89b-12d3-a456-426614174000` to `...004`
pub fn sample_tasks() -> Vec<Task> {
    vec![
        task(
            0,
            "Complete project proposal",
            "Draft and finalize the project proposal for client review.",
            Priority::High,
            Status::Todo,
            day(2025, 12, 10),
            at(2023, 7, 10, 10),
            Category::Workshop,
            "Conference Room A",
            25,
        ),
        task(
            1,
            "Review documentation",
            "Go through the technical documentation and provide feedback.",
            Priority::Medium,
            Status::InProgress,
            day(2024, 7, 1),
            at(2023, 7, 1, 9),
            Category::Seminar,
            "Main Auditorium",
            150,
        ),
        task(
            2,
            "Team meeting preparation",
            "Prepare agenda and materials for the weekly team meeting.",
            Priority::Low,
            Status::Completed,
            day(2025, 10, 28),
            at(2023, 6, 28, 14),
            Category::ClubMeetings,
            "Team Room 3",
            12,
        ),
        task(
            3,
            "Annual Social Event",
            "Organize the annual company social event for employees.",
            Priority::Medium,
            Status::Todo,
            day(2023, 9, 15),
            at(2023, 7, 15, 11),
            Category::Social,
            "Grand Ballroom",
            300,
        ),
        task(
            4,
            "Technical Workshop",
            "Conduct Angular framework workshop for developers.",
            Priority::High,
            Status::InProgress,
            day(2025, 7, 12),
            at(2023, 7, 12, 8),
            Category::Workshop,
            "Training Lab 2",
            40,
        ),
    ]
}
