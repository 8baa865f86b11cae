//! Field-level validation for task input
//!
//! These rules guard the editing surface only. The repository accepts
//! whatever it is given, and clones skip validation entirely.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Validated form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Description,
    DueDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::DueDate => "dueDate",
        })
    }
}

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldError {
    Required,
    MaxLength(usize),
    PastDate,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("This field is required"),
            Self::MaxLength(max) => write!(f, "Maximum {} characters allowed", max),
            Self::PastDate => f.write_str("Due date must be in the future"),
        }
    }
}

/// Every failing field, at most one error each
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }

    /// Record the first error seen for a field
    fn add(&mut self, field: Field, error: FieldError) {
        self.errors.entry(field).or_insert(error);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field, error)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check the raw field values the form collects
pub fn validate_fields(
    title: &str,
    description: &str,
    due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<NaiveDate, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if title.trim().is_empty() {
        errors.add(Field::Title, FieldError::Required);
    } else if title.chars().count() > TITLE_MAX_LEN {
        errors.add(Field::Title, FieldError::MaxLength(TITLE_MAX_LEN));
    }

    if description.chars().count() > DESCRIPTION_MAX_LEN {
        errors.add(Field::Description, FieldError::MaxLength(DESCRIPTION_MAX_LEN));
    }

    let due_date = match due_date {
        None => {
            errors.add(Field::DueDate, FieldError::Required);
            None
        }
        Some(date) if date < today => {
            errors.add(Field::DueDate, FieldError::PastDate);
            None
        }
        Some(date) => Some(date),
    };

    match due_date {
        Some(date) if errors.is_empty() => Ok(date),
        _ => Err(errors),
    }
}
