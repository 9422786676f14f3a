use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::task::Priority;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Schema of a record kind held by a [`RecordManager`](crate::core::manager::RecordManager).
///
/// Each implementation names its storage key, id prefix and validation rules;
/// the manager supplies the shared load/validate/save cycle.
pub trait Record:
    Identifiable + NamedEntity + Displayable + Clone + Serialize + DeserializeOwned
{
    /// Field values accepted by `add` and `update`.
    type Draft: Clone;

    const ID_PREFIX: &'static str;
    const STORAGE_KEY: &'static str;
    /// Plural noun used in list placeholders ("tasks", "classes").
    const PLURAL: &'static str;
    /// Maximum rows a list shows unless the view overrides it.
    const LIST_LIMIT: Option<usize> = None;

    fn created_at(&self) -> DateTime<Utc>;

    fn validate(draft: &Self::Draft) -> Result<(), ValidationError>;

    fn from_draft(id: String, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    /// Overwrites the mutable fields; `id` and `created_at` stay untouched.
    fn apply(&mut self, draft: Self::Draft);

    /// Editable fields of an existing record.
    fn to_draft(&self) -> Self::Draft;

    /// Applies the draft rules to a record that did not come through `add`.
    fn check(&self) -> Result<(), ValidationError> {
        require_text("id", self.id())?;
        Self::validate(&self.to_draft())
    }

    fn is_completed(&self) -> bool {
        false
    }

    fn priority(&self) -> Option<Priority> {
        None
    }

    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }

    fn supports_completion() -> bool {
        false
    }

    fn empty_message() -> String {
        format!("No {} yet", Self::PLURAL)
    }
}

/// Field-level rule violations raised before a record is created or edited.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("amount must be a positive number")]
    NonPositiveAmount,
    #[error("end time must be after start time")]
    InvalidTimeRange,
    #[error("invalid time `{0}` (expected HH:MM)")]
    InvalidTime(String),
    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid color `{0}` (expected #RRGGBB)")]
    InvalidColor(String),
    #[error("unknown {field} `{value}`")]
    UnknownValue { field: &'static str, value: String },
    #[error("duplicate id `{0}`")]
    DuplicateId(String),
    #[error("No {0} to export")]
    NothingToExport(&'static str),
}

/// Returns the trimmed value or a `Required` error when nothing is left.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Builds an id of the form `prefix_millis_random`.
pub fn generate_id(prefix: &str, now: DateTime<Utc>) -> String {
    let random: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("{}_{}_{}", prefix, now.timestamp_millis(), random)
}
