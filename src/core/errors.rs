use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::ValidationError;

/// Unified error type for the domain, storage and export layers.
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Schedule conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: u64, limit: u64 },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Export failed: {0}")]
    Export(String),
}

pub type Result<T> = StdResult<T, OrganizerError>;

impl From<std::io::Error> for OrganizerError {
    fn from(err: std::io::Error) -> Self {
        OrganizerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for OrganizerError {
    fn from(err: serde_json::Error) -> Self {
        OrganizerError::Storage(err.to_string())
    }
}

impl From<csv::Error> for OrganizerError {
    fn from(err: csv::Error) -> Self {
        OrganizerError::Export(err.to_string())
    }
}

impl OrganizerError {
    /// True for errors the user can fix by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            OrganizerError::Validation(_) | OrganizerError::Conflict(_) | OrganizerError::NotFound(_)
        )
    }
}
