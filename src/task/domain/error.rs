//! Error types for task domain validation and parsing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single rejected field together with a client-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Name of the rejected field.
    pub field: String,
    /// Human-readable reason for the rejection.
    pub message: String,
}

impl FieldViolation {
    /// Creates a new field violation.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("Title is required")]
    EmptyTitle,

    /// The trimmed task title is longer than the persisted column allows.
    #[error("Title must be between 1 and 255 characters")]
    TitleTooLong(usize),

    /// The task identifier is not a canonical UUID.
    #[error("Invalid task ID")]
    InvalidTaskId(String),

    /// The status value is not one of the supported statuses.
    #[error("Status must be one of: pending, in-progress, completed")]
    InvalidStatus(String),
}

impl TaskDomainError {
    /// Returns the name of the task field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong(_) => "title",
            Self::InvalidTaskId(_) => "id",
            Self::InvalidStatus(_) => "status",
        }
    }

    /// Converts the error into a field violation.
    #[must_use]
    pub fn to_violation(&self) -> FieldViolation {
        FieldViolation::new(self.field(), self.to_string())
    }
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

impl From<ParseTaskStatusError> for TaskDomainError {
    fn from(err: ParseTaskStatusError) -> Self {
        Self::InvalidStatus(err.0)
    }
}
