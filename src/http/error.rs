//! HTTP error mapping.
//!
//! Every failure is logged, then rendered as the uniform
//! `{success: false, message?, errors?}` envelope.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::task::domain::FieldViolation;
use crate::task::ports::TaskRepositoryError;
use crate::task::services::TaskLifecycleError;

/// Failures surfaced by the HTTP layer.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request fields failed validation.
    #[error("request validation failed: {0:?}")]
    Validation(Vec<FieldViolation>),

    /// A body-bearing request did not declare JSON.
    #[error("Send JSON with header: Content-Type: application/json")]
    UnsupportedMediaType,

    /// The body was empty, malformed, or `null`.
    #[error("Invalid JSON body. Use Content-Type: application/json and a valid JSON payload.")]
    InvalidBody,

    /// The task does not exist.
    #[error("Task not found")]
    NotFound,

    /// The store or domain rejected field values after request validation.
    #[error("Validation error")]
    StoreValidation(Vec<FieldViolation>),

    /// A uniqueness constraint was violated.
    #[error("A record with this value already exists")]
    Conflict,

    /// Any other store failure.
    #[error("Database error")]
    Database(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// Failure with an explicit status and client-facing message.
    #[error("{message}")]
    Other {
        /// Response status.
        status: StatusCode,
        /// Client-facing message.
        message: String,
    },
}

impl ApiError {
    /// Builds an unclassified failure.
    #[must_use]
    pub fn other(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Other {
            status,
            message: message.into(),
        }
    }

    /// Unclassified 500 failure.
    #[must_use]
    pub fn internal() -> Self {
        Self::other(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// HTTP status for this failure.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody | Self::StoreValidation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Other { status, .. } => *status,
        }
    }

    fn body(self) -> ErrorBody {
        match self {
            Self::Validation(errors) => ErrorBody {
                success: false,
                message: None,
                errors: Some(errors),
            },
            Self::StoreValidation(errors) => ErrorBody {
                success: false,
                message: Some("Validation error".to_owned()),
                errors: Some(errors),
            },
            other => ErrorBody {
                success: false,
                message: Some(other.to_string()),
                errors: None,
            },
        }
    }

    fn log(&self, status: StatusCode) {
        match self {
            Self::Database(source) => {
                error!(status = status.as_u16(), error = %source, "store failure");
            }
            other if status.is_server_error() => {
                error!(status = status.as_u16(), error = %other, "request failed");
            }
            other => {
                warn!(status = status.as_u16(), error = %other, "request rejected");
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldViolation>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        self.log(status);
        (status, Json(self.body())).into_response()
    }
}

impl From<TaskRepositoryError> for ApiError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::Validation(violations) => Self::StoreValidation(violations),
            TaskRepositoryError::DuplicateTask(_) => Self::Conflict,
            TaskRepositoryError::NotFound(_) => Self::NotFound,
            TaskRepositoryError::Persistence(source) => Self::Database(source),
        }
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(domain) => Self::StoreValidation(vec![domain.to_violation()]),
            TaskLifecycleError::Repository(repository) => Self::from(repository),
            TaskLifecycleError::NotFound(_) => Self::NotFound,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::other(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::Validation(vec![FieldViolation::new("id", "Invalid task ID")])
    }
}
