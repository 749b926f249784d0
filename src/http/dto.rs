//! Response bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::domain::{Task, TaskStatus};
use crate::task::services::TaskPage;

/// Formats a timestamp as ISO-8601 UTC with millisecond precision.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Wire form of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task identifier.
    pub id: Uuid,
    /// Task title.
    pub title: String,
    /// Optional description, `null` when absent.
    pub description: Option<String>,
    /// Task status.
    pub status: TaskStatus,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().into_inner(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(ToOwned::to_owned),
            status: task.status(),
            created_at: format_timestamp(task.created_at()),
            updated_at: format_timestamp(task.updated_at()),
        }
    }
}

/// Success envelope around a single payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Response payload.
    pub data: T,
}

impl<T> DataEnvelope<T> {
    /// Wraps `data` in a success envelope.
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Count of all tasks.
    pub total: u64,
    /// Number of pages, never less than one.
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

/// Success envelope for a page of tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Tasks on the page.
    pub data: Vec<TaskResponse>,
    /// Page metadata.
    pub pagination: Pagination,
}

impl From<TaskPage> for PageEnvelope {
    fn from(page: TaskPage) -> Self {
        Self {
            success: true,
            data: page.tasks.iter().map(TaskResponse::from).collect(),
            pagination: Pagination {
                page: page.page,
                limit: page.limit,
                total: page.total,
                total_pages: page.total_pages,
            },
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Whether the store is reachable.
    pub success: bool,
    /// `OK` or `Service Unavailable`.
    pub message: String,
    /// `connected` or `disconnected`.
    pub database: String,
    /// Failure summary when the store is unreachable.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    /// Time of the check.
    pub timestamp: String,
}

impl HealthResponse {
    /// Report for a reachable store.
    #[must_use]
    pub fn healthy(checked_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            message: "OK".to_owned(),
            database: "connected".to_owned(),
            error: None,
            timestamp: format_timestamp(checked_at),
        }
    }

    /// Report for an unreachable store.
    #[must_use]
    pub fn unavailable(checked_at: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: "Service Unavailable".to_owned(),
            database: "disconnected".to_owned(),
            error: Some(error.into()),
            timestamp: format_timestamp(checked_at),
        }
    }
}

/// Endpoint listing returned by `GET /`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoints {
    /// Health check.
    pub health: &'static str,
    /// Task creation.
    pub create_task: &'static str,
    /// Paginated listing.
    pub get_all_tasks: &'static str,
    /// Single task lookup.
    pub get_task: &'static str,
    /// Partial update.
    pub update_task: &'static str,
    /// Removal.
    pub delete_task: &'static str,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiIndex {
    /// Service name.
    pub message: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Available endpoints.
    pub endpoints: ApiEndpoints,
}

impl Default for ApiIndex {
    fn default() -> Self {
        Self {
            message: "Task Management System API",
            version: env!("CARGO_PKG_VERSION"),
            endpoints: ApiEndpoints {
                health: "GET /health",
                create_task: "POST /tasks",
                get_all_tasks: "GET /tasks?page=1&limit=10",
                get_task: "GET /tasks/{id}",
                update_task: "PATCH /tasks/{id}",
                delete_task: "DELETE /tasks/{id}",
            },
        }
    }
}
