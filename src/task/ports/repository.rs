//! Repository port for task persistence and paginated lookup.

use crate::task::domain::{FieldViolation, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Offset window over tasks ordered newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Maximum number of tasks to return.
    pub limit: u32,
    /// Number of tasks to skip.
    pub offset: u64,
}

impl PageWindow {
    /// Creates a window from a limit and offset.
    #[must_use]
    pub const fn new(limit: u32, offset: u64) -> Self {
        Self { limit, offset }
    }
}

/// Tasks inside a [`PageWindow`] together with the unpaginated total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSlice {
    /// Tasks in the window, ordered by `created_at` descending.
    pub tasks: Vec<Task>,
    /// Count of all stored tasks, ignoring the window.
    pub total: u64,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::Validation`] when the store rejects a
    /// field.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns one window of tasks, newest first, plus the total task count.
    ///
    /// Tasks sharing a creation timestamp are returned in a stable,
    /// store-defined order.
    async fn find_page(&self, window: PageWindow) -> TaskRepositoryResult<TaskSlice>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Removes a task and returns the number of removed records.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<u64>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The store rejected one or more task fields.
    #[error("store rejected task fields: {0:?}")]
    Validation(Vec<FieldViolation>),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
