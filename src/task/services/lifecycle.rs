//! Service layer for task creation, listing, retrieval, update, and removal.

use crate::task::{
    domain::{Task, TaskChanges, TaskDomainError, TaskDraft, TaskId, TaskStatus, TaskTitle},
    ports::{PageWindow, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Page number used when none is supplied.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when none is supplied.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: TaskStatus,
}

impl CreateTaskRequest {
    /// Creates a request with the required title and default status.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Request for one page of tasks with defaults already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTasksRequest {
    page: u32,
    limit: u32,
}

impl Default for ListTasksRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListTasksRequest {
    /// Resolves a page request from raw query values.
    ///
    /// Missing or zero values fall back to the defaults, negative pages become
    /// the first page, and limits are clamped to `1..=100`. Pages above
    /// `u32::MAX` saturate; callers that echo the page back should reject them
    /// first.
    #[must_use]
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            None | Some(0) => DEFAULT_PAGE,
            Some(value) => u32::try_from(value.max(1)).unwrap_or(u32::MAX),
        };
        let limit = match limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(value) => {
                u32::try_from(value.clamp(1, i64::from(MAX_LIMIT))).unwrap_or(DEFAULT_LIMIT)
            }
        };
        Self { page, limit }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    fn window(self) -> PageWindow {
        let offset = u64::from(self.page.saturating_sub(1)) * u64::from(self.limit);
        PageWindow::new(self.limit, offset)
    }
}

/// Request for a partial task update.
///
/// Only the title and status are updatable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    id: TaskId,
    title: Option<String>,
    status: Option<TaskStatus>,
}

impl UpdateTaskRequest {
    /// Creates an update that changes nothing but `updated_at`.
    #[must_use]
    pub const fn new(id: TaskId) -> Self {
        Self {
            id,
            title: None,
            status: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the targeted task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }
}

/// One page of tasks plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page, newest first.
    pub tasks: Vec<Task>,
    /// One-based page number.
    pub page: u32,
    /// Page size used for the query.
    pub limit: u32,
    /// Count of all tasks.
    pub total: u64,
    /// Number of pages, never less than one.
    pub total_pages: u64,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// No task exists with the requested identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates and persists a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the title is invalid or the
    /// repository rejects persistence.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let mut draft = TaskDraft::new(title).with_status(request.status);
        if let Some(description) = request.description {
            draft = draft.with_description(description);
        }

        let task = Task::new(draft, &*self.clock);
        self.repository.store(&task).await?;
        Ok(task)
    }

    /// Lists one page of tasks ordered newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list(&self, request: ListTasksRequest) -> TaskLifecycleResult<TaskPage> {
        let slice = self.repository.find_page(request.window()).await?;
        let limit = u64::from(request.limit());
        Ok(TaskPage {
            tasks: slice.tasks,
            page: request.page(),
            limit: request.limit(),
            total: slice.total,
            total_pages: slice.total.div_ceil(limit).max(1),
        })
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when no task matches, or
    /// [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn get(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))
    }

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// Concurrent updates to the same task are last-writer-wins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when no task matches,
    /// [`TaskLifecycleError::Domain`] when the new title is invalid, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn update(&self, request: UpdateTaskRequest) -> TaskLifecycleResult<Task> {
        let mut task = self.get(request.id).await?;

        let mut changes = TaskChanges::new();
        if let Some(title) = request.title {
            changes = changes.with_title(TaskTitle::new(title)?);
        }
        if let Some(status) = request.status {
            changes = changes.with_status(status);
        }

        task.apply(changes, &*self.clock);
        self.repository
            .update(&task)
            .await
            .map_err(|err| match err {
                TaskRepositoryError::NotFound(id) => TaskLifecycleError::NotFound(id),
                other => TaskLifecycleError::Repository(other),
            })?;
        Ok(task)
    }

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when nothing was removed, or
    /// [`TaskLifecycleError::Repository`] when the removal fails.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<()> {
        match self.repository.delete(id).await? {
            0 => Err(TaskLifecycleError::NotFound(id)),
            _ => Ok(()),
        }
    }

    /// Checks that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the store cannot be reached.
    pub async fn check_store(&self) -> TaskLifecycleResult<()> {
        self.repository.ping().await.map_err(TaskLifecycleError::from)
    }
}
