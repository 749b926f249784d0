//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, DEFAULT_LIMIT, DEFAULT_PAGE, ListTasksRequest, MAX_LIMIT, TaskLifecycleError,
    TaskLifecycleResult, TaskLifecycleService, TaskPage, UpdateTaskRequest,
};
