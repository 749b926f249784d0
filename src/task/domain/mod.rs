//! Domain model for task records.
//!
//! The task domain owns identifier parsing, title and status rules, and the
//! timestamp invariants of the task aggregate while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod status;
mod task;

pub use error::{FieldViolation, ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskId, TaskTitle};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskChanges, TaskDraft};
