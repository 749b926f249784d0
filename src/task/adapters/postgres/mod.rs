//! `PostgreSQL` adapter for task persistence.

mod migrations;
mod models;
mod repository;
mod schema;

pub use migrations::{CREATE_TASKS_DOWN, CREATE_TASKS_UP, apply_schema, revert_schema};
pub use repository::{PostgresTaskRepository, TaskPgPool};
