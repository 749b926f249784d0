//! Embedded schema migration for the `tasks` table.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::result::QueryResult;

/// SQL that creates the `tasks` table and its ordering index.
pub const CREATE_TASKS_UP: &str =
    include_str!("../../../../migrations/2026-10-18-000000_create_tasks/up.sql");

/// SQL that drops the `tasks` table.
pub const CREATE_TASKS_DOWN: &str =
    include_str!("../../../../migrations/2026-10-18-000000_create_tasks/down.sql");

/// Creates the task schema when it does not already exist.
///
/// # Errors
///
/// Returns the database error raised while executing the migration.
pub fn apply_schema(connection: &mut PgConnection) -> QueryResult<()> {
    connection.batch_execute(CREATE_TASKS_UP)
}

/// Drops the task schema.
///
/// # Errors
///
/// Returns the database error raised while executing the migration.
pub fn revert_schema(connection: &mut PgConnection) -> QueryResult<()> {
    connection.batch_execute(CREATE_TASKS_DOWN)
}
