//! Persistence adapters for the task module.
//!
//! - [`memory::InMemoryTaskRepository`]: thread-safe in-memory storage for
//!   tests and local runs
//! - [`postgres::PostgresTaskRepository`]: `PostgreSQL` persistence using
//!   Diesel over an r2d2 connection pool

pub mod memory;
pub mod postgres;
