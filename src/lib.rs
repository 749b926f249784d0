//! taskhub: a task management HTTP API.
//!
//! Clients create, list, fetch, update, and delete task records stored in
//! `PostgreSQL` (or an in-memory store for tests and local runs).
//!
//! # Architecture
//!
//! taskhub follows hexagonal architecture principles:
//!
//! - **Domain**: task values and invariants with no infrastructure dependencies
//! - **Ports**: the [`task::ports::TaskRepository`] store contract
//! - **Adapters**: in-memory and `PostgreSQL` store implementations
//! - **Delivery**: the axum router in [`http`]
//!
//! # Modules
//!
//! - [`config`]: environment-driven configuration
//! - [`http`]: routes, validation, and error mapping
//! - [`task`]: task domain, ports, adapters, and services
//! - [`telemetry`]: tracing subscriber installation

pub mod config;
pub mod http;
pub mod task;
pub mod telemetry;
