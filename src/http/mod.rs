//! HTTP delivery layer.
//!
//! Requests flow through the JSON guard, sample-payload unwrapping (create
//! only), and validation before reaching the task service. Every failure is
//! rendered by [`ApiError`] as `{success: false, message?, errors?}`.

pub mod dto;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod sanitize;
pub mod state;
pub mod validation;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, TaskService};
