//! Task management for taskhub.
//!
//! A task is the single record the API manages: a title, an optional
//! description, a status, and creation and update timestamps. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
