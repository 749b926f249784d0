//! Shared handler state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::config::StorageConfig;
use crate::task::adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository};
use crate::task::ports::TaskRepository;
use crate::task::services::TaskLifecycleService;

/// Task service bound to a type-erased store.
pub type TaskService = TaskLifecycleService<dyn TaskRepository, DefaultClock>;

/// State cloned into every request handler.
#[derive(Clone)]
pub struct AppState {
    tasks: TaskService,
    clock: Arc<DefaultClock>,
}

impl AppState {
    /// Creates state over an existing store.
    #[must_use]
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        let clock = Arc::new(DefaultClock);
        Self {
            tasks: TaskLifecycleService::new(repository, Arc::clone(&clock)),
            clock,
        }
    }

    /// Creates state over an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTaskRepository::new()))
    }

    /// Creates state for the configured store.
    ///
    /// `PostgreSQL` connections are opened lazily; reachability is reported by
    /// the health route.
    #[must_use]
    pub fn from_storage(storage: &StorageConfig) -> Self {
        match storage {
            StorageConfig::Postgres(database) => Self::new(Arc::new(
                PostgresTaskRepository::connect(&database.url, database.pool_size),
            )),
            StorageConfig::InMemory => Self::in_memory(),
        }
    }

    /// Task lifecycle service.
    #[must_use]
    pub const fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    /// Current time according to the state clock.
    #[must_use]
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.utc()
    }
}
