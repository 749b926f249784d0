//! Embedded `PostgreSQL` fixtures for task store tests.

use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::fixture;
use taskhub::task::adapters::postgres::{PostgresTaskRepository, apply_schema};
use tokio::runtime::{Builder, Runtime};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Database holding the migrated schema that test databases are cloned from.
const TEMPLATE_DB: &str = "taskhub_test_template";

/// Creates a current-thread runtime for driving the async repository.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut connection =
                PgConnection::establish(&url).map_err(|err| eyre::eyre!("{err}"))?;
            apply_schema(&mut connection).map_err(|err| eyre::eyre!("{err}"))?;
            Ok(())
        })
        .map_err(|err| Box::new(err) as BoxError)
}

/// A database cloned from the template, dropped with the value.
pub struct TemporaryDatabase {
    cluster: &'static TestCluster,
    name: String,
}

impl TemporaryDatabase {
    fn create(cluster: &'static TestCluster) -> Result<Self, BoxError> {
        ensure_template(cluster)?;
        let name = format!("taskhub_test_{}", uuid::Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|err| Box::new(err) as BoxError)?;
        Ok(Self { cluster, name })
    }

    /// Connection URL for this database.
    pub fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }

    /// Opens a dedicated connection, outside the repository pool.
    pub fn connect(&self) -> Result<PgConnection, BoxError> {
        PgConnection::establish(&self.url()).map_err(|err| Box::new(err) as BoxError)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("failed to drop test database {}: {err}", self.name);
        }
    }
}

/// Repository over a fresh database plus the runtime that drives it.
///
/// Fields drop in order, so pooled connections close before the database is
/// dropped.
pub struct TaskStore {
    pub repository: PostgresTaskRepository,
    pub runtime: Runtime,
    pub database: TemporaryDatabase,
}

impl TaskStore {
    /// Runs a repository future to completion.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Provides a repository over an empty, migrated database.
#[fixture]
pub fn task_store(shared_test_cluster: &'static TestCluster) -> TaskStore {
    let database = TemporaryDatabase::create(shared_test_cluster).expect("test database");
    TaskStore {
        repository: PostgresTaskRepository::connect(&database.url(), 1),
        runtime: test_runtime().expect("tokio runtime"),
        database,
    }
}
