//! Applies or reverts the task schema.
//!
//! Usage:
//!
//! ```text
//! taskhub-migrate <up|down>
//! ```
//!
//! The database is selected with the same variables as the server
//! (`APP_ENV`, `DATABASE_URL`, and the `DB_*` family). `up` is idempotent;
//! `down` drops the `tasks` table.

use diesel::Connection;
use diesel::pg::PgConnection;
use taskhub::config::{AppEnvironment, ConfigError, DatabaseConfig, LogFormat};
use taskhub::task::adapters::postgres::{apply_schema, revert_schema};
use taskhub::telemetry::{TelemetryError, init_tracing};
use thiserror::Error;
use tracing::info;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum MigrateError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to connect to database: {0}")]
    Connect(#[from] diesel::ConnectionError),
    #[error("migration failed: {0}")]
    Migration(#[from] diesel::result::Error),
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Up,
    Down,
}

impl Operation {
    fn parse(arg: Option<&str>) -> Result<Self, MigrateError> {
        match arg {
            Some("up") => Ok(Self::Up),
            Some("down") => Ok(Self::Down),
            Some(other) => Err(MigrateError::InvalidArgs(format!(
                "unknown operation '{other}'; expected up or down"
            ))),
            None => Err(MigrateError::InvalidArgs(
                "missing operation; expected up or down".to_owned(),
            )),
        }
    }
}

fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();
    let argument = std::env::args().nth(1);
    run(argument.as_deref()).map_err(Into::into)
}

fn run(argument: Option<&str>) -> Result<(), MigrateError> {
    let operation = Operation::parse(argument)?;
    let lookup = |name: &str| std::env::var(name).ok();
    let environment = lookup("APP_ENV")
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.parse::<AppEnvironment>())
        .transpose()?
        .unwrap_or_default();
    let database = DatabaseConfig::from_lookup(environment, &lookup)?;
    init_tracing(LogFormat::default(), database.logging)?;

    info!(%environment, ?operation, "running task schema migration");
    let mut connection = PgConnection::establish(&database.url)?;
    match operation {
        Operation::Up => apply_schema(&mut connection)?,
        Operation::Down => revert_schema(&mut connection)?,
    }
    info!(?operation, "task schema migration complete");
    Ok(())
}
