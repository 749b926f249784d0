//! Environment-driven configuration.
//!
//! Parsing is a pure function over a variable lookup so that every rule can be
//! exercised without mutating the process environment. Empty values are
//! treated the same as unset ones.
//!
//! | Variable | Default |
//! |---|---|
//! | `APP_ENV` | `development` |
//! | `HOST` / `PORT` | `0.0.0.0` / `3000` |
//! | `STORAGE_MODE` | `postgres` |
//! | `DATABASE_URL` (`DATABASE_URL_TEST` fallback in `test`) | assembled from `DB_*` |
//! | `DB_USER` / `DB_PASSWORD` | `postgres` outside production |
//! | `DB_HOST` / `DB_PORT` | `127.0.0.1` outside production / `5432` |
//! | `DB_NAME` (`DB_NAME_TEST` in `test`) | `task_management` / `task_management_test` |
//! | `DB_POOL_SIZE` | `10` |
//! | `DB_LOGGING` | `false` |
//! | `LOG_FORMAT` | `pretty` |

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_POOL_SIZE: u32 = 10;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable without a default was not set.
    #[error("missing required environment variable {0}")]
    MissingVariable(&'static str),

    /// A numeric variable could not be parsed.
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// A variable held a value outside its allowed set.
    #[error("{name} must be one of {expected}, got '{value}'")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Human-readable list of accepted values.
        expected: &'static str,
    },
}

/// Deployment environment selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    /// Local development with permissive defaults.
    #[default]
    Development,
    /// Automated test runs against the test database.
    Test,
    /// Production: no database defaults.
    Production,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidValue {
                name: "APP_ENV",
                value: value.to_owned(),
                expected: "development, test, production",
            }),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        })
    }
}

/// Output format for log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                name: "LOG_FORMAT",
                value: value.to_owned(),
                expected: "pretty, json",
            }),
        }
    }
}

/// Storage backend selected by `STORAGE_MODE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageMode {
    /// `PostgreSQL` via a Diesel connection pool.
    #[default]
    Postgres,
    /// Process-local in-memory store.
    InMemory,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            _ => Err(ConfigError::InvalidValue {
                name: "STORAGE_MODE",
                value: value.to_owned(),
                expected: "postgres, in_memory",
            }),
        }
    }
}

/// Connection settings for the `PostgreSQL` store.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// Whether store operations are logged at debug level.
    pub logging: bool,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("pool_size", &self.pool_size)
            .field("logging", &self.logging)
            .finish()
    }
}

impl DatabaseConfig {
    /// Reads database settings for `environment` from `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing in
    /// production or a numeric variable is malformed.
    pub fn from_lookup<F>(environment: AppEnvironment, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match explicit_url(environment, lookup) {
            Some(url) => url,
            None => assemble_url(environment, lookup)?,
        };
        let pool_size = match read(lookup, "DB_POOL_SIZE") {
            Some(raw) => parse_number::<u32>("DB_POOL_SIZE", &raw).and_then(|size| {
                if size == 0 {
                    Err(ConfigError::InvalidNumber {
                        name: "DB_POOL_SIZE",
                        value: raw,
                    })
                } else {
                    Ok(size)
                }
            })?,
            None => DEFAULT_POOL_SIZE,
        };
        let logging = environment == AppEnvironment::Development
            && read(lookup, "DB_LOGGING").is_some_and(|value| value.eq_ignore_ascii_case("true"));

        Ok(Self {
            url,
            pool_size,
            logging,
        })
    }
}

/// Store selection plus any backend-specific settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// `PostgreSQL` store.
    Postgres(DatabaseConfig),
    /// In-memory store.
    InMemory,
}

impl StorageConfig {
    /// Returns `true` when store operations should be logged.
    #[must_use]
    pub const fn logs_store_operations(&self) -> bool {
        match self {
            Self::Postgres(database) => database.logging,
            Self::InMemory => false,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Deployment environment.
    pub environment: AppEnvironment,
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Store selection.
    pub storage: StorageConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is missing or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment: AppEnvironment = read_enum(&lookup, "APP_ENV")?;
        let host = read(&lookup, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = read(&lookup, "PORT")
            .map(|raw| parse_number("PORT", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);
        let storage = match read_enum::<StorageMode, _>(&lookup, "STORAGE_MODE")? {
            StorageMode::Postgres => {
                StorageConfig::Postgres(DatabaseConfig::from_lookup(environment, &lookup)?)
            }
            StorageMode::InMemory => StorageConfig::InMemory,
        };
        let log_format: LogFormat = read_enum(&lookup, "LOG_FORMAT")?;

        Ok(Self {
            environment,
            host,
            port,
            storage,
            log_format,
        })
    }
}

fn read<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn read_enum<T, F>(lookup: &F, name: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = ConfigError> + Default,
    F: Fn(&str) -> Option<String>,
{
    read(lookup, name).map_or_else(|| Ok(T::default()), |raw| raw.parse())
}

fn parse_number<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: raw.to_owned(),
    })
}

fn explicit_url<F>(environment: AppEnvironment, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    read(lookup, "DATABASE_URL").or_else(|| match environment {
        AppEnvironment::Test => read(lookup, "DATABASE_URL_TEST"),
        AppEnvironment::Development | AppEnvironment::Production => None,
    })
}

fn assemble_url<F>(environment: AppEnvironment, lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let with_default = |name: &'static str, default: &str| -> Result<String, ConfigError> {
        match (read(lookup, name), environment) {
            (Some(value), _) => Ok(value),
            (None, AppEnvironment::Production) => Err(ConfigError::MissingVariable(name)),
            (None, AppEnvironment::Development | AppEnvironment::Test) => Ok(default.to_owned()),
        }
    };

    let user = with_default("DB_USER", "postgres")?;
    let password = with_default("DB_PASSWORD", "postgres")?;
    let host = with_default("DB_HOST", "127.0.0.1")?;
    let port = read(lookup, "DB_PORT")
        .map(|raw| parse_number::<u16>("DB_PORT", &raw))
        .transpose()?
        .unwrap_or(DEFAULT_DB_PORT);
    let database = match environment {
        AppEnvironment::Test => with_default("DB_NAME_TEST", "task_management_test")?,
        AppEnvironment::Development | AppEnvironment::Production => {
            with_default("DB_NAME", "task_management")?
        }
    };

    connection_url(&user, &password, &host, port, &database)
}

/// Builds a `postgres://` URL with percent-encoded credentials and database.
fn connection_url(
    user: &str,
    password: &str,
    host: &str,
    port: u16,
    database: &str,
) -> Result<String, ConfigError> {
    let invalid_host = || ConfigError::InvalidValue {
        name: "DB_HOST",
        value: host.to_owned(),
        expected: "a hostname or IP address",
    };

    let mut url = Url::parse(&format!("postgres://{host}:{port}/")).map_err(|_| invalid_host())?;
    if url.host_str() != Some(host) || url.port() != Some(port) {
        return Err(invalid_host());
    }
    url.set_username(user).map_err(|()| invalid_host())?;
    url.set_password(Some(password)).map_err(|()| invalid_host())?;
    url.path_segments_mut()
        .map_err(|()| invalid_host())?
        .pop_if_empty()
        .push(database);
    Ok(url.into())
}
