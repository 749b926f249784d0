//! Tracing subscriber installation.

use crate::config::LogFormat;
use thiserror::Error;
use tracing_subscriber::filter::{Directive, EnvFilter, ParseError};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "taskhub=info,tower_http=info";

const STORE_DEBUG_DIRECTIVE: &str = "taskhub::task::adapters::postgres=debug";

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),
}

/// Builds the event filter from an optional `RUST_LOG` value.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the store debug directive cannot
/// be parsed.
pub fn build_filter(
    rust_log: Option<&str>,
    store_logging: bool,
) -> Result<EnvFilter, TelemetryError> {
    let base = rust_log
        .and_then(|value| EnvFilter::try_new(value).ok())
        .map_or_else(|| EnvFilter::try_new(DEFAULT_FILTER), Ok)?;

    if store_logging {
        let directive: Directive = STORE_DEBUG_DIRECTIVE.parse()?;
        Ok(base.add_directive(directive))
    } else {
        Ok(base)
    }
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(format: LogFormat, store_logging: bool) -> Result<(), TelemetryError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(rust_log.as_deref(), store_logging)?;

    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(fmt::layer().with_target(true)), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_current_span(true))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()?;
    Ok(())
}
