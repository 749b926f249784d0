//! `taskhub` server entry point.
//!
//! Loads `.env`, reads configuration, installs tracing, opens the configured
//! store, and serves the API until Ctrl-C or `SIGTERM`.

use std::process::ExitCode;

use taskhub::config::{AppConfig, LogFormat};
use taskhub::http::{AppState, router};
use taskhub::telemetry::init_tracing;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            // Tracing is configured from the same settings, so fall back to
            // the default subscriber for this one report.
            init_tracing(LogFormat::default(), false).ok();
            error!(error = %err, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    // No subscriber is available to report an installation failure through.
    if init_tracing(config.log_format, config.storage.logs_store_operations()).is_err() {
        return ExitCode::FAILURE;
    }

    info!(
        environment = %config.environment,
        storage = ?config.storage,
        "starting taskhub"
    );

    let state = AppState::from_storage(&config.storage);
    let application = router(state);

    let listener = match TcpListener::bind((config.host.as_str(), config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, host = %config.host, port = config.port, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    match listener.local_addr() {
        Ok(address) => info!(%address, "listening"),
        Err(err) => warn!(error = %err, "could not determine local address"),
    }

    if let Err(err) = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    info!("server shutdown complete");
    ExitCode::SUCCESS
}

/// Completes when Ctrl-C or, on Unix, `SIGTERM` is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
