// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use clap::error::ErrorKind;
use clap::Parser;
use std::fs::{File, OpenOptions};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};
use zonesync::{
    config::Config, constants::EXIT_RUNTIME_FAILURE, metrics::serve_metrics,
    sync_errors::SyncError,
};

/// Filter used when neither `RUST_LOG` nor `LOG_LEVEL` is set
const DEFAULT_LOG_FILTER: &str = "info";

fn main() -> ExitCode {
    let log_file_error = initialize_logging();

    info!("Starting zonesync");
    debug!("Logging initialized with file and line number tracking");
    if let Some((path, e)) = log_file_error {
        warn!(path = %path, error = %e, "Cannot open log file, logging to stdout only");
    }

    // One cycle at a time; the only other task is the optional metrics endpoint.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .thread_name("zonesync")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to build Tokio runtime");
            return ExitCode::from(EXIT_RUNTIME_FAILURE);
        }
    };

    runtime.block_on(async_main())
}

async fn async_main() -> ExitCode {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => return fatal(&config_error(&e)),
    };

    info!(
        zone = %config.zone_name,
        path = %config.zone_path.display(),
        interval_secs = config.sync_interval_secs,
        auth_type = ?config.auth_type,
        "Configuration loaded"
    );
    debug!(config = ?config, "Full configuration");

    let mut sync = match config.zone_sync() {
        Ok(sync) => sync,
        Err(e) => return fatal(&e),
    };

    if let Some(addr) = config.metrics_bind_address {
        tokio::spawn(async move {
            if let Err(e) = serve_metrics(addr).await {
                error!(address = %addr, error = %e, "Metrics server stopped");
            }
        });
    }

    match sync.run().await {
        Ok(never) => match never {},
        Err(e) => fatal(&e),
    }
}

/// A command line that clap rejects is a fatal config error, logged like
/// any other.
fn config_error(err: &clap::Error) -> SyncError {
    SyncError::config(err.to_string().trim_end())
}

fn fatal(err: &SyncError) -> ExitCode {
    error!(kind = err.kind(), error = %err, "Zone sync failed, exiting");
    ExitCode::from(err.exit_code())
}

/// Set up the global subscriber.
///
/// Output goes to stdout as compact text, or JSON when `RUST_LOG_FORMAT=json`.
/// When `LOG_FILE` is set, JSON lines are also appended to that file. A log
/// file that cannot be opened is returned so it can be reported once logging
/// works.
fn initialize_logging() -> Option<(String, std::io::Error)> {
    let env_filter = EnvFilter::try_new(filter_directive(
        std::env::var("RUST_LOG").ok(),
        std::env::var("LOG_LEVEL").ok(),
    ))
    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    match log_format.to_lowercase().as_str() {
        "json" => layers.push(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .boxed(),
        ),
        _ => layers.push(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .boxed(),
        ),
    }

    let mut log_file_error = None;
    if let Ok(path) = std::env::var("LOG_FILE") {
        match open_log_file(&path) {
            Ok(file) => layers.push(
                tracing_subscriber::fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_ansi(false)
                    .json()
                    .with_writer(Mutex::new(file))
                    .boxed(),
            ),
            Err(e) => log_file_error = Some((path, e)),
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    log_file_error
}

fn open_log_file(path: &str) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// `RUST_LOG` wins, then `LOG_LEVEL`, then [`DEFAULT_LOG_FILTER`].
fn filter_directive(rust_log: Option<String>, log_level: Option<String>) -> String {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            log_level
                .map(|level| level.trim().to_lowercase())
                .filter(|level| !level.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}
