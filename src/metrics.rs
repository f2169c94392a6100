// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the zone sync loop.
//!
//! All metrics use the namespace prefix `zonesync_` and live in
//! [`METRICS_REGISTRY`]. They are exposed over HTTP only when a metrics bind
//! address is configured (see [`serve_metrics`]).
//!
//! # Metrics Categories
//!
//! - **Cycle Metrics** - Outcome and duration of each poll cycle
//! - **Source Metrics** - Individual export attempts
//! - **Zone Metrics** - Zone file writes, reloads and the current zone state
//! - **Error Metrics** - Fatal errors by kind
//!
//! # Example
//!
//! ```rust,no_run
//! use zonesync::metrics::{gather_metrics, record_cycle};
//!
//! record_cycle("unchanged", std::time::Duration::from_millis(120));
//! let text = gather_metrics().unwrap();
//! ```

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{error, info};

use crate::constants::METRICS_SERVER_PATH;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all zonesync metrics
const METRICS_NAMESPACE: &str = "zonesync";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Cycle Metrics
// ============================================================================

/// Total number of poll cycles by outcome
///
/// Labels:
/// - `outcome`: `unchanged`, `updated` or `error`
pub static SYNC_CYCLES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_sync_cycles_total"),
        "Total number of poll cycles by outcome",
    );
    let counter = CounterVec::new(opts, &["outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of poll cycles in seconds, excluding the sleep between them
pub static SYNC_CYCLE_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_sync_cycle_duration_seconds"),
        "Duration of poll cycles in seconds by outcome",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Source Metrics
// ============================================================================

/// Total number of zone export attempts
///
/// Labels:
/// - `result`: `success` or `error`
pub static FETCH_ATTEMPTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_fetch_attempts_total"),
        "Total number of zone export attempts by result",
    );
    let counter = CounterVec::new(opts, &["result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Zone Metrics
// ============================================================================

/// Total number of zone file writes
///
/// Labels:
/// - `zone`: Zone name
pub static ZONE_WRITES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zone_writes_total"),
        "Total number of zone file writes by zone",
    );
    let counter = CounterVec::new(opts, &["zone"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total number of reload commands run
///
/// Labels:
/// - `result`: `success` or `error`
pub static RELOADS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reloads_total"),
        "Total number of reload commands by result",
    );
    let counter = CounterVec::new(opts, &["result"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Records in the last written zone file
pub static ZONE_RECORDS: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zone_records"),
        "Number of records in the last written zone file",
    );
    let gauge = GaugeVec::new(opts, &["zone"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

/// Fingerprint of the last payload that was written
pub static ZONE_FINGERPRINT: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_zone_fingerprint"),
        "FNV-1a fingerprint of the last written zone payload",
    );
    let gauge = GaugeVec::new(opts, &["zone"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

/// Unix time of the last completed poll cycle
pub static LAST_SYNC_TIMESTAMP_SECONDS: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_last_sync_timestamp_seconds"),
        "Unix time of the last completed poll cycle by zone",
    );
    let gauge = GaugeVec::new(opts, &["zone"]).unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of sync errors by kind
///
/// Labels:
/// - `kind`: Error kind (e.g., `SourceUnavailable`, `WriteFailure`)
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of sync errors by kind",
    );
    let counter = CounterVec::new(opts, &["kind"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a finished poll cycle
///
/// # Arguments
/// * `outcome` - `unchanged`, `updated` or `error`
/// * `duration` - Time spent in the cycle
pub fn record_cycle(outcome: &str, duration: Duration) {
    SYNC_CYCLES_TOTAL.with_label_values(&[outcome]).inc();
    SYNC_CYCLE_DURATION_SECONDS
        .with_label_values(&[outcome])
        .observe(duration.as_secs_f64());
}

/// Record one export attempt
pub fn record_fetch_attempt(success: bool) {
    FETCH_ATTEMPTS_TOTAL
        .with_label_values(&[result_label(success)])
        .inc();
}

/// Record a zone file write
///
/// # Arguments
/// * `zone` - Zone name
/// * `records` - Records written to the file
/// * `fingerprint` - Fingerprint of the payload that was written
pub fn record_zone_written(zone: &str, records: usize, fingerprint: u32) {
    ZONE_WRITES_TOTAL.with_label_values(&[zone]).inc();
    #[allow(clippy::cast_precision_loss)]
    ZONE_RECORDS.with_label_values(&[zone]).set(records as f64);
    ZONE_FINGERPRINT
        .with_label_values(&[zone])
        .set(f64::from(fingerprint));
}

/// Record a reload command result
pub fn record_reload(success: bool) {
    RELOADS_TOTAL
        .with_label_values(&[result_label(success)])
        .inc();
}

/// Record the completion time of a poll cycle for `zone`
pub fn record_sync_completed(zone: &str) {
    #[allow(clippy::cast_precision_loss)]
    LAST_SYNC_TIMESTAMP_SECONDS
        .with_label_values(&[zone])
        .set(chrono::Utc::now().timestamp() as f64);
}

/// Record a sync error
///
/// # Arguments
/// * `kind` - Error kind, see [`SyncError::kind`](crate::sync_errors::SyncError::kind)
pub fn record_error(kind: &str) {
    ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

fn result_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

// ============================================================================
// HTTP Endpoint
// ============================================================================

/// Router serving [`gather_metrics`] at `/metrics`.
pub fn metrics_router() -> Router {
    Router::new().route(METRICS_SERVER_PATH, get(metrics_handler))
}

async fn metrics_handler() -> impl IntoResponse {
    match gather_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                e.to_string(),
            )
        }
    }
}

/// Serve metrics on `addr` until the process exits.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, path = METRICS_SERVER_PATH, "Serving metrics");
    axum::serve(listener, metrics_router()).await?;
    Ok(())
}
