// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The poll loop: fetch, detect change, parse, write, reload, sleep.
//!
//! One cycle runs to completion before the next starts. Every error is
//! returned to the caller, which is expected to log it and exit; there is no
//! retry beyond the fetch window of [`RetryPolicy`].

use std::convert::Infallible;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::metrics;
use crate::reload::Reloader;
use crate::source::{fetch_with_retry, RetryPolicy, ZoneSource};
use crate::sync_errors::SyncError;
use crate::zonefile::{parse_zone, ChangeDetector, Fingerprint, ZoneSynthesizer, ZoneWriter};

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Payload matched the last written one; nothing was written or reloaded.
    Unchanged {
        /// Fingerprint of the fetched payload
        fingerprint: Fingerprint,
    },
    /// A new zone file was written and the server reloaded.
    Updated {
        /// Fingerprint of the fetched payload
        fingerprint: Fingerprint,
        /// Records in the new zone file
        records_written: usize,
    },
}

impl CycleOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Unchanged { .. } => "unchanged",
            Self::Updated { .. } => "updated",
        }
    }
}

/// Keeps a local zone file in sync with a remote zone.
pub struct ZoneSync {
    zone_name: String,
    source: Box<dyn ZoneSource>,
    reloader: Box<dyn Reloader>,
    synthesizer: ZoneSynthesizer,
    writer: ZoneWriter,
    retry: RetryPolicy,
    default_ttl: u32,
    interval: Duration,
    detector: ChangeDetector,
}

impl ZoneSync {
    /// Create a sync loop for the zone the synthesizer was built for.
    ///
    /// Uses the default retry policy and `default_ttl` for records in the
    /// payload that carry no TTL of their own.
    pub fn new(
        source: Box<dyn ZoneSource>,
        reloader: Box<dyn Reloader>,
        synthesizer: ZoneSynthesizer,
        writer: ZoneWriter,
        default_ttl: u32,
        interval: Duration,
    ) -> Self {
        Self {
            zone_name: synthesizer.apex(),
            source,
            reloader,
            synthesizer,
            writer,
            retry: RetryPolicy::default(),
            default_ttl,
            interval,
            detector: ChangeDetector::new(),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fully qualified zone name.
    #[must_use]
    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    /// Fingerprint of the last payload that was written, if any.
    #[must_use]
    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        self.detector.last()
    }

    /// Run one cycle.
    ///
    /// The zone file is written, and the reload triggered, only when the
    /// payload differs from the last one seen.
    ///
    /// # Errors
    ///
    /// - [`SyncError::SourceUnavailable`] if every fetch attempt failed
    /// - [`SyncError::MalformedZonePayload`] if the payload does not parse
    /// - [`SyncError::WriteFailure`] if the zone file cannot be replaced
    /// - [`SyncError::ReloadFailure`] if the reload command fails
    ///
    /// In every error case nothing after the failing step runs.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, SyncError> {
        let start = Instant::now();
        let result = self.sync_once().await;

        match &result {
            Ok(outcome) => {
                metrics::record_cycle(outcome.label(), start.elapsed());
                metrics::record_sync_completed(&self.zone_name);
            }
            Err(e) => {
                metrics::record_cycle("error", start.elapsed());
                metrics::record_error(e.kind());
            }
        }
        result
    }

    async fn sync_once(&mut self) -> Result<CycleOutcome, SyncError> {
        let payload = fetch_with_retry(self.source.as_ref(), &self.retry).await?;
        debug!(
            zone = %self.zone_name,
            bytes = payload.len(),
            payload = %String::from_utf8_lossy(&payload),
            "Fetched zone payload"
        );

        let fingerprint = Fingerprint::of(&payload);
        if !self.detector.has_changed(fingerprint) {
            debug!(
                zone = %self.zone_name,
                fingerprint = %fingerprint,
                "Zone unchanged, skipping write"
            );
            return Ok(CycleOutcome::Unchanged { fingerprint });
        }

        info!(
            zone = %self.zone_name,
            fingerprint = %fingerprint,
            "Zone changed, regenerating zone file"
        );

        let parsed = parse_zone(&payload, &self.zone_name, self.default_ttl).map_err(|e| {
            SyncError::MalformedZonePayload {
                zone: self.zone_name.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut records = self.synthesizer.synthesize();
        records.extend(parsed);

        let records_written = self.writer.write(&records)?;
        metrics::record_zone_written(&self.zone_name, records_written, fingerprint.value());

        let reloaded = self.reloader.reload().await;
        metrics::record_reload(reloaded.is_ok());
        reloaded?;

        info!(
            zone = %self.zone_name,
            path = %self.writer.path().display(),
            records = records_written,
            "Zone synchronized"
        );

        Ok(CycleOutcome::Updated {
            fingerprint,
            records_written,
        })
    }

    /// Run cycles forever, sleeping the configured interval between them.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`run_cycle`](Self::run_cycle).
    pub async fn run(&mut self) -> Result<Infallible, SyncError> {
        info!(
            zone = %self.zone_name,
            path = %self.writer.path().display(),
            interval_secs = self.interval.as_secs(),
            "Starting zone sync loop"
        );

        loop {
            self.run_cycle().await?;
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
#[path = "sync_loop_tests.rs"]
mod sync_loop_tests;
