// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Bounded retry for zone exports.
//!
//! Every failure is retried with a fixed delay between attempts.

use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use super::ZoneSource;
use crate::constants::{DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_RETRY_DELAY_SECS};
use crate::metrics;
use crate::sync_errors::SyncError;

/// How many times to try an export and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Sleep between consecutive attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` below 1 is treated as 1.
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_FETCH_ATTEMPTS,
            Duration::from_secs(DEFAULT_FETCH_RETRY_DELAY_SECS),
        )
    }
}

/// Export the zone from `source`, retrying according to `policy`.
///
/// Sleeps only between attempts, never after the last one.
///
/// # Errors
///
/// Returns [`SyncError::SourceUnavailable`] carrying the last attempt's error
/// once every attempt has failed.
pub async fn fetch_with_retry(
    source: &dyn ZoneSource,
    policy: &RetryPolicy,
) -> Result<Vec<u8>, SyncError> {
    let max_attempts = policy.max_attempts.max(1);
    let start_time = Instant::now();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match source.export_zone().await {
            Ok(payload) => {
                metrics::record_fetch_attempt(true);
                if attempt > 1 {
                    debug!(
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        "Zone export succeeded after retries"
                    );
                }
                return Ok(payload);
            }
            Err(e) => {
                metrics::record_fetch_attempt(false);

                if attempt >= max_attempts {
                    error!(
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %e,
                        "Zone export failed, giving up"
                    );
                    return Err(SyncError::SourceUnavailable {
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }

                warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    retry_after = ?policy.delay,
                    error = %e,
                    "Zone export failed, will retry"
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
