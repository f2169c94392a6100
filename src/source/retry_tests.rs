// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `retry.rs`

#[cfg(test)]
mod tests {
    use super::super::{fetch_with_retry, RetryPolicy};
    use crate::source::{FetchError, ZoneSource};
    use crate::sync_errors::SyncError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Fails the first `failures` calls, then returns `payload`.
    struct FlakySource {
        failures: u32,
        calls: AtomicU32,
        payload: Vec<u8>,
    }

    impl FlakySource {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                payload: b"www 300 IN A 10.0.0.10\n".to_vec(),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ZoneSource for FlakySource {
        async fn export_zone(&self) -> Result<Vec<u8>, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                return Err(FetchError::UnexpectedStatus {
                    url: "http://dns.test/export".to_string(),
                    status: 503,
                    body: format!("attempt {call}"),
                });
            }
            Ok(self.payload.clone())
        }
    }

    fn no_delay(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::ZERO)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.delay, Duration::from_secs(10));
    }

    #[test]
    fn test_policy_makes_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let source = FlakySource::new(0);
        let payload = fetch_with_retry(&source, &no_delay(4)).await.unwrap();

        assert_eq!(payload, source.payload);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_success_after_transient_failures() {
        let source = FlakySource::new(3);
        let payload = fetch_with_retry(&source, &no_delay(4)).await.unwrap();

        assert_eq!(payload, source.payload);
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_report_last_error() {
        let source = FlakySource::new(u32::MAX);
        let err = fetch_with_retry(&source, &no_delay(4)).await.unwrap_err();

        assert_eq!(source.calls(), 4);
        match err {
            SyncError::SourceUnavailable { attempts, reason } => {
                assert_eq!(attempts, 4);
                assert!(reason.contains("attempt 4"), "got: {reason}");
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_only_between_attempts() {
        let source = FlakySource::new(u32::MAX);
        let policy = RetryPolicy::new(3, Duration::from_secs(10));

        let start = tokio::time::Instant::now();
        let _ = fetch_with_retry(&source, &policy).await;

        assert_eq!(source.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }
}
