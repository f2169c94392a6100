// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for sync error types.

#[cfg(test)]
mod tests {
    use crate::sync_errors::SyncError;
    use std::collections::HashSet;
    use std::path::Path;

    fn all_kinds() -> Vec<SyncError> {
        vec![
            SyncError::SourceUnavailable {
                attempts: 4,
                reason: "HTTP 503".to_string(),
            },
            SyncError::MalformedZonePayload {
                zone: "example.com".to_string(),
                reason: "line 3: unterminated record".to_string(),
            },
            SyncError::InvalidAddressConfig {
                address: "10.0.0".to_string(),
            },
            SyncError::write_failure(Path::new("/etc/bind/db.example"), "permission denied"),
            SyncError::ReloadFailure {
                command: "rndc reload".to_string(),
                reason: "exit status: 1".to_string(),
            },
            SyncError::config("BIND9_ZONE_NAME is empty"),
        ]
    }

    #[test]
    fn test_source_unavailable_message() {
        let error = SyncError::SourceUnavailable {
            attempts: 4,
            reason: "HTTP 503".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Zone source unavailable after 4 attempts: HTTP 503"
        );
    }

    #[test]
    fn test_malformed_zone_payload_message() {
        let error = SyncError::MalformedZonePayload {
            zone: "example.com".to_string(),
            reason: "line 3: unterminated record".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Malformed zone payload for 'example.com': line 3: unterminated record"
        );
    }

    #[test]
    fn test_write_failure_message_includes_path() {
        let error = SyncError::write_failure(Path::new("/etc/bind/db.example"), "disk full");

        assert_eq!(
            error.to_string(),
            "Failed to write zone file /etc/bind/db.example: disk full"
        );
    }

    #[test]
    fn test_reload_failure_message() {
        let error = SyncError::ReloadFailure {
            command: "rndc reload".to_string(),
            reason: "exit status: 1".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Reload command 'rndc reload' failed: exit status: 1"
        );
    }

    #[test]
    fn test_config_helper() {
        let error = SyncError::config("missing zone name");
        assert_eq!(error.to_string(), "Invalid configuration: missing zone name");
        assert_eq!(error.kind(), "ConfigInvalid");
    }

    #[test]
    fn test_exit_codes_are_distinct_and_non_zero() {
        let codes: Vec<u8> = all_kinds().iter().map(SyncError::exit_code).collect();

        assert!(codes.iter().all(|code| *code != 0));
        let unique: HashSet<u8> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len(), "exit codes must be distinct");
    }

    #[test]
    fn test_kind_names() {
        let kinds: Vec<&str> = all_kinds().iter().map(SyncError::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "SourceUnavailable",
                "MalformedZonePayload",
                "InvalidAddressConfig",
                "WriteFailure",
                "ReloadFailure",
                "ConfigInvalid",
            ]
        );
    }
}
