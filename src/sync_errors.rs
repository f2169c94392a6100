// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the zone synchronization cycle.
//!
//! Every failure the sync loop can hit is one of the [`SyncError`] kinds below.
//! None of them are recoverable inside the process: the loop logs the error and
//! the binary exits with the code returned by [`SyncError::exit_code`], leaving
//! the restart to the process supervisor.

use std::path::Path;
use thiserror::Error;

use crate::constants::{
    EXIT_CONFIG_INVALID, EXIT_INVALID_ADDRESS, EXIT_MALFORMED_ZONE, EXIT_RELOAD_FAILURE,
    EXIT_SOURCE_UNAVAILABLE, EXIT_WRITE_FAILURE,
};

/// Fatal errors raised while configuring or running the sync loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The zone source failed on every attempt of the fetch window.
    #[error("Zone source unavailable after {attempts} attempts: {reason}")]
    SourceUnavailable {
        /// Number of attempts that were made
        attempts: u32,
        /// Error reported by the last attempt
        reason: String,
    },

    /// The exported payload is not a well-formed zone file.
    ///
    /// Nothing is written for the cycle that produced this error.
    #[error("Malformed zone payload for '{zone}': {reason}")]
    MalformedZonePayload {
        /// Zone that was being parsed
        zone: String,
        /// Parser error, including the offending line
        reason: String,
    },

    /// The configured listing IP is neither an IPv4 nor an IPv6 address.
    #[error("Invalid listing IP address '{address}'")]
    InvalidAddressConfig {
        /// The value that failed to parse
        address: String,
    },

    /// The zone file could not be created, written or moved into place.
    #[error("Failed to write zone file {path}: {reason}")]
    WriteFailure {
        /// Target zone file path
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// The reload command could not be spawned or exited non-zero.
    #[error("Reload command '{command}' failed: {reason}")]
    ReloadFailure {
        /// Command line that was executed
        command: String,
        /// Spawn error or exit status with captured output
        reason: String,
    },

    /// A required setting is missing or unparseable.
    #[error("Invalid configuration: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration
        reason: String,
    },
}

impl SyncError {
    /// Build a [`SyncError::WriteFailure`] for `path`.
    pub fn write_failure(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::WriteFailure {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    /// Build a [`SyncError::ConfigInvalid`].
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            reason: reason.into(),
        }
    }

    /// Stable name of the error kind, used as a log field and metrics label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "SourceUnavailable",
            Self::MalformedZonePayload { .. } => "MalformedZonePayload",
            Self::InvalidAddressConfig { .. } => "InvalidAddressConfig",
            Self::WriteFailure { .. } => "WriteFailure",
            Self::ReloadFailure { .. } => "ReloadFailure",
            Self::ConfigInvalid { .. } => "ConfigInvalid",
        }
    }

    /// Process exit code for this error kind.
    ///
    /// | Kind | Code |
    /// |------|------|
    /// | `ConfigInvalid` | 2 |
    /// | `InvalidAddressConfig` | 3 |
    /// | `SourceUnavailable` | 4 |
    /// | `MalformedZonePayload` | 5 |
    /// | `WriteFailure` | 6 |
    /// | `ReloadFailure` | 7 |
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigInvalid { .. } => EXIT_CONFIG_INVALID,
            Self::InvalidAddressConfig { .. } => EXIT_INVALID_ADDRESS,
            Self::SourceUnavailable { .. } => EXIT_SOURCE_UNAVAILABLE,
            Self::MalformedZonePayload { .. } => EXIT_MALFORMED_ZONE,
            Self::WriteFailure { .. } => EXIT_WRITE_FAILURE,
            Self::ReloadFailure { .. } => EXIT_RELOAD_FAILURE,
        }
    }
}
