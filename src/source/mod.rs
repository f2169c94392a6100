// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Remote zone sources.
//!
//! The sync loop only needs one operation from the outside world: "give me
//! the current zone as a master file". [`ZoneSource`] is that seam; the
//! production implementation is [`DnsServicesClient`], which calls the DNS
//! Services `export_resource_records` API.
//!
//! Fetches are wrapped by [`retry::fetch_with_retry`], which makes a bounded
//! number of attempts before giving up with
//! [`SyncError::SourceUnavailable`](crate::sync_errors::SyncError::SourceUnavailable).

pub mod auth;
pub mod dns_services;
pub mod retry;

pub use auth::{AuthType, Authenticator, IamAuthenticator};
pub use dns_services::DnsServicesClient;
pub use retry::{fetch_with_retry, RetryPolicy};

use async_trait::async_trait;
use thiserror::Error;

/// A single failed export attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("HTTP request to {url} failed: {reason}")]
    Transport {
        /// Request URL
        url: String,
        /// Underlying client error
        reason: String,
    },

    /// The API answered with something other than 200 OK.
    #[error("Unexpected HTTP response from {url}: {status} {body}")]
    UnexpectedStatus {
        /// Request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, for diagnosis
        body: String,
    },

    /// No access token could be obtained for the request.
    #[error("Failed to obtain access token from {url}: {reason}")]
    Authentication {
        /// Token endpoint URL
        url: String,
        /// Why the token exchange failed
        reason: String,
    },
}

/// Something that can export the current zone as master file bytes.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Export the zone once, without retrying.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] for transport failures, non-200 responses and
    /// authentication failures.
    async fn export_zone(&self) -> Result<Vec<u8>, FetchError>;
}
