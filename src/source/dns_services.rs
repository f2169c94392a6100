// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS Services zone export client.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client as HttpClient, StatusCode};
use tracing::{debug, error};
use url::Url;

use super::{Authenticator, FetchError, ZoneSource};
use crate::sync_errors::SyncError;

/// Exports one zone of one DNS Services instance.
#[derive(Debug)]
pub struct DnsServicesClient {
    http: HttpClient,
    export_url: Url,
    auth: Authenticator,
}

impl DnsServicesClient {
    /// Create a client for `zone_id` in `instance_id` under the API base URL
    /// `base_url` (for example `https://api.dns-svcs.cloud.ibm.com/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ConfigInvalid`] if `base_url` is not an absolute
    /// URL that can carry a path, or if either identifier is empty.
    pub fn new(
        base_url: &str,
        instance_id: &str,
        zone_id: &str,
        auth: Authenticator,
    ) -> Result<Self, SyncError> {
        let export_url = build_export_url(base_url, instance_id, zone_id)?;
        Ok(Self {
            http: HttpClient::new(),
            export_url,
            auth,
        })
    }

    /// Replace the HTTP client (custom timeouts, proxies).
    #[must_use]
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// Full URL of the export endpoint.
    #[must_use]
    pub fn export_url(&self) -> &Url {
        &self.export_url
    }
}

#[async_trait]
impl ZoneSource for DnsServicesClient {
    async fn export_zone(&self) -> Result<Vec<u8>, FetchError> {
        let url = self.export_url.as_str();
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let mut request = self.http.get(self.export_url.clone()).header(ACCEPT, "text/plain");
        if let Some(token) = self.auth.token(&self.http).await? {
            request = request.bearer_auth(token);
        }

        debug!(url = %url, "Exporting zone resource records");
        let response = request.send().await.map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                url = %url,
                status = %status,
                body = %body,
                "Zone export request failed"
            );
            return Err(FetchError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        debug!(url = %url, bytes = bytes.len(), "Zone export received");
        Ok(bytes.to_vec())
    }
}

/// `{base}/instances/{instance}/dnszones/{zone}/export_resource_records`
///
/// Identifiers are appended as path segments, so any reserved characters in
/// them are percent-encoded rather than altering the path.
pub(crate) fn build_export_url(
    base_url: &str,
    instance_id: &str,
    zone_id: &str,
) -> Result<Url, SyncError> {
    if instance_id.is_empty() {
        return Err(SyncError::config("DNS Services instance ID must not be empty"));
    }
    if zone_id.is_empty() {
        return Err(SyncError::config("DNS Services zone ID must not be empty"));
    }

    let mut url = Url::parse(base_url)
        .map_err(|e| SyncError::config(format!("invalid DNS Services URL '{base_url}': {e}")))?;

    url.path_segments_mut()
        .map_err(|()| SyncError::config(format!("DNS Services URL '{base_url}' cannot be a base")))?
        .pop_if_empty()
        .extend([
            "instances",
            instance_id,
            "dnszones",
            zone_id,
            "export_resource_records",
        ]);

    Ok(url)
}

#[cfg(test)]
#[path = "dns_services_tests.rs"]
mod dns_services_tests;
