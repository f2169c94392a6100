// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Request authentication for the DNS Services API.
//!
//! Three modes are supported, selected by `SERVICE_AUTH_TYPE`:
//!
//! - `iam` - exchange an API key for a bearer token at the IAM token endpoint,
//!   cache it, and refresh it shortly before it expires
//! - `bearertoken` - send a fixed, externally managed bearer token
//! - `noauth` - send no `Authorization` header (local mocks, proxies)

use chrono::Utc;
use clap::ValueEnum;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::FetchError;
use crate::constants::{IAM_APIKEY_GRANT_TYPE, IAM_TOKEN_PATH, IAM_TOKEN_REFRESH_MARGIN_SECS};

/// Authentication mode for the zone source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AuthType {
    /// API key exchanged for IAM bearer tokens
    #[default]
    Iam,
    /// Static bearer token
    #[value(name = "bearertoken")]
    BearerToken,
    /// No authentication
    #[value(name = "noauth")]
    NoAuth,
}

/// Produces the bearer token (if any) for each request.
#[derive(Debug)]
pub enum Authenticator {
    /// No `Authorization` header
    NoAuth,
    /// Fixed bearer token
    BearerToken(String),
    /// IAM API key exchange
    Iam(IamAuthenticator),
}

impl Authenticator {
    /// Token to send with the next request, or `None` when auth is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Authentication`] if an IAM token cannot be obtained.
    pub async fn token(&self, client: &HttpClient) -> Result<Option<String>, FetchError> {
        match self {
            Self::NoAuth => Ok(None),
            Self::BearerToken(token) => Ok(Some(token.clone())),
            Self::Iam(iam) => iam.token(client).await.map(Some),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    /// Unix time (seconds) when the token expires
    expiration: i64,
}

/// IAM token endpoint response; only the fields we use.
#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    expiration: i64,
}

/// Exchanges an API key for IAM access tokens and caches them.
#[derive(Debug)]
pub struct IamAuthenticator {
    apikey: String,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl IamAuthenticator {
    /// Create an authenticator for `apikey` against the IAM service at `iam_url`.
    #[must_use]
    pub fn new(apikey: impl Into<String>, iam_url: &str) -> Self {
        Self {
            apikey: apikey.into(),
            token_url: token_url(iam_url),
            cached: Mutex::new(None),
        }
    }

    /// Full URL of the token endpoint.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Return the cached token, or request a new one if it is about to expire.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Authentication`] if the token request fails.
    pub async fn token(&self, client: &HttpClient) -> Result<String, FetchError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Utc::now().timestamp() < token.expiration - IAM_TOKEN_REFRESH_MARGIN_SECS {
                return Ok(token.access_token.clone());
            }
            debug!(url = %self.token_url, "IAM access token expires soon, refreshing");
        }

        let fresh = self.request_token(client).await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn request_token(&self, client: &HttpClient) -> Result<CachedToken, FetchError> {
        let fail = |reason: String| FetchError::Authentication {
            url: self.token_url.clone(),
            reason,
        };

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", IAM_APIKEY_GRANT_TYPE)
            .append_pair("apikey", &self.apikey)
            .finish();

        let response = client
            .post(&self.token_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(fail(format!("HTTP {status}: {text}")));
        }

        let token: IamTokenResponse = response
            .json()
            .await
            .map_err(|e| fail(format!("invalid token response: {e}")))?;

        info!(
            url = %self.token_url,
            expiration = token.expiration,
            "Obtained IAM access token"
        );

        Ok(CachedToken {
            access_token: token.access_token,
            expiration: token.expiration,
        })
    }
}

fn token_url(iam_url: &str) -> String {
    format!("{}/{IAM_TOKEN_PATH}", iam_url.trim_end_matches('/'))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod auth_tests;
