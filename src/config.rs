// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Service configuration.
//!
//! Every option can be given on the command line or through the environment
//! variable named next to it. All connection, zone and reload settings are
//! required; tunables have defaults.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `DNS_SVCS_URL` | DNS Services API base URL, including the version |
//! | `DNS_SVCS_INSTANCE_ID` | DNS Services instance |
//! | `DNS_SVCS_ZONE_ID` | Zone identifier inside the instance |
//! | `DNS_SVCS_SYNC_INTERNAL` | Seconds between poll cycles |
//! | `BIND9_ZONE_NAME` | Zone name, e.g. `example.com` |
//! | `BIND9_ZONE_PATH` | Zone file to maintain |
//! | `RESTART_CMD` | Command run after each write |
//! | `LISTING_IP` | Address for the apex A/AAAA record |
//! | `SERVICE_AUTH_TYPE` | `iam`, `bearertoken` or `noauth` |
//! | `SERVICE_APIKEY` | API key for `iam` |
//! | `SERVICE_AUTH_URL` | IAM base URL |
//! | `SERVICE_BEARER_TOKEN` | Token for `bearertoken` |
//! | `DEFAULT_TTL` | TTL for records without one |
//! | `FETCH_ATTEMPTS` | Export attempts per cycle |
//! | `FETCH_RETRY_DELAY_SECS` | Pause between export attempts |
//! | `SOA_SERIAL_POLICY` | `zero` or `unix-time` |
//! | `METRICS_BIND_ADDRESS` | Serve `/metrics` here when set |

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_FETCH_ATTEMPTS, DEFAULT_FETCH_RETRY_DELAY_SECS, DEFAULT_IAM_URL,
    DEFAULT_RECORD_TTL_SECS, MAX_TTL_SECS,
};
use crate::reload::CommandReloader;
use crate::source::{AuthType, Authenticator, DnsServicesClient, IamAuthenticator, RetryPolicy};
use crate::sync_errors::SyncError;
use crate::sync_loop::ZoneSync;
use crate::zonefile::{SoaSerialPolicy, ZoneSynthesizer, ZoneWriter};

/// Keeps a BIND9 zone file in sync with a DNS Services zone.
#[derive(Parser, Clone)]
#[command(name = "zonesync", version, about, long_about = None)]
pub struct Config {
    /// DNS Services API base URL (e.g. `https://api.dns-svcs.cloud.ibm.com/v1`)
    #[arg(long = "dns-svcs-url", env = "DNS_SVCS_URL")]
    pub dns_svcs_url: String,

    /// DNS Services instance ID
    #[arg(long = "instance-id", env = "DNS_SVCS_INSTANCE_ID")]
    pub instance_id: String,

    /// DNS Services zone ID
    #[arg(long = "zone-id", env = "DNS_SVCS_ZONE_ID")]
    pub zone_id: String,

    /// Seconds to sleep between poll cycles
    #[arg(long = "sync-interval", env = "DNS_SVCS_SYNC_INTERNAL")]
    pub sync_interval_secs: u64,

    /// Zone name, with or without the trailing dot
    #[arg(long = "zone-name", env = "BIND9_ZONE_NAME")]
    pub zone_name: String,

    /// Zone file to write
    #[arg(long = "zone-path", env = "BIND9_ZONE_PATH")]
    pub zone_path: PathBuf,

    /// Command that makes the DNS server reload the zone
    #[arg(long = "restart-cmd", env = "RESTART_CMD")]
    pub restart_cmd: String,

    /// IP address published for the zone apex
    #[arg(long = "listing-ip", env = "LISTING_IP")]
    pub listing_ip: String,

    /// How requests to DNS Services are authenticated
    #[arg(long = "auth-type", env = "SERVICE_AUTH_TYPE", value_enum, default_value_t = AuthType::Iam)]
    pub auth_type: AuthType,

    /// API key exchanged for IAM tokens
    #[arg(long = "apikey", env = "SERVICE_APIKEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// IAM base URL
    #[arg(long = "auth-url", env = "SERVICE_AUTH_URL", default_value = DEFAULT_IAM_URL)]
    pub auth_url: String,

    /// Static bearer token
    #[arg(long = "bearer-token", env = "SERVICE_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// TTL for records that do not specify one
    #[arg(long = "default-ttl", env = "DEFAULT_TTL", default_value_t = DEFAULT_RECORD_TTL_SECS)]
    pub default_ttl: u32,

    /// Export attempts per cycle before giving up
    #[arg(long = "fetch-attempts", env = "FETCH_ATTEMPTS", default_value_t = DEFAULT_FETCH_ATTEMPTS)]
    pub fetch_attempts: u32,

    /// Seconds between export attempts
    #[arg(
        long = "fetch-retry-delay",
        env = "FETCH_RETRY_DELAY_SECS",
        default_value_t = DEFAULT_FETCH_RETRY_DELAY_SECS
    )]
    pub fetch_retry_delay_secs: u64,

    /// How the SOA serial is chosen
    #[arg(
        long = "soa-serial-policy",
        env = "SOA_SERIAL_POLICY",
        value_enum,
        default_value_t = SoaSerialPolicy::Zero
    )]
    pub soa_serial_policy: SoaSerialPolicy,

    /// Serve Prometheus metrics on this address
    #[arg(long = "metrics-bind-address", env = "METRICS_BIND_ADDRESS")]
    pub metrics_bind_address: Option<SocketAddr>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("dns_svcs_url", &self.dns_svcs_url)
            .field("instance_id", &self.instance_id)
            .field("zone_id", &self.zone_id)
            .field("sync_interval_secs", &self.sync_interval_secs)
            .field("zone_name", &self.zone_name)
            .field("zone_path", &self.zone_path)
            .field("restart_cmd", &self.restart_cmd)
            .field("listing_ip", &self.listing_ip)
            .field("auth_type", &self.auth_type)
            .field("apikey", &redacted(&self.apikey))
            .field("auth_url", &self.auth_url)
            .field("bearer_token", &redacted(&self.bearer_token))
            .field("default_ttl", &self.default_ttl)
            .field("fetch_attempts", &self.fetch_attempts)
            .field("fetch_retry_delay_secs", &self.fetch_retry_delay_secs)
            .field("soa_serial_policy", &self.soa_serial_policy)
            .field("metrics_bind_address", &self.metrics_bind_address)
            .finish()
    }
}

impl Config {
    /// Check everything clap cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidAddressConfig`] for an unparseable listing
    /// IP and [`SyncError::ConfigInvalid`] for any other bad value.
    pub fn validate(&self) -> Result<(), SyncError> {
        for (name, value) in [
            ("DNS_SVCS_URL", &self.dns_svcs_url),
            ("DNS_SVCS_INSTANCE_ID", &self.instance_id),
            ("DNS_SVCS_ZONE_ID", &self.zone_id),
            ("BIND9_ZONE_NAME", &self.zone_name),
            ("RESTART_CMD", &self.restart_cmd),
        ] {
            if value.trim().is_empty() {
                return Err(SyncError::config(format!("{name} must not be empty")));
            }
        }

        if self.zone_path.as_os_str().is_empty() {
            return Err(SyncError::config("BIND9_ZONE_PATH must not be empty"));
        }
        if self.sync_interval_secs == 0 {
            return Err(SyncError::config(
                "DNS_SVCS_SYNC_INTERNAL must be a positive number of seconds",
            ));
        }
        if self.default_ttl == 0 || self.default_ttl > MAX_TTL_SECS {
            return Err(SyncError::config(format!(
                "DEFAULT_TTL must be between 1 and {MAX_TTL_SECS}"
            )));
        }
        if self.fetch_attempts == 0 {
            return Err(SyncError::config("FETCH_ATTEMPTS must be at least 1"));
        }

        self.synthesizer()?;
        self.authenticator()?;
        Ok(())
    }

    #[must_use]
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.fetch_attempts,
            Duration::from_secs(self.fetch_retry_delay_secs),
        )
    }

    /// Authenticator for the configured `SERVICE_AUTH_TYPE`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ConfigInvalid`] if the credential the auth type
    /// needs is missing.
    pub fn authenticator(&self) -> Result<Authenticator, SyncError> {
        match self.auth_type {
            AuthType::NoAuth => Ok(Authenticator::NoAuth),
            AuthType::BearerToken => non_empty(self.bearer_token.as_deref())
                .map(|token| Authenticator::BearerToken(token.to_string()))
                .ok_or_else(|| {
                    SyncError::config("SERVICE_BEARER_TOKEN is required for bearertoken auth")
                }),
            AuthType::Iam => non_empty(self.apikey.as_deref())
                .map(|apikey| Authenticator::Iam(IamAuthenticator::new(apikey, &self.auth_url)))
                .ok_or_else(|| SyncError::config("SERVICE_APIKEY is required for iam auth")),
        }
    }

    /// DNS Services client for the configured instance and zone.
    ///
    /// # Errors
    ///
    /// See [`DnsServicesClient::new`] and [`Config::authenticator`].
    pub fn zone_source(&self) -> Result<DnsServicesClient, SyncError> {
        DnsServicesClient::new(
            &self.dns_svcs_url,
            &self.instance_id,
            &self.zone_id,
            self.authenticator()?,
        )
    }

    /// # Errors
    ///
    /// See [`ZoneSynthesizer::new`].
    pub fn synthesizer(&self) -> Result<ZoneSynthesizer, SyncError> {
        Ok(
            ZoneSynthesizer::new(&self.zone_name, &self.listing_ip, self.default_ttl)?
                .with_serial_policy(self.soa_serial_policy),
        )
    }

    /// # Errors
    ///
    /// See [`CommandReloader::new`].
    pub fn reloader(&self) -> Result<CommandReloader, SyncError> {
        CommandReloader::new(&self.restart_cmd)
    }

    /// Validate and assemble the sync loop.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn zone_sync(&self) -> Result<ZoneSync, SyncError> {
        self.validate()?;
        Ok(ZoneSync::new(
            Box::new(self.zone_source()?),
            Box::new(self.reloader()?),
            self.synthesizer()?,
            ZoneWriter::new(&self.zone_path),
            self.default_ttl,
            self.sync_interval(),
        )
        .with_retry_policy(self.retry_policy()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
