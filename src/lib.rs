// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # zonesync - DNS Services to BIND9 zone synchronizer
//!
//! zonesync periodically exports a zone from IBM Cloud DNS Services and keeps a
//! local BIND9 zone file in step with it, reloading the server only when the
//! zone actually changed.
//!
//! ## Overview
//!
//! Each poll cycle:
//!
//! 1. Exports the zone as a master file, retrying a bounded number of times
//! 2. Fingerprints the raw payload and stops if it matches the last write
//! 3. Parses the payload into resource records
//! 4. Prepends a synthesized SOA, apex A/AAAA and NS record
//! 5. Atomically replaces the zone file, leaving out PTR records
//! 6. Runs the reload command
//!
//! Any failure ends the process with an exit code specific to the error kind;
//! restarting is left to the supervisor.
//!
//! ## Modules
//!
//! - [`config`] - Command line and environment configuration
//! - [`source`] - DNS Services client, authentication and fetch retry
//! - [`zonefile`] - Parsing, synthesis, fingerprinting and writing
//! - [`reload`] - Reload command execution
//! - [`sync_loop`] - The poll loop tying everything together
//! - [`sync_errors`] - Error kinds and exit codes
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use zonesync::reload::CommandReloader;
//! use zonesync::source::{Authenticator, DnsServicesClient};
//! use zonesync::sync_loop::ZoneSync;
//! use zonesync::zonefile::{ZoneSynthesizer, ZoneWriter};
//!
//! # async fn example() -> Result<(), zonesync::sync_errors::SyncError> {
//! let source = DnsServicesClient::new(
//!     "https://api.dns-svcs.cloud.ibm.com/v1",
//!     "instance-id",
//!     "zone-id",
//!     Authenticator::BearerToken("token".to_string()),
//! )?;
//!
//! let mut sync = ZoneSync::new(
//!     Box::new(source),
//!     Box::new(CommandReloader::new("rndc reload example.com")?),
//!     ZoneSynthesizer::new("example.com", "10.0.0.5", 900)?,
//!     ZoneWriter::new("/etc/bind/db.example.com"),
//!     900,
//!     Duration::from_secs(60),
//! );
//!
//! sync.run_cycle().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod metrics;
pub mod reload;
pub mod source;
pub mod sync_errors;
pub mod sync_loop;
pub mod zonefile;

#[cfg(test)]
mod sync_errors_tests;
