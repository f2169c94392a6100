// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for zonesync.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Time Constants
// ============================================================================

/// One minute in seconds
pub const ONE_MINUTE_SECS: u32 = 60;

/// One hour in seconds
pub const ONE_HOUR_SECS: u32 = 60 * ONE_MINUTE_SECS;

/// One day in seconds
pub const ONE_DAY_SECS: u32 = 24 * ONE_HOUR_SECS;

/// One week in seconds
pub const ONE_WEEK_SECS: u32 = 7 * ONE_DAY_SECS;

// ============================================================================
// Zone File Constants
// ============================================================================

/// TTL applied to records that omit one (15 minutes)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 15 * ONE_MINUTE_SECS;

/// TTL of the synthesized SOA record (3 weeks)
pub const SOA_TTL_SECS: u32 = 3 * ONE_WEEK_SECS;

/// SOA refresh interval (12 hours)
pub const SOA_REFRESH_SECS: u32 = 12 * ONE_HOUR_SECS;

/// SOA retry interval (15 minutes)
pub const SOA_RETRY_SECS: u32 = 15 * ONE_MINUTE_SECS;

/// SOA expire time (3 weeks)
pub const SOA_EXPIRE_SECS: u32 = 3 * ONE_WEEK_SECS;

/// SOA minimum / negative caching TTL (2 hours)
pub const SOA_MINIMUM_SECS: u32 = 2 * ONE_HOUR_SECS;

/// Label prepended to the zone name to build the SOA mailbox
pub const SOA_MAILBOX_LABEL: &str = "admin";

/// Largest TTL accepted by the parser (RFC 2181 section 8)
pub const MAX_TTL_SECS: u32 = i32::MAX as u32;

/// Permissions applied to the written zone file so `named` can read it
pub const ZONE_FILE_MODE: u32 = 0o644;

// ============================================================================
// Fetch Constants
// ============================================================================

/// Total number of export attempts per cycle (1 initial + 3 retries)
pub const DEFAULT_FETCH_ATTEMPTS: u32 = 4;

/// Pause between failed export attempts
pub const DEFAULT_FETCH_RETRY_DELAY_SECS: u64 = 10;

/// Default IAM endpoint used to exchange an API key for a bearer token
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";

/// Path of the IAM token endpoint, relative to the IAM URL
pub const IAM_TOKEN_PATH: &str = "identity/token";

/// Grant type for API key token exchange
pub const IAM_APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Refresh cached IAM tokens this many seconds before they expire
pub const IAM_TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit code when the runtime could not be created
pub const EXIT_RUNTIME_FAILURE: u8 = 1;

/// Exit code for invalid or missing configuration
pub const EXIT_CONFIG_INVALID: u8 = 2;

/// Exit code for an unparseable listing IP address
pub const EXIT_INVALID_ADDRESS: u8 = 3;

/// Exit code when the zone source stayed unavailable for every attempt
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 4;

/// Exit code when the exported zone could not be parsed
pub const EXIT_MALFORMED_ZONE: u8 = 5;

/// Exit code when the zone file could not be written
pub const EXIT_WRITE_FAILURE: u8 = 6;

/// Exit code when the reload command failed
pub const EXIT_RELOAD_FAILURE: u8 = 7;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";
