// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Master file (RFC 1035 section 5) parsing for exported zone payloads.
//!
//! Scanning is done by the `domain` crate's in-place zonefile scanner, which
//! resolves `$ORIGIN`, `@`, relative and blank owners, parentheses, comments
//! and escapes, and knows every record type the crate implements plus the
//! generic `TYPEnnn \# len hex` form.
//!
//! The scanner starts with the zone apex as origin and the default TTL as if
//! the payload began with a `$TTL` line. Records without a TTL take the most
//! recent `$TTL` or explicit TTL. Any error aborts the whole parse: a
//! partially parsed zone is never returned.

use bytes::Bytes;
use domain::base::name::Name;
use domain::zonefile::inplace::{self, Entry, ScannedRecord, Zonefile};
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

use super::writer::fqdn;
use crate::constants::MAX_TTL_SECS;

/// A parsed or synthesized resource record.
pub type ZoneRecord = ScannedRecord;

/// Lines the scanner sees before the payload itself.
const SEED_LINES: usize = 1;

/// Why a payload could not be turned into records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneParseError {
    #[error("line {line}: payload is not valid UTF-8: {reason}")]
    Encoding { line: usize, reason: String },

    /// Rejected by the scanner. `line` is 0 when the position is unknown.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("record {owner} {rtype}: TTL {ttl} is out of range (1..={max})", max = MAX_TTL_SECS)]
    TtlOutOfRange {
        owner: String,
        rtype: String,
        ttl: u32,
    },

    #[error("$INCLUDE {path} is not supported in zone exports")]
    Include { path: String },

    #[error("invalid zone name '{zone}': {reason}")]
    ZoneName { zone: String, reason: String },
}

/// Parse a zone payload into records, in source order.
///
/// # Arguments
/// * `raw` - zone file bytes as exported by the source
/// * `zone_name` - zone apex, with or without trailing dot; the initial origin
/// * `default_ttl` - TTL for records before any `$TTL` or explicit TTL
///
/// # Errors
///
/// Returns a [`ZoneParseError`] for invalid UTF-8, anything the scanner
/// rejects, `$INCLUDE` directives and TTLs of zero or above `i32::MAX`.
pub fn parse_zone(
    raw: &[u8],
    zone_name: &str,
    default_ttl: u32,
) -> Result<Vec<ZoneRecord>, ZoneParseError> {
    if let Err(e) = std::str::from_utf8(raw) {
        let line = raw[..e.valid_up_to()].iter().filter(|b| **b == b'\n').count() + 1;
        return Err(ZoneParseError::Encoding {
            line,
            reason: e.to_string(),
        });
    }

    let mut zonefile = seeded_zonefile(raw, zone_apex(zone_name)?, default_ttl);
    let mut records = Vec::new();
    while let Some(entry) = zonefile.next_entry().map_err(|e| syntax_error(&e))? {
        match entry {
            Entry::Record(record) => {
                check_ttl(&record)?;
                trace!(
                    owner = %fqdn(record.owner()),
                    ttl = record.ttl().as_secs(),
                    rtype = %record.rtype(),
                    "Parsed record"
                );
                records.push(record);
            }
            Entry::Include { path, .. } => {
                return Err(ZoneParseError::Include {
                    path: path.to_string(),
                })
            }
        }
    }
    Ok(records)
}

/// Build the fully qualified apex name for `zone_name`.
///
/// # Errors
///
/// Returns [`ZoneParseError::ZoneName`] if `zone_name` is not a valid domain
/// name.
pub fn zone_apex(zone_name: &str) -> Result<Name<Bytes>, ZoneParseError> {
    let absolute = if zone_name.ends_with('.') {
        zone_name.to_string()
    } else {
        format!("{zone_name}.")
    };
    Name::from_str(&absolute).map_err(|e| ZoneParseError::ZoneName {
        zone: zone_name.to_string(),
        reason: e.to_string(),
    })
}

fn seeded_zonefile(raw: &[u8], origin: Name<Bytes>, default_ttl: u32) -> Zonefile {
    let seed = format!("$TTL {default_ttl}\n");
    let mut zonefile = Zonefile::with_capacity(seed.len() + raw.len() + 1);
    zonefile.extend_from_slice(seed.as_bytes());
    zonefile.extend_from_slice(raw);
    // The scanner only accepts an entry that ends in a line feed
    if !raw.ends_with(b"\n") {
        zonefile.extend_from_slice(b"\n");
    }
    zonefile.set_origin(origin);
    zonefile
}

/// Convert a scanner error, reported as `line:column: message`, so that the
/// line counts from the start of the payload.
fn syntax_error(err: &inplace::Error) -> ZoneParseError {
    let text = err.to_string();
    let located = text
        .split_once(':')
        .and_then(|(line, rest)| Some((line.parse::<usize>().ok()?, rest.trim_start())));

    match located {
        Some((line, rest)) => ZoneParseError::Syntax {
            line: line.saturating_sub(SEED_LINES),
            message: format!("column {rest}"),
        },
        None => ZoneParseError::Syntax {
            line: 0,
            message: text,
        },
    }
}

fn check_ttl(record: &ZoneRecord) -> Result<(), ZoneParseError> {
    let ttl = record.ttl().as_secs();
    if ttl == 0 || ttl > MAX_TTL_SECS {
        return Err(ZoneParseError::TtlOutOfRange {
            owner: fqdn(record.owner()),
            rtype: record.rtype().to_string(),
            ttl,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
