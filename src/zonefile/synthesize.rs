// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Bootstrap records prepended to every written zone file.
//!
//! The exported zone does not carry the records BIND9 needs to load it as a
//! primary zone, so every write starts with a synthesized SOA, an address
//! record for the apex pointing at the listing IP, and an apex NS record.

use bytes::Bytes;
use chrono::Utc;
use clap::ValueEnum;
use domain::base::iana::Class;
use domain::base::name::{Name, RelativeName};
use domain::base::{Record, Serial, Ttl};
use domain::rdata::{Aaaa, Ns, Soa, ZoneRecordData, A};
use domain::zonefile::inplace::{ScannedDname, ScannedRecordData};
use std::net::IpAddr;
use std::str::FromStr;

use super::parser::{zone_apex, ZoneRecord};
use super::writer::fqdn;
use crate::constants::{
    SOA_EXPIRE_SECS, SOA_MAILBOX_LABEL, SOA_MINIMUM_SECS, SOA_REFRESH_SECS, SOA_RETRY_SECS,
    SOA_TTL_SECS,
};
use crate::sync_errors::SyncError;

/// How the serial of the synthesized SOA record is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SoaSerialPolicy {
    /// Always 0. Secondaries that compare serials never see an update.
    #[default]
    Zero,
    /// Seconds since the Unix epoch at the time of the write.
    UnixTime,
}

impl SoaSerialPolicy {
    /// Serial to use for a write happening now.
    #[must_use]
    pub fn serial(self) -> u32 {
        match self {
            Self::Zero => 0,
            Self::UnixTime => u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX),
        }
    }
}

/// Builds the SOA, A/AAAA and NS records for a zone.
#[derive(Debug, Clone)]
pub struct ZoneSynthesizer {
    apex: ScannedDname,
    mailbox: ScannedDname,
    listing_ip: IpAddr,
    default_ttl: u32,
    serial_policy: SoaSerialPolicy,
}

impl ZoneSynthesizer {
    /// Create a synthesizer for `zone_name`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidAddressConfig`] if `listing_ip` is not an IP
    /// address and [`SyncError::ConfigInvalid`] if `zone_name` is not a valid
    /// domain name.
    pub fn new(zone_name: &str, listing_ip: &str, default_ttl: u32) -> Result<Self, SyncError> {
        let listing_ip = listing_ip
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| SyncError::InvalidAddressConfig {
                address: listing_ip.to_string(),
            })?;

        let apex = zone_apex(zone_name).map_err(|e| SyncError::config(e.to_string()))?;
        let mailbox = Name::<Bytes>::from_str(&format!("{SOA_MAILBOX_LABEL}.{}", fqdn(&apex)))
            .map_err(|e| SyncError::config(format!("invalid SOA mailbox for '{zone_name}': {e}")))?;

        Ok(Self {
            apex: absolute(apex)?,
            mailbox: absolute(mailbox)?,
            listing_ip,
            default_ttl,
            serial_policy: SoaSerialPolicy::default(),
        })
    }

    /// Use `policy` to pick the SOA serial.
    #[must_use]
    pub fn with_serial_policy(mut self, policy: SoaSerialPolicy) -> Self {
        self.serial_policy = policy;
        self
    }

    /// Fully qualified zone apex, trailing dot included.
    #[must_use]
    pub fn apex(&self) -> String {
        fqdn(&self.apex)
    }

    /// The SOA, address and NS records, in that order.
    #[must_use]
    pub fn synthesize(&self) -> Vec<ZoneRecord> {
        let soa = Soa::new(
            self.apex.clone(),
            self.mailbox.clone(),
            Serial(self.serial_policy.serial()),
            Ttl::from_secs(SOA_REFRESH_SECS),
            Ttl::from_secs(SOA_RETRY_SECS),
            Ttl::from_secs(SOA_EXPIRE_SECS),
            Ttl::from_secs(SOA_MINIMUM_SECS),
        );

        let address = match self.listing_ip {
            IpAddr::V4(v4) => ZoneRecordData::A(A::new(v4)),
            IpAddr::V6(v6) => ZoneRecordData::Aaaa(Aaaa::new(v6)),
        };

        vec![
            self.in_record(SOA_TTL_SECS, ZoneRecordData::Soa(soa)),
            self.in_record(self.default_ttl, address),
            self.in_record(
                self.default_ttl,
                ZoneRecordData::Ns(Ns::new(self.apex.clone())),
            ),
        ]
    }

    fn in_record(&self, ttl: u32, data: ScannedRecordData) -> ZoneRecord {
        Record::new(self.apex.clone(), Class::IN, Ttl::from_secs(ttl), data)
    }
}

/// Synthesize the bootstrap records with the default serial policy.
///
/// # Errors
///
/// See [`ZoneSynthesizer::new`].
pub fn synthesize(
    zone_name: &str,
    listing_ip: &str,
    default_ttl: u32,
) -> Result<Vec<ZoneRecord>, SyncError> {
    Ok(ZoneSynthesizer::new(zone_name, listing_ip, default_ttl)?.synthesize())
}

// Records share one name type with what the scanner produces.
fn absolute(name: Name<Bytes>) -> Result<ScannedDname, SyncError> {
    RelativeName::empty_bytes()
        .chain(name)
        .map_err(|e| SyncError::config(format!("invalid record name: {e}")))
}

#[cfg(test)]
#[path = "synthesize_tests.rs"]
mod synthesize_tests;
