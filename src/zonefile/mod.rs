// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone file handling for the sync loop.
//!
//! This module covers everything between the raw export and the file BIND9
//! loads:
//!
//! - [`parser`] - master file scanning into `domain` records
//! - [`synthesize`] - SOA, apex address and NS records prepended to every write
//! - [`fingerprint`] - payload hashing and change detection
//! - [`writer`] - PTR filtering and atomic zone file replacement
//!
//! # Example
//!
//! ```rust,no_run
//! use zonesync::zonefile::{parse_zone, synthesize, ZoneWriter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut records = synthesize("example.com", "10.0.0.5", 900)?;
//! records.extend(parse_zone(b"www 300 IN A 10.0.0.10\n", "example.com", 900)?);
//! ZoneWriter::new("/etc/bind/db.example.com").write(&records)?;
//! # Ok(())
//! # }
//! ```

pub mod fingerprint;
pub mod parser;
pub mod synthesize;
pub mod writer;

pub use fingerprint::{fingerprint, ChangeDetector, Fingerprint};
pub use parser::{parse_zone, zone_apex, ZoneParseError, ZoneRecord};
pub use synthesize::{synthesize, SoaSerialPolicy, ZoneSynthesizer};
pub use writer::{fqdn, render_record, write_zone_file, zone_file_lines, ZoneWriter};
