// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone file serialization.
//!
//! Records are written one per line in master file presentation format:
//!
//! ```text
//! example.com.	1814400	IN	SOA	example.com. admin.example.com. 0 43200 900 1814400 7200
//! www.example.com.	300	IN	A	10.0.0.10
//! ```
//!
//! PTR records never reach the file: reverse pointers do not belong in a
//! forward zone. The file is replaced atomically, so BIND9 (or anything else
//! reading it) sees either the previous zone or the new one, never a partial
//! write.

use bytes::Bytes;
use domain::base::iana::Rtype;
use domain::base::name::{Name, ToName};
use domain::rdata::ZoneRecordData;
use domain::zonefile::inplace::ScannedRecordData;
use std::fmt::Write as _;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::parser::ZoneRecord;
use crate::sync_errors::SyncError;

/// Writes record sets to a single zone file.
#[derive(Debug, Clone)]
pub struct ZoneWriter {
    path: PathBuf,
}

impl ZoneWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target zone file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the zone file with `records`, skipping PTR records.
    ///
    /// The content goes to a temporary file next to the target, which is
    /// synced and then renamed over it.
    ///
    /// # Returns
    ///
    /// The number of records written.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::WriteFailure`] if the temporary file cannot be
    /// created, written or renamed.
    pub fn write(&self, records: &[ZoneRecord]) -> Result<usize, SyncError> {
        let fail = |e: std::io::Error| SyncError::write_failure(&self.path, e);

        let mut file = NamedTempFile::new_in(self.directory()).map_err(fail)?;
        let mut written = 0;
        {
            let mut out = BufWriter::new(&mut file);
            for line in zone_file_lines(records) {
                writeln!(out, "{line}").map_err(fail)?;
                written += 1;
            }
            out.flush().map_err(fail)?;
        }
        file.as_file().sync_all().map_err(fail)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(
                    crate::constants::ZONE_FILE_MODE,
                ))
                .map_err(fail)?;
        }

        debug!(
            temp_path = %file.path().display(),
            path = %self.path.display(),
            "Moving zone file into place"
        );
        file.persist(&self.path).map_err(|e| fail(e.error))?;

        info!(
            path = %self.path.display(),
            records = written,
            skipped = records.len() - written,
            "Zone file written successfully"
        );
        Ok(written)
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Write `records` to `path`. See [`ZoneWriter::write`].
///
/// # Errors
///
/// Returns [`SyncError::WriteFailure`] on any I/O error.
pub fn write_zone_file(path: &Path, records: &[ZoneRecord]) -> Result<usize, SyncError> {
    ZoneWriter::new(path).write(records)
}

/// Whether `record` is kept out of the zone file.
#[must_use]
pub fn is_excluded(record: &ZoneRecord) -> bool {
    record.rtype() == Rtype::PTR
}

/// Presentation lines for every record that belongs in the zone file, in order.
pub fn zone_file_lines(records: &[ZoneRecord]) -> impl Iterator<Item = String> + '_ {
    records
        .iter()
        .filter(|record| !is_excluded(record))
        .map(render_record)
}

/// Render one record as `name<TAB>ttl<TAB>class<TAB>type<TAB>rdata`.
#[must_use]
pub fn render_record(record: &ZoneRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        fqdn(record.owner()),
        record.ttl().as_secs(),
        record.class(),
        record.rtype(),
        render_rdata(record.data())
    )
}

/// Absolute presentation form of `name`, trailing dot included.
pub fn fqdn<N: ToName>(name: &N) -> String {
    let name: Name<Bytes> = name.to_bytes();
    if name.is_root() {
        ".".to_string()
    } else {
        format!("{name}.")
    }
}

// Names are always written absolute; other types use the crate's own
// presentation format.
fn render_rdata(rdata: &ScannedRecordData) -> String {
    match rdata {
        ZoneRecordData::A(a) => a.addr().to_string(),
        ZoneRecordData::Aaaa(aaaa) => aaaa.addr().to_string(),
        ZoneRecordData::Ns(ns) => fqdn(ns.nsdname()),
        ZoneRecordData::Cname(cname) => fqdn(cname.cname()),
        ZoneRecordData::Ptr(ptr) => fqdn(ptr.ptrdname()),
        ZoneRecordData::Mx(mx) => format!("{} {}", mx.preference(), fqdn(mx.exchange())),
        ZoneRecordData::Srv(srv) => format!(
            "{} {} {} {}",
            srv.priority(),
            srv.weight(),
            srv.port(),
            fqdn(srv.target())
        ),
        ZoneRecordData::Soa(soa) => format!(
            "{} {} {} {} {} {} {}",
            fqdn(soa.mname()),
            fqdn(soa.rname()),
            soa.serial(),
            soa.refresh().as_secs(),
            soa.retry().as_secs(),
            soa.expire().as_secs(),
            soa.minimum().as_secs()
        ),
        ZoneRecordData::Txt(txt) => txt
            .iter()
            .map(quote_character_string)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

/// Quote a TXT character-string, escaping `"`, `\` and non-printable bytes.
fn quote_character_string(data: &[u8]) -> String {
    let mut quoted = String::with_capacity(data.len() + 2);
    quoted.push('"');
    for &byte in data {
        match byte {
            b'"' | b'\\' => {
                quoted.push('\\');
                quoted.push(char::from(byte));
            }
            0x20..=0x7e => quoted.push(char::from(byte)),
            _ => {
                let _ = write!(quoted, "\\{byte:03}");
            }
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod writer_tests;
