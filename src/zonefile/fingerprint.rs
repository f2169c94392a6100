// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Change detection for exported zone payloads.
//!
//! Each payload is reduced to a 32-bit FNV-1a hash over its exact bytes. The
//! sync loop only rewrites the zone file and reloads BIND9 when the hash of a
//! fresh export differs from the last one it processed.

use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of a zone payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u32);

impl Fingerprint {
    /// Hash `payload`.
    #[must_use]
    pub fn of(payload: &[u8]) -> Self {
        Self(
            payload
                .iter()
                .fold(FNV_OFFSET_BASIS, |hash, byte| {
                    (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
                }),
        )
    }

    /// Raw hash value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Fingerprint a zone payload.
#[must_use]
pub fn fingerprint(payload: &[u8]) -> Fingerprint {
    Fingerprint::of(payload)
}

/// Remembers the fingerprint of the last payload that was written.
///
/// Starts empty, so the first payload always counts as a change.
#[derive(Debug, Default, Clone)]
pub struct ChangeDetector {
    last: Option<Fingerprint>,
}

impl ChangeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint of the last changed payload, if any.
    #[must_use]
    pub fn last(&self) -> Option<Fingerprint> {
        self.last
    }

    /// Returns `true` and stores `fingerprint` if it differs from the stored one.
    pub fn has_changed(&mut self, fingerprint: Fingerprint) -> bool {
        if self.last == Some(fingerprint) {
            return false;
        }
        self.last = Some(fingerprint);
        true
    }
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod fingerprint_tests;
