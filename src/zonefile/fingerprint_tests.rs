// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `fingerprint.rs`

#[cfg(test)]
mod tests {
    use super::super::{fingerprint, ChangeDetector, Fingerprint};

    #[test]
    fn test_fnv1a_reference_vectors() {
        assert_eq!(fingerprint(b"").value(), 0x811c_9dc5);
        assert_eq!(fingerprint(b"a").value(), 0xe40c_292c);
        assert_eq!(fingerprint(b"foobar").value(), 0xbf9c_f968);
    }

    #[test]
    fn test_identical_payloads_have_identical_fingerprints() {
        let payload = b"www 300 IN A 10.0.0.1\n".to_vec();
        assert_eq!(fingerprint(&payload), fingerprint(&payload.clone()));
    }

    #[test]
    fn test_different_payloads_have_different_fingerprints() {
        let first = fingerprint(b"www 300 IN A 10.0.0.1\n");
        let second = fingerprint(b"www 300 IN A 10.0.0.2\n");
        let longer = fingerprint(b"www 300 IN A 10.0.0.1\nftp 300 IN A 10.0.0.3\n");

        assert_ne!(first, second);
        assert_ne!(first, longer);
    }

    #[test]
    fn test_fingerprint_is_order_sensitive() {
        assert_ne!(fingerprint(b"ab"), fingerprint(b"ba"));
    }

    #[test]
    fn test_display_is_zero_padded_hex() {
        assert_eq!(Fingerprint::of(b"a").to_string(), "e40c292c");
    }

    #[test]
    fn test_first_fingerprint_always_counts_as_change() {
        let mut detector = ChangeDetector::new();
        assert_eq!(detector.last(), None);

        // The empty payload hash must not collide with the initial state
        assert!(detector.has_changed(fingerprint(b"")));
    }

    #[test]
    fn test_unchanged_fingerprint_is_not_a_change() {
        let mut detector = ChangeDetector::new();
        let fp = fingerprint(b"zone v1");

        assert!(detector.has_changed(fp));
        assert!(!detector.has_changed(fp));
        assert!(!detector.has_changed(fp));
        assert_eq!(detector.last(), Some(fp));
    }

    #[test]
    fn test_new_fingerprint_replaces_stored_one() {
        let mut detector = ChangeDetector::new();
        let v1 = fingerprint(b"zone v1");
        let v2 = fingerprint(b"zone v2");

        assert!(detector.has_changed(v1));
        assert!(detector.has_changed(v2));
        assert_eq!(detector.last(), Some(v2));
        assert!(detector.has_changed(v1), "going back to v1 is a change");
    }
}
