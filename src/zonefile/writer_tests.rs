// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `writer.rs`

#[cfg(test)]
mod tests {
    use super::super::{render_record, write_zone_file, zone_file_lines, ZoneWriter};
    use crate::sync_errors::SyncError;
    use crate::zonefile::{parse_zone, synthesize};
    use tempfile::TempDir;

    const EXPORT: &[u8] = b"www 300 IN A 10.0.0.10
10.0.0.10.in-addr.arpa. 300 IN PTR www.example.com.
mail 300 IN MX 10 mx.example.com.
11.0.0.10.in-addr.arpa. 300 IN PTR mail.example.com.
@ 300 IN TXT \"v=spf1 -all\"
";

    #[test]
    fn test_render_record_formats() {
        let records = synthesize("example.com", "10.0.0.5", 900).unwrap();

        assert_eq!(
            render_record(&records[0]),
            "example.com.\t1814400\tIN\tSOA\texample.com. admin.example.com. 0 43200 900 1814400 7200"
        );
        assert_eq!(render_record(&records[1]), "example.com.\t900\tIN\tA\t10.0.0.5");
        assert_eq!(render_record(&records[2]), "example.com.\t900\tIN\tNS\texample.com.");
    }

    #[test]
    fn test_render_txt_is_quoted_and_escaped() {
        let records = parse_zone(
            b"@ 300 IN TXT \"plain\" \"with \\\"quotes\\\" and \\\\\"\n",
            "example.com",
            900,
        )
        .unwrap();

        assert_eq!(
            render_record(&records[0]),
            "example.com.\t300\tIN\tTXT\t\"plain\" \"with \\\"quotes\\\" and \\\\\""
        );
    }

    #[test]
    fn test_txt_octets_round_trip_through_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.example.com");
        let records = parse_zone(
            b"t 300 IN TXT \"\\200\\001\" a\\;b\n",
            "example.com",
            900,
        )
        .unwrap();

        write_zone_file(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "t.example.com.\t300\tIN\tTXT\t\"\\200\\001\" \"a;b\"\n");

        let reparsed = parse_zone(content.as_bytes(), "example.com", 900).unwrap();
        assert_eq!(render_record(&reparsed[0]), render_record(&records[0]));
    }

    #[test]
    fn test_uncommon_record_types_are_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.example.com");
        let records = parse_zone(
            b"host 300 IN HINFO \"x86_64\" \"Linux\"\n",
            "example.com",
            900,
        )
        .unwrap();

        assert_eq!(ZoneWriter::new(&path).write(&records).unwrap(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(
            content.starts_with("host.example.com.\t300\tIN\tHINFO\t"),
            "{content}"
        );
        assert!(content.contains("x86_64") && content.contains("Linux"));
    }

    #[test]
    fn test_ptr_records_are_filtered_and_order_preserved() {
        let records = parse_zone(EXPORT, "example.com", 900).unwrap();
        let lines: Vec<String> = zone_file_lines(&records).collect();

        assert_eq!(
            lines,
            vec![
                "www.example.com.\t300\tIN\tA\t10.0.0.10".to_string(),
                "mail.example.com.\t300\tIN\tMX\t10 mx.example.com.".to_string(),
                "example.com.\t300\tIN\tTXT\t\"v=spf1 -all\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_write_creates_file_with_synthesized_records_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.example.com");

        let mut records = synthesize("example.com", "10.0.0.5", 900).unwrap();
        records.extend(parse_zone(EXPORT, "example.com", 900).unwrap());

        let written = ZoneWriter::new(&path).write(&records).unwrap();
        assert_eq!(written, 6, "3 synthesized + 3 non-PTR records");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("\tSOA\t"));
        assert!(lines[1].contains("\tA\t10.0.0.5"));
        assert!(lines[2].contains("\tNS\t"));
        assert!(!content.contains("PTR"));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_write_replaces_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.example.com");
        std::fs::write(&path, "stale content that is much longer than the new zone\n".repeat(50))
            .unwrap();

        let records = parse_zone(b"www 300 IN A 10.0.0.10\n", "example.com", 900).unwrap();
        write_zone_file(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "www.example.com.\t300\tIN\tA\t10.0.0.10\n");
    }

    #[test]
    fn test_write_leaves_no_temporary_files_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.example.com");
        let records = synthesize("example.com", "10.0.0.5", 900).unwrap();

        ZoneWriter::new(&path).write(&records).unwrap();
        ZoneWriter::new(&path).write(&records).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.example.com");
        let records = synthesize("example.com", "10.0.0.5", 900).unwrap();
        ZoneWriter::new(&path).write(&records).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_write_to_missing_directory_is_write_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("db.example.com");
        let records = synthesize("example.com", "10.0.0.5", 900).unwrap();

        let err = ZoneWriter::new(&path).write(&records).unwrap_err();
        assert!(matches!(err, SyncError::WriteFailure { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_writer_reports_path() {
        let writer = ZoneWriter::new("/etc/bind/db.example.com");
        assert_eq!(
            writer.path(),
            std::path::Path::new("/etc/bind/db.example.com")
        );
    }
}
