//! Record Format Tests
//!
//! Records must be readable by replay tooling:
//! header line, request line, canonical sorted headers, blank line,
//! raw body, separator.

use std::collections::HashSet;

use httplog::record::{
    parse_header_line, split_records, LogRecord, RecordId, RequestSnapshot, PAYLOAD_SEPARATOR,
    RECORD_ID_LEN,
};

fn id(fill: u8) -> RecordId {
    RecordId::from_bytes([fill; 12])
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_post_with_body_layout() {
    let snapshot = RequestSnapshot::new("POST", "/submit?q=1", "HTTP/1.1")
        .with_header("content-type", "application/json")
        .with_header("Content-Length", "13")
        .with_header("host", "example.test")
        .with_body(&b"{\"a\":\"hello\"}"[..]);

    let record = LogRecord::build(id(0xab), 42, &snapshot);

    let expected = format!(
        "1 {} 42 0\n\
         POST /submit?q=1 HTTP/1.1\n\
         Content-Length: 13\r\n\
         Content-Type: application/json\r\n\
         Host: example.test\r\n\
         \r\n\
         {{\"a\":\"hello\"}}{}",
        "ab".repeat(12),
        PAYLOAD_SEPARATOR
    );
    assert_eq!(record.as_bytes(), expected.as_bytes());
}

#[test]
fn test_binary_body_is_copied_verbatim() {
    let body: Vec<u8> = (0u8..=255).collect();
    let snapshot = RequestSnapshot::new("PUT", "/blob", "HTTP/1.1").with_body(body.clone());
    let record = LogRecord::build(id(0), 1, &snapshot);

    let bytes = record.as_bytes();
    // No headers: the blank line follows the request line directly.
    let prefix = format!("1 {} 1 0\nPUT /blob HTTP/1.1\n\r\n", "00".repeat(12));
    assert!(bytes.starts_with(prefix.as_bytes()));
    let body_start = prefix.len();
    let body_end = bytes.len() - PAYLOAD_SEPARATOR.len();
    assert_eq!(&bytes[body_start..body_end], body.as_slice());
}

#[test]
fn test_header_injection_stays_on_one_line() {
    let snapshot = RequestSnapshot::new("GET", "/", "HTTP/1.1")
        .with_header("X-Evil", "a\r\nInjected: yes");
    let record = LogRecord::build(id(1), 7, &snapshot);
    let text = String::from_utf8(record.into_bytes()).unwrap();

    assert!(text.contains("X-Evil: a  Injected: yes\r\n"));
    assert!(!text.contains("\nInjected"));
}

#[test]
fn test_repeated_headers_keep_arrival_order() {
    let snapshot = RequestSnapshot::new("GET", "/", "HTTP/1.1")
        .with_header("x-b", "first")
        .with_header("X-A", "only")
        .with_header("X-B", "second");
    let record = LogRecord::build(id(2), 7, &snapshot);
    let text = String::from_utf8(record.into_bytes()).unwrap();

    assert!(text.contains("X-A: only\r\nX-B: first\r\nX-B: second\r\n\r\n"));
}

// =============================================================================
// Identifiers
// =============================================================================

#[test]
fn test_captured_ids_are_unique_lowercase_hex() {
    let snapshot = RequestSnapshot::new("GET", "/", "HTTP/1.1");
    let mut seen = HashSet::new();

    for _ in 0..1000 {
        let record = LogRecord::capture(&snapshot).unwrap();
        let header = parse_header_line(record.as_bytes()).unwrap();

        assert_eq!(header.id.len(), RECORD_ID_LEN);
        assert!(header
            .id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        assert_eq!(header.id, record.id().as_str());
        assert!(header.timestamp_ns > 0);
        assert!(seen.insert(header.id));
    }
}

// =============================================================================
// Stream splitting
// =============================================================================

#[test]
fn test_stream_of_records_splits_back() {
    let mut stream = Vec::new();
    let mut ids = Vec::new();
    for n in 0..5u8 {
        let snapshot = RequestSnapshot::new("GET", format!("/{}", n), "HTTP/1.1")
            .with_body(vec![b'\n'; n as usize]);
        let record = LogRecord::build(id(n), i64::from(n), &snapshot);
        ids.push(record.id().as_str().to_string());
        stream.extend_from_slice(record.as_bytes());
    }
    // Torn trailing write.
    stream.extend_from_slice(b"1 deadbeef");

    let records = split_records(&stream);
    assert_eq!(records.len(), 5);
    let parsed: Vec<String> = records
        .iter()
        .map(|r| parse_header_line(r).unwrap().id)
        .collect();
    assert_eq!(parsed, ids);
}
