//! Log record format
//!
//! A record is:
//!
//! ```text
//! 1 <id> <timestamp_ns> 0\n
//! <method> <url> <proto>\n
//! Name: Value\r\n            (zero or more)
//! \r\n
//! <raw body>
//! \n🐵🙈🙉\n
//! ```
//!
//! Replay tooling splits the stream on the separator, so every byte here
//! is part of the interchange format.

use chrono::Utc;

use super::errors::RecordResult;
use super::id::RecordId;
use super::snapshot::RequestSnapshot;

/// Marker appended after every record
pub const PAYLOAD_SEPARATOR: &str = "\n🐵🙈🙉\n";

/// Payload type of a captured request in the header line
const REQUEST_PAYLOAD_TYPE: &str = "1";

/// One serialized request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    id: RecordId,
    timestamp_ns: i64,
    bytes: Vec<u8>,
}

impl LogRecord {
    /// Serializes a request with a fresh identifier and the current time.
    ///
    /// # Errors
    ///
    /// FATAL if no identifier can be generated.
    pub fn capture(snapshot: &RequestSnapshot) -> RecordResult<Self> {
        let id = RecordId::generate()?;
        let timestamp_ns = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        Ok(Self::build(id, timestamp_ns, snapshot))
    }

    /// Assembles the record bytes for a given identifier and timestamp.
    pub fn build(id: RecordId, timestamp_ns: i64, snapshot: &RequestSnapshot) -> Self {
        let header_line = format!("{} {} {} 0\n", REQUEST_PAYLOAD_TYPE, id, timestamp_ns);
        let request_line = format!(
            "{} {} {}\n",
            snapshot.method(),
            snapshot.url(),
            snapshot.proto()
        );
        let header_block = header_block(snapshot.headers());

        let mut bytes = Vec::with_capacity(
            header_line.len()
                + request_line.len()
                + header_block.len()
                + 2
                + snapshot.body().len()
                + PAYLOAD_SEPARATOR.len(),
        );
        bytes.extend_from_slice(header_line.as_bytes());
        bytes.extend_from_slice(request_line.as_bytes());
        bytes.extend_from_slice(header_block.as_bytes());
        bytes.extend_from_slice(b"\r\n");
        bytes.extend_from_slice(snapshot.body());
        bytes.extend_from_slice(PAYLOAD_SEPARATOR.as_bytes());

        Self {
            id,
            timestamp_ns,
            bytes,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Arrival time in nanoseconds since the Unix epoch
    pub fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Renders headers sorted by canonical name, one line per value.
///
/// The sort is stable so repeated names keep their arrival order.
fn header_block(headers: &[(String, String)]) -> String {
    let mut lines: Vec<(String, String)> = headers
        .iter()
        .map(|(name, value)| (canonical_header_name(name), sanitize_header_value(value)))
        .collect();
    lines.sort_by(|a, b| a.0.cmp(&b.0));

    let mut block = String::new();
    for (name, value) in lines {
        block.push_str(&name);
        block.push_str(": ");
        block.push_str(&value);
        block.push_str("\r\n");
    }
    block
}

/// `content-type` -> `Content-Type`.
///
/// Names containing anything other than token characters are left untouched.
pub fn canonical_header_name(name: &str) -> String {
    let is_token = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if !is_token {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// CR and LF become spaces, surrounding whitespace is trimmed.
fn sanitize_header_value(value: &str) -> String {
    value
        .replace(['\r', '\n'], " ")
        .trim_matches(|c: char| c == ' ' || c == '\t')
        .to_string()
}

/// Splits a log stream into records, each including its trailing separator.
///
/// Trailing bytes without a separator (a torn final write) are ignored.
pub fn split_records(stream: &[u8]) -> Vec<&[u8]> {
    let separator = PAYLOAD_SEPARATOR.as_bytes();
    let mut records = Vec::new();
    let mut start = 0;
    let mut cursor = 0;

    while cursor + separator.len() <= stream.len() {
        if &stream[cursor..cursor + separator.len()] == separator {
            let end = cursor + separator.len();
            records.push(&stream[start..end]);
            start = end;
            cursor = end;
        } else {
            cursor += 1;
        }
    }

    records
}

/// Fields of a record header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub id: String,
    pub timestamp_ns: i64,
}

/// Parses the first line of a record (`1 <id> <timestamp_ns> 0`).
///
/// Returns `None` if the line does not have exactly that shape.
pub fn parse_header_line(record: &[u8]) -> Option<RecordHeader> {
    let line_end = record.iter().position(|&b| b == b'\n')?;
    let line = std::str::from_utf8(&record[..line_end]).ok()?;

    let mut parts = line.split(' ');
    let kind = parts.next()?;
    let id = parts.next()?;
    let timestamp_ns = parts.next()?.parse::<i64>().ok()?;
    let latency = parts.next()?;

    if kind != REQUEST_PAYLOAD_TYPE
        || latency != "0"
        || parts.next().is_some()
        || !RecordId::is_well_formed(id)
    {
        return None;
    }

    Some(RecordHeader {
        id: id.to_string(),
        timestamp_ns,
    })
}
