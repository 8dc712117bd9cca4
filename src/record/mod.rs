//! Request record serialization
//!
//! Turns one received request into one self-delimited record of the
//! replay log format. Serialization has no side effects beyond
//! allocation and reading the OS random source.

mod errors;
mod id;
mod serializer;
mod snapshot;

pub use errors::{RecordError, RecordErrorCode, RecordResult};
pub use id::{RecordId, RECORD_ID_BYTES, RECORD_ID_LEN};
pub use serializer::{
    canonical_header_name, parse_header_line, split_records, LogRecord, RecordHeader,
    PAYLOAD_SEPARATOR,
};
pub use snapshot::RequestSnapshot;
