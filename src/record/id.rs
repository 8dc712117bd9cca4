//! Per-request record identifiers
//!
//! 12 bytes (96 bits) from the OS CSPRNG, lowercase hex encoded to
//! exactly 24 characters. Uniqueness is probabilistic, never checked.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::{RecordError, RecordResult};

/// Number of random bytes behind an identifier
pub const RECORD_ID_BYTES: usize = 12;

/// Length of the hex form
pub const RECORD_ID_LEN: usize = RECORD_ID_BYTES * 2;

/// Identifier written into the header line of every record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Draws a fresh identifier from the OS random source.
    ///
    /// # Errors
    ///
    /// `HTTPLOG_RECORD_ENTROPY_UNAVAILABLE` (FATAL) if the random source
    /// fails. No fallback identifier is ever produced.
    pub fn generate() -> RecordResult<Self> {
        let mut bytes = [0u8; RECORD_ID_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(RecordError::entropy_unavailable)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Builds the identifier for known bytes.
    pub fn from_bytes(bytes: [u8; RECORD_ID_BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Returns true if `s` has the shape of an identifier: 24 lowercase hex digits.
    pub fn is_well_formed(s: &str) -> bool {
        s.len() == RECORD_ID_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_id_is_24_lowercase_hex() {
        let id = RecordId::generate().unwrap();
        assert_eq!(id.as_str().len(), 24);
        assert!(RecordId::is_well_formed(id.as_str()));
    }

    #[test]
    fn test_generated_ids_differ() {
        let ids: HashSet<_> = (0..1000).map(|_| RecordId::generate().unwrap()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_from_bytes_is_lowercase() {
        let id = RecordId::from_bytes([0xAB; RECORD_ID_BYTES]);
        assert_eq!(id.as_str(), "abababababababababababab");
    }

    #[test]
    fn test_is_well_formed_rejects_bad_shapes() {
        assert!(!RecordId::is_well_formed("ABABABABABABABABABABABAB"));
        assert!(!RecordId::is_well_formed("abab"));
        assert!(!RecordId::is_well_formed("zzzzzzzzzzzzzzzzzzzzzzzz"));
    }
}
