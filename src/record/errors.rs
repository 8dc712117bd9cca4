//! Record serialization errors
//!
//! Error codes:
//! - HTTPLOG_RECORD_ENTROPY_UNAVAILABLE (FATAL severity)

use std::fmt;

use crate::errors::Severity;

/// Record-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordErrorCode {
    /// The OS random source could not supply identifier bytes
    EntropyUnavailable,
}

impl RecordErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            RecordErrorCode::EntropyUnavailable => "HTTPLOG_RECORD_ENTROPY_UNAVAILABLE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            RecordErrorCode::EntropyUnavailable => Severity::Fatal,
        }
    }
}

impl fmt::Display for RecordErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error raised while building a log record
#[derive(Debug)]
pub struct RecordError {
    code: RecordErrorCode,
    message: String,
    source: Option<rand::Error>,
}

impl RecordError {
    /// The random source failed; no identifier can be produced
    pub fn entropy_unavailable(source: rand::Error) -> Self {
        Self {
            code: RecordErrorCode::EntropyUnavailable,
            message: "OS random source unavailable for record identifier".to_string(),
            source: Some(source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> RecordErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether this error requires process termination
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;
