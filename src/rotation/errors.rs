//! Rotating writer error types
//!
//! Error codes:
//! - HTTPLOG_ROTATION_OPEN_FAILED (FATAL severity)
//! - HTTPLOG_APPEND_FAILED (ERROR severity)

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::Severity;

/// Writer-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterErrorCode {
    /// The rotation target could not be opened
    RotationOpenFailed,
    /// Appending a record to the open file failed
    AppendFailed,
}

impl WriterErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            WriterErrorCode::RotationOpenFailed => "HTTPLOG_ROTATION_OPEN_FAILED",
            WriterErrorCode::AppendFailed => "HTTPLOG_APPEND_FAILED",
        }
    }

    /// Returns the severity level for this error.
    ///
    /// An open failure leaves no valid destination, so it is fatal.
    /// An append failure loses one record only.
    pub fn severity(&self) -> Severity {
        match self {
            WriterErrorCode::RotationOpenFailed => Severity::Fatal,
            WriterErrorCode::AppendFailed => Severity::Error,
        }
    }
}

impl fmt::Display for WriterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Writer error with the file it concerns
#[derive(Debug)]
pub struct WriterError {
    code: WriterErrorCode,
    message: String,
    path: PathBuf,
    source: io::Error,
}

impl WriterError {
    /// The rotation target could not be opened
    pub fn open_failed(path: &Path, source: io::Error) -> Self {
        Self {
            code: WriterErrorCode::RotationOpenFailed,
            message: "Cannot open log file".to_string(),
            path: path.to_path_buf(),
            source,
        }
    }

    /// A record could not be appended
    pub fn append_failed(path: &Path, len: usize, source: io::Error) -> Self {
        Self {
            code: WriterErrorCode::AppendFailed,
            message: format!("Failed to append {} byte record", len),
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> WriterErrorCode {
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

    /// Returns the log file involved
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether this error requires process termination
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for WriterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} {:?}: {}",
            self.code.severity(),
            self.code.code(),
            self.message,
            self.path,
            self.source
        )
    }
}

impl std::error::Error for WriterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Result type for writer operations
pub type WriterResult<T> = Result<T, WriterError>;
