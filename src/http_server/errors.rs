//! # HTTP Server Errors

use std::io;

use thiserror::Error;

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Capture server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Server I/O error: {0}")]
    Serve(#[from] io::Error),

    /// Capture can no longer continue safely; the process must stop
    #[error("[FATAL] {code}: {message}")]
    Fatal { code: &'static str, message: String },
}

impl ServerError {
    /// Whether the condition requires the process to terminate
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServerError::Fatal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_fatal_variant_is_fatal() {
        let fatal = ServerError::Fatal {
            code: "HTTPLOG_ROTATION_OPEN_FAILED",
            message: "Cannot open log file".to_string(),
        };
        assert!(fatal.is_fatal());
        assert!(fatal.to_string().contains("HTTPLOG_ROTATION_OPEN_FAILED"));

        assert!(!ServerError::InvalidConfig("x".to_string()).is_fatal());
        assert!(!ServerError::Serve(io::Error::new(io::ErrorKind::Other, "x")).is_fatal());
    }
}
