//! Observable events of the capture server
//!
//! Events are explicit and typed so that log consumers can rely on
//! a closed set of names.

use std::fmt;

/// Observable events in httplog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration resolved from flags and file
    ConfigLoaded,
    /// Listener bound, ready to capture
    Serving,
    /// Shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Capture
    /// Request accepted by the catch-all route
    RequestReceived,
    /// Request body could not be read completely
    BodyReadFailed,

    // Log file
    /// Writer switched to a new target file
    LogFileRotated,
    /// Appending a record failed, record dropped
    RecordAppendFailed,
    /// Target file could not be opened (FATAL)
    RotationOpenFailed,
    /// No entropy for a record identifier (FATAL)
    EntropyUnavailable,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "SERVER_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "SERVER_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::RequestReceived => "REQUEST_RECEIVED",
            Event::BodyReadFailed => "BODY_READ_FAILED",

            Event::LogFileRotated => "LOG_FILE_ROTATED",
            Event::RecordAppendFailed => "RECORD_APPEND_FAILED",
            Event::RotationOpenFailed => "ROTATION_OPEN_FAILED",
            Event::EntropyUnavailable => "ENTROPY_UNAVAILABLE",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::RotationOpenFailed | Event::EntropyUnavailable)
    }

    /// Returns true if this event reports a failure that the server survives
    pub fn is_error(&self) -> bool {
        matches!(self, Event::RecordAppendFailed | Event::BodyReadFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
