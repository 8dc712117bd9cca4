//! Observability for the capture server
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Capture counters
//!
//! # Usage
//!
//! ```ignore
//! use httplog::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::LogFileRotated, &[("path", "http-20240301.log")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_error() {
        Severity::Error
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
