//! Rotating, concurrency-safe log writer
//!
//! One mutex covers the whole operation:
//! 1. Read the clock
//! 2. If no file is open or the rotation boundary has passed, re-resolve
//!    the template and move the boundary to the next whole second
//! 3. If the resolved path differs from the open file, open it
//!    (create + truncate), replacing the old handle
//! 4. Append the record
//!
//! Records therefore never interleave and a rotation never races an append.
//!
//! Opening truncates. A restart, or a return to a previously used name,
//! discards what that file held before.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Local, Timelike};

use super::clock::{Clock, SystemClock};
use super::errors::{WriterError, WriterResult};
use super::template::FilenameTemplate;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

/// The file currently receiving records
struct OpenLog {
    path: PathBuf,
    file: File,
}

/// Mutable writer state, only touched under the writer's lock
#[derive(Default)]
struct WriterState {
    /// At most one handle is open at a time
    file: Option<OpenLog>,
    /// Name resolved at the last rotation decision
    current_name: Option<PathBuf>,
    /// Re-resolve once the clock is strictly after this instant
    next_rotation: Option<DateTime<Local>>,
}

impl WriterState {
    fn rotation_due(&self, now: DateTime<Local>) -> bool {
        match (&self.file, self.next_rotation) {
            (Some(_), Some(boundary)) => now > boundary,
            _ => true,
        }
    }
}

/// Appends serialized records to a time-bucketed log file.
///
/// Shared between request tasks behind an `Arc`; every method takes `&self`.
pub struct RotatingWriter {
    template: FilenameTemplate,
    clock: Arc<dyn Clock>,
    metrics: Arc<MetricsRegistry>,
    state: Mutex<WriterState>,
}

impl RotatingWriter {
    /// Creates a writer on the system clock. No file is opened until the
    /// first write.
    pub fn new(template: FilenameTemplate, metrics: Arc<MetricsRegistry>) -> Self {
        Self::with_clock(template, Arc::new(SystemClock), metrics)
    }

    /// Creates a writer reading time from `clock`.
    pub fn with_clock(
        template: FilenameTemplate,
        clock: Arc<dyn Clock>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            template,
            clock,
            metrics,
            state: Mutex::new(WriterState::default()),
        }
    }

    /// Path of the file currently open for writing, if any.
    pub fn current_path(&self) -> Option<PathBuf> {
        self.lock_state().file.as_ref().map(|open| open.path.clone())
    }

    /// Appends `data` to the log file for the current time.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// - `HTTPLOG_ROTATION_OPEN_FAILED` (FATAL) if the target cannot be opened.
    ///   No handle is left open afterwards.
    /// - `HTTPLOG_APPEND_FAILED` if the append fails. The record is dropped;
    ///   the writer does not retry.
    pub fn write(&self, data: &[u8]) -> WriterResult<usize> {
        let mut state = self.lock_state();
        let now = self.clock.now();

        if state.rotation_due(now) {
            state.next_rotation = Some(next_boundary(now));
            state.current_name = Some(self.template.resolve(&now));
        }

        let open = match state.file.take() {
            Some(open) if state.current_name.as_deref() == Some(open.path.as_path()) => open,
            stale => {
                // Close the previous file before opening the next one.
                drop(stale);
                let path = match state.current_name.clone() {
                    Some(path) => path,
                    None => self.template.resolve(&now),
                };
                self.open_target(path)?
            }
        };

        let open = state.file.insert(open);
        match open.file.write_all(data) {
            Ok(()) => {
                self.metrics.record_append(data.len() as u64);
                Ok(data.len())
            }
            Err(e) => {
                self.metrics.increment_append_failures();
                Err(WriterError::append_failed(&open.path, data.len(), e))
            }
        }
    }

    fn open_target(&self, path: PathBuf) -> WriterResult<OpenLog> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| WriterError::open_failed(&path, e))?;

        self.metrics.increment_rotations();
        log_event_with_fields(Event::LogFileRotated, &[("path", &display(&path))]);

        Ok(OpenLog { path, file })
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, WriterState> {
        // A panic mid-write leaves the state consistent: at worst the
        // handle is missing and the next write reopens.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `now` truncated to the whole second, plus one second
fn next_boundary(now: DateTime<Local>) -> DateTime<Local> {
    now - Duration::nanoseconds(i64::from(now.nanosecond())) + Duration::seconds(1)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
