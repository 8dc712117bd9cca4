//! Capture HTTP Route
//!
//! A single catch-all handler: every method on every path is serialized
//! into a record and appended to the rotating log. The client always
//! gets an empty `200 OK`.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::StatusCode,
    Router,
};
use tokio::sync::mpsc;

use super::errors::ServerError;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::record::{LogRecord, RequestSnapshot};
use crate::rotation::RotatingWriter;

// ==================
// Shared State
// ==================

/// Capture state shared across request tasks
pub struct CaptureState {
    writer: Arc<RotatingWriter>,
    metrics: Arc<MetricsRegistry>,
    fatal_tx: mpsc::UnboundedSender<ServerError>,
}

impl CaptureState {
    /// `fatal_tx` reaches the serving loop, which stops the server on
    /// the first message.
    pub fn new(
        writer: Arc<RotatingWriter>,
        metrics: Arc<MetricsRegistry>,
        fatal_tx: mpsc::UnboundedSender<ServerError>,
    ) -> Self {
        Self {
            writer,
            metrics,
            fatal_tx,
        }
    }

    /// Serializes and appends one request.
    ///
    /// Append failures are logged and dropped. Fatal conditions are
    /// forwarded to the serving loop.
    pub async fn capture(&self, snapshot: RequestSnapshot) {
        let record = match LogRecord::capture(&snapshot) {
            Ok(record) => record,
            Err(e) => {
                log_event_with_fields(Event::EntropyUnavailable, &[("error", &e.to_string())]);
                self.signal_fatal(e.code().code(), e.to_string());
                return;
            }
        };

        let writer = Arc::clone(&self.writer);
        let result = tokio::task::spawn_blocking(move || writer.write(record.as_bytes())).await;

        match result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) if e.is_fatal() => {
                log_event_with_fields(
                    Event::RotationOpenFailed,
                    &[
                        ("error", &e.to_string()),
                        ("path", &e.path().display().to_string()),
                    ],
                );
                self.signal_fatal(e.code().code(), e.to_string());
            }
            Ok(Err(e)) => {
                log_event_with_fields(
                    Event::RecordAppendFailed,
                    &[
                        ("error", &e.to_string()),
                        ("path", &e.path().display().to_string()),
                    ],
                );
            }
            Err(join_error) => {
                log_event_with_fields(
                    Event::RecordAppendFailed,
                    &[("error", &join_error.to_string())],
                );
            }
        }
    }

    fn signal_fatal(&self, code: &'static str, message: String) {
        // The receiver is gone only once serving has already stopped.
        let _ = self.fatal_tx.send(ServerError::Fatal { code, message });
    }
}

// ==================
// Routes
// ==================

/// Create the catch-all capture router
pub fn capture_routes(state: Arc<CaptureState>) -> Router {
    Router::new().fallback(capture_handler).with_state(state)
}

async fn capture_handler(State(state): State<Arc<CaptureState>>, request: Request) -> StatusCode {
    let (parts, body) = request.into_parts();

    state.metrics.increment_requests();
    log_event_with_fields(
        Event::RequestReceived,
        &[("method", parts.method.as_str()), ("url", &parts.uri.to_string())],
    );

    let body = read_body(body).await;
    state.capture(RequestSnapshot::from_parts(&parts, body)).await;

    // Always 200, even when the record was not written. After a fatal
    // signal the serving loop stops, so this response may never be flushed.
    StatusCode::OK
}

/// Collects the whole body; a broken body is recorded as empty.
async fn read_body(body: Body) -> Bytes {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log_event_with_fields(Event::BodyReadFailed, &[("error", &e.to_string())]);
            Bytes::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::split_records;
    use crate::rotation::{FilenameTemplate, ManualClock};
    use axum::http::{self, Method};
    use chrono::{Local, TimeZone};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state_in(dir: &TempDir, template: &str) -> (Arc<CaptureState>, mpsc::UnboundedReceiver<ServerError>) {
        let clock = Arc::new(ManualClock::new(
            Local.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        ));
        let metrics = Arc::new(MetricsRegistry::new());
        let writer = Arc::new(RotatingWriter::with_clock(
            FilenameTemplate::new(format!("{}/{}", dir.path().display(), template)),
            clock,
            Arc::clone(&metrics),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(CaptureState::new(writer, metrics, tx)), rx)
    }

    #[tokio::test]
    async fn test_every_method_and_path_is_captured() {
        let dir = TempDir::new().unwrap();
        let (state, _rx) = state_in(&dir, "http-%Y%m%d.log");
        let router = capture_routes(Arc::clone(&state));

        for (method, uri) in [
            (Method::GET, "/"),
            (Method::POST, "/deep/nested/path?x=1"),
            (Method::DELETE, "/items/7"),
            (Method::PUT, "/items/7?force=true"),
        ] {
            let request = http::Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(body.is_empty());
        }

        let log = fs::read(dir.path().join("http-20240301.log")).unwrap();
        assert_eq!(split_records(&log).len(), 4);
        assert_eq!(state.metrics.snapshot().requests_received, 4);
    }

    #[tokio::test]
    async fn test_open_failure_signals_fatal_but_still_responds() {
        let dir = TempDir::new().unwrap();
        let (state, mut rx) = state_in(&dir, "no-such-dir/http.log");
        let router = capture_routes(state);

        let request = http::Request::builder().uri("/x").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let signal = rx.try_recv().unwrap();
        assert!(signal.is_fatal());
        assert!(signal.to_string().contains("HTTPLOG_ROTATION_OPEN_FAILED"));
    }
}
