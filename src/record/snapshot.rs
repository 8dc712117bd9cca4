//! Request snapshots handed from the transport to the serializer

use axum::body::Bytes;
use axum::http::request::Parts;
use axum::http::Version;

/// Immutable view of one received request.
///
/// Headers keep arrival order; a name may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    method: String,
    url: String,
    proto: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl RequestSnapshot {
    /// Creates a snapshot with no headers and an empty body
    pub fn new(method: impl Into<String>, url: impl Into<String>, proto: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            proto: proto.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Adds one header value
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Captures the parsed request head and the collected body.
    ///
    /// Header values that are not valid UTF-8 are kept lossily.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Self {
            method: parts.method.as_str().to_string(),
            url: parts.uri.to_string(),
            proto: protocol_name(parts.version).to_string(),
            headers,
            body,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn proto(&self) -> &str {
        &self.proto
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Request-line protocol name, `HTTP/major.minor`
fn protocol_name(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_from_parts_captures_request_head() {
        let request = Request::builder()
            .method("POST")
            .uri("/orders?limit=5")
            .version(Version::HTTP_11)
            .header("Host", "example.com")
            .header("X-Trace", "a")
            .header("X-Trace", "b")
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        let snapshot = RequestSnapshot::from_parts(&parts, Bytes::from_static(b"{}"));

        assert_eq!(snapshot.method(), "POST");
        assert_eq!(snapshot.url(), "/orders?limit=5");
        assert_eq!(snapshot.proto(), "HTTP/1.1");
        assert_eq!(snapshot.body(), b"{}");
        assert_eq!(
            snapshot.headers(),
            &[
                ("host".to_string(), "example.com".to_string()),
                ("x-trace".to_string(), "a".to_string()),
                ("x-trace".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_protocol_name_per_version() {
        for (version, expected) in [
            (Version::HTTP_09, "HTTP/0.9"),
            (Version::HTTP_10, "HTTP/1.0"),
            (Version::HTTP_11, "HTTP/1.1"),
            (Version::HTTP_2, "HTTP/2.0"),
            (Version::HTTP_3, "HTTP/3.0"),
        ] {
            let (parts, ()) = Request::builder()
                .version(version)
                .body(())
                .unwrap()
                .into_parts();
            let snapshot = RequestSnapshot::from_parts(&parts, Bytes::new());
            assert_eq!(snapshot.proto(), expected);
        }
    }

    #[test]
    fn test_builder_defaults() {
        let snapshot = RequestSnapshot::new("GET", "/", "HTTP/1.0");
        assert!(snapshot.headers().is_empty());
        assert!(snapshot.body().is_empty());
    }
}
