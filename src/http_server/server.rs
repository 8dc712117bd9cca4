//! # HTTP Server
//!
//! Owns the rotating writer, builds the capture router and runs the
//! serving loop. The loop ends on the first fatal capture condition,
//! on server I/O failure, or when the shutdown future resolves.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use super::capture_routes::{capture_routes, CaptureState};
use super::config::HttpServerConfig;
use super::errors::{ServerError, ServerResult};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::rotation::RotatingWriter;

/// HTTP capture server
pub struct HttpServer {
    config: HttpServerConfig,
    state: Arc<CaptureState>,
    metrics: Arc<MetricsRegistry>,
    fatal_rx: mpsc::UnboundedReceiver<ServerError>,
}

impl HttpServer {
    /// Create a server writing through a system-clock writer built from
    /// `config.log_file`
    pub fn with_config(config: HttpServerConfig) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        let writer = Arc::new(RotatingWriter::new(config.template(), Arc::clone(&metrics)));
        Self::with_writer(config, writer, metrics)
    }

    /// Create a server around an existing writer
    pub fn with_writer(
        config: HttpServerConfig,
        writer: Arc<RotatingWriter>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();
        let state = Arc::new(CaptureState::new(writer, Arc::clone(&metrics), fatal_tx));
        Self {
            config,
            state,
            metrics,
            fatal_rx,
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.metrics)
    }

    /// Bind the listener without serving yet.
    ///
    /// With no bind address the IPv6 wildcard is tried first, then the
    /// IPv4 wildcard.
    pub async fn bind(self) -> ServerResult<BoundServer> {
        let port = self.config.port;
        let listener = match TcpListener::bind((self.config.host(), port)).await {
            Ok(listener) => listener,
            Err(source) => match self.config.fallback_host() {
                Some(host) => TcpListener::bind((host, port))
                    .await
                    .map_err(|source| ServerError::Bind {
                        addr: format!("{}:{}", host, port),
                        source,
                    })?,
                None => {
                    return Err(ServerError::Bind {
                        addr: self.config.socket_addr(),
                        source,
                    })
                }
            },
        };

        Ok(BoundServer {
            listener,
            router: capture_routes(self.state),
            fatal_rx: self.fatal_rx,
            log_file: self.config.log_file,
        })
    }

    /// Bind and serve until `shutdown` resolves or a fatal condition occurs
    pub async fn start<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        self.bind().await?.serve_until(shutdown).await
    }
}

/// A server whose listener is bound
pub struct BoundServer {
    listener: TcpListener,
    router: Router,
    fatal_rx: mpsc::UnboundedReceiver<ServerError>,
    log_file: String,
}

impl BoundServer {
    /// Address the listener actually bound (resolves port 0)
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests.
    ///
    /// Returns `Ok(())` when `shutdown` resolves and `Err(ServerError::Fatal)`
    /// as soon as any request reports an unrecoverable capture failure.
    /// In-flight requests are abandoned in both cases.
    pub async fn serve_until<F>(mut self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = self.local_addr()?;
        log_event_with_fields(
            Event::Serving,
            &[("addr", &addr.to_string()), ("log_file", &self.log_file)],
        );

        let serve = axum::serve(self.listener, self.router.into_make_service());

        tokio::select! {
            result = serve.into_future() => result.map_err(ServerError::Serve),
            Some(fatal) = self.fatal_rx.recv() => Err(fatal),
            () = shutdown => Ok(()),
        }
    }
}
