//! # httplog HTTP Server Module
//!
//! Accepts every request on every path, hands it to the record serializer
//! and the rotating writer, and answers with an empty `200 OK`.
//!
//! A failure to open the log file stops the serving loop with
//! [`ServerError::Fatal`]; the caller is expected to exit.

pub mod capture_routes;
pub mod config;
pub mod errors;
pub mod server;

pub use capture_routes::{capture_routes, CaptureState};
pub use config::HttpServerConfig;
pub use errors::{ServerError, ServerResult};
pub use server::{BoundServer, HttpServer};
