//! httplog - capture every HTTP request into a replayable, time-rotated log
//!
//! Request → [`record::LogRecord`] → [`rotation::RotatingWriter`]

pub mod cli;
pub mod errors;
pub mod http_server;
pub mod observability;
pub mod record;
pub mod rotation;
