//! CLI module for httplog
//!
//! Parses flags (and an optional JSON config file), then boots the capture
//! server and blocks until shutdown.

mod args;
mod commands;
mod errors;

pub use args::Cli;
pub use commands::{resolve_config, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
