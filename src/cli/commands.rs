//! CLI command implementation
//!
//! Startup sequence:
//! 1. Configuration (file, then flags)
//! 2. Runtime
//! 3. Bind and serve until Ctrl-C or a fatal capture condition

use std::fs;
use std::path::Path;

use crate::http_server::{HttpServer, HttpServerConfig, ServerError};
use crate::observability::{log_event, log_event_with_fields, Event, Logger};

use super::args::Cli;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the server
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}

/// Run the server for already parsed arguments
pub fn run_command(cli: Cli) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = resolve_config(&cli)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("bind", config.host()),
            ("port", &config.port.to_string()),
            ("log_file", &config.log_file),
        ],
    );
    if !config.template().has_time_tokens() {
        Logger::warn(
            "LOG_FILE_NEVER_ROTATES",
            &[("log_file", &config.log_file)],
        );
    }

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(serve(config))
}

/// Load the configuration file if one is given, then apply flags.
pub fn resolve_config(cli: &Cli) -> CliResult<HttpServerConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => HttpServerConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = log_file.clone();
    }

    config
        .validate()
        .map_err(|e| CliError::config_error(e.to_string()))?;

    Ok(config)
}

fn load_config_file(path: &Path) -> CliResult<HttpServerConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
}

async fn serve(config: HttpServerConfig) -> CliResult<()> {
    let server = HttpServer::with_config(config);
    let metrics = server.metrics();

    let result = server.start(shutdown_signal()).await;

    log_event(Event::ShutdownStart);
    match result {
        Ok(()) => {
            log_event_with_fields(Event::ShutdownComplete, &[("metrics", &metrics.to_json())]);
            Ok(())
        }
        Err(e) => Err(shutdown_error(e)),
    }
}

/// Maps the error that ended serving to the process exit error.
///
/// A fatal capture condition is logged at FATAL before exiting.
fn shutdown_error(e: ServerError) -> CliError {
    if e.is_fatal() {
        Logger::fatal("CAPTURE_ABORTED", &[("error", &e.to_string())]);
        CliError::fatal(e.to_string())
    } else {
        CliError::server_failed(e.to_string())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler the server runs until killed.
        std::future::pending::<()>().await;
    }
}
