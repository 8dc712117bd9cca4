//! CLI argument definitions using clap
//!
//! httplog [--config <path>] [--bind <addr>] [--port <port>] [--log-file <template>]
//!
//! Flags override values read from the configuration file.

use clap::Parser;
use std::path::PathBuf;

/// httplog - capture every HTTP request into a replayable, time-rotated log
#[derive(Parser, Debug, Default)]
#[command(name = "httplog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Optional JSON configuration file (keys: bind, port, log_file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// HTTP bind address [default: all interfaces]
    #[arg(long)]
    pub bind: Option<String>,

    /// HTTP port [default: 8080]
    #[arg(long)]
    pub port: Option<u16>,

    /// Log file name with date tokens %Y %m %d %H %M %S [default: http-%Y%m%d.log]
    #[arg(long)]
    pub log_file: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
