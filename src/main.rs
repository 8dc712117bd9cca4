//! httplog CLI entry point
//!
//! All logic is delegated to the CLI module. Any error, including a fatal
//! capture condition, is printed to stderr and exits non-zero.

use httplog::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
