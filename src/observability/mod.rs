//! Logging setup for the command-line entry point.
//!
//! The library only emits `tracing` events. The binary installs a
//! `tracing-subscriber` formatter writing to stderr, so that JSON written to
//! stdout stays machine-readable.
//!
//! ## Levels
//!
//! - default: `info` (per-report "Parsing" lines and import summaries)
//! - `-v`: `debug`
//! - `-vv` and more: `trace`
//! - `--quiet`: `warn` (missing reports and deprecated keys only)
//!
//! `RUST_LOG` overrides all of the above.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level.
pub fn default_directive(verbosity: u8, quiet: bool) -> String {
    let level = match (quiet, verbosity) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    format!("warn,genericcov={}", level)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(verbosity: u8, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}
