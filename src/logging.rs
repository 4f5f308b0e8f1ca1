//! Logging
//!
//! `tracing-subscriber` setup for the CLI. The library only emits events.

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Build the log filter
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `debug` with
/// `verbose` and `warn` without, and dependencies stay at `warn`.
pub fn build_filter(verbose: bool) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    parse_filter(&default_directives(verbose))
}

/// Directives used when `RUST_LOG` is unset
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    format!("warn,gh_label_importer={}", level)
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| Error::config_validation(format!("Invalid log filter: {}", e)))
}

/// Install the global subscriber, writing to stderr
///
/// # Errors
/// Returns an error if the filter is invalid or a subscriber is already installed
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = build_filter(verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::config_validation(format!("Failed to initialize logging: {}", e)))
}
