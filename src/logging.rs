// src/logging.rs
// =============================================================================
// Sets up `tracing` output for the CLI.
//
// Levels:
// - default: debug (every single warm-up request is logged)
// - --quiet: info (phase changes and the summary only)
// - RUST_LOG, when set, always wins
//
// Logs go to stderr so `--json` output on stdout can be piped.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

// Dependencies that get chatty at debug level
const QUIET_DEPENDENCIES: &str = "hyper=warn,reqwest=warn,rustls=warn,html5ever=warn,selectors=warn";

pub fn init(quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("could not initialize logging: {}", e))
}

fn default_directives(quiet: bool) -> String {
    let level = if quiet { "info" } else { "debug" };
    format!("{},{}", level, QUIET_DEPENDENCIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert!(default_directives(false).starts_with("debug,"));
        assert!(default_directives(true).starts_with("info,"));
        assert!(default_directives(true).contains("reqwest=warn"));
    }
}
