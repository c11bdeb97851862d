//! Diagnostic logging setup
//!
//! Logs go to stderr so command output on stdout stays clean for piping.
//! `RUST_LOG` takes precedence over the `--verbose` flag.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "fintrack=debug" } else { "warn" };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
