//! Logging setup for the CLI.
//!
//! Library code only emits `tracing` events; the binary installs a stderr
//! subscriber here. `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `level` is a plain level ("info") or any EnvFilter directive
/// ("santa_shuffle=debug,warn").
pub fn init_logging(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_filter(level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn build_filter(level: &str) -> Result<EnvFilter, Box<dyn std::error::Error>> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(level)
        .map_err(|e| format!("Invalid log level '{}': {}", level, e).into())
}
