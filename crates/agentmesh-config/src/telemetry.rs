//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::{
    error::{ConfigError, Result},
    types::LoggingConfig,
};

/// Build the filter: `RUST_LOG` wins, the configured level is the fallback.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| ConfigError::Logging(format!("invalid level '{}': {}", config.level, e))),
    }
}

/// Install the global fmt subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(level = %config.level, "Tracing initialized");
    }
    Ok(installed)
}
