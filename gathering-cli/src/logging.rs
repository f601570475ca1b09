//! Logging initialization for the CLI.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `GatheringConfig`. Logs go to stderr so stdout carries only command output.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gathering_core::config::GeneralConfig;

use crate::error::CliError;

/// Build the level filter.
///
/// Precedence: `--log-level` flag, then `RUST_LOG`, then `general.log_level`.
pub fn build_filter(config: &GeneralConfig, override_level: Option<&str>) -> Result<EnvFilter, CliError> {
    match override_level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| CliError::Config(format!("invalid log level '{}': {}", level, e))),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level))),
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Formats
///
/// * `"json"` - JSON lines
/// * `"pretty"` - Human-readable multi-line output
pub fn init_tracing(config: &GeneralConfig, override_level: Option<&str>) -> Result<(), CliError> {
    let env_filter = build_filter(config, override_level)?;

    match config.log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| {
                CliError::Command(format!("failed to initialize JSON tracing subscriber: {}", e))
            }),
        "pretty" => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| {
                CliError::Command(format!(
                    "failed to initialize pretty tracing subscriber: {}",
                    e
                ))
            }),
        other => Err(CliError::Config(format!(
            "unknown log format '{}', expected 'json' or 'pretty'",
            other
        ))),
    }
}
