//! Command handlers -- one module per subcommand

pub mod config;
pub mod matches;
pub mod parse;
pub mod segments;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use gathering_core::config::GatheringConfig;
use gathering_core::error::GatheringError;
use gathering_log_pipeline::{ArenaLog, LogConfig};

use crate::error::CliError;

/// Configuration file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "gathering.toml";

/// Resolve which configuration file to load.
///
/// An explicit path is always used (and must exist). Otherwise the default
/// file is used only if present; `None` means built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            default.exists().then(|| default.to_path_buf())
        }
    }
}

/// Load the effective configuration (file or defaults, then env overrides).
pub async fn load_config(path: Option<&Path>) -> Result<GatheringConfig, GatheringError> {
    match path {
        Some(path) => GatheringConfig::load(path).await,
        None => {
            let mut config = GatheringConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Human-readable name of the configuration source.
pub fn config_source(path: Option<&Path>) -> String {
    path.map_or_else(|| "(defaults)".to_owned(), |p| p.display().to_string())
}

/// Read and segment a client log on the blocking pool.
pub async fn read_log(file: &Path, config: &GatheringConfig) -> Result<ArenaLog, CliError> {
    let log_config = LogConfig::from_core(&config.parser);
    log_config.validate()?;

    info!(path = %file.display(), "loading client log");
    let path = file.to_path_buf();
    let log = tokio::task::spawn_blocking(move || ArenaLog::read(path, log_config))
        .await
        .map_err(|e| CliError::Command(format!("log reader task failed: {e}")))??;

    debug!(
        segments = log.segments().len(),
        preamble_bytes = log.preamble().len(),
        "client log loaded"
    );
    Ok(log)
}
