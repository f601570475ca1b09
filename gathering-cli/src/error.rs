//! CLI-specific error types and exit code mapping

use gathering_core::error::GatheringError;
use gathering_log_pipeline::ArenaLogError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The client log could not be read.
    #[error("log file error: {0}")]
    LogFile(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | General / command error         |
    /// | 2    | Configuration error             |
    /// | 3    | Client log missing or too large |
    /// | 10   | IO error                        |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::LogFile(_) => 3,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<GatheringError> for CliError {
    fn from(e: GatheringError) -> Self {
        match e {
            GatheringError::Config(_) => Self::Config(e.to_string()),
            GatheringError::Io(io) => Self::Io(io),
            GatheringError::Parse(_) => Self::Command(e.to_string()),
        }
    }
}

impl From<ArenaLogError> for CliError {
    fn from(e: ArenaLogError) -> Self {
        match e {
            ArenaLogError::Config { .. } => Self::Config(e.to_string()),
            ArenaLogError::Io(_) | ArenaLogError::TooLarge { .. } => Self::LogFile(e.to_string()),
            _ => Self::Command(e.to_string()),
        }
    }
}
