//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O happen here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Gathering -- rebuild MTG Arena player state from a client log.
///
/// Use `gathering <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "gathering", version, about, long_about = None)]
pub struct Cli {
    /// Path to the gathering.toml configuration file.
    ///
    /// When omitted, `gathering.toml` in the working directory is used if it
    /// exists, otherwise built-in defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconstruct the full upload aggregate from a client log.
    Parse(ParseArgs),

    /// List the matches reconstructed from a client log.
    Matches(MatchesArgs),

    /// Show how the segments of a client log were classified.
    Segments(SegmentsArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- parse ----

/// Build the upload aggregate for one log snapshot.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Client log file (`output_log.txt`).
    pub file: PathBuf,

    /// Mark the snapshot as taken while the game is running.
    #[arg(long)]
    pub playing: bool,
}

// ---- matches ----

/// Replay match segments and report reconstructed matches.
#[derive(Args, Debug)]
pub struct MatchesArgs {
    /// Client log file (`output_log.txt`).
    pub file: PathBuf,

    /// Also list discarded segments and abandoned matches.
    #[arg(short, long)]
    pub verbose: bool,
}

// ---- segments ----

/// Segment classification histogram.
#[derive(Args, Debug)]
pub struct SegmentsArgs {
    /// Client log file (`output_log.txt`).
    pub file: PathBuf,

    /// Only count segments of this kind (e.g. `match-start`).
    #[arg(long)]
    pub kind: Option<String>,
}

// ---- config ----

/// Manage gathering configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, parser).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_parse_defaults() {
        let cli = Cli::try_parse_from(["gathering", "parse", "output_log.txt"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.file, PathBuf::from("output_log.txt"));
                assert!(!args.playing, "playing should default to false");
            }
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn test_cli_parse_parse_playing() {
        let cli = Cli::try_parse_from(["gathering", "parse", "log.txt", "--playing"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Parse(args) => assert!(args.playing, "playing should be true"),
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn test_cli_parse_requires_file() {
        let args = Cli::try_parse_from(["gathering", "parse"]);
        assert!(args.is_err(), "parse without a file should fail");
    }

    #[test]
    fn test_cli_parse_matches_verbose() {
        let cli = Cli::try_parse_from(["gathering", "matches", "-v", "log.txt"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Matches(args) => {
                assert!(args.verbose);
                assert_eq!(args.file, PathBuf::from("log.txt"));
            }
            _ => panic!("expected Matches command"),
        }
    }

    #[test]
    fn test_cli_parse_segments_kind_filter() {
        let cli = Cli::try_parse_from(["gathering", "segments", "log.txt", "--kind", "match-start"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Segments(args) => {
                assert_eq!(args.kind.as_deref(), Some("match-start"));
            }
            _ => panic!("expected Segments command"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli =
            Cli::try_parse_from(["gathering", "config", "validate"]).expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => {
                assert!(matches!(config_args.action, ConfigAction::Validate));
            }
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["gathering", "config", "show", "--section", "parser"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section.as_deref(), Some("parser"));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_config_path_is_optional() {
        let cli = Cli::try_parse_from(["gathering", "segments", "log.txt"])
            .expect("parse succeeded");
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gathering",
            "matches",
            "log.txt",
            "--output",
            "json",
            "-c",
            "/custom/gathering.toml",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/gathering.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_parse_invalid_output_format_fails() {
        let args = Cli::try_parse_from(["gathering", "--output", "yaml", "segments", "log.txt"]);
        assert!(args.is_err(), "unknown output format should fail");
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        assert!(Cli::try_parse_from(["gathering"]).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "gathering");

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for expected in ["parse", "matches", "segments", "config"] {
            assert!(
                subcommands.contains(&expected),
                "should have '{expected}' subcommand"
            );
        }
        cmd.debug_assert();
    }
}
