//! Gathering CLI -- one-shot reconstruction of Arena player state from a client log

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Commands};
use error::CliError;
use output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = commands::resolve_config_path(cli.config.as_deref());
    let writer = OutputWriter::new(cli.output);

    // `config validate` must report a broken file instead of failing on load.
    let config = match commands::load_config(config_path.as_deref()).await {
        Ok(config) => config,
        Err(e) => match cli.command {
            Commands::Config(args) => {
                logging::init_tracing(&Default::default(), cli.log_level.as_deref())?;
                tracing::debug!(error = %e, "configuration failed to load");
                return commands::config::execute(args, config_path.as_deref(), &writer).await;
            }
            _ => return Err(e.into()),
        },
    };

    logging::init_tracing(&config.general, cli.log_level.as_deref())?;
    gathering_core::metrics::describe_all();
    tracing::debug!(
        config = %commands::config_source(config_path.as_deref()),
        "gathering starting"
    );

    match cli.command {
        Commands::Parse(args) => commands::parse::execute(args, &config, &writer).await,
        Commands::Matches(args) => commands::matches::execute(args, &config, &writer).await,
        Commands::Segments(args) => commands::segments::execute(args, &config, &writer).await,
        Commands::Config(args) => {
            commands::config::execute(args, config_path.as_deref(), &writer).await
        }
    }
}
