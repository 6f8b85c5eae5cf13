//! LiveQuiz command-line interface
//!
//! Operator tooling for the session core: channel name lookup, an in-memory
//! end-to-end simulation of a quiz run, and configuration inspection.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod quiz_file;

use commands::{
    channels::{handle_channels_command, ChannelsCommand},
    config::handle_config_command,
    simulate::{handle_simulate_command, SimulateCommand},
};

#[derive(Parser)]
#[command(name = "livequiz")]
#[command(about = "LiveQuiz - live quiz session tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the channel names of a session
    Channels(ChannelsCommand),

    /// Run a quiz end to end against in-memory handlers
    Simulate(SimulateCommand),

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Channels(cmd) => {
            handle_channels_command(&cmd)?;
        }

        Commands::Simulate(cmd) => {
            let config = commands::load_config(cli.config.as_deref())?;
            handle_simulate_command(&cmd, config).await?;
        }

        Commands::Config => {
            let config = commands::load_config(cli.config.as_deref())?;
            handle_config_command(&config)?;
        }
    }

    Ok(())
}
