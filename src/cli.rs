//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use apidoc_sync::output::OutputConfig;

use crate::commands;

/// apidoc-sync - Fetch API documentation sources around a docs build
#[derive(Parser, Debug)]
#[command(name = "apidoc-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch API doc sources, run a build command, then clean up
    Run(commands::run::RunArgs),

    /// Fetch API doc sources and leave them in place
    Fetch(commands::fetch::FetchArgs),

    /// Show the version pinned for each component
    Versions(commands::versions::VersionsArgs),

    /// Remove the API doc sources directory
    Clean(commands::clean::CleanArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Run(args) => commands::run::execute(args, &output),
            Commands::Fetch(args) => commands::fetch::execute(args, &output),
            Commands::Versions(args) => commands::versions::execute(args),
            Commands::Clean(args) => commands::clean::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Log to stderr at `level`; `RUST_LOG` takes precedence when set.
fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env();
    // A logger may already be installed when running under a test harness.
    let _ = builder.try_init();
}
