//! Run command implementation
//!
//! Wraps a documentation build in the two sync hooks:
//! 1. Fetch API doc sources (pinned or latest)
//! 2. Run the build command given after `--`
//! 3. Clean up, whether or not the build succeeded

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use apidoc_sync::build;
use apidoc_sync::output::{emoji, format_state, OutputConfig};
use apidoc_sync::sync::Synchronizer;

use super::{load_config, ModeArgs};

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "APIDOC_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Directory to run the build command in
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Suppress the per-component report
    #[arg(short, long)]
    pub quiet: bool,

    /// Build command and its arguments
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Execute the run command
pub fn execute(args: RunArgs, output: &OutputConfig) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mode = args.mode.resolve(&config);
    let synchronizer = Synchronizer::new(config);

    let status = build::with_api_sources(&synchronizer, mode, |state| {
        if !args.quiet {
            for line in format_state(output, state) {
                println!("{}", line);
            }
        }
        build::run_command(&args.command, args.cwd.as_deref())
    })?;

    if !status.success() {
        bail!("Build command '{}' failed: {}", args.command.join(" "), status);
    }

    if !args.quiet {
        println!("{} Build finished, API doc sources cleaned up", emoji(output, "✨", "[DONE]"));
    }
    Ok(())
}
