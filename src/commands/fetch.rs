//! Fetch command implementation
//!
//! Runs only the build-start hook. The fetched directory stays in place, so
//! later `run` invocations treat it as pre-existing and leave it alone.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use apidoc_sync::output::{emoji, format_state, OutputConfig};
use apidoc_sync::sync::Synchronizer;

use super::{load_config, ModeArgs};

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "APIDOC_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub mode: ModeArgs,
}

/// Execute the fetch command
pub fn execute(args: FetchArgs, output: &OutputConfig) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mode = args.mode.resolve(&config);
    let synchronizer = Synchronizer::new(config);

    let state = synchronizer.sync(mode)?;
    for line in format_state(output, &state) {
        println!("{}", line);
    }

    if let Some(backup) = state.latest_backup() {
        println!(
            "{} Previous sources saved in {}; restore them with `apidoc-sync clean`",
            emoji(output, "💾", "[BACKUP]"),
            backup.display()
        );
    }
    if !state.already_present() {
        println!(
            "Sources left in {}; remove them with `apidoc-sync clean`",
            synchronizer.target_dir().display()
        );
    }

    Ok(())
}
