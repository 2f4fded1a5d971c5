//! Clean command implementation
//!
//! Removes the target directory left behind by `fetch`. This is the manual
//! counterpart of the build-finish hook. It has no sync state to consult, so
//! a latest-mode backup is found by looking next to the target and moved
//! back into place.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use apidoc_sync::output::{emoji, OutputConfig};
use apidoc_sync::sync::Synchronizer;

use super::load_config;

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "APIDOC_SYNC_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Execute the clean command
pub fn execute(args: CleanArgs, output: &OutputConfig) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let synchronizer = Synchronizer::new(config);
    let target = synchronizer.target_dir();

    let report = synchronizer
        .clean()
        .with_context(|| format!("Failed to clean {}", target.display()))?;

    if report.removed_target {
        println!("{} Removed {}", emoji(output, "🧹", "[CLEAN]"), target.display());
    }
    if let Some(backup) = &report.restored_from {
        println!(
            "{} Restored {} from {}",
            emoji(output, "♻️", "[RESTORE]"),
            target.display(),
            backup.display()
        );
    }
    if !report.removed_target && report.restored_from.is_none() {
        println!("Nothing to clean, {} does not exist", target.display());
    }
    Ok(())
}
