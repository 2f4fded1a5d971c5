//! # CLI Command Implementations
//!
//! Each subcommand of `apidoc-sync` lives in its own file with an `Args`
//! struct derived using `clap` and an `execute` function that calls into the
//! `apidoc_sync` library.

pub mod clean;
pub mod completions;
pub mod fetch;
pub mod run;
pub mod versions;

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use apidoc_sync::config::{self, Config, DEFAULT_CONFIG_FILE};
use apidoc_sync::sync::SyncMode;

/// Options shared by commands that fetch sources.
#[derive(Args, Debug, Default, Clone)]
pub struct ModeArgs {
    /// Fetch each component's default-branch tip instead of pinned versions
    #[arg(long, conflicts_with = "pinned")]
    pub latest: bool,

    /// Fetch pinned versions even if the latest-mode variable is set
    #[arg(long)]
    pub pinned: bool,
}

impl ModeArgs {
    /// Flags win over the environment toggle named in the configuration.
    pub fn resolve(&self, config: &Config) -> SyncMode {
        if self.latest {
            SyncMode::Latest
        } else if self.pinned {
            SyncMode::Pinned
        } else {
            SyncMode::from_env(&config.latest_env)
        }
    }
}

/// Load the configuration file, defaulting to `.apidoc-sync.yaml`.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if !path.exists() {
        bail!("Configuration file not found: {}", path.display());
    }

    config::from_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
