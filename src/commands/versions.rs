//! Versions command implementation
//!
//! Prints the version each component is pinned to in the packaging
//! manifest. Components without a pin are listed too, so a missing pin is
//! visible before a build silently skips it.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;

use apidoc_sync::manifest;

use super::load_config;

/// Arguments for the versions command
#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "APIDOC_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read pins from this manifest instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Execute the versions command
pub fn execute(args: VersionsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let manifest_path = args.manifest.unwrap_or_else(|| config.manifest.clone());
    let names = config.component_names();

    let versions = manifest::discover_versions(&manifest_path, &names)
        .with_context(|| format!("Failed to read pins from {}", manifest_path.display()))?;

    let rendered = render(&names, &versions, &args.format)?;
    print!("{}", rendered);
    Ok(())
}

fn render(names: &[&str], versions: &BTreeMap<String, String>, format: &str) -> Result<String> {
    match format {
        "text" => {
            let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
            Ok(names
                .iter()
                .map(|name| match versions.get(*name) {
                    Some(version) => format!("{:width$}  {}\n", name, version, width = width),
                    None => format!("{:width$}  (no pin)\n", name, width = width),
                })
                .collect())
        }
        "json" => {
            let map: BTreeMap<&str, Option<&String>> =
                names.iter().map(|name| (*name, versions.get(*name))).collect();
            Ok(format!("{}\n", serde_json::to_string_pretty(&map)?))
        }
        other => bail!("Unknown output format '{}', expected text or json", other),
    }
}
