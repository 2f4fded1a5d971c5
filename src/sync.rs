//! # API-Source Synchronizer
//!
//! The synchronizer implements the two build hooks:
//!
//! - [`Synchronizer::sync`] runs before the documentation build. It fills the
//!   target directory with each component's documentation sources and
//!   returns a [`SyncState`] recording what it did.
//! - [`Synchronizer::cleanup`] runs after the build, success or failure. It
//!   consumes the state and puts the target directory back the way it was.
//!
//! ## Modes
//!
//! - **Pinned** (default): versions come from the packaging manifest. If the
//!   target directory already exists nothing is fetched and nothing will be
//!   cleaned up; the directory belongs to the caller.
//! - **Latest**: any existing target directory is moved aside into a backup
//!   directory, every component is installed from its default branch, and
//!   docs are fetched at `HEAD`. Cleanup deletes the fetched tree and moves
//!   the backup back.
//!
//! | Pre-condition                 | Action                              | State recorded          |
//! |-------------------------------|-------------------------------------|-------------------------|
//! | target exists, pinned mode    | skip fetching, warn                 | `already_present`       |
//! | latest mode                   | back up existing dir, fetch `HEAD`  | `latest_backup`         |
//! | neither                       | fetch pinned versions               | nothing                 |

use crate::config::{Component, Config};
use crate::error::{Error, Result};
use crate::fetcher::{FetchOutcome, GitFetcher, SourceFetcher};
use crate::installer::{CommandInstaller, PackageInstaller};
use crate::{filesystem, manifest};
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Ref used for every component in latest mode.
pub const LATEST_REF: &str = "HEAD";

/// Name prefix of backup directories created next to the target.
const BACKUP_PREFIX: &str = ".apidoc-sync-backup-";

/// Name of the relocated target directory inside the backup directory.
const BACKUP_ENTRY: &str = "apidoc";

/// Which versions of the components to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Versions pinned in the packaging manifest.
    #[default]
    Pinned,
    /// The tip of each component's default branch.
    Latest,
}

impl SyncMode {
    /// Read the latest-mode toggle from the environment variable `var`.
    pub fn from_env(var: &str) -> Self {
        Self::from_toggle(std::env::var(var).ok().as_deref())
    }

    /// Interpret a boolean-like toggle value.
    ///
    /// Unset, empty, `0`, `false`, `no` and `off` (any case) select pinned
    /// mode. Anything else selects latest mode.
    pub fn from_toggle(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            None => SyncMode::Pinned,
            Some(v) if matches!(v.as_str(), "" | "0" | "false" | "no" | "off") => SyncMode::Pinned,
            Some(_) => SyncMode::Latest,
        }
    }
}

/// A component paired with the ref it resolved to.
///
/// `version_or_ref` is `None` when pinned mode found no pin in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub name: String,
    pub version_or_ref: Option<String>,
}

/// What happened to one component during sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentReport {
    pub name: String,
    pub version_or_ref: Option<String>,
    pub outcome: FetchOutcome,
}

/// State handed from [`Synchronizer::sync`] to [`Synchronizer::cleanup`].
#[derive(Debug)]
#[must_use = "pass the state to Synchronizer::cleanup after the build"]
pub struct SyncState {
    already_present: bool,
    latest_backup: Option<PathBuf>,
    reports: Vec<ComponentReport>,
}

impl SyncState {
    /// The target directory existed before sync and is not owned by this run.
    pub fn already_present(&self) -> bool {
        self.already_present
    }

    /// Where the pre-existing target was moved during a latest-mode sync.
    pub fn latest_backup(&self) -> Option<&Path> {
        self.latest_backup.as_deref()
    }

    /// Per-component outcomes, in configuration order.
    pub fn reports(&self) -> &[ComponentReport] {
        &self.reports
    }

    /// Number of components whose sources were fetched.
    pub fn fetched_count(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_fetched()).count()
    }
}

/// What [`Synchronizer::clean`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// The target directory existed and was removed.
    pub removed_target: bool,
    /// Backup directory whose contents were moved back into the target.
    pub restored_from: Option<PathBuf>,
}

/// Fetches component documentation around a build.
pub struct Synchronizer {
    config: Config,
    fetcher: Box<dyn SourceFetcher>,
    installer: Box<dyn PackageInstaller>,
}

impl Synchronizer {
    /// Creates a synchronizer that fetches with `git` and installs with the
    /// configured installer command.
    pub fn new(config: Config) -> Self {
        let installer = CommandInstaller::new(config.installer.clone());
        Self {
            config,
            fetcher: Box::new(GitFetcher::new()),
            installer: Box::new(installer),
        }
    }

    /// Creates a synchronizer with custom fetch and install operations.
    pub fn with_operations(
        config: Config,
        fetcher: Box<dyn SourceFetcher>,
        installer: Box<dyn PackageInstaller>,
    ) -> Self {
        Self {
            config,
            fetcher,
            installer,
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.config.target
    }

    /// Map each component with a pin in the manifest to its version.
    pub fn discover_versions(&self) -> Result<BTreeMap<String, String>> {
        manifest::discover_versions(&self.config.manifest, &self.config.component_names())
    }

    /// Resolve the ref each component would be fetched at in `mode`.
    pub fn resolve(&self, mode: SyncMode) -> Result<Vec<ComponentSpec>> {
        let versions = match mode {
            SyncMode::Pinned => Some(self.discover_versions()?),
            SyncMode::Latest => None,
        };

        Ok(self
            .config
            .components
            .iter()
            .map(|c| ComponentSpec {
                name: c.name.clone(),
                version_or_ref: match &versions {
                    Some(versions) => versions.get(&c.name).cloned(),
                    None => Some(LATEST_REF.to_string()),
                },
            })
            .collect())
    }

    /// Build-start hook: populate the target directory.
    pub fn sync(&self, mode: SyncMode) -> Result<SyncState> {
        let target = self.target_dir();
        let mut state = SyncState {
            already_present: false,
            latest_backup: None,
            reports: Vec::new(),
        };

        match mode {
            SyncMode::Pinned if target.is_dir() => {
                warn!(
                    "{} already exists, skipping source clone",
                    target.display()
                );
                state.already_present = true;
                return Ok(state);
            }
            SyncMode::Pinned => {}
            SyncMode::Latest => {
                state.latest_backup = Some(self.back_up_target()?);
                if let Err(e) = self.installer.install(&self.config.components) {
                    warn!("Installing latest components failed, continuing: {}", e);
                }
            }
        }

        let specs = self.resolve(mode)?;
        for (component, spec) in self.config.components.iter().zip(specs) {
            let outcome = self.fetch_one(component, spec.version_or_ref.as_deref(), target);
            state.reports.push(ComponentReport {
                name: spec.name,
                version_or_ref: spec.version_or_ref,
                outcome,
            });
        }

        info!(
            "Fetched {} of {} components into {}",
            state.fetched_count(),
            state.reports.len(),
            target.display()
        );
        Ok(state)
    }

    fn fetch_one(&self, component: &Component, git_ref: Option<&str>, target: &Path) -> FetchOutcome {
        match git_ref {
            Some(git_ref) => self.fetcher.fetch(component, git_ref, target),
            None => FetchOutcome::Skipped {
                reason: "no version pin in manifest".to_string(),
            },
        }
    }

    /// Move an existing target directory aside. Always creates the backup
    /// directory so cleanup knows latest mode ran.
    fn back_up_target(&self) -> Result<PathBuf> {
        let target = self.target_dir();
        let parent = self.backup_parent();
        fs::create_dir_all(parent)?;

        let backup = tempfile::Builder::new()
            .prefix(BACKUP_PREFIX)
            .tempdir_in(parent)?
            .keep();

        if target.exists() {
            info!("Moving {} aside to {}", target.display(), backup.display());
            filesystem::move_dir(target, &backup.join(BACKUP_ENTRY))?;
        }

        Ok(backup)
    }

    /// Build-finish hook: undo what `sync` did.
    pub fn cleanup(&self, state: SyncState) -> Result<()> {
        let target = self.target_dir();

        if state.already_present {
            return Ok(());
        }

        remove_if_exists(target)?;

        if let Some(backup) = &state.latest_backup {
            self.restore_backup(backup)?;
        }

        Ok(())
    }

    /// Clean up without a [`SyncState`], as after a `fetch` in another
    /// process.
    ///
    /// Removes the target directory. A latest-mode backup left next to it is
    /// moved back into place. When more than one backup holds saved sources
    /// nothing is touched, since it is unclear which one to restore.
    pub fn clean(&self) -> Result<CleanReport> {
        let target = self.target_dir();
        let backups = self.find_backups()?;
        let holding: Vec<&PathBuf> = backups
            .iter()
            .filter(|b| b.join(BACKUP_ENTRY).exists())
            .collect();

        if holding.len() > 1 {
            let names: Vec<String> = holding.iter().map(|b| b.display().to_string()).collect();
            return Err(Error::Cleanup {
                path: target.display().to_string(),
                message: format!(
                    "several backups hold saved sources, restore one by hand: {}",
                    names.join(", ")
                ),
            });
        }

        let mut report = CleanReport {
            removed_target: target.exists(),
            restored_from: None,
        };
        remove_if_exists(target)?;

        for backup in &backups {
            if self.restore_backup(backup)? {
                info!("Restored {} from {}", target.display(), backup.display());
                report.restored_from = Some(backup.clone());
            }
        }

        Ok(report)
    }

    /// Move the saved target out of `backup`, then delete `backup`.
    /// Returns whether anything was restored.
    fn restore_backup(&self, backup: &Path) -> Result<bool> {
        let target = self.target_dir();
        let saved = backup.join(BACKUP_ENTRY);
        let restored = saved.exists();
        if restored {
            filesystem::move_dir(&saved, target).map_err(|e| Error::Cleanup {
                path: target.display().to_string(),
                message: format!("restoring from {}: {}", saved.display(), e),
            })?;
        }
        remove_if_exists(backup)?;
        Ok(restored)
    }

    /// Backup directories left next to the target, oldest name first.
    fn find_backups(&self) -> Result<Vec<PathBuf>> {
        let parent = self.backup_parent();
        if !parent.is_dir() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(parent)? {
            let entry = entry?;
            if entry.file_name().to_string_lossy().starts_with(BACKUP_PREFIX)
                && entry.file_type()?.is_dir()
            {
                backups.push(entry.path());
            }
        }
        backups.sort();
        Ok(backups)
    }

    fn backup_parent(&self) -> &Path {
        self.target_dir()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    fs::remove_dir_all(path).map_err(|e| Error::Cleanup {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
