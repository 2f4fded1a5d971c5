//! # Documentation Source Fetching
//!
//! A fetch clones a component's repository into a scratch directory, checks
//! out the requested ref, and copies the documentation subtree into
//! `target_dir/<component>`.
//!
//! Fetching is best-effort. [`SourceFetcher::fetch`] never returns an error:
//! a missing external component must not abort the documentation build, so
//! every failure becomes [`FetchOutcome::Failed`] with a reason, is logged at
//! `warn` level, and leaves the component's subdirectory absent.
//!
//! The [`SourceFetcher`] trait is the seam used by the synchronizer, which
//! lets tests substitute a recording fetcher for the git-backed one.

use crate::config::Component;
use crate::error::{Error, Result};
use crate::{filesystem, git};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of fetching one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Sources were copied to `path`.
    Fetched { path: PathBuf },
    /// No fetch was attempted.
    Skipped { reason: String },
    /// The fetch was attempted and failed.
    Failed { reason: String },
}

impl FetchOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched { .. })
    }
}

/// Trait for fetching documentation sources - allows mocking in tests
pub trait SourceFetcher: Send + Sync {
    /// Fetch `component` at `git_ref` into `target_dir/<component name>`.
    fn fetch(&self, component: &Component, git_ref: &str, target_dir: &Path) -> FetchOutcome;
}

/// The default fetcher, backed by the system `git` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }

    fn try_fetch(&self, component: &Component, git_ref: &str, target_dir: &Path) -> Result<PathBuf> {
        // Removed on drop, on every path out of this function.
        let scratch = tempfile::Builder::new()
            .prefix("apidoc-sync-clone-")
            .tempdir()?;

        git::clone_repo(&component.url, scratch.path())?;
        git::checkout(scratch.path(), git_ref)?;

        let docs = scratch.path().join(&component.docs_path);
        if !docs.is_dir() {
            return Err(Error::MissingDocs {
                component: component.name.clone(),
                path: component.docs_path.clone(),
            });
        }

        let dest = target_dir.join(&component.name);
        if let Err(e) = filesystem::copy_tree(&docs, &dest) {
            if dest.exists() {
                // Best effort; the copy error is the one worth reporting.
                let _ = fs::remove_dir_all(&dest);
            }
            return Err(e);
        }

        Ok(dest)
    }
}

impl SourceFetcher for GitFetcher {
    fn fetch(&self, component: &Component, git_ref: &str, target_dir: &Path) -> FetchOutcome {
        info!("Fetching {} at {} from {}", component.name, git_ref, component.url);

        match self.try_fetch(component, git_ref, target_dir) {
            Ok(path) => FetchOutcome::Fetched { path },
            Err(e) => {
                warn!(
                    "Copy from git failed for {} at {}, skipping: {}",
                    component.name, git_ref, e
                );
                FetchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
