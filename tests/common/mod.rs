//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then `use common::prelude::*;`.
//!
//! Repositories are created locally with the system `git` and referenced by
//! path, so no test needs network access. Tests that need git call
//! [`git_available`] first and return early without it.

use assert_fs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    pub use super::TestFixture;
}

/// Check whether `git` can be run.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(cwd: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed in {}", args, cwd.display());
}

/// A temporary project directory with a config, a manifest and local
/// component repositories.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    components: Vec<(String, PathBuf)>,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            components: Vec::new(),
        }
    }

    /// Create a local component repository.
    ///
    /// The repository has `docs/index.rst` containing `release <tag>` at
    /// `tag`, and `unreleased` at the tip of its default branch.
    pub fn with_component_repo(mut self, name: &str, tag: &str) -> Self {
        let origin = self.temp_dir.path().join("remotes").join(name);
        fs::create_dir_all(origin.join("docs")).expect("Failed to create repo dir");
        git(&origin, &["init", "--quiet"]);
        git(&origin, &["config", "user.email", "docs@example.com"]);
        git(&origin, &["config", "user.name", "Docs"]);
        fs::write(origin.join("docs/index.rst"), format!("release {}", tag)).unwrap();
        git(&origin, &["add", "."]);
        git(&origin, &["commit", "--quiet", "-m", "release"]);
        git(&origin, &["tag", tag]);
        fs::write(origin.join("docs/index.rst"), "unreleased").unwrap();
        git(&origin, &["commit", "--quiet", "-am", "wip"]);

        self.components.push((name.to_string(), origin));
        self
    }

    /// Register a component whose repository does not exist.
    pub fn with_unreachable_component(mut self, name: &str) -> Self {
        let missing = self.temp_dir.path().join("remotes").join(name);
        self.components.push((name.to_string(), missing));
        self
    }

    /// Write `.apidoc-sync.yaml` listing every registered component, with an
    /// installer that always succeeds.
    pub fn with_config(self) -> Self {
        let mut yaml = String::from("installer: [\"true\"]\ncomponents:\n");
        for (name, url) in &self.components {
            yaml.push_str(&format!("  - name: {}\n    url: {}\n", name, url.display()));
        }
        self.with_file(".apidoc-sync.yaml", &yaml)
    }

    /// Write `setup.py` with the given requirement strings.
    pub fn with_manifest(self, requirements: &[&str]) -> Self {
        let body: String = requirements
            .iter()
            .map(|r| format!("    \"{}\",\n", r))
            .collect();
        let content = format!("install_requires = [\n{}]\n", body);
        self.with_file("setup.py", &content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The default target directory.
    pub fn target(&self) -> PathBuf {
        self.path().join("docs/apidoc")
    }

    /// Read a fetched file under the target directory.
    #[allow(dead_code)]
    pub fn read_target(&self, relative: &str) -> String {
        fs::read_to_string(self.target().join(relative)).expect("Failed to read fetched file")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("apidoc-sync");
        cmd.current_dir(self.path())
            .env_remove("DOCS_FROM_MASTER")
            .env_remove("APIDOC_SYNC_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
