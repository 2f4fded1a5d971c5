//! Thin wrappers over the system `git` command.
//!
//! Fetching clones a component repository and checks out a ref in it.
//! Authentication is whatever the user's git is configured with.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::Error;

/// Clone a repository into `target_dir`.
///
/// This is a full clone so that any commit SHA can be checked out afterwards.
/// `target_dir` must be absent or empty.
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
pub fn clone_repo(url: &str, target_dir: &Path) -> Result<(), Error> {
    log::debug!("git clone {} {}", url, target_dir.display());

    let output = Command::new("git")
        .args(["clone", "--quiet", url])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: "clone".to_string(),
            target: url.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Provide helpful error message for common auth failures
        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository.\n\
                For private repos, ensure you have:\n\
                - SSH key added to ssh-agent\n\
                - Git credentials configured\n\
                - Personal access token set up\n\
                Error: {}",
                stderr.trim()
            )
        } else {
            stderr.trim().to_string()
        };

        return Err(Error::GitCommand {
            command: "clone".to_string(),
            target: url.to_string(),
            stderr: message,
        });
    }

    Ok(())
}

/// Check out `git_ref` (tag, branch, commit or `HEAD`) in a cloned repository.
pub fn checkout(repo_dir: &Path, git_ref: &str) -> Result<(), Error> {
    let command = format!("checkout {}", git_ref);
    log::debug!("git {} in {}", command, repo_dir.display());

    let output = run_git(repo_dir, &["checkout", "--quiet", git_ref]).map_err(|e| {
        Error::GitCommand {
            command: command.clone(),
            target: repo_dir.display().to_string(),
            stderr: e.to_string(),
        }
    })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command,
            target: repo_dir.display().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Check whether a usable `git` executable is on `PATH`.
pub fn is_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn run_git(cwd: &Path, args: &[&str]) -> std::io::Result<Output> {
    Command::new("git").args(args).current_dir(cwd).output()
}
