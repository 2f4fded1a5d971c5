//! # Error Handling
//!
//! This module defines the centralized error type for `apidoc-sync`. It uses
//! `thiserror` to build an `Error` enum covering every failure the library
//! can report, each variant carrying enough context to print a useful
//! message.
//!
//! Not every failure becomes an `Error` for the caller. Fetch failures are
//! best-effort: the fetcher converts them into a
//! [`FetchOutcome::Failed`](crate::fetcher::FetchOutcome) and moves on to the
//! next component. The variants below still describe those failures so the
//! outcome carries a readable reason.
//!
//! Failures that do propagate:
//!
//! - Configuration parsing and validation.
//! - Reading or parsing the packaging manifest.
//! - Cleanup at build-finish (`Cleanup`).
//! - Spawning the wrapped build command.

use thiserror::Error;

/// Main error type for apidoc-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The `.apidoc-sync.yaml` configuration is malformed or invalid.
    ///
    /// Carries an optional hint about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The packaging manifest could not be interpreted.
    #[error("Manifest parsing error in {path}: {message}")]
    ManifestParse { path: String, message: String },

    /// A git command exited unsuccessfully or could not be spawned.
    #[error("Git command failed for {target}: {command} - {stderr}")]
    GitCommand {
        command: String,
        target: String,
        stderr: String,
    },

    /// The cloned repository has no documentation subtree at the expected
    /// location.
    #[error("No documentation sources for {component} at {path}")]
    MissingDocs { component: String, path: String },

    /// Copying a directory tree failed part-way.
    #[error("Copy error from {src} to {dst}: {message}")]
    Copy {
        src: String,
        dst: String,
        message: String,
    },

    /// The package installer failed.
    #[error("Package install failed: {command} - {message}")]
    Install { command: String, message: String },

    /// Removing or restoring the target directory at build-finish failed.
    #[error("Cleanup error for {path}: {message}")]
    Cleanup { path: String, message: String },

    /// The wrapped documentation build could not be started.
    #[error("Build command error: {command} - {message}")]
    BuildCommand { command: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML parsing error, wrapped from `toml::de::Error`.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
