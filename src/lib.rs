//! # API Documentation Source Sync
//!
//! This library fetches API-documentation sources from a fixed set of
//! sibling repositories into a local directory before a documentation build,
//! and removes them again afterwards. It backs the `apidoc-sync` command-line
//! tool, and a build driver can also call it directly.
//!
//! ## Quick Example
//!
//! ```no_run
//! use apidoc_sync::config;
//! use apidoc_sync::sync::{SyncMode, Synchronizer};
//!
//! let config = config::from_file(".apidoc-sync.yaml")?;
//! let synchronizer = Synchronizer::new(config);
//!
//! // build-start hook
//! let state = synchronizer.sync(SyncMode::Pinned)?;
//!
//! // ... run the documentation generator ...
//!
//! // build-finish hook
//! synchronizer.cleanup(state)?;
//! # Ok::<(), apidoc_sync::error::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the `.apidoc-sync.yaml` schema, naming the
//!   components and where their repositories, manifest and target live.
//! - **Version discovery (`manifest`)**: reads version pins for the
//!   components out of a packaging manifest.
//! - **Fetching (`fetcher`, `git`, `filesystem`)**: clones a component into a
//!   scratch directory, checks out a ref and copies its docs subtree.
//! - **Synchronizer (`sync`)**: the two build hooks and the explicit state
//!   passed between them.
//! - **Build glue (`build`)**: runs a build between the hooks.

pub mod build;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod filesystem;
pub mod git;
pub mod installer;
pub mod manifest;
pub mod output;
pub mod sync;

#[cfg(test)]
mod manifest_proptest;
