//! Running a documentation build between the sync hooks.
//!
//! [`with_api_sources`] is the glue a build driver uses: sync, build, then
//! clean up no matter how the build went. The build's own result is returned
//! after cleanup has run.

use crate::error::{Error, Result};
use crate::sync::{SyncMode, SyncState, Synchronizer};
use log::{info, warn};
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Run `build` with API sources in place.
///
/// Cleanup runs whether `build` succeeds or fails. A cleanup failure is
/// returned in preference to the build's result, after logging a build
/// failure so it is not lost.
pub fn with_api_sources<T, F>(synchronizer: &Synchronizer, mode: SyncMode, build: F) -> Result<T>
where
    F: FnOnce(&SyncState) -> Result<T>,
{
    let state = synchronizer.sync(mode)?;
    let outcome = build(&state);

    if let Err(e) = &outcome {
        warn!("Documentation build failed: {}", e);
    }

    synchronizer.cleanup(state)?;
    outcome
}

/// Run an external build command and wait for it.
pub fn run_command(command: &[String], cwd: Option<&Path>) -> Result<ExitStatus> {
    let Some((program, args)) = command.split_first() else {
        return Err(Error::BuildCommand {
            command: String::new(),
            message: "no build command given".to_string(),
        });
    };
    let display = command.join(" ");
    info!("Running build: {}", display);

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    cmd.status().map_err(|e| Error::BuildCommand {
        command: display,
        message: e.to_string(),
    })
}
