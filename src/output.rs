//! # Output Configuration
//!
//! Controls how the CLI prints sync reports: with emoji markers when the
//! terminal supports color, with bracketed plain-text markers otherwise.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use crate::fetcher::FetchOutcome;
use crate::sync::{ComponentReport, SyncState};
use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `always` and `never` force the setting; anything else detects support
    /// from the environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Format one component's outcome as a single line.
pub fn format_report(config: &OutputConfig, report: &ComponentReport) -> String {
    let git_ref = report.version_or_ref.as_deref().unwrap_or("-");
    match &report.outcome {
        FetchOutcome::Fetched { path } => format!(
            "{} {} @ {} -> {}",
            emoji(config, "✅", "[OK]"),
            report.name,
            git_ref,
            path.display()
        ),
        FetchOutcome::Skipped { reason } => format!(
            "{} {} skipped: {}",
            emoji(config, "⏭️", "[SKIP]"),
            report.name,
            reason
        ),
        FetchOutcome::Failed { reason } => format!(
            "{} {} @ {} failed: {}",
            emoji(config, "⚠️", "[FAIL]"),
            report.name,
            git_ref,
            reason
        ),
    }
}

/// Format the whole sync result, one line per component plus a summary.
pub fn format_state(config: &OutputConfig, state: &SyncState) -> Vec<String> {
    if state.already_present() {
        return vec![format!(
            "{} API doc sources already present, nothing fetched",
            emoji(config, "📁", "[KEEP]")
        )];
    }

    let mut lines: Vec<String> = state
        .reports()
        .iter()
        .map(|r| format_report(config, r))
        .collect();
    lines.push(format!(
        "{} of {} components fetched",
        state.fetched_count(),
        state.reports().len()
    ));
    lines
}
