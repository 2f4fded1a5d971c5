//! Package installation for latest mode.
//!
//! Latest mode installs every component from its default branch so that
//! downstream consumers (autodoc-style generators) can import the same code
//! whose docs were fetched. The installer is an external command line, by
//! default `python -m pip install -U`, with one `git+<url>` argument appended
//! per component.

use crate::config::Component;
use crate::error::{Error, Result};
use std::process::Command;

/// Trait for package installation - allows mocking in tests
pub trait PackageInstaller: Send + Sync {
    /// Install the latest release of every component.
    fn install(&self, components: &[Component]) -> Result<()>;
}

/// Installer that runs an external command.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    command: Vec<String>,
}

impl CommandInstaller {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// The full argument vector that `install` would run.
    pub fn command_line(&self, components: &[Component]) -> Vec<String> {
        let mut line = self.command.clone();
        line.extend(components.iter().map(|c| requirement_url(&c.url)));
        line
    }
}

/// Turn a repository URL into an installable VCS requirement.
pub fn requirement_url(url: &str) -> String {
    if url.starts_with("git+") {
        url.to_string()
    } else {
        format!("git+{}", url)
    }
}

impl PackageInstaller for CommandInstaller {
    fn install(&self, components: &[Component]) -> Result<()> {
        let line = self.command_line(components);
        let Some((program, args)) = line.split_first() else {
            return Err(Error::Install {
                command: String::new(),
                message: "installer command is empty".to_string(),
            });
        };
        let display = line.join(" ");
        log::info!("Installing latest components: {}", display);

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| Error::Install {
                command: display.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::Install {
                command: display,
                message: format!("exited with {}", status),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, url: &str) -> Component {
        Component {
            name: name.to_string(),
            url: url.to_string(),
            docs_path: "docs".to_string(),
        }
    }

    #[test]
    fn test_requirement_url() {
        assert_eq!(
            requirement_url("https://github.com/example/widget-core"),
            "git+https://github.com/example/widget-core"
        );
        assert_eq!(
            requirement_url("git+ssh://git@example.com/widget.git"),
            "git+ssh://git@example.com/widget.git"
        );
    }

    #[test]
    fn test_command_line_appends_components() {
        let installer = CommandInstaller::new(vec!["pip".into(), "install".into(), "-U".into()]);
        let line = installer.command_line(&[
            component("widget-core", "https://github.com/example/widget-core"),
            component("widget-extras", "https://github.com/example/widget-extras"),
        ]);

        assert_eq!(
            line,
            vec![
                "pip",
                "install",
                "-U",
                "git+https://github.com/example/widget-core",
                "git+https://github.com/example/widget-extras",
            ]
        );
    }

    #[test]
    fn test_install_missing_program_errors() {
        let installer = CommandInstaller::new(vec!["apidoc-sync-no-such-installer".into()]);
        let err = installer.install(&[component("widget-core", "x")]).unwrap_err();
        assert!(err.to_string().contains("Package install failed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_install_nonzero_exit_errors() {
        let installer = CommandInstaller::new(vec!["false".into()]);
        let err = installer.install(&[component("widget-core", "x")]).unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[cfg(unix)]
    #[test]
    fn test_install_success() {
        let installer = CommandInstaller::new(vec!["true".into()]);
        assert!(installer.install(&[component("widget-core", "x")]).is_ok());
    }

    #[test]
    fn test_install_empty_command_errors() {
        let installer = CommandInstaller::new(Vec::new());
        assert!(installer.install(&[]).is_err());
    }
}
