//! # Configuration Schema and Parsing
//!
//! This module defines the `.apidoc-sync.yaml` configuration file: which
//! components to pull documentation from, where their repositories live,
//! where the packaging manifest is, and where fetched sources go.
//!
//! ## Format
//!
//! ```yaml
//! manifest: setup.py
//! target: docs/apidoc
//! url_template: "https://github.com/example/{name}"
//! components:
//!   - widget-core
//!   - name: widget-extras
//!     url: https://example.com/widget-extras.git
//!     docs_path: docs/apidocs
//! ```
//!
//! Components may be written as a bare name or as a mapping. Both forms are
//! resolved into a [`Component`] with a concrete URL and documentation path,
//! so nothing downstream needs to know about the template or the defaults.
//!
//! Relative `manifest` and `target` paths are resolved against the directory
//! that holds the configuration file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".apidoc-sync.yaml";

/// Default environment variable that switches syncing to latest mode.
pub const DEFAULT_LATEST_ENV: &str = "DOCS_FROM_MASTER";

const NAME_PLACEHOLDER: &str = "{name}";

/// A component entry as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentEntry {
    /// Short form: just the component name.
    Name(String),
    /// Long form with optional overrides.
    Detailed {
        name: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        docs_path: Option<String>,
    },
}

impl ComponentEntry {
    fn name(&self) -> &str {
        match self {
            ComponentEntry::Name(name) => name,
            ComponentEntry::Detailed { name, .. } => name,
        }
    }
}

/// The on-disk representation of `.apidoc-sync.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Packaging manifest holding the version pins.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    /// Directory that receives one subdirectory per component.
    #[serde(default = "default_target")]
    pub target: PathBuf,
    /// Documentation subtree inside each cloned repository.
    #[serde(default = "default_docs_path")]
    pub docs_path: String,
    /// Repository URL template; `{name}` is replaced by the component name.
    #[serde(default)]
    pub url_template: Option<String>,
    /// Environment variable that selects latest mode.
    #[serde(default = "default_latest_env")]
    pub latest_env: String,
    /// Installer command line, `git+<url>` arguments are appended.
    #[serde(default = "default_installer")]
    pub installer: Vec<String>,
    /// The fixed list of components.
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("setup.py")
}

fn default_target() -> PathBuf {
    PathBuf::from("docs/apidoc")
}

fn default_docs_path() -> String {
    "docs".to_string()
}

fn default_latest_env() -> String {
    DEFAULT_LATEST_ENV.to_string()
}

fn default_installer() -> Vec<String> {
    ["python", "-m", "pip", "install", "-U"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// A fully resolved component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component name, also the name of its subdirectory in the target.
    pub name: String,
    /// Remote repository URL.
    pub url: String,
    /// Documentation subtree inside the repository.
    pub docs_path: String,
}

/// Validated configuration with all paths resolved.
#[derive(Debug, Clone)]
pub struct Config {
    pub manifest: PathBuf,
    pub target: PathBuf,
    pub latest_env: String,
    pub installer: Vec<String>,
    pub components: Vec<Component>,
}

impl Config {
    /// Names of all configured components, in configuration order.
    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Parse a YAML configuration string, resolving relative paths against
/// `base_dir`.
pub fn parse(yaml: &str, base_dir: &Path) -> Result<Config> {
    let raw: RawConfig = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: None,
    })?;
    resolve(raw, base_dir)
}

/// Load and parse a configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    parse(&content, base_dir)
}

fn resolve(raw: RawConfig, base_dir: &Path) -> Result<Config> {
    if raw.components.is_empty() {
        return Err(Error::ConfigParse {
            message: "No components configured".to_string(),
            hint: Some("Add at least one entry under 'components:'".to_string()),
        });
    }

    if raw.installer.is_empty() {
        return Err(Error::ConfigParse {
            message: "Installer command is empty".to_string(),
            hint: Some("Remove 'installer:' to use 'python -m pip install -U'".to_string()),
        });
    }

    if let Some(template) = &raw.url_template {
        if !template.contains(NAME_PLACEHOLDER) {
            return Err(Error::ConfigParse {
                message: format!("url_template '{}' has no {} placeholder", template, NAME_PLACEHOLDER),
                hint: Some("Example: \"https://github.com/example/{name}\"".to_string()),
            });
        }
    }

    let mut seen = HashSet::new();
    let mut components = Vec::with_capacity(raw.components.len());
    for entry in &raw.components {
        let name = entry.name().trim();
        validate_name(name)?;
        if !seen.insert(name.to_string()) {
            return Err(Error::ConfigParse {
                message: format!("Component '{}' is listed more than once", name),
                hint: None,
            });
        }

        let (url, docs_path) = match entry {
            ComponentEntry::Name(_) => (None, None),
            ComponentEntry::Detailed { url, docs_path, .. } => (url.clone(), docs_path.clone()),
        };

        let url = match (url, &raw.url_template) {
            (Some(url), _) => url,
            (None, Some(template)) => template.replace(NAME_PLACEHOLDER, name),
            (None, None) => {
                return Err(Error::ConfigParse {
                    message: format!("Component '{}' has no url and no url_template is set", name),
                    hint: Some("Set 'url_template:' or give the component a 'url:'".to_string()),
                })
            }
        };

        components.push(Component {
            name: name.to_string(),
            url,
            docs_path: docs_path.unwrap_or_else(|| raw.docs_path.clone()),
        });
    }

    Ok(Config {
        manifest: base_dir.join(&raw.manifest),
        target: base_dir.join(&raw.target),
        latest_env: raw.latest_env,
        installer: raw.installer,
        components,
    })
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::ConfigParse {
            message: "Component name is empty".to_string(),
            hint: None,
        });
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::ConfigParse {
            message: format!("Component name '{}' is not a valid directory name", name),
            hint: Some("Component names become subdirectories of the target".to_string()),
        });
    }
    Ok(())
}
