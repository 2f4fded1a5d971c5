//! # Version Pin Discovery
//!
//! Reads a packaging manifest and finds the version each component is pinned
//! to. A pin is a requirement with an `==` or `>=` specifier, for example
//! `widget-core==1.2.0` or `widget-core>=0.9,<1.0`.
//!
//! ## Manifest Formats
//!
//! - **TOML** (`pyproject.toml`): requirement strings come from
//!   `project.dependencies` and every list in `project.optional-dependencies`.
//! - **Text** (`setup.py`, `setup.cfg`, `requirements*.txt`): requirement
//!   strings are the quoted string literals in the file, followed by its bare
//!   lines with comments stripped.
//!
//! Each candidate string is parsed as a requirement. Strings that are not
//! requirements are ignored, so the text scan can afford to be generous.
//!
//! A component with no pin is absent from the result. That is not an error;
//! the synchronizer skips such components.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static REQUIREMENT_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[[^\]]*\])?\s*(.*)$")
        .expect("requirement head pattern is valid")
});

static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(===|==|>=|<=|~=|!=|<|>)\s*([^\s,;()]+)\s*$")
        .expect("specifier pattern is valid")
});

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"\\\n]*)"|'([^'\\\n]*)'"#).expect("string literal pattern is valid")
});

static NAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("separator pattern is valid"));

/// A version comparison operator in a requirement specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Exact,
    Arbitrary,
    AtLeast,
    AtMost,
    Compatible,
    NotEqual,
    Less,
    Greater,
}

impl Operator {
    fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "==" => Operator::Exact,
            "===" => Operator::Arbitrary,
            ">=" => Operator::AtLeast,
            "<=" => Operator::AtMost,
            "~=" => Operator::Compatible,
            "!=" => Operator::NotEqual,
            "<" => Operator::Less,
            ">" => Operator::Greater,
            _ => return None,
        })
    }

    /// Whether this operator declares a version pin.
    pub fn is_pin(self) -> bool {
        matches!(self, Operator::Exact | Operator::AtLeast)
    }
}

/// A parsed requirement such as `widget-core[extra]>=1.0,<2; python_version>"3"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub specifiers: Vec<(Operator, String)>,
}

impl Requirement {
    /// The version of the first pinning specifier, if any.
    pub fn pin(&self) -> Option<&str> {
        self.specifiers
            .iter()
            .find(|(op, _)| op.is_pin())
            .map(|(_, version)| version.as_str())
    }
}

/// How a manifest's contents are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Text,
}

impl ManifestFormat {
    /// Pick the format from the manifest's file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ManifestFormat::Toml,
            _ => ManifestFormat::Text,
        }
    }
}

/// Normalize a distribution name so that spelling variants compare equal.
///
/// Lowercases and collapses runs of `-`, `_` and `.` into a single `-`.
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATORS
        .replace_all(&name.to_ascii_lowercase(), "-")
        .into_owned()
}

/// Parse a single requirement string.
///
/// Returns `None` when the string is not a requirement. A bare name with no
/// specifiers is a valid requirement without a pin.
pub fn parse_requirement(input: &str) -> Option<Requirement> {
    let caps = REQUIREMENT_HEAD.captures(input)?;
    let name = caps.get(1)?.as_str().to_string();
    let rest = caps.get(2).map_or("", |m| m.as_str());

    // Environment markers never affect the pin.
    let rest = rest.split(';').next().unwrap_or("").trim();
    let rest = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .unwrap_or(rest)
        .trim();

    if rest.starts_with('@') {
        return Some(Requirement {
            name,
            specifiers: Vec::new(),
        });
    }

    let mut specifiers = Vec::new();
    if !rest.is_empty() {
        for clause in rest.split(',') {
            let caps = SPECIFIER.captures(clause)?;
            let op = Operator::parse(caps.get(1)?.as_str())?;
            specifiers.push((op, caps.get(2)?.as_str().to_string()));
        }
    }

    Some(Requirement { name, specifiers })
}

/// Collect candidate requirement strings from manifest text.
pub fn requirement_strings(content: &str, format: ManifestFormat) -> Result<Vec<String>> {
    match format {
        ManifestFormat::Toml => toml_requirement_strings(content),
        ManifestFormat::Text => Ok(text_requirement_strings(content)),
    }
}

fn toml_requirement_strings(content: &str) -> Result<Vec<String>> {
    let document: toml::Table = content.parse()?;
    let mut found = Vec::new();

    let Some(project) = document.get("project").and_then(|p| p.as_table()) else {
        return Ok(found);
    };

    let mut push_all = |value: &toml::Value| {
        if let Some(items) = value.as_array() {
            found.extend(items.iter().filter_map(|v| v.as_str()).map(str::to_string));
        }
    };

    if let Some(deps) = project.get("dependencies") {
        push_all(deps);
    }
    if let Some(optional) = project.get("optional-dependencies").and_then(|o| o.as_table()) {
        for deps in optional.values() {
            push_all(deps);
        }
    }

    Ok(found)
}

fn text_requirement_strings(content: &str) -> Vec<String> {
    let literals = STRING_LITERAL.captures_iter(content).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    });

    let lines = content.lines().filter_map(|line| {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() || line.starts_with('-') {
            None
        } else {
            Some(line.to_string())
        }
    });

    literals.chain(lines).collect()
}

/// Find version pins for `names` in manifest contents.
///
/// The first pinning requirement for a component wins. Components without a
/// pin are omitted from the result.
pub fn extract_versions(
    content: &str,
    format: ManifestFormat,
    names: &[&str],
) -> Result<BTreeMap<String, String>> {
    let wanted: Vec<(String, &str)> = names.iter().map(|n| (normalize_name(n), *n)).collect();
    let mut versions = BTreeMap::new();

    for candidate in requirement_strings(content, format)? {
        let Some(requirement) = parse_requirement(&candidate) else {
            continue;
        };
        let Some(pin) = requirement.pin() else {
            continue;
        };
        let normalized = normalize_name(&requirement.name);
        for (wanted_name, configured) in &wanted {
            if *wanted_name == normalized && !versions.contains_key(*configured) {
                versions.insert(configured.to_string(), pin.to_string());
            }
        }
    }

    Ok(versions)
}

/// Read the manifest at `path` and find version pins for `names`.
pub fn discover_versions(path: &Path, names: &[&str]) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path)?;
    extract_versions(&content, ManifestFormat::from_path(path), names).map_err(|e| match e {
        Error::Toml(toml_err) => Error::ManifestParse {
            path: path.display().to_string(),
            message: toml_err.to_string(),
        },
        other => other,
    })
}
