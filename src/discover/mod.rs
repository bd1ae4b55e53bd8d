//! Device-role example discovery and deploy-target validation.
//!
//! Non-mutating probes over a role directory. Two example layouts are
//! supported side by side:
//! - legacy: `<role>/example.yml`, named after the file stem;
//! - new style: `<role>/examples/<name>/config.yml`, named after the first
//!   top-level mapping key of the config.
//!
//! An unparsable config is skipped with an audit warning rather than
//! aborting discovery.

use std::path::{Path, PathBuf};

use log::Level;
use regex::Regex;

use crate::constants::{EXAMPLES_DIR, EXAMPLE_CONFIG_FILE, LEGACY_EXAMPLE_FILE, VERIFY_FILE_NAME};
use crate::logging::AuditSink;
use crate::types::{Error, ErrorKind, Result};

/// One deployable example config of a device role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExampleConfig {
    /// IOC name the config deploys as.
    pub name: String,
    pub path: PathBuf,
}

/// First top-level mapping key of a config document; this is the IOC name
/// under both example layouts.
pub fn ioc_name_of(config_path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(config_path).map_err(|e| {
        Error::new(
            ErrorKind::Io,
            format!("cannot read {}: {e}", config_path.display()),
        )
    })?;
    let doc: serde_yaml::Value = serde_yaml::from_str(&text).map_err(|e| {
        Error::new(
            ErrorKind::Parse,
            format!("invalid config {}: {e}", config_path.display()),
        )
    })?;
    doc.as_mapping()
        .and_then(|m| m.keys().next())
        .and_then(|k| k.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::new(
                ErrorKind::Parse,
                format!("{}: expected a top-level IOC mapping", config_path.display()),
            )
        })
}

/// Enumerate the example configs of a device role: the legacy example first,
/// then new-style examples in directory-name order.
pub fn examples_for_role(role_dir: &Path, audit: &dyn AuditSink) -> Vec<ExampleConfig> {
    let mut examples: Vec<ExampleConfig> = Vec::new();

    let legacy = role_dir.join(LEGACY_EXAMPLE_FILE);
    if legacy.exists() {
        if let Some(stem) = legacy.file_stem().and_then(|s| s.to_str()) {
            examples.push(ExampleConfig {
                name: stem.to_string(),
                path: legacy.clone(),
            });
        }
    }

    let new_style = role_dir.join(EXAMPLES_DIR);
    if new_style.is_dir() {
        let mut dirs: Vec<PathBuf> = match std::fs::read_dir(&new_style) {
            Ok(rd) => rd.filter_map(|e| e.ok().map(|e| e.path())).collect(),
            Err(_) => Vec::new(),
        };
        dirs.sort();
        for dir in dirs {
            let config = dir.join(EXAMPLE_CONFIG_FILE);
            match ioc_name_of(&config) {
                Ok(name) => examples.push(ExampleConfig { name, path: config }),
                Err(e) => audit.log(
                    Level::Warn,
                    &format!("Failed to load example config: {}, error: {e}", config.display()),
                ),
            }
        }
    }

    examples
}

/// Companion verification schema for an example, if one is configured next
/// to its config file.
pub fn verify_file_for(example: &ExampleConfig) -> Option<PathBuf> {
    let candidate = example.path.parent()?.join(VERIFY_FILE_NAME);
    candidate.exists().then_some(candidate)
}

/// RFC-1123 shape check for a deploy-target hostname: at most 253 chars,
/// labels of 1-63 alphanumeric-or-hyphen chars not starting or ending with a
/// hyphen, and a TLD that is not all-numeric.
pub fn is_valid_hostname(hostname: &str) -> bool {
    let value = hostname.strip_suffix('.').unwrap_or(hostname);
    if value.is_empty() || value.len() > 253 {
        return false;
    }
    let labels: Vec<&str> = value.split('.').collect();
    let Some(tld) = labels.last() else {
        return false;
    };
    if tld.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    // Compiled per call; hostname validation is not on a hot path.
    let Ok(label_re) = Regex::new(r"(?i)^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$") else {
        return false;
    };
    labels.iter().all(|l| label_re.is_match(l))
}
