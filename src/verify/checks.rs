//! The five check categories driven by a `verify.yml` schema.
//!
//! Each checker takes the deployment root plus one category of the schema and
//! returns its error strings in declaration order. Checkers never raise past
//! this boundary: per-item failures (missing file, unreadable content,
//! unstattable path, escaping entry) become error strings attributed to that
//! item and the remaining items still run.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::adapters::OwnershipOracle;
use crate::types::safepath::SafePath;

/// Resolve a schema entry below the root, or the failure detail.
fn resolve(root: &Path, raw: &str) -> Result<PathBuf, String> {
    SafePath::from_rooted(root, Path::new(raw))
        .map(|sp| sp.as_path())
        .map_err(|e| e.msg)
}

fn read_text(root: &Path, raw: &str) -> Result<String, String> {
    let path = resolve(root, raw)?;
    std::fs::read_to_string(path).map_err(|e| e.to_string())
}

/// Check that all listed paths exist (file or directory) under the root.
/// Absence is a reported outcome, not an exceptional one.
pub fn check_files_exist(root: &Path, files: &[String]) -> Vec<String> {
    let mut errors = Vec::new();
    for f in files {
        match resolve(root, f) {
            Ok(path) => {
                if !path.exists() {
                    errors.push(format!("File not found: {}", path.display()));
                }
            }
            Err(_) => errors.push(format!("File not found: {}", root.join(f).display())),
        }
    }
    errors
}

/// Check that files contain every required pattern. Patterns are literal
/// substrings, case-sensitive, not regular expressions. A failed read emits
/// one error for the file and skips its pattern checks.
pub fn check_file_contains(
    root: &Path,
    file_patterns: &IndexMap<String, Vec<String>>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (filename, patterns) in file_patterns {
        let content = match read_text(root, filename) {
            Ok(c) => c,
            Err(detail) => {
                errors.push(format!("{filename}: Cannot read file: {detail}"));
                continue;
            }
        };
        for pattern in patterns {
            if !content.contains(pattern.as_str()) {
                errors.push(format!("{filename}: missing required pattern '{pattern}'"));
            }
        }
    }
    errors
}

/// Check that files contain none of the forbidden patterns. Read-failure
/// handling matches `check_file_contains`.
pub fn check_file_not_contains(
    root: &Path,
    file_patterns: &IndexMap<String, Vec<String>>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (filename, patterns) in file_patterns {
        let content = match read_text(root, filename) {
            Ok(c) => c,
            Err(detail) => {
                errors.push(format!("{filename}: Cannot read file: {detail}"));
                continue;
            }
        };
        for pattern in patterns {
            if content.contains(pattern.as_str()) {
                errors.push(format!("{filename}: contains forbidden pattern '{pattern}'"));
            }
        }
    }
    errors
}

/// Parse an octal mode string (`"644"`, `"0644"`, `"0o644"`) to permission
/// bits. Returns `None` for non-octal input or values outside `0o7777`.
pub fn parse_octal_mode(s: &str) -> Option<u32> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 8).ok().filter(|b| *b <= 0o7777)
}

/// Canonical rendering used on both sides of a mode comparison, so
/// formatting differences in the schema never produce false mismatches.
pub fn format_octal_mode(bits: u32) -> String {
    format!("{bits:04o}")
}

fn stat_mode_bits(root: &Path, raw: &str) -> Result<u32, String> {
    use std::os::unix::fs::MetadataExt;

    let path = resolve(root, raw)?;
    let md = std::fs::metadata(path).map_err(|e| e.to_string())?;
    // Permission bits only; file-type bits are masked out, suid/sgid/sticky kept.
    Ok(md.mode() & 0o7777)
}

/// Check permission bits against expected octal modes. Both sides normalize
/// through base-8 parsing before comparison.
pub fn check_permissions(root: &Path, perms: &IndexMap<String, String>) -> Vec<String> {
    let mut errors = Vec::new();
    for (path_str, expected) in perms {
        let Some(expected_bits) = parse_octal_mode(expected) else {
            errors.push(format!("{path_str}: invalid expected mode '{expected}'"));
            continue;
        };
        let actual_bits = match stat_mode_bits(root, path_str) {
            Ok(b) => b,
            Err(detail) => {
                errors.push(format!("Cannot stat {path_str}: {detail}"));
                continue;
            }
        };
        if actual_bits != expected_bits {
            errors.push(format!(
                "{path_str}: expected mode {}, got {}",
                format_octal_mode(expected_bits),
                format_octal_mode(actual_bits)
            ));
        }
    }
    errors
}

/// Check `user:group` ownership via the supplied oracle. Resolution failures
/// (missing path, uid/gid without a database entry) skip the comparison for
/// that entry.
pub fn check_ownership(
    root: &Path,
    ownership: &IndexMap<String, String>,
    oracle: &dyn OwnershipOracle,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (path_str, expected_owner) in ownership {
        let resolved = resolve(root, path_str)
            .and_then(|p| oracle.owner_of(&p).map_err(|e| e.msg));
        let info = match resolved {
            Ok(i) => i,
            Err(detail) => {
                errors.push(format!("Cannot get ownership of {path_str}: {detail}"));
                continue;
            }
        };
        let actual = info.owner_string();
        if actual != *expected_owner {
            errors.push(format!(
                "{path_str}: expected owner {expected_owner}, got {actual}"
            ));
        }
    }
    errors
}
