//! Substitution-template debugging: render a device role's
//! `*.substitutions.j2` templates against its example config, the way the
//! deployment tooling would, so template errors surface without a deploy.

use std::path::{Path, PathBuf};

use minijinja::value::{Kwargs, Value};
use minijinja::Environment;

use crate::constants::{LEGACY_EXAMPLE_FILE, SUBSTITUTIONS_SUFFIX, TEMPLATES_DIR};
use crate::types::{Error, ErrorKind, Result};

/// One rendered template of a role.
#[derive(Clone, Debug)]
pub struct RenderedTemplate {
    /// Template file name, e.g. `motor.substitutions.j2`.
    pub template: String,
    pub output: String,
}

/// Translate Python-style backreferences (`\1`) in a replacement string to
/// the `${1}` form the regex crate expects; literal `$` is escaped.
fn convert_backrefs(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek().is_some_and(char::is_ascii_digit) => {
                let mut group = String::new();
                while let Some(d) = chars.peek().copied() {
                    if d.is_ascii_digit() {
                        group.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(&format!("${{{group}}}"));
            }
            '$' => out.push_str("$$"),
            _ => out.push(c),
        }
    }
    out
}

/// Ansible's `regex_replace` filter, which base Jinja lacks. Supports the
/// `ignorecase` and `multiline` keyword arguments.
fn regex_replace(
    value: String,
    pattern: String,
    replacement: Option<String>,
    kwargs: Kwargs,
) -> std::result::Result<String, minijinja::Error> {
    let ignorecase = kwargs.get::<Option<bool>>("ignorecase")?.unwrap_or(false);
    let multiline = kwargs.get::<Option<bool>>("multiline")?.unwrap_or(false);
    kwargs.assert_all_used()?;
    let re = regex::RegexBuilder::new(&pattern)
        .case_insensitive(ignorecase)
        .multi_line(multiline)
        .build()
        .map_err(|e| {
            minijinja::Error::new(
                minijinja::ErrorKind::InvalidOperation,
                format!("invalid pattern: {e}"),
            )
        })?;
    let rep = convert_backrefs(replacement.as_deref().unwrap_or(""));
    Ok(re.replace_all(&value, rep.as_str()).into_owned())
}

/// Jinja environment matching what the deployment tooling provides.
fn template_env() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_filter("regex_replace", regex_replace);
    env
}

/// Render every substitution template of a role against its example config.
///
/// The example's first top-level key names the IOC; the render context is the
/// IOC's `environment` (required) plus `channels` and `loops` (default
/// empty).
///
/// # Errors
/// Missing/unparsable example config, a config without an `environment`
/// section, and any template error are all fatal for the command.
pub fn render_role_templates(role_dir: &Path) -> Result<Vec<RenderedTemplate>> {
    let example = role_dir.join(LEGACY_EXAMPLE_FILE);
    let text = std::fs::read_to_string(&example)
        .map_err(|e| Error::new(ErrorKind::Io, format!("cannot read {}: {e}", example.display())))?;
    let doc: serde_yaml::Value = serde_yaml::from_str(&text).map_err(|e| {
        Error::new(
            ErrorKind::Parse,
            format!("invalid example config {}: {e}", example.display()),
        )
    })?;

    let ioc = doc
        .as_mapping()
        .and_then(|m| m.values().next())
        .ok_or_else(|| {
            Error::new(
                ErrorKind::Parse,
                format!("{}: expected a top-level IOC mapping", example.display()),
            )
        })?;
    let environment = ioc.get("environment").ok_or_else(|| {
        Error::new(
            ErrorKind::Parse,
            format!("{}: IOC config has no environment section", example.display()),
        )
    })?;
    let empty = serde_yaml::Value::Sequence(Vec::new());
    let channels = ioc.get("channels").unwrap_or(&empty);
    let loops = ioc.get("loops").unwrap_or(&empty);

    let env = template_env();
    let ctx = minijinja::context! {
        environment => Value::from_serialize(environment),
        channels => Value::from_serialize(channels),
        loops => Value::from_serialize(loops),
    };

    let templates_dir = role_dir.join(TEMPLATES_DIR);
    let mut files: Vec<PathBuf> = match std::fs::read_dir(&templates_dir) {
        Ok(rd) => rd
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(SUBSTITUTIONS_SUFFIX))
            })
            .collect(),
        Err(e) => {
            return Err(Error::new(
                ErrorKind::Io,
                format!("cannot read {}: {e}", templates_dir.display()),
            ))
        }
    };
    files.sort();

    let mut rendered = Vec::new();
    for file in files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let src = std::fs::read_to_string(&file)
            .map_err(|e| Error::new(ErrorKind::Io, format!("cannot read {}: {e}", file.display())))?;
        let output = env
            .render_str(&src, &ctx)
            .map_err(|e| Error::new(ErrorKind::Parse, format!("{name}: {e}")))?;
        rendered.push(RenderedTemplate {
            template: name,
            output,
        });
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backrefs_translate_to_dollar_groups() {
        assert_eq!(convert_backrefs(r"\1-suffix"), "${1}-suffix");
        assert_eq!(convert_backrefs(r"pre\12post"), "pre${12}post");
        assert_eq!(convert_backrefs("plain"), "plain");
        assert_eq!(convert_backrefs("$lit"), "$$lit");
    }
}
