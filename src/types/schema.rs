//! Data-only types for the `verify.yml` verification schema.
//!
//! The schema is loaded once per run and immutable after parse. Every
//! category is optional; an absent category is skipped entirely by the
//! engine, it is not a failure. The three mapping categories are
//! order-sensitive (errors are reported in declaration order), hence
//! `IndexMap` rather than a sorted map.

use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level document shape of a `verify.yml`.
///
/// A document without a `verification` key is valid and vacuously passes.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyDoc {
    #[serde(default)]
    pub verification: Option<VerifySpec>,
}

/// The five optional check categories, in engine execution order.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifySpec {
    /// Relative paths that must exist (file or directory) under the root.
    #[serde(default)]
    pub files_must_exist: Option<Vec<String>>,

    /// Relative file path to required literal substrings.
    #[serde(default)]
    pub file_must_contain: Option<IndexMap<String, Vec<String>>>,

    /// Relative file path to forbidden literal substrings.
    #[serde(default)]
    pub file_must_not_contain: Option<IndexMap<String, Vec<String>>>,

    /// Relative path to expected octal permission mode, e.g. `"0644"`.
    #[serde(default)]
    pub permissions: Option<IndexMap<String, String>>,

    /// Relative path to expected `user:group` owner.
    #[serde(default)]
    pub ownership: Option<IndexMap<String, String>>,
}

impl VerifyDoc {
    /// The effective spec: an absent `verification` key behaves as an empty
    /// one (no checks to fail).
    pub fn spec(&self) -> VerifySpec {
        self.verification.clone().unwrap_or_default()
    }
}
