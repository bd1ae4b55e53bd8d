//! Verification stage: schema load and the single-pass check engine.
//!
//! Two error tiers:
//! - Fatal: the schema document is absent or unparsable (`load_doc` returns
//!   `Err`); no partial results are produced.
//! - Recoverable: every individual assertion failure is collected as one
//!   error string. The engine always runs every category present in the
//!   schema so one invocation surfaces the complete discrepancy set.
//!
//! Side-effects:
//! - Emits one `verify.category` fact per category run and a `verify.summary`
//!   fact at the end.
//! - Logs one progress line per category through the audit sink;
//!   presentation only, not part of the report contract.

pub mod checks;

use std::path::Path;

use log::Level;
use serde_json::json;

use crate::adapters::{FsOwnershipOracle, OwnershipOracle};
use crate::logging::audit::AuditCtx;
use crate::logging::{AuditSink, Decision, FactsEmitter, StageLogger};
use crate::types::ids::verify_run_id;
use crate::types::{Error, ErrorKind, Result, VerifyDoc, VerifyReport};

/// Load and parse a `verify.yml` document. This is the one unrecoverable
/// condition of a verification run.
pub fn load_doc(path: &Path) -> Result<VerifyDoc> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::new(ErrorKind::Io, format!("cannot read {}: {e}", path.display())))?;
    serde_yaml::from_str(&text).map_err(|e| {
        Error::new(
            ErrorKind::Parse,
            format!("invalid verification schema {}: {e}", path.display()),
        )
    })
}

/// Declarative deployment verifier.
///
/// Runs the five check categories in fixed order against a deployment root,
/// read-only, without short-circuiting. Ownership resolution goes through an
/// `OwnershipOracle` so tests can substitute a fake.
pub struct Verifier<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    owner: Box<dyn OwnershipOracle>,
}

impl<E: FactsEmitter, A: AuditSink> Verifier<E, A> {
    pub fn new(facts: E, audit: A) -> Self {
        Self {
            facts,
            audit,
            owner: Box::new(FsOwnershipOracle),
        }
    }

    #[must_use]
    pub fn with_ownership_oracle(mut self, owner: Box<dyn OwnershipOracle>) -> Self {
        self.owner = owner;
        self
    }

    /// Load `schema` and verify `root` against it.
    ///
    /// # Errors
    /// Fatal tier only: schema read or parse failure.
    pub fn verify_file(&self, schema: &Path, root: &Path) -> Result<VerifyReport> {
        let doc = load_doc(schema)?;
        Ok(self.run(root, &doc))
    }

    /// Verify `root` against an already-parsed document.
    pub fn run(&self, root: &Path, doc: &VerifyDoc) -> VerifyReport {
        let ctx = AuditCtx::new(&self.facts, verify_run_id(root).to_string());
        let slog = StageLogger::new(&ctx);
        let spec = doc.spec();
        let mut errors: Vec<String> = Vec::new();

        if let Some(files) = &spec.files_must_exist {
            self.audit.log(Level::Info, "Checking file existence...");
            let errs = checks::check_files_exist(root, files);
            emit_category(&slog, "files_must_exist", files.len(), &errs);
            errors.extend(errs);
        }

        if let Some(map) = &spec.file_must_contain {
            self.audit.log(Level::Info, "Checking file content (must contain)...");
            let errs = checks::check_file_contains(root, map);
            emit_category(&slog, "file_must_contain", map.len(), &errs);
            errors.extend(errs);
        }

        if let Some(map) = &spec.file_must_not_contain {
            self.audit
                .log(Level::Info, "Checking file content (must not contain)...");
            let errs = checks::check_file_not_contains(root, map);
            emit_category(&slog, "file_must_not_contain", map.len(), &errs);
            errors.extend(errs);
        }

        if let Some(map) = &spec.permissions {
            self.audit.log(Level::Info, "Checking permissions...");
            let errs = checks::check_permissions(root, map);
            emit_category(&slog, "permissions", map.len(), &errs);
            errors.extend(errs);
        }

        if let Some(map) = &spec.ownership {
            self.audit.log(Level::Info, "Checking ownership...");
            let errs = checks::check_ownership(root, map, self.owner.as_ref());
            emit_category(&slog, "ownership", map.len(), &errs);
            errors.extend(errs);
        }

        let ok = errors.is_empty();
        slog.verify_summary()
            .merge(json!({
                "root": root.display().to_string(),
                "error_count": errors.len(),
            }))
            .emit(if ok { Decision::Success } else { Decision::Failure });

        VerifyReport { ok, errors }
    }
}

fn emit_category(slog: &StageLogger<'_>, category: &str, checked: usize, errs: &[String]) {
    slog.verify_category()
        .merge(json!({
            "category": category,
            "checked": checked,
            "errors": errs.len(),
        }))
        .emit(if errs.is_empty() {
            Decision::Success
        } else {
            Decision::Failure
        });
}
