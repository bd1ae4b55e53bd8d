// Audit helpers that emit structured facts across iocdeploy stages.
//
// Side-effects:
// - Emits JSON facts via `FactsEmitter` for the stages below.
// - Ensures a minimal envelope on every fact: `schema_version`, `run_id`,
//   `stage`.
use serde_json::{json, Value};

use crate::logging::FactsEmitter;

pub(crate) const SCHEMA_VERSION: i64 = 1;
const SUBSYSTEM: &str = "iocdeploy";

pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub run_id: String,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(facts: &'a dyn FactsEmitter, run_id: String) -> Self {
        Self { facts, run_id }
    }
}

/// Stage for typed fact emission.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    DeployAttempt,
    DeployResult,
    VerifyCategory,
    VerifySummary,
}

impl Stage {
    fn as_event(self) -> &'static str {
        match self {
            Stage::DeployAttempt => "deploy.attempt",
            Stage::DeployResult => "deploy.result",
            Stage::VerifyCategory => "verify.category",
            Stage::VerifySummary => "verify.summary",
        }
    }
}

/// Decision severity for emitted facts.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    fn as_str(self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over fact emission with a centralized envelope.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn deploy_attempt(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::DeployAttempt)
    }
    pub fn deploy_result(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::DeployResult)
    }
    pub fn verify_category(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::VerifyCategory)
    }
    pub fn verify_summary(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::VerifySummary)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    /// Merge the fields of a JSON object into the event payload.
    pub fn merge(mut self, extra: Value) -> Self {
        if let Value::Object(map) = extra {
            self.fields.extend(map);
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = self.fields;
        fields.insert("schema_version".to_string(), json!(SCHEMA_VERSION));
        fields.insert("run_id".to_string(), json!(self.ctx.run_id));
        self.ctx.facts.emit(
            SUBSYSTEM,
            self.stage.as_event(),
            decision.as_str(),
            Value::Object(fields),
        );
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success);
    }

    pub fn emit_failure(self) {
        self.emit(Decision::Failure);
    }
}
