use log::Level;
use serde_json::Value;

/// Structured fact sink. One fact per stage event; `fields` carries the
/// stage-specific payload under a minimal envelope (run id, stage, decision).
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Human-readable audit line sink. Progress markers and warnings route here;
/// they are presentation, not part of any report contract.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Default sink: discards facts and audit lines. Callers that want JSONL
/// output or colored terminal lines supply their own sinks.
#[derive(Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}
