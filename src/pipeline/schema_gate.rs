use crate::error::{PipelineError, Result};
use crate::types::RawRecord;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::Value;

// Declared shape of the breach-directory payload, compiled once on first use.
static BREACH_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(include_str!("../../schemas/breaches.v1.json"))
        .expect("embedded breach schema is well-formed JSON");
    let schema_static: &'static Value = Box::leak(Box::new(schema));
    JSONSchema::options()
        .compile(schema_static)
        .expect("embedded breach schema compiles")
});

/// Fail-fast shape check of a raw API payload, applied once before any
/// coercion. The first violation fails the whole batch.
pub fn check_payload(payload: &Value) -> Result<()> {
    if let Err(mut errors) = BREACH_SCHEMA.validate(payload) {
        if let Some(first) = errors.next() {
            return Err(PipelineError::Schema {
                pointer: first.instance_path.to_string(),
                message: first.to_string(),
            });
        }
    }
    Ok(())
}

/// Check an already-split batch of raw records against the payload schema.
pub fn check_records(records: &[RawRecord]) -> Result<()> {
    let payload = Value::Array(records.iter().cloned().map(Value::Object).collect());
    check_payload(&payload)
}
