use crate::error::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Raw record as returned from a source, keyed by source field name.
/// CSV rows arrive with every value as a JSON string.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A single field value after coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn as_count(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Semantic breach record after coercion, field set varies by source
pub type BreachRecord = BTreeMap<String, FieldValue>;

/// Core trait that all breach data sources must implement
#[async_trait::async_trait]
pub trait BreachSource: Send + Sync {
    /// Unique identifier for this source
    fn source_id(&self) -> &'static str;

    /// Minimum number of rows a healthy fetch is expected to return
    fn expected_min_records(&self) -> usize;

    /// Fetch all raw records from this data source
    async fn fetch(&self) -> Result<Vec<RawRecord>>;

    /// Shape-check the raw batch before any coercion. Sources without a
    /// declared payload schema accept everything.
    fn schema_check(&self, _records: &[RawRecord]) -> Result<()> {
        Ok(())
    }

    /// Convert one raw record into typed field values
    fn coerce(&self, raw: &RawRecord) -> Result<BreachRecord>;
}
