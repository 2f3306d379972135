use crate::config::IibConfig;
use crate::constants::IIB_SOURCE;
use crate::error::Result;
use crate::pipeline::coerce;
use crate::types::{BreachRecord, BreachSource, RawRecord};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Local CSV export source ("Information is Beautiful" dataset).
pub struct IibSource {
    csv_path: PathBuf,
    expected_records: usize,
}

impl IibSource {
    pub fn new(config: &IibConfig) -> Self {
        Self {
            csv_path: PathBuf::from(&config.csv_path),
            expected_records: config.expected_records,
        }
    }
}

#[async_trait::async_trait]
impl BreachSource for IibSource {
    fn source_id(&self) -> &'static str {
        IIB_SOURCE
    }

    fn expected_min_records(&self) -> usize {
        self.expected_records
    }

    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let mut reader = csv::Reader::from_path(&self.csv_path)?;
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut record = RawRecord::new();
            for (header, value) in headers.iter().zip(row.iter()) {
                record.insert(header.to_string(), Value::String(value.to_string()));
            }
            records.push(record);
        }

        info!(
            "Loaded {} rows from {}",
            records.len(),
            self.csv_path.display()
        );
        Ok(records)
    }

    fn coerce(&self, raw: &RawRecord) -> Result<BreachRecord> {
        coerce::coerce_csv_record(raw)
    }
}
