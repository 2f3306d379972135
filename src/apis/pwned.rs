use crate::config::PwnedConfig;
use crate::constants::PWNED_SOURCE;
use crate::error::{PipelineError, Result};
use crate::pipeline::{coerce, schema_gate};
use crate::types::{BreachRecord, BreachSource, RawRecord};
use serde_json::Value;
use tracing::{info, instrument};

/// Breach-directory API source (haveibeenpwned.com).
pub struct PwnedSource {
    client: reqwest::Client,
    url: String,
    expected_records: usize,
}

impl PwnedSource {
    pub fn new(config: &PwnedConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            expected_records: config.expected_records,
        }
    }
}

#[async_trait::async_trait]
impl BreachSource for PwnedSource {
    fn source_id(&self) -> &'static str {
        PWNED_SOURCE
    }

    fn expected_min_records(&self) -> usize {
        self.expected_records
    }

    #[instrument(skip(self))]
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let payload: Value = resp.json().await?;
        let items = payload.as_array().ok_or_else(|| PipelineError::Schema {
            pointer: String::new(),
            message: "expected a JSON array of breaches".to_string(),
        })?;

        let mut records = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let entry = item.as_object().ok_or_else(|| PipelineError::Schema {
                pointer: format!("/{i}"),
                message: "expected breach entries to be objects".to_string(),
            })?;
            records.push(entry.clone());
        }

        info!("Fetched {} breaches from the breach directory", records.len());
        Ok(records)
    }

    fn schema_check(&self, records: &[RawRecord]) -> Result<()> {
        schema_gate::check_records(records)
    }

    fn coerce(&self, raw: &RawRecord) -> Result<BreachRecord> {
        coerce::coerce_api_record(raw)
    }
}
