pub mod clean;
pub mod coerce;
pub mod schema_gate;
pub mod validate;

use crate::error::Result;
use crate::observability::metrics::sources;
use crate::types::{BreachRecord, BreachSource};
use clean::DatasetCleaner;
use tracing::{info, instrument};

/// Result of a complete pipeline run for one source
#[derive(Debug)]
pub struct PipelineOutcome {
    pub source_id: String,
    pub fetched_records: usize,
    pub usable_records: usize,
    pub records: Vec<BreachRecord>,
}

impl PipelineOutcome {
    pub fn rejected_records(&self) -> usize {
        self.fetched_records - self.usable_records
    }

    /// One record for operators to eyeball after a run, matching the
    /// source order (the last record fetched).
    pub fn example_record(&self) -> Option<&BreachRecord> {
        self.records.last()
    }
}

/// Run the fetch -> schema check -> coerce -> clean pipeline for one source.
///
/// Coercion failures are fatal: no partial dataset is produced. Per-record
/// rule rejections happen inside the cleaner and only surface as counts.
#[instrument(skip(source, cleaner), fields(source_id = %source.source_id()))]
pub async fn run_for_source(
    source: &dyn BreachSource,
    cleaner: &DatasetCleaner,
) -> Result<PipelineOutcome> {
    let source_id = source.source_id();
    info!("starting pipeline");

    let t_fetch = std::time::Instant::now();
    let raw_records = match source.fetch().await {
        Ok(records) => {
            sources::request_success(source_id, t_fetch.elapsed().as_secs_f64());
            records
        }
        Err(e) => {
            sources::request_error(source_id);
            return Err(e);
        }
    };
    sources::records_fetched(source_id, raw_records.len());
    info!(fetched = raw_records.len(), "fetch complete");

    source.schema_check(&raw_records)?;

    let coerced = raw_records
        .iter()
        .map(|raw| source.coerce(raw))
        .collect::<Result<Vec<_>>>()?;

    let fetched_records = coerced.len();
    let records = cleaner.clean(source_id, coerced, source.expected_min_records())?;

    Ok(PipelineOutcome {
        source_id: source_id.to_string(),
        fetched_records,
        usable_records: records.len(),
        records,
    })
}

/// Push a minimal metrics snapshot to a Pushgateway if one is configured.
pub async fn push_run_metrics(outcome: &PipelineOutcome, duration_secs: f64) {
    let base = match std::env::var("BREACH_PUSHGATEWAY_URL") {
        Ok(v) if !v.trim().is_empty() => v,
        _ => return,
    };
    let push_url = format!(
        "{}/metrics/job/{}/instance/{}",
        base.trim_end_matches('/'),
        "breach_scraper",
        outcome.source_id
    );

    // Current timestamp for freshness tracking
    let timestamp_secs = chrono::Utc::now().timestamp() as f64;

    let body = format!(
        "# TYPE breach_ingest_runs_total counter\n\
         breach_ingest_runs_total 1\n\
         # TYPE breach_records_usable_total counter\n\
         breach_records_usable_total {}\n\
         # TYPE breach_records_rejected_total counter\n\
         breach_records_rejected_total {}\n\
         # TYPE breach_pipeline_duration_seconds gauge\n\
         breach_pipeline_duration_seconds {}\n\
         # TYPE breach_pipeline_last_run_timestamp_seconds gauge\n\
         breach_pipeline_last_run_timestamp_seconds {}\n",
        outcome.usable_records,
        outcome.rejected_records(),
        duration_secs,
        timestamp_secs
    );

    let client = reqwest::Client::new();
    let push_res = client
        .post(&push_url)
        .header("Content-Type", "text/plain; version=0.0.4")
        .body(body)
        .send()
        .await;

    match push_res {
        Ok(r) if r.status().is_success() => {
            tracing::info!("Pushed metrics to Pushgateway for source={}", outcome.source_id);
        }
        Ok(r) => {
            tracing::warn!(
                "Pushgateway push responded with status {} for source={}",
                r.status().as_u16(),
                outcome.source_id
            );
        }
        Err(e) => {
            tracing::warn!(
                "Failed to push metrics to Pushgateway for source={}: {}",
                outcome.source_id,
                e
            );
        }
    }
}
