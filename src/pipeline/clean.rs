use crate::config::ValidationConfig;
use crate::error::{PipelineError, Result};
use crate::observability::metrics::cleaning;
use crate::pipeline::validate::RecordValidator;
use crate::types::BreachRecord;
use tracing::info;

/// Volume-checks a coerced dataset, then filters it through the validator.
///
/// The volume check runs first so a truncated or runaway fetch fails the run
/// outright instead of being quietly filtered down to a plausible-looking
/// dataset.
pub struct DatasetCleaner {
    validator: RecordValidator,
    max_records: usize,
}

impl DatasetCleaner {
    pub fn new(config: ValidationConfig) -> Self {
        let max_records = config.max_records;
        Self {
            validator: RecordValidator::new(config),
            max_records,
        }
    }

    /// Clean one dataset. `expected_min` is the per-source minimum row count
    /// a healthy fetch returns; the ceiling is the configured fixed constant.
    pub fn clean(
        &self,
        source_id: &str,
        records: Vec<BreachRecord>,
        expected_min: usize,
    ) -> Result<Vec<BreachRecord>> {
        let fetched = records.len();
        if fetched < expected_min || fetched > self.max_records {
            cleaning::volume_check_failed(source_id);
            return Err(PipelineError::UnexpectedVolume {
                source_id: source_id.to_string(),
                actual: fetched,
                min: expected_min,
                max: self.max_records,
            });
        }
        cleaning::records_seen(source_id, fetched);

        let usable: Vec<BreachRecord> = records
            .into_iter()
            .filter(|record| self.validator.validate(record))
            .collect();

        cleaning::records_kept(source_id, usable.len());
        cleaning::records_rejected(source_id, fetched - usable.len());
        info!(
            source = source_id,
            fetched,
            usable = usable.len(),
            "dataset cleaned"
        );

        Ok(usable)
    }
}
