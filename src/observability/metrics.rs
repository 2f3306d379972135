//! Counters and histograms emitted by the ingestion pipeline.
//!
//! Everything goes through the `metrics` facade; whether a recorder is
//! installed (and where the numbers end up) is the binary's concern.

/// Metrics for source fetches
pub mod sources {
    use metrics::{counter, histogram};

    pub fn request_success(source_id: &str, duration_secs: f64) {
        counter!("breach_sources_requests_success_total", "source" => source_id.to_string())
            .increment(1);
        histogram!("breach_sources_request_duration_seconds", "source" => source_id.to_string())
            .record(duration_secs);
    }

    pub fn request_error(source_id: &str) {
        counter!("breach_sources_requests_error_total", "source" => source_id.to_string())
            .increment(1);
    }

    pub fn records_fetched(source_id: &str, count: usize) {
        histogram!("breach_sources_records_per_fetch", "source" => source_id.to_string())
            .record(count as f64);
    }
}

/// Metrics for the cleaning stage: pre-/post-filter record counts
pub mod cleaning {
    use metrics::counter;

    pub fn records_seen(source_id: &str, count: usize) {
        counter!("breach_cleaning_records_seen_total", "source" => source_id.to_string())
            .increment(count as u64);
    }

    pub fn records_kept(source_id: &str, count: usize) {
        counter!("breach_cleaning_records_kept_total", "source" => source_id.to_string())
            .increment(count as u64);
    }

    pub fn records_rejected(source_id: &str, count: usize) {
        counter!("breach_cleaning_records_rejected_total", "source" => source_id.to_string())
            .increment(count as u64);
    }

    pub fn volume_check_failed(source_id: &str) {
        counter!("breach_cleaning_volume_check_failures_total", "source" => source_id.to_string())
            .increment(1);
    }
}
