//! Aggregation of cleaned datasets into the summaries the charts are built
//! from. Consumes cleaned records only; never sees raw or rejected rows.

use crate::error::Result;
use crate::types::{BreachRecord, FieldValue};
use chrono::{Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// Either source's calendar field, in lookup order.
const YEAR_KEY_FIELDS: &[&str] = &["BreachDate", "year"];
// Either source's affected-account count field.
const COUNT_KEY_FIELDS: &[&str] = &["PwnCount", "records"];
const SENSITIVITY_FIELD: &str = "sensitivity";

/// Affected-account magnitude bins, upper bound inclusive. The bucket labels
/// are the dataset's historical ones and deliberately lag the edges by one
/// order of magnitude.
const MAGNITUDE_BINS: &[(i64, &str)] = &[
    (100, "Tens"),
    (10_000, "Hundreds"),
    (100_000, "Thousands"),
    (1_000_000, "Tens of Thousands"),
    (10_000_000, "Hundreds of Thousands"),
    (100_000_000, "Millions"),
    (1_000_000_000, "Tens of Millions"),
    (10_000_000_000, "Hundreds of Millions"),
];

/// Chart labels for the sensitivity categories.
pub const SENSITIVITY_LABELS: &[(i64, &str)] = &[
    (1, "Email Address"),
    (2, "SSN or Personal Details"),
    (3, "Credit Card"),
    (4, "Personal Records like Health"),
    (5, "Full Details"),
];

/// Per-source aggregate summary handed to visualization
#[derive(Debug, Serialize)]
pub struct SourceSummary {
    pub source_id: String,
    pub total_breaches: usize,
    pub breaches_by_year: BTreeMap<i32, usize>,
    pub breaches_by_magnitude: Vec<MagnitudeBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breaches_by_sensitivity: Option<Vec<SensitivityShare>>,
}

#[derive(Debug, Serialize)]
pub struct MagnitudeBucket {
    pub label: &'static str,
    pub breaches: usize,
}

#[derive(Debug, Serialize)]
pub struct SensitivityShare {
    pub level: i64,
    pub label: &'static str,
    pub breaches: usize,
}

fn lookup<'a>(record: &'a BreachRecord, fields: &[&str]) -> Option<&'a FieldValue> {
    fields.iter().find_map(|field| record.get(*field))
}

fn magnitude_label(count: i64) -> Option<&'static str> {
    let mut lower = 0;
    for &(upper, label) in MAGNITUDE_BINS {
        if count > lower && count <= upper {
            return Some(label);
        }
        lower = upper;
    }
    None
}

/// Aggregate one cleaned dataset.
pub fn summarize(source_id: &str, records: &[BreachRecord]) -> SourceSummary {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    let mut by_magnitude: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut by_sensitivity: BTreeMap<i64, usize> = BTreeMap::new();

    for record in records {
        if let Some(date) = lookup(record, YEAR_KEY_FIELDS).and_then(FieldValue::as_date) {
            *by_year.entry(date.year()).or_insert(0) += 1;
        }
        if let Some(count) = lookup(record, COUNT_KEY_FIELDS).and_then(FieldValue::as_count) {
            if let Some(label) = magnitude_label(count) {
                *by_magnitude.entry(label).or_insert(0) += 1;
            }
        }
        if let Some(level) = record.get(SENSITIVITY_FIELD).and_then(FieldValue::as_count) {
            *by_sensitivity.entry(level).or_insert(0) += 1;
        }
    }

    // Keep the buckets in magnitude order, empty ones included, the way the
    // charts expect them.
    let breaches_by_magnitude = MAGNITUDE_BINS
        .iter()
        .map(|&(_, label)| MagnitudeBucket {
            label,
            breaches: by_magnitude.get(label).copied().unwrap_or(0),
        })
        .collect();

    let breaches_by_sensitivity = if by_sensitivity.is_empty() {
        None
    } else {
        Some(
            SENSITIVITY_LABELS
                .iter()
                .map(|&(level, label)| SensitivityShare {
                    level,
                    label,
                    breaches: by_sensitivity.get(&level).copied().unwrap_or(0),
                })
                .collect(),
        )
    };

    SourceSummary {
        source_id: source_id.to_string(),
        total_breaches: records.len(),
        breaches_by_year: by_year,
        breaches_by_magnitude,
        breaches_by_sensitivity,
    }
}

/// Render a summary as console tables.
pub fn print_summary(summary: &SourceSummary) {
    println!(
        "\n📈 Summary for {} ({} breaches)",
        summary.source_id, summary.total_breaches
    );

    println!("   Breaches by year:");
    for (year, count) in &summary.breaches_by_year {
        println!("      {:<6} {}", year, count);
    }

    println!("   Breaches by affected accounts:");
    for bucket in &summary.breaches_by_magnitude {
        println!("      {:<22} {}", bucket.label, bucket.breaches);
    }

    if let Some(shares) = &summary.breaches_by_sensitivity {
        println!("   Breaches by sensitivity:");
        for share in shares {
            println!("      {}: {:<28} {}", share.level, share.label, share.breaches);
        }
    }
}

/// Persist a summary as a timestamped JSON file in the output directory.
pub fn write_summary(summary: &SourceSummary, output_dir: &str) -> Result<String> {
    fs::create_dir_all(output_dir)?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("{}_summary_{}.json", summary.source_id, timestamp);
    let filepath = Path::new(output_dir).join(&filename);

    let json_content = serde_json::to_string_pretty(summary)?;
    fs::write(&filepath, json_content)?;

    Ok(filepath.to_string_lossy().to_string())
}
