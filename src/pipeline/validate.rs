use crate::config::ValidationConfig;
use crate::types::{BreachRecord, FieldValue};
use thiserror::Error;
use tracing::debug;

// Sensitivity categories run from "email address only" (1) to "full details" (5).
pub const SENSITIVITY_MIN: i64 = 1;
pub const SENSITIVITY_MAX: i64 = 5;

/// Semantic rule applied to a single field when it is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Affected-account counts must be strictly positive
    PositiveCount,
    /// Fabricated breaches are excluded
    RequireFalse,
    /// Only verified breaches are kept
    RequireTrue,
    /// Breach date must fall inside the examined window
    WithinDateWindow,
    /// Sensitivity category must sit inside the defined band
    SensitivityBand,
}

/// Ordered (field, rule) table. A field absent from a record is never
/// checked; supporting a new source field means adding a row here.
pub const RULES: &[(&str, FieldRule)] = &[
    ("PwnCount", FieldRule::PositiveCount),
    ("IsFabricated", FieldRule::RequireFalse),
    ("IsVerified", FieldRule::RequireTrue),
    ("BreachDate", FieldRule::WithinDateWindow),
    ("year", FieldRule::WithinDateWindow),
    ("records", FieldRule::PositiveCount),
    ("sensitivity", FieldRule::SensitivityBand),
];

/// Why a record failed validation. Never propagated past the validator
/// boundary; collapsed into a reject instead.
#[derive(Error, Debug, PartialEq)]
pub enum RuleViolation {
    #[error("invalid number of affected accounts: {0}")]
    NonPositiveCount(i64),

    #[error("breach was fabricated")]
    Fabricated,

    #[error("breach was not verified")]
    Unverified,

    #[error("breach outside of examined date range: {0}")]
    DateOutsideWindow(chrono::NaiveDate),

    #[error("sensitivity ranked outside of defined band: {0}")]
    SensitivityOutsideBand(i64),

    #[error("field '{field}' has the wrong type for its rule")]
    TypeMismatch { field: String },
}

/// Applies the rule table to individual records.
pub struct RecordValidator {
    config: ValidationConfig,
}

impl RecordValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Accept or reject one record. Any violation rejects the whole record,
    /// including a wrong-typed field reaching its rule; nothing propagates.
    /// A record with none of the ruled fields passes vacuously.
    pub fn validate(&self, record: &BreachRecord) -> bool {
        match self.check(record) {
            Ok(()) => true,
            Err(violation) => {
                debug!(%violation, "record rejected");
                false
            }
        }
    }

    /// Rule-table walk, stopping at the first violation.
    pub fn check(&self, record: &BreachRecord) -> Result<(), RuleViolation> {
        for &(field, rule) in RULES {
            if let Some(value) = record.get(field) {
                self.apply(field, rule, value)?;
            }
        }
        Ok(())
    }

    fn apply(&self, field: &str, rule: FieldRule, value: &FieldValue) -> Result<(), RuleViolation> {
        let mismatch = || RuleViolation::TypeMismatch {
            field: field.to_string(),
        };

        match rule {
            FieldRule::PositiveCount => {
                let count = value.as_count().ok_or_else(mismatch)?;
                if count > 0 {
                    Ok(())
                } else {
                    Err(RuleViolation::NonPositiveCount(count))
                }
            }
            FieldRule::RequireFalse => {
                if value.as_flag().ok_or_else(mismatch)? {
                    Err(RuleViolation::Fabricated)
                } else {
                    Ok(())
                }
            }
            FieldRule::RequireTrue => {
                if value.as_flag().ok_or_else(mismatch)? {
                    Ok(())
                } else {
                    Err(RuleViolation::Unverified)
                }
            }
            FieldRule::WithinDateWindow => {
                let date = value.as_date().ok_or_else(mismatch)?;
                if self.config.min_date <= date && date < self.config.max_date {
                    Ok(())
                } else {
                    Err(RuleViolation::DateOutsideWindow(date))
                }
            }
            FieldRule::SensitivityBand => {
                let level = value.as_count().ok_or_else(mismatch)?;
                if (SENSITIVITY_MIN..=SENSITIVITY_MAX).contains(&level) {
                    Ok(())
                } else {
                    Err(RuleViolation::SensitivityOutsideBand(level))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn validator() -> RecordValidator {
        RecordValidator::new(ValidationConfig::default())
    }

    fn record(fields: &[(&str, FieldValue)]) -> BreachRecord {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> FieldValue {
        FieldValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn empty_record_passes_vacuously() {
        assert!(validator().validate(&BreachRecord::new()));
    }

    #[test]
    fn accepts_well_formed_record() {
        let r = record(&[
            ("PwnCount", FieldValue::Integer(1_029_961)),
            ("IsFabricated", FieldValue::Flag(false)),
            ("IsVerified", FieldValue::Flag(true)),
            ("BreachDate", date(2014, 10, 14)),
        ]);
        assert!(validator().validate(&r));
    }

    #[test]
    fn rejects_non_positive_count() {
        let r = record(&[("PwnCount", FieldValue::Integer(0))]);
        assert!(!validator().validate(&r));
        assert_eq!(
            validator().check(&r),
            Err(RuleViolation::NonPositiveCount(0))
        );
    }

    #[test]
    fn rejects_fabricated_breach() {
        let r = record(&[("IsFabricated", FieldValue::Flag(true))]);
        assert_eq!(validator().check(&r), Err(RuleViolation::Fabricated));
    }

    #[test]
    fn rejects_unverified_breach() {
        let r = record(&[("IsVerified", FieldValue::Flag(false))]);
        assert_eq!(validator().check(&r), Err(RuleViolation::Unverified));
    }

    #[test]
    fn date_window_start_is_inclusive() {
        let r = record(&[("BreachDate", date(2009, 1, 1))]);
        assert!(validator().validate(&r));
    }

    #[test]
    fn date_window_end_is_exclusive() {
        let r = record(&[("BreachDate", date(2020, 1, 1))]);
        assert!(!validator().validate(&r));

        let r = record(&[("BreachDate", date(2019, 12, 31))]);
        assert!(validator().validate(&r));
    }

    #[test]
    fn year_field_uses_the_same_window() {
        let r = record(&[("year", date(2021, 1, 1))]);
        assert!(!validator().validate(&r));
    }

    #[test]
    fn sensitivity_band_edges() {
        for (level, expected) in [(0, false), (1, true), (5, true), (6, false)] {
            let r = record(&[("sensitivity", FieldValue::Integer(level))]);
            assert_eq!(validator().validate(&r), expected, "level {}", level);
        }
    }

    #[test]
    fn one_violation_rejects_despite_other_valid_fields() {
        let r = record(&[
            ("records", FieldValue::Integer(1000)),
            ("sensitivity", FieldValue::Integer(3)),
            ("year", date(2021, 1, 1)),
        ]);
        assert!(!validator().validate(&r));
    }

    #[test]
    fn wrong_type_collapses_to_rejection() {
        let r = record(&[("PwnCount", FieldValue::Text("many".to_string()))]);
        assert!(!validator().validate(&r));
        assert_eq!(
            validator().check(&r),
            Err(RuleViolation::TypeMismatch {
                field: "PwnCount".to_string()
            })
        );
    }

    #[test]
    fn unruled_fields_are_ignored() {
        let r = record(&[
            ("Description", FieldValue::Text("free text".to_string())),
            ("Title", FieldValue::Null),
        ]);
        assert!(validator().validate(&r));
    }
}
