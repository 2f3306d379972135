use crate::constants::{
    CATEGORY_FIELDS, DATE_FIELDS, DATETIME_FIELDS, GROUPED_COUNT_FIELDS, YEAR_FIELDS,
};
use crate::error::{PipelineError, Result};
use crate::types::{BreachRecord, FieldValue, RawRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Parse an ISO-8601 calendar date ("2014-10-14").
pub fn parse_iso_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| PipelineError::Parse {
        field: field.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}

/// Parse an ISO-8601 timestamp. Trailing offsets ("Z", "+02:00") are accepted
/// and normalized to UTC; offset-less strings parse as-is.
pub fn parse_iso_timestamp(field: &str, raw: &str) -> Result<NaiveDateTime> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map_err(|e| PipelineError::Parse {
        field: field.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}

/// Parse an integer that may carry "," thousands separators ("1,029,961").
pub fn parse_grouped_count(field: &str, raw: &str) -> Result<i64> {
    raw.replace(',', "")
        .trim()
        .parse::<i64>()
        .map_err(|e| PipelineError::Parse {
            field: field.to_string(),
            value: raw.to_string(),
            message: e.to_string(),
        })
}

/// Convert a four-digit year to the date of its January 1st.
pub fn parse_year(field: &str, raw: &str) -> Result<NaiveDate> {
    let year: i32 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
        PipelineError::Parse {
            field: field.to_string(),
            value: raw.to_string(),
            message: e.to_string(),
        }
    })?;
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| PipelineError::Parse {
        field: field.to_string(),
        value: raw.to_string(),
        message: "year out of range".to_string(),
    })
}

fn expect_str<'a>(field: &str, value: &'a Value) -> Result<&'a str> {
    value.as_str().ok_or_else(|| PipelineError::Parse {
        field: field.to_string(),
        value: value.to_string(),
        message: "expected a string".to_string(),
    })
}

// Natural JSON -> FieldValue mapping for fields with no declared semantic
// type. Arrays and objects are kept as their JSON text.
fn passthrough(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Flag(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::Null
            }
        }
        Value::String(s) => FieldValue::Text(s.clone()),
        other => FieldValue::Text(other.to_string()),
    }
}

/// Coerce one API record: declared date and datetime fields parse into their
/// calendar types, everything else passes through unchanged.
pub fn coerce_api_record(raw: &RawRecord) -> Result<BreachRecord> {
    let mut record = BreachRecord::new();
    for (key, value) in raw {
        let coerced = if DATE_FIELDS.contains(&key.as_str()) {
            FieldValue::Date(parse_iso_date(key, expect_str(key, value)?)?)
        } else if DATETIME_FIELDS.contains(&key.as_str()) {
            FieldValue::Timestamp(parse_iso_timestamp(key, expect_str(key, value)?)?)
        } else {
            passthrough(value)
        };
        record.insert(key.clone(), coerced);
    }
    Ok(record)
}

/// Coerce one CSV row: counts, years and categories parse out of their
/// string forms, everything else stays text.
pub fn coerce_csv_record(raw: &RawRecord) -> Result<BreachRecord> {
    let mut record = BreachRecord::new();
    for (key, value) in raw {
        let text = expect_str(key, value)?;
        let coerced = if GROUPED_COUNT_FIELDS.contains(&key.as_str()) {
            FieldValue::Integer(parse_grouped_count(key, text)?)
        } else if YEAR_FIELDS.contains(&key.as_str()) {
            FieldValue::Date(parse_year(key, text)?)
        } else if CATEGORY_FIELDS.contains(&key.as_str()) {
            FieldValue::Integer(text.trim().parse().map_err(
                |e: std::num::ParseIntError| PipelineError::Parse {
                    field: key.clone(),
                    value: text.to_string(),
                    message: e.to_string(),
                },
            )?)
        } else {
            FieldValue::Text(text.to_string())
        };
        record.insert(key.clone(), coerced);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_raw(value: Value) -> RawRecord {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn parses_iso_date() {
        let date = parse_iso_date("BreachDate", "2014-10-14").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2014, 10, 14).unwrap());
    }

    #[test]
    fn rejects_malformed_date() {
        let err = parse_iso_date("BreachDate", "14/10/2014").unwrap_err();
        assert!(matches!(err, PipelineError::Parse { ref field, .. } if field == "BreachDate"));
    }

    #[test]
    fn parses_timestamp_with_zulu_suffix() {
        let ts = parse_iso_timestamp("AddedDate", "2013-12-04T00:00:00Z").unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2013, 12, 4)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn normalizes_numeric_offset_to_utc() {
        let ts = parse_iso_timestamp("AddedDate", "2013-12-04T02:00:00+02:00").unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2013, 12, 4)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn accepts_offsetless_timestamp() {
        let ts = parse_iso_timestamp("ModifiedDate", "2015-06-01T12:30:00").unwrap();
        assert_eq!(ts.and_utc().timestamp(), 1433161800);
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(parse_iso_timestamp("AddedDate", "not-a-timestamp").is_err());
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_grouped_count("records", "1,029,961").unwrap(), 1_029_961);
        assert_eq!(parse_grouped_count("records", "1,000").unwrap(), 1000);
    }

    #[test]
    fn year_becomes_january_first() {
        let date = parse_year("year", "2021").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    }

    #[test]
    fn coerces_api_record() {
        let raw = as_raw(json!({
            "Name": "Adobe",
            "Domain": "adobe.com",
            "BreachDate": "2013-10-04",
            "AddedDate": "2013-12-04T00:00:00Z",
            "PwnCount": 152445165,
            "IsVerified": true,
            "IsFabricated": false,
        }));

        let record = coerce_api_record(&raw).unwrap();
        assert_eq!(
            record["BreachDate"],
            FieldValue::Date(NaiveDate::from_ymd_opt(2013, 10, 4).unwrap())
        );
        assert!(matches!(record["AddedDate"], FieldValue::Timestamp(_)));
        assert_eq!(record["PwnCount"], FieldValue::Integer(152445165));
        assert_eq!(record["IsVerified"], FieldValue::Flag(true));
        assert_eq!(record["Name"], FieldValue::Text("Adobe".to_string()));
    }

    #[test]
    fn api_record_with_unparseable_date_is_fatal() {
        let raw = as_raw(json!({ "BreachDate": "October 4th" }));
        assert!(coerce_api_record(&raw).is_err());
    }

    #[test]
    fn api_record_with_non_string_date_is_fatal() {
        let raw = as_raw(json!({ "BreachDate": 20131004 }));
        assert!(coerce_api_record(&raw).is_err());
    }

    #[test]
    fn coerces_csv_row() {
        let raw = as_raw(json!({
            "organisation": "Acme Corp",
            "records": "1,029,961",
            "year": "2014",
            "sensitivity": "3",
        }));

        let record = coerce_csv_record(&raw).unwrap();
        assert_eq!(record["records"], FieldValue::Integer(1_029_961));
        assert_eq!(
            record["year"],
            FieldValue::Date(NaiveDate::from_ymd_opt(2014, 1, 1).unwrap())
        );
        assert_eq!(record["sensitivity"], FieldValue::Integer(3));
        assert_eq!(record["organisation"], FieldValue::Text("Acme Corp".to_string()));
    }

    #[test]
    fn csv_row_with_bad_count_is_fatal() {
        let raw = as_raw(json!({ "records": "lots" }));
        assert!(coerce_csv_record(&raw).is_err());
    }
}
