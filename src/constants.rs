/// Source name constants to ensure consistency across the codebase.
/// These constants define the mapping between CLI source names and the
/// field-classification sets used during coercion.

// User-facing source names (used in CLI)
pub const PWNED_SOURCE: &str = "pwned";
pub const IIB_SOURCE: &str = "iib";

// API fields carrying an ISO-8601 calendar date
pub const DATE_FIELDS: &[&str] = &["BreachDate"];

// API fields carrying an ISO-8601 timestamp
pub const DATETIME_FIELDS: &[&str] = &["AddedDate", "ModifiedDate"];

// CSV fields holding counts written with thousands separators ("1,029,961")
pub const GROUPED_COUNT_FIELDS: &[&str] = &["records"];

// CSV fields holding a bare four-digit year
pub const YEAR_FIELDS: &[&str] = &["year"];

// CSV fields holding a small integer category
pub const CATEGORY_FIELDS: &[&str] = &["sensitivity"];

/// Get all supported user-facing source names
pub fn supported_sources() -> Vec<&'static str> {
    vec![PWNED_SOURCE, IIB_SOURCE]
}
