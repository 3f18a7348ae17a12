use std::str::FromStr;

use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Take a required text field, trimmed. Missing and blank values are both rejected.
pub fn required(field: &str, value: Option<String>) -> Result<String, String> {
    optional(value).ok_or_else(|| format!("Missing required field: {}", field))
}

/// Take an optional text field, trimmed. Blank values collapse to `None`.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a required field into a domain type
pub fn parse_required<T>(field: &str, value: Option<String>) -> Result<T, String>
where
    T: FromStr<Err = String>,
{
    required(field, value)?.parse()
}

/// Parse an optional field into a domain type
pub fn parse_optional<T>(value: Option<String>) -> Result<Option<T>, String>
where
    T: FromStr<Err = String>,
{
    optional(value).map(|v| v.parse()).transpose()
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| format!("{} must be a date formatted as YYYY-MM-DD", field))
}

/// Parse a required `YYYY-MM-DD` field
pub fn required_date(field: &str, value: Option<String>) -> Result<NaiveDate, String> {
    parse_date(field, &required(field, value)?)
}

/// Parse an optional `YYYY-MM-DD` field
pub fn optional_date(field: &str, value: Option<String>) -> Result<Option<NaiveDate>, String> {
    optional(value).map(|v| parse_date(field, &v)).transpose()
}
