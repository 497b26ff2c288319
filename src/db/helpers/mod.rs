use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::LifestyleItem;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// RFC 3339 with as many fractional digits as needed to round-trip exactly.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn items_to_json(items: &[LifestyleItem]) -> Result<String> {
    serde_json::to_string(items).context("failed to serialize lifestyle items")
}

pub fn items_from_json(value: &str, entry_id: &str) -> Result<Vec<LifestyleItem>> {
    serde_json::from_str(value)
        .with_context(|| format!("failed to parse items_json for entry {entry_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn datetime_round_trips_with_subseconds() {
        let value = Utc.timestamp_nanos(1_790_000_000_123_456_789);
        let text = format_datetime(&value);
        assert!(text.ends_with('Z'));
        assert_eq!(parse_datetime(&text, "date").unwrap(), value);
    }

    #[test]
    fn bad_datetime_names_field() {
        let err = parse_datetime("yesterday", "entry_date").unwrap_err();
        assert!(err.to_string().contains("entry_date"));
    }
}
