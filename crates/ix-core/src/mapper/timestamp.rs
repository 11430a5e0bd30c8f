//! Lenient timestamp parsing for feed dates

use crate::feed::FeedTimestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a feed timestamp, returning `None` when it is not a usable date
pub fn parse_timestamp(ts: &FeedTimestamp) -> Option<DateTime<Utc>> {
    match ts {
        FeedTimestamp::Epoch(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            from_millis(millis)
        }
        FeedTimestamp::Text(s) => parse_text(s),
    }
}

fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

fn parse_text(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(from_millis);
    }

    None
}

/// Raw text of a timestamp, for messages and id derivation
pub fn raw_text(ts: &FeedTimestamp) -> String {
    match ts {
        FeedTimestamp::Epoch(n) => n.to_string(),
        FeedTimestamp::Text(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::to_iso;

    fn text(s: &str) -> FeedTimestamp {
        FeedTimestamp::Text(s.to_string())
    }

    fn iso(ts: &FeedTimestamp) -> Option<String> {
        parse_timestamp(ts).map(|dt| to_iso(&dt))
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(
            iso(&text("2024-03-05T10:00:00+02:00")).as_deref(),
            Some("2024-03-05T08:00:00.000Z")
        );
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(
            iso(&text("Tue, 05 Mar 2024 10:00:00 GMT")).as_deref(),
            Some("2024-03-05T10:00:00.000Z")
        );
    }

    #[test]
    fn test_naive_and_date_only() {
        assert_eq!(
            iso(&text("2024-03-05 10:00:00")).as_deref(),
            Some("2024-03-05T10:00:00.000Z")
        );
        assert_eq!(
            iso(&text("2024-03-05")).as_deref(),
            Some("2024-03-05T00:00:00.000Z")
        );
    }

    #[test]
    fn test_epoch_millis() {
        let ts: FeedTimestamp = serde_json::from_str("1709632800000").unwrap();
        assert_eq!(iso(&ts).as_deref(), Some("2024-03-05T10:00:00.000Z"));
        assert_eq!(
            iso(&text("1709632800000")).as_deref(),
            Some("2024-03-05T10:00:00.000Z")
        );
    }

    #[test]
    fn test_invalid() {
        assert!(parse_timestamp(&text("")).is_none());
        assert!(parse_timestamp(&text("not a date")).is_none());
        assert!(parse_timestamp(&text("2024-13-45")).is_none());
    }
}
