use chrono::{DateTime, NaiveDateTime, Utc};

use crate::app::{GramfeedError, Result};

/// Format name for unix timestamps in seconds
pub const UNIX_SECONDS: &str = "X";

/// Parse a raw listing timestamp.
///
/// `X` reads unix seconds (integer or fractional). Any other format is a
/// chrono pattern interpreted as UTC.
pub fn parse_timestamp(raw: &str, format: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    let invalid = |detail: String| GramfeedError::parse(format!("timestamp {:?}", raw), detail);

    if format == UNIX_SECONDS {
        let (secs, nanos) = match raw.parse::<i64>() {
            Ok(secs) => (secs, 0),
            Err(_) => {
                let value: f64 = raw.parse().map_err(|_| invalid("not a unix timestamp".into()))?;
                if !value.is_finite() {
                    return Err(invalid("not a unix timestamp".into()));
                }
                let secs = value.floor();
                (secs as i64, ((value - secs) * 1e9).round().min(999_999_999.0) as u32)
            }
        };
        return DateTime::from_timestamp(secs, nanos).ok_or_else(|| invalid("out of range".into()));
    }

    NaiveDateTime::parse_from_str(raw, format)
        .map(|naive| naive.and_utc())
        .map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unix_seconds() {
        let parsed = parse_timestamp("1700000000", UNIX_SECONDS).unwrap();
        assert_eq!(parsed, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    }

    #[test]
    fn test_fractional_unix_seconds() {
        let parsed = parse_timestamp(" 1700000000.5 ", UNIX_SECONDS).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
        assert_eq!(parsed.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_custom_format() {
        let parsed = parse_timestamp("2024-01-02 03:04:05", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            parse_timestamp("yesterday", UNIX_SECONDS),
            Err(GramfeedError::Parse { .. })
        ));
        assert!(parse_timestamp("NaN", UNIX_SECONDS).is_err());
        assert!(parse_timestamp("2024-13-40", "%Y-%m-%d %H:%M:%S").is_err());
    }
}
