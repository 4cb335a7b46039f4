//! Lenient timestamp parsing
//!
//! Machine-readable timestamps arrive from element attributes and user
//! input in a handful of shapes. Parsing is forgiving about the shape but
//! strict about validity. Anything unparseable comes back as `None` and the
//! caller decides whether to skip or report it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Formats tried for naive timestamps, which are taken to be UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp into a UTC instant.
///
/// Accepts RFC 3339 (the `datetime` attribute format), RFC 2822, naive
/// `YYYY-MM-DD HH:MM:SS` timestamps with `T` or space separators and
/// optional fractional seconds, and bare `YYYY-MM-DD` dates taken as
/// midnight UTC.
pub fn parse(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&Utc));
    }

    if let Ok(instant) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(instant.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_utc() {
        let expected = Utc.with_ymd_and_hms(2013, 11, 14, 13, 24, 43).unwrap();
        assert_eq!(parse("2013-11-14T13:24:43Z"), Some(expected));
    }

    #[test]
    fn test_parse_rfc3339_with_millis() {
        let expected = Utc.with_ymd_and_hms(2013, 11, 14, 13, 24, 43).unwrap()
            + chrono::TimeDelta::milliseconds(310);
        assert_eq!(parse("2013-11-14T13:24:43.310Z"), Some(expected));
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let expected = Utc.with_ymd_and_hms(2013, 11, 14, 11, 24, 43).unwrap();
        assert_eq!(parse("2013-11-14T13:24:43+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_rfc2822() {
        let expected = Utc.with_ymd_and_hms(2013, 11, 14, 13, 24, 43).unwrap();
        assert_eq!(parse("Thu, 14 Nov 2013 13:24:43 +0000"), Some(expected));
    }

    #[test]
    fn test_parse_naive_datetime() {
        let expected = Utc.with_ymd_and_hms(2013, 11, 14, 13, 24, 43).unwrap();
        assert_eq!(parse("2013-11-14T13:24:43"), Some(expected));
        assert_eq!(parse("2013-11-14 13:24:43"), Some(expected));
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let expected = Utc.with_ymd_and_hms(2013, 11, 14, 0, 0, 0).unwrap();
        assert_eq!(parse("2013-11-14"), Some(expected));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let expected = Utc.with_ymd_and_hms(2013, 11, 14, 0, 0, 0).unwrap();
        assert_eq!(parse("  2013-11-14\n"), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("yesterday"), None);
        assert_eq!(parse("2013-13-40"), None);
        assert_eq!(parse("1384435483"), None, "Bare epoch numbers are not accepted");
    }
}
