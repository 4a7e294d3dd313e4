//! Date parsing and normalization for upload and analysis payloads

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat};

/// Spreadsheet-style fallback format accepted alongside ISO-8601
pub const FALLBACK_FORMAT: &str = "%m/%d/%y %H:%M";

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Normalize a date string to an ISO-8601 representation.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS`, bare `YYYY-MM-DD`
/// dates, or `MM/DD/YY HH:mm` as a fallback. Normalization is idempotent:
/// feeding the output back in yields the same string.
pub fn normalize_datetime(value: &str) -> Result<String, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, NAIVE_FORMAT) {
        return Ok(dt.format(NAIVE_FORMAT).to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(format!("{}T00:00:00", date.format("%Y-%m-%d")));
    }
    match NaiveDateTime::parse_from_str(value, FALLBACK_FORMAT) {
        Ok(dt) => Ok(dt.format(NAIVE_FORMAT).to_string()),
        Err(_) => Err(format!(
            "could not parse '{value}'. Must be YYYY-MM-DD or an ISO-formatted timestamp"
        )),
    }
}

/// Interpret a normalized timestamp as a naive UTC instant for range checks.
pub(crate) fn to_naive_utc(normalized: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(normalized) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(normalized, NAIVE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rfc3339() {
        let iso = normalize_datetime("2016-09-20T00:00:00+00:00").unwrap();
        assert_eq!(iso, "2016-09-20T00:00:00Z");
    }

    #[test]
    fn test_normalize_naive_datetime() {
        let iso = normalize_datetime("2010-01-26T16:14:00").unwrap();
        assert_eq!(iso, "2010-01-26T16:14:00");
    }

    #[test]
    fn test_normalize_bare_date() {
        let iso = normalize_datetime("2017-09-26").unwrap();
        assert_eq!(iso, "2017-09-26T00:00:00");
    }

    #[test]
    fn test_normalize_fallback_format() {
        let iso = normalize_datetime("01/26/10 16:14").unwrap();
        assert_eq!(iso, "2010-01-26T16:14:00");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["2016-09-20T00:00:00+00:00", "2010-01-26T16:14:00", "2017-09-26", "01/26/10 16:14"] {
            let once = normalize_datetime(input).unwrap();
            let twice = normalize_datetime(&once).unwrap();
            assert_eq!(once, twice, "normalization of '{input}' is not idempotent");
        }
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        let err = normalize_datetime("next tuesday").unwrap_err();
        assert!(err.contains("next tuesday"));
    }

    #[test]
    fn test_to_naive_utc_offsets_align() {
        let a = to_naive_utc("2016-09-20T02:00:00+02:00").unwrap();
        let b = to_naive_utc("2016-09-20T00:00:00").unwrap();
        assert_eq!(a, b);
    }
}
