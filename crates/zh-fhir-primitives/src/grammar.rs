//! Fixed-shape textual grammars for the FHIR temporal primitives.
//!
//! Every temporal type is validated by strict pattern matching against the
//! shapes listed here before any calendar arithmetic happens. The calendar
//! library is never asked to "guess" what a string means.
//!
//! Digit classes are spelled `[0-9]` rather than `\d`, which would also accept
//! non-ASCII Unicode digits.

use crate::precision::Precision;
use regex::Regex;
use std::sync::LazyLock;

// =============================================================================
// Regex patterns for validation
// =============================================================================

/// `YYYY`
static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("Invalid year regex"));

/// `YYYY-MM`
static YEAR_MONTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").expect("Invalid year-month regex")
});

/// `YYYY-MM-DD`
static FULL_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$")
        .expect("Invalid full date regex")
});

/// `YYYY-MM-DDThh:mm:ss[.fff…][Z|±hh:mm]`
static DATE_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])T([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9](\.[0-9]+)?(Z|[+-](0[0-9]|1[0-4]):[0-5][0-9])?$",
    )
    .expect("Invalid dateTime regex")
});

/// `YYYY-MM-DDThh:mm:ss[.fff…](Z|±hh:mm)`
static INSTANT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])T([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9](\.[0-9]+)?(Z|[+-](0[0-9]|1[0-4]):[0-5][0-9])$",
    )
    .expect("Invalid instant regex")
});

/// `hh:mm:ss[.fff…]`
static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9]):([0-5][0-9])(?:\.([0-9]+))?$")
        .expect("Invalid time regex")
});

/// Accepted shapes, quoted verbatim in format errors.
pub(crate) const DATE_SHAPES: &str = "YYYY, YYYY-MM, or YYYY-MM-DD";
pub(crate) const DATE_TIME_SHAPES: &str =
    "YYYY, YYYY-MM, YYYY-MM-DD, or YYYY-MM-DDThh:mm:ss[.sss][Z|+/-hh:mm]";
pub(crate) const INSTANT_SHAPES: &str = "YYYY-MM-DDThh:mm:ss[.sss](Z|+/-hh:mm)";
pub(crate) const TIME_SHAPES: &str = "hh:mm:ss or hh:mm:ss.ffffff";

/// Matches the three date-only shapes shared by `date` and `dateTime`.
pub(crate) fn match_partial_date(text: &str) -> Option<Precision> {
    if YEAR_REGEX.is_match(text) {
        Some(Precision::Year)
    } else if YEAR_MONTH_REGEX.is_match(text) {
        Some(Precision::Month)
    } else if FULL_DATE_REGEX.is_match(text) {
        Some(Precision::Day)
    } else {
        None
    }
}

/// Matches the `dateTime` shape that carries a time of day.
pub(crate) fn is_date_time_with_time(text: &str) -> bool {
    DATE_TIME_REGEX.is_match(text)
}

pub(crate) fn is_instant(text: &str) -> bool {
    INSTANT_REGEX.is_match(text)
}

/// Time-of-day fields captured from a `time` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeFields<'a> {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Fraction digits after the dot, without the dot.
    pub fraction: Option<&'a str>,
}

/// Matches a `time` value and splits it into its fields.
pub(crate) fn match_time(text: &str) -> Option<TimeFields<'_>> {
    let caps = TIME_REGEX.captures(text)?;
    Some(TimeFields {
        hour: caps.get(1)?.as_str().parse().ok()?,
        minute: caps.get(2)?.as_str().parse().ok()?,
        second: caps.get(3)?.as_str().parse().ok()?,
        fraction: caps.get(4).map(|m| m.as_str()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_date_shapes() {
        assert_eq!(match_partial_date("2024"), Some(Precision::Year));
        assert_eq!(match_partial_date("2024-01"), Some(Precision::Month));
        assert_eq!(match_partial_date("2024-01-15"), Some(Precision::Day));
        assert_eq!(match_partial_date("2024-1"), None);
        assert_eq!(match_partial_date("2024-13"), None);
        assert_eq!(match_partial_date("2024-01-32"), None);
        assert_eq!(match_partial_date("2024-01-15T10:30:00"), None);
        assert_eq!(match_partial_date(""), None);
    }

    #[test]
    fn test_rejects_non_ascii_digits() {
        // Arabic-Indic digits
        assert_eq!(match_partial_date("٢٠٢٤"), None);
        assert!(match_time("١٠:30:00").is_none());
    }

    #[test]
    fn test_date_time_timezone_optional() {
        assert!(is_date_time_with_time("2024-01-15T10:30:00"));
        assert!(is_date_time_with_time("2024-01-15T10:30:00Z"));
        assert!(is_date_time_with_time("2024-01-15T10:30:00.5-05:00"));
        assert!(!is_date_time_with_time("2024-01-15T10:30:00+10"));
        assert!(!is_date_time_with_time("2024-01-15T10:30Z"));
    }

    #[test]
    fn test_instant_timezone_mandatory() {
        assert!(is_instant("2024-01-15T10:30:00Z"));
        assert!(is_instant("2024-01-15T10:30:00.123456789+14:00"));
        assert!(!is_instant("2024-01-15T10:30:00"));
        assert!(!is_instant("2024-01-15T10:30:00+15:00"));
    }

    #[test]
    fn test_time_fields() {
        let fields = match_time("23:59:58.0125").unwrap();
        assert_eq!(fields.hour, 23);
        assert_eq!(fields.minute, 59);
        assert_eq!(fields.second, 58);
        assert_eq!(fields.fraction, Some("0125"));

        let fields = match_time("00:00:00").unwrap();
        assert_eq!(fields.fraction, None);

        assert!(match_time("24:00:00").is_none());
        assert!(match_time("10:30:60").is_none());
        assert!(match_time("10:30:00.").is_none());
    }
}
