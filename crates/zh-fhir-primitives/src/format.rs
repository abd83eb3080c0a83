//! Text formatting and calendar helpers shared by the temporal types.

use crate::error::{PrimitiveError, PrimitiveKind, Result};
use time::{Date, Month, UtcOffset};

const NANOS_DIGITS: usize = 9;

/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY` depending on how much of the date is kept.
pub(crate) fn format_calendar(date: Date, keep_month: bool, keep_day: bool) -> String {
    let year = date.year();
    let month = u8::from(date.month());
    match (keep_month, keep_day) {
        (true, true) => format!("{year:04}-{month:02}-{:02}", date.day()),
        (true, false) => format!("{year:04}-{month:02}"),
        _ => format!("{year:04}"),
    }
}

/// `hh:mm:ss`
pub(crate) fn format_clock(hour: u8, minute: u8, second: u8) -> String {
    format!("{hour:02}:{minute:02}:{second:02}")
}

/// `Z` for UTC, otherwise `+hh:mm` / `-hh:mm`. Callers pass whole-minute offsets.
pub(crate) fn format_offset(offset: UtcOffset) -> String {
    if offset.is_utc() {
        return "Z".to_string();
    }
    debug_assert_eq!(offset.seconds_past_minute(), 0);
    let (hours, minutes, _) = offset.as_hms();
    let sign = if offset.is_negative() { '-' } else { '+' };
    format!(
        "{sign}{:02}:{:02}",
        hours.unsigned_abs(),
        minutes.unsigned_abs()
    )
}

/// Fractional suffix in its shortest lossless form: empty for zero,
/// otherwise `.` followed by the digits with trailing zeros removed.
pub(crate) fn shortest_fraction(nanos: u32) -> String {
    if nanos == 0 {
        return String::new();
    }
    let digits = format!("{nanos:09}");
    format!(".{}", digits.trim_end_matches('0'))
}

/// Fractional suffix at full nanosecond width: empty for zero, otherwise
/// `.` followed by nine zero-padded digits.
pub(crate) fn padded_fraction(nanos: u32) -> String {
    if nanos == 0 {
        String::new()
    } else {
        format!(".{nanos:09}")
    }
}

/// Converts fraction digits (without the dot) to nanoseconds.
/// Digits beyond nanosecond resolution are truncated.
pub(crate) fn fraction_nanos(digits: &str) -> u32 {
    digits
        .bytes()
        .take(NANOS_DIGITS)
        .chain(std::iter::repeat(b'0'))
        .take(NANOS_DIGITS)
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Resolves the leading `YYYY[-MM[-DD]]` of already-validated text to a
/// calendar date, defaulting missing month and day to 1.
pub(crate) fn resolve_calendar(kind: PrimitiveKind, text: &str) -> Result<Date> {
    let component = |start: usize, default: i32| -> Result<i32> {
        match text.get(start..start + 2) {
            Some(digits) => digits
                .parse::<i32>()
                .map_err(|e| PrimitiveError::parse(kind, text, e)),
            None => Ok(default),
        }
    };

    let year = text
        .get(0..4)
        .ok_or_else(|| PrimitiveError::parse(kind, text, "missing year"))?
        .parse::<i32>()
        .map_err(|e| PrimitiveError::parse(kind, text, e))?;
    let month = component(5, 1)?;
    let day = component(8, 1)?;

    let month = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| PrimitiveError::parse(kind, text, format!("month {month} out of range")))?;
    let day = u8::try_from(day)
        .map_err(|_| PrimitiveError::parse(kind, text, format!("day {day} out of range")))?;

    Date::from_calendar_date(year, month, day).map_err(|e| PrimitiveError::parse(kind, text, e))
}
