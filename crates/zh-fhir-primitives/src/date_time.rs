use crate::error::{PrimitiveError, PrimitiveKind, Result};
use crate::format::{format_calendar, format_clock, format_offset, resolve_calendar};
use crate::grammar::{DATE_TIME_SHAPES, is_date_time_with_time, match_partial_date};
use crate::precision::Precision;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// FHIR `dateTime` primitive - a date, date-time, or partial date.
///
/// Format: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or
/// `YYYY-MM-DDThh:mm:ss[.sss][Z|+/-hh:mm]`.
///
/// Unlike `instant`, the timezone is optional when a time is present.
/// Equality is textual: `...T10:30:00Z` and `...T10:30:00+00:00` denote the
/// same moment but are different values.
///
/// # Examples
/// - `2024` (year only)
/// - `2024-01-15` (full date)
/// - `2024-01-15T10:30:00Z` (date-time with timezone)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FhirDateTime(String);

text_primitive!(FhirDateTime, PrimitiveKind::DateTime);

impl FhirDateTime {
    fn check(text: &str) -> Result<()> {
        if match_partial_date(text).is_some() || is_date_time_with_time(text) {
            return Ok(());
        }
        tracing::debug!(value = text, "rejected FHIR dateTime");
        Err(PrimitiveError::format(
            PrimitiveKind::DateTime,
            text,
            DATE_TIME_SHAPES,
        ))
    }

    /// Precision derived from the text; `Unknown` only for the absent value.
    pub fn precision(&self) -> Precision {
        match match_partial_date(&self.0) {
            Some(precision) => precision,
            None if is_date_time_with_time(&self.0) => Precision::Second,
            None => Precision::Unknown,
        }
    }

    /// True when the text carries `Z` or a numeric offset.
    pub fn has_timezone(&self) -> bool {
        self.precision() == Precision::Second
            && (self.0.ends_with('Z') || self.0[10..].contains(['+', '-']))
    }

    /// Resolves to an absolute timestamp.
    ///
    /// Partial dates resolve to UTC midnight on the first day they cover.
    /// A time without an offset is read as UTC.
    pub fn to_offset_date_time(&self) -> Result<OffsetDateTime> {
        match self.precision() {
            Precision::Unknown => Err(PrimitiveError::format(
                PrimitiveKind::DateTime,
                &self.0,
                DATE_TIME_SHAPES,
            )),
            Precision::Second => self.resolve_full(),
            _ => {
                let date = resolve_calendar(PrimitiveKind::DateTime, &self.0)?;
                Ok(date.midnight().assume_utc())
            }
        }
    }

    fn resolve_full(&self) -> Result<OffsetDateTime> {
        let text = self.0.as_str();
        let zoned = match OffsetDateTime::parse(text, &Rfc3339) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        tracing::debug!(value = text, error = %zoned, "no offset in dateTime, reading as UTC");

        let local = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
        if let Ok(value) = PrimitiveDateTime::parse(text, local) {
            return Ok(value.assume_utc());
        }

        let fractional =
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
        PrimitiveDateTime::parse(text, fractional)
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|e| PrimitiveError::parse(PrimitiveKind::DateTime, text, e))
    }

    /// `YYYY` from the calendar fields of `value` in its own offset.
    pub fn from_offset_date_time_year(value: OffsetDateTime) -> Result<Self> {
        Self::new(format_calendar(value.date(), false, false))
    }

    /// `YYYY-MM` from the calendar fields of `value` in its own offset.
    pub fn from_offset_date_time_month(value: OffsetDateTime) -> Result<Self> {
        Self::new(format_calendar(value.date(), true, false))
    }

    /// `YYYY-MM-DD` from the calendar fields of `value` in its own offset.
    pub fn from_offset_date_time_day(value: OffsetDateTime) -> Result<Self> {
        Self::new(format_calendar(value.date(), true, true))
    }

    /// `YYYY-MM-DDThh:mm:ss` plus the offset of `value`, whole seconds only.
    ///
    /// An offset with a seconds component has no `±hh:mm` form, so such
    /// values are written in UTC instead.
    pub fn from_offset_date_time(value: OffsetDateTime) -> Result<Self> {
        let value = if value.offset().seconds_past_minute() != 0 {
            value.to_offset(UtcOffset::UTC)
        } else {
            value
        };
        Self::new(format!(
            "{}T{}{}",
            format_calendar(value.date(), true, true),
            format_clock(value.hour(), value.minute(), value.second()),
            format_offset(value.offset())
        ))
    }

    pub fn now_utc() -> Result<Self> {
        Self::from_offset_date_time(OffsetDateTime::now_utc())
    }
}
