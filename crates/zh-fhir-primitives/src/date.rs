use crate::error::{PrimitiveError, PrimitiveKind, Result};
use crate::format::{format_calendar, resolve_calendar};
use crate::grammar::{DATE_SHAPES, match_partial_date};
use crate::precision::Precision;
use time::{OffsetDateTime, PrimitiveDateTime, Time};

/// FHIR `date` primitive - a date or partial date.
///
/// Format: `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`. There is no time zone.
///
/// The text is the whole state of the value: equality is byte equality of
/// the text, so `2024-01` and `2024-01-01` are different dates.
///
/// # Examples
/// - `2024` (year only)
/// - `2024-01` (year and month)
/// - `2024-01-15` (full date)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FhirDate(String);

text_primitive!(FhirDate, PrimitiveKind::Date);

impl FhirDate {
    fn check(text: &str) -> Result<()> {
        match match_partial_date(text) {
            Some(_) => Ok(()),
            None => {
                tracing::debug!(value = text, "rejected FHIR date");
                Err(PrimitiveError::format(PrimitiveKind::Date, text, DATE_SHAPES))
            }
        }
    }

    /// Precision derived from the text; `Unknown` only for the absent value.
    pub fn precision(&self) -> Precision {
        match_partial_date(&self.0).unwrap_or(Precision::Unknown)
    }

    /// Resolves to midnight of the date, with no offset attached.
    ///
    /// Month precision resolves to the 1st of the month and year precision
    /// to January 1st.
    pub fn to_primitive_date_time(&self) -> Result<PrimitiveDateTime> {
        self.validate()?;
        let date = resolve_calendar(PrimitiveKind::Date, &self.0)?;
        Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT))
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
    pub fn from_offset_date_time(value: OffsetDateTime) -> Result<Self> {
        Self::new(format_calendar(value.date(), true, true))
    }
}
