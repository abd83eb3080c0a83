use crate::error::{PrimitiveError, PrimitiveKind, Result};
use crate::format::{format_calendar, format_clock, shortest_fraction};
use crate::grammar::{INSTANT_SHAPES, is_instant};
use crate::precision::Precision;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// FHIR `instant` primitive - a timestamp with a mandatory timezone.
///
/// Format: `YYYY-MM-DDThh:mm:ss[.sss](Z|+/-hh:mm)`
///
/// Used for recording precisely when something happened. Fractional
/// seconds are kept exactly as written.
///
/// # Examples
/// - `2024-01-15T10:30:00Z`
/// - `2024-01-15T10:30:00.123+01:00`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FhirInstant(String);

text_primitive!(FhirInstant, PrimitiveKind::Instant);

impl FhirInstant {
    fn check(text: &str) -> Result<()> {
        if is_instant(text) {
            Ok(())
        } else {
            tracing::debug!(value = text, "rejected FHIR instant");
            Err(PrimitiveError::format(
                PrimitiveKind::Instant,
                text,
                INSTANT_SHAPES,
            ))
        }
    }

    /// `Second` for any present value, `Unknown` for the absent one.
    pub fn precision(&self) -> Precision {
        if self.is_empty() {
            Precision::Unknown
        } else {
            Precision::Second
        }
    }

    /// Resolves to the absolute timestamp, keeping the written offset.
    pub fn to_offset_date_time(&self) -> Result<OffsetDateTime> {
        self.validate()?;
        let text = self.0.as_str();
        if let Ok(value) = OffsetDateTime::parse(text, &Rfc3339) {
            return Ok(value);
        }

        let fractional = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
        );
        OffsetDateTime::parse(text, fractional)
            .map_err(|e| PrimitiveError::parse(PrimitiveKind::Instant, text, e))
    }

    /// UTC, whole seconds.
    pub fn from_offset_date_time(value: OffsetDateTime) -> Result<Self> {
        let utc = value.to_offset(UtcOffset::UTC);
        Self::new(format!(
            "{}T{}Z",
            format_calendar(utc.date(), true, true),
            format_clock(utc.hour(), utc.minute(), utc.second())
        ))
    }

    /// UTC, with the sub-second part in its shortest lossless form.
    ///
    /// A whole-second value gets no fractional suffix at all.
    pub fn from_offset_date_time_nanos(value: OffsetDateTime) -> Result<Self> {
        let utc = value.to_offset(UtcOffset::UTC);
        Self::new(format!(
            "{}T{}{}Z",
            format_calendar(utc.date(), true, true),
            format_clock(utc.hour(), utc.minute(), utc.second()),
            shortest_fraction(utc.nanosecond())
        ))
    }

    pub fn now_utc() -> Result<Self> {
        Self::from_offset_date_time_nanos(OffsetDateTime::now_utc())
    }
}
