use crate::error::{PrimitiveError, PrimitiveKind, Result};
use crate::format::{format_clock, fraction_nanos, padded_fraction, shortest_fraction};
use crate::grammar::{TIME_SHAPES, TimeFields, match_time};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_DAY: i128 = 86_400 * NANOS_PER_SECOND;

/// FHIR `time` primitive - a time of day.
///
/// Format: `hh:mm:ss` or `hh:mm:ss.sss…`, 24-hour clock, no leap seconds.
/// There is no date and no timezone; both come from context.
///
/// # Examples
/// - `10:30:00`
/// - `14:45:30.123`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FhirTime(String);

text_primitive!(FhirTime, PrimitiveKind::Time);

impl FhirTime {
    fn check(text: &str) -> Result<()> {
        match match_time(text) {
            Some(_) => Ok(()),
            None => {
                tracing::debug!(value = text, "rejected FHIR time");
                Err(PrimitiveError::format(PrimitiveKind::Time, text, TIME_SHAPES))
            }
        }
    }

    fn fields(&self) -> Result<TimeFields<'_>> {
        self.validate()?;
        match_time(&self.0).ok_or_else(|| {
            PrimitiveError::parse(PrimitiveKind::Time, &self.0, "time fields not recognised")
        })
    }

    /// Duration since midnight.
    pub fn to_duration(&self) -> Result<Duration> {
        let fields = self.fields()?;
        let nanos = fields.fraction.map(fraction_nanos).unwrap_or(0);
        Ok(Duration::hours(i64::from(fields.hour))
            + Duration::minutes(i64::from(fields.minute))
            + Duration::seconds(i64::from(fields.second))
            + Duration::nanoseconds(i64::from(nanos)))
    }

    /// This time of day on `date`, counted from local midnight. No offset is chosen.
    pub fn resolve_on(&self, date: Date) -> Result<PrimitiveDateTime> {
        let duration = self.to_duration()?;
        date.midnight().checked_add(duration).ok_or_else(|| {
            PrimitiveError::parse(PrimitiveKind::Time, &self.0, format!("overflow on {date}"))
        })
    }

    /// Canonical time for a duration since midnight.
    ///
    /// Durations outside a single day wrap modulo 24 hours. A non-zero
    /// sub-second part is written at full nanosecond width.
    pub fn from_duration(duration: Duration) -> Self {
        let nanos_of_day = duration.whole_nanoseconds().rem_euclid(NANOS_PER_DAY);
        let total_seconds = nanos_of_day / NANOS_PER_SECOND;
        // All components are bounded by the modulo above.
        let hour = (total_seconds / 3600) as u8;
        let minute = (total_seconds / 60 % 60) as u8;
        let second = (total_seconds % 60) as u8;
        let nanos = (nanos_of_day % NANOS_PER_SECOND) as u32;

        let text = format!(
            "{}{}",
            format_clock(hour, minute, second),
            padded_fraction(nanos)
        );
        debug_assert!(Self::check(&text).is_ok());
        Self(text)
    }

    /// Time of day of `value`, with the shortest lossless fractional part.
    pub fn from_time(value: time::Time) -> Self {
        let text = format!(
            "{}{}",
            format_clock(value.hour(), value.minute(), value.second()),
            shortest_fraction(value.nanosecond())
        );
        debug_assert!(Self::check(&text).is_ok());
        Self(text)
    }

    /// Wall-clock time of `value` in its own offset.
    pub fn from_offset_date_time(value: OffsetDateTime) -> Self {
        Self::from_time(value.time())
    }
}
