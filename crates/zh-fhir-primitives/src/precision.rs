use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity at which a partial temporal value is specified.
///
/// Always derived from the text of a value, never stored beside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Year,
    Month,
    Day,
    /// Time of day included, with or without fractional digits or offset.
    Second,
    /// Only reported for the absent (default) value.
    Unknown,
}

impl Precision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Second => "second",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
