use std::fmt;
use thiserror::Error;

/// The FHIR primitive a value or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Date,
    DateTime,
    Time,
    Instant,
}

impl PrimitiveKind {
    /// FHIR type name, as used in `value[x]` suffixes and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Time => "time",
            Self::Instant => "instant",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by FHIR primitive construction and resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// The text does not match any shape accepted by the type.
    #[error("invalid FHIR {kind} format: '{value}' (expected {expected})")]
    Format {
        kind: PrimitiveKind,
        value: String,
        expected: &'static str,
    },

    /// The text is well-formed but does not denote a real calendar value.
    #[error("cannot resolve FHIR {kind} '{value}': {reason}")]
    Parse {
        kind: PrimitiveKind,
        value: String,
        reason: String,
    },
}

impl PrimitiveError {
    /// Create a new Format error
    pub fn format(kind: PrimitiveKind, value: impl Into<String>, expected: &'static str) -> Self {
        Self::Format {
            kind,
            value: value.into(),
            expected,
        }
    }

    /// Create a new Parse error
    pub fn parse(kind: PrimitiveKind, value: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Parse {
            kind,
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// The primitive type that produced this error
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Format { kind, .. } | Self::Parse { kind, .. } => *kind,
        }
    }

    /// The offending text
    pub fn value(&self) -> &str {
        match self {
            Self::Format { value, .. } | Self::Parse { value, .. } => value,
        }
    }
}

/// Convenience result type for primitive operations
pub type Result<T> = std::result::Result<T, PrimitiveError>;
