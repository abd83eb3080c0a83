//! FHIR temporal primitives (`date`, `time`, `dateTime`, `instant`) and the
//! extension side-car that can accompany any primitive value.
//!
//! Every temporal type wraps its text exactly as written. Construction
//! validates the text against the FHIR grammar; resolution to a calendar
//! value is a separate, fallible step.

#[macro_use]
mod macros;

pub mod date;
pub mod date_time;
pub mod error;
pub mod extension;
pub mod fhir_time;
pub(crate) mod format;
pub(crate) mod grammar;
pub mod instant;
pub mod precision;

pub use date::FhirDate;
pub use date_time::FhirDateTime;
pub use error::{PrimitiveError, PrimitiveKind, Result};
pub use extension::{
    Extension, ExtensionValue, PrimitiveExtension, PrimitiveExtensionExt, is_absent,
};
pub use fhir_time::FhirTime;
pub use instant::FhirInstant;
pub use precision::Precision;
