use anyhow::{Context, Result};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use zh_fhir_primitives::{FhirDate, FhirDateTime, FhirInstant, FhirTime, Precision};

use crate::cli::{CheckArgs, OutputFormat, PrimitiveArg};
use crate::output::{print_field, print_json, print_success};

/// What a single value looks like once validated and resolved.
#[derive(Debug, Serialize, PartialEq)]
pub struct CheckReport {
    pub kind: &'static str,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<Precision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_timezone: Option<bool>,
    pub resolved: String,
}

pub fn inspect(kind: PrimitiveArg, text: &str) -> Result<CheckReport> {
    let report = match kind {
        PrimitiveArg::Date => {
            let value = FhirDate::new(text)?;
            let resolved = value.to_primitive_date_time()?;
            CheckReport {
                kind: "date",
                text: value.to_string(),
                precision: Some(value.precision()),
                has_timezone: None,
                resolved: resolved.date().to_string(),
            }
        }
        PrimitiveArg::Time => {
            let value = FhirTime::new(text)?;
            let since_midnight = value.to_duration()?;
            CheckReport {
                kind: "time",
                text: value.to_string(),
                precision: None,
                has_timezone: None,
                resolved: format!("{}s after midnight", since_midnight.as_seconds_f64()),
            }
        }
        PrimitiveArg::DateTime => {
            let value = FhirDateTime::new(text)?;
            let resolved = value.to_offset_date_time()?;
            CheckReport {
                kind: "dateTime",
                text: value.to_string(),
                precision: Some(value.precision()),
                has_timezone: Some(value.has_timezone()),
                resolved: resolved.format(&Rfc3339).context("cannot format resolved value")?,
            }
        }
        PrimitiveArg::Instant => {
            let value = FhirInstant::new(text)?;
            let resolved = value.to_offset_date_time()?;
            CheckReport {
                kind: "instant",
                text: value.to_string(),
                precision: Some(value.precision()),
                has_timezone: Some(true),
                resolved: resolved.format(&Rfc3339).context("cannot format resolved value")?,
            }
        }
    };
    Ok(report)
}

pub fn run(args: &CheckArgs, format: OutputFormat, pretty: bool) -> Result<()> {
    let report = inspect(args.kind, &args.text)?;
    tracing::debug!(kind = report.kind, text = %report.text, "checked value");

    match format {
        OutputFormat::Json => print_json(&report, pretty)?,
        OutputFormat::Text => {
            print_success(&format!("valid FHIR {}", report.kind));
            print_field("Text", &report.text);
            if let Some(precision) = report.precision {
                print_field("Precision", precision);
            }
            if let Some(has_timezone) = report.has_timezone {
                print_field("Timezone", if has_timezone { "yes" } else { "no" });
            }
            print_field("Resolved", &report.resolved);
        }
    }
    Ok(())
}
