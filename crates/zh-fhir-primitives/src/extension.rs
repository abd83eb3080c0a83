//! FHIR extensions and the `_field` side-car attached to primitive values.
//!
//! In FHIR JSON a primitive field `name` may be accompanied by a sibling
//! `_name` object carrying an `id` and/or `extension` array:
//!
//! ```json
//! {
//!   "birthDate": "1974-12",
//!   "_birthDate": {
//!     "extension": [{ "url": "http://example.org/precision", "valueCode": "month" }]
//!   }
//! }
//! ```
//!
//! The pairing is a naming convention of the containing record: declare the
//! side-car as `Option<PrimitiveExtension>` renamed to `_name` and skip it with
//! [`is_absent`].

use crate::{FhirDate, FhirDateTime, FhirInstant, FhirTime};
use serde::{Deserialize, Serialize};

/// The single value carried by a leaf extension.
///
/// Serialized as one `value<Type>` key beside `url`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExtensionValue {
    #[serde(rename = "valueDate")]
    Date(FhirDate),
    #[serde(rename = "valueDateTime")]
    DateTime(FhirDateTime),
    #[serde(rename = "valueTime")]
    Time(FhirTime),
    #[serde(rename = "valueInstant")]
    Instant(FhirInstant),
    #[serde(rename = "valueBoolean")]
    Boolean(bool),
    #[serde(rename = "valueInteger")]
    Integer(i32),
    #[serde(rename = "valueString")]
    String(String),
    #[serde(rename = "valueDecimal")]
    Decimal(f64),
    #[serde(rename = "valueUri")]
    Uri(String),
    #[serde(rename = "valueUrl")]
    Url(String),
    #[serde(rename = "valueCanonical")]
    Canonical(String),
    #[serde(rename = "valueBase64Binary")]
    Base64Binary(String),
    #[serde(rename = "valueCode")]
    Code(String),
}

impl ExtensionValue {
    /// FHIR type suffix of the `value[x]` key, e.g. `Date` for `valueDate`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Date(_) => "Date",
            Self::DateTime(_) => "DateTime",
            Self::Time(_) => "Time",
            Self::Instant(_) => "Instant",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::String(_) => "String",
            Self::Decimal(_) => "Decimal",
            Self::Uri(_) => "Uri",
            Self::Url(_) => "Url",
            Self::Canonical(_) => "Canonical",
            Self::Base64Binary(_) => "Base64Binary",
            Self::Code(_) => "Code",
        }
    }
}

/// A FHIR extension: a url-identified value, or nested extensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExtensionRepr")]
pub struct Extension {
    /// Unique id for inter-element referencing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Additional extensions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,

    /// Identifies the meaning of the extension
    pub url: String,

    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub value: Option<ExtensionValue>,
}

impl Extension {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            url: url.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: ExtensionValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }

    /// First nested extension with exactly this url.
    pub fn extension_by_url(&self, url: &str) -> Option<&Extension> {
        self.extension.iter().find(|e| e.url == url)
    }
}

/// Wire shape of an extension with every `value[x]` slot spelled out.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtensionRepr {
    id: Option<String>,
    #[serde(default)]
    extension: Vec<Extension>,
    url: String,
    value_date: Option<FhirDate>,
    value_date_time: Option<FhirDateTime>,
    value_time: Option<FhirTime>,
    value_instant: Option<FhirInstant>,
    value_boolean: Option<bool>,
    value_integer: Option<i32>,
    value_string: Option<String>,
    value_decimal: Option<f64>,
    value_uri: Option<String>,
    value_url: Option<String>,
    value_canonical: Option<String>,
    value_base64_binary: Option<String>,
    value_code: Option<String>,
    /// Keys not modelled above, checked for unsupported `value[x]` types.
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<ExtensionRepr> for Extension {
    type Error = String;

    fn try_from(repr: ExtensionRepr) -> Result<Self, Self::Error> {
        if let Some(key) = repr.rest.keys().find(|key| key.starts_with("value")) {
            return Err(format!(
                "extension '{}' has unsupported value type '{key}'",
                repr.url
            ));
        }

        let candidates = [
            repr.value_date.map(ExtensionValue::Date),
            repr.value_date_time.map(ExtensionValue::DateTime),
            repr.value_time.map(ExtensionValue::Time),
            repr.value_instant.map(ExtensionValue::Instant),
            repr.value_boolean.map(ExtensionValue::Boolean),
            repr.value_integer.map(ExtensionValue::Integer),
            repr.value_string.map(ExtensionValue::String),
            repr.value_decimal.map(ExtensionValue::Decimal),
            repr.value_uri.map(ExtensionValue::Uri),
            repr.value_url.map(ExtensionValue::Url),
            repr.value_canonical.map(ExtensionValue::Canonical),
            repr.value_base64_binary.map(ExtensionValue::Base64Binary),
            repr.value_code.map(ExtensionValue::Code),
        ];
        let mut values = candidates.into_iter().flatten();
        let value = values.next();
        if let Some(extra) = values.next() {
            return Err(format!(
                "extension '{}' has more than one value[x] (also value{})",
                repr.url,
                extra.type_name()
            ));
        }

        Ok(Self {
            id: repr.id,
            extension: repr.extension,
            url: repr.url,
            value,
        })
    }
}

/// Side-car metadata for a primitive value, serialized as `_<field>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveExtension {
    /// Unique id for inter-element referencing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Additional content defined by implementations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

impl PrimitiveExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn has_extension(&self) -> bool {
        !self.extension.is_empty()
    }

    /// First extension with exactly this url.
    pub fn extension_by_url(&self, url: &str) -> Option<&Extension> {
        self.extension.iter().find(|e| e.url == url)
    }

    /// Appends, keeping earlier extensions in order.
    pub fn add_extension(&mut self, extension: Extension) {
        self.extension.push(extension);
    }

    /// Neither an id nor any extension.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.is_empty()
    }
}

/// `skip_serializing_if` predicate for `_<field>` side-cars.
pub fn is_absent(value: &Option<PrimitiveExtension>) -> bool {
    value.as_ref().is_none_or(PrimitiveExtension::is_empty)
}

/// Accessors that treat a missing side-car as one with no extensions.
pub trait PrimitiveExtensionExt {
    fn has_extension(&self) -> bool;
    fn extension_by_url(&self, url: &str) -> Option<&Extension>;
    /// No-op when the side-car is absent.
    fn add_extension(&mut self, extension: Extension);
}

impl PrimitiveExtensionExt for Option<PrimitiveExtension> {
    fn has_extension(&self) -> bool {
        self.as_ref().is_some_and(PrimitiveExtension::has_extension)
    }

    fn extension_by_url(&self, url: &str) -> Option<&Extension> {
        self.as_ref()?.extension_by_url(url)
    }

    fn add_extension(&mut self, extension: Extension) {
        if let Some(side_car) = self {
            side_car.add_extension(extension);
        }
    }
}
