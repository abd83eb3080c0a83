//! CodeSystem and ValueSet resources, reduced to what loading and `$expand` need.

use serde::{Deserialize, Serialize};
use zh_fhir_primitives::{FhirDateTime, PrimitiveExtension, is_absent};

pub const STATUS_ACTIVE: &str = "active";
pub const CONTENT_COMPLETE: &str = "complete";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType", rename_all = "camelCase")]
pub struct CodeSystem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<FhirDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<Concept>,
}

impl CodeSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            url: None,
            version: None,
            name: Some(name.into()),
            title: None,
            description: None,
            status: STATUS_ACTIVE.to_string(),
            content: CONTENT_COMPLETE.to_string(),
            date: None,
            concept: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType", rename_all = "camelCase")]
pub struct ValueSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<FhirDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose: Option<ValueSetCompose>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion: Option<ValueSetExpansion>,
}

impl ValueSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            url: None,
            version: None,
            name: Some(name.into()),
            title: None,
            description: None,
            status: STATUS_ACTIVE.to_string(),
            date: None,
            compose: None,
            expansion: None,
        }
    }

    /// Code system urls this value set draws from, in declaration order.
    pub fn included_systems(&self) -> impl Iterator<Item = &str> {
        self.compose
            .iter()
            .flat_map(|compose| compose.include.iter())
            .map(|include| include.system.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSetCompose {
    #[serde(default)]
    pub include: Vec<ValueSetInclude>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSetInclude {
    pub system: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSetExpansion {
    pub timestamp: FhirDateTime,
    #[serde(rename = "_timestamp", default, skip_serializing_if = "is_absent")]
    pub timestamp_ext: Option<PrimitiveExtension>,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<ExpansionContains>,
}

impl ValueSetExpansion {
    pub fn new(timestamp: FhirDateTime, contains: Vec<ExpansionContains>) -> Self {
        Self {
            timestamp,
            timestamp_ext: None,
            total: contains.len(),
            contains,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionContains {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl ExpansionContains {
    /// Case-insensitive substring match on code or display.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.code.to_lowercase().contains(needle_lowercase)
            || self
                .display
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle_lowercase))
    }
}
