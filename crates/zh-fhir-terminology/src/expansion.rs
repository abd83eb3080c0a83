use crate::error::{Result, TerminologyError};
use crate::loader::TerminologyLoader;
use crate::model::{CodeSystem, ExpansionContains, ValueSet, ValueSetExpansion};
use time::OffsetDateTime;
use zh_fhir_primitives::FhirDateTime;

/// `ValueSet/$expand` over loaded terminology.
#[derive(Debug, Clone)]
pub struct TerminologyService {
    loader: TerminologyLoader,
}

impl TerminologyService {
    pub fn new(loader: TerminologyLoader) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &TerminologyLoader {
        &self.loader
    }

    /// Expands the value set or code system registered under `url`.
    ///
    /// A value set wins over a code system with the same url. A non-empty
    /// `filter` keeps entries whose code or display contains it, ignoring case.
    pub fn expand(&self, url: &str, filter: Option<&str>) -> Result<ValueSet> {
        self.expand_at(url, filter, OffsetDateTime::now_utc())
    }

    /// Same as [`expand`](Self::expand) with an explicit expansion timestamp.
    pub fn expand_at(
        &self,
        url: &str,
        filter: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<ValueSet> {
        let timestamp = FhirDateTime::from_offset_date_time(now)?;

        let mut expanded = if let Some(vs) = self.loader.value_set(url) {
            self.expand_value_set(vs, timestamp)
        } else if let Some(cs) = self.loader.code_system(url) {
            expand_code_system(cs, timestamp)
        } else {
            tracing::debug!(url, "no terminology resource for url");
            return Err(TerminologyError::not_found(url));
        };

        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            if let Some(expansion) = expanded.expansion.as_mut() {
                apply_filter(expansion, filter);
            }
        }

        tracing::debug!(
            url,
            filter = ?filter,
            total = expanded.expansion.as_ref().map_or(0, |e| e.total),
            "expanded terminology"
        );
        Ok(expanded)
    }

    fn expand_value_set(&self, vs: &ValueSet, timestamp: FhirDateTime) -> ValueSet {
        let mut contains = Vec::new();
        for system in vs.included_systems() {
            match self.loader.code_system(system) {
                Some(cs) => contains.extend(concepts_of(cs)),
                None => tracing::warn!(
                    value_set = ?vs.url,
                    system,
                    "included code system is not loaded, contributing no codes"
                ),
            }
        }

        let mut expanded = vs.clone();
        expanded.expansion = Some(ValueSetExpansion::new(timestamp, contains));
        expanded
    }
}

/// A whole code system presented as an implicit value set.
fn expand_code_system(cs: &CodeSystem, timestamp: FhirDateTime) -> ValueSet {
    let mut vs = ValueSet {
        id: None,
        url: cs.url.clone(),
        version: cs.version.clone(),
        name: cs.name.clone(),
        title: cs.title.clone(),
        description: None,
        status: cs.status.clone(),
        date: None,
        compose: None,
        expansion: None,
    };
    vs.expansion = Some(ValueSetExpansion::new(timestamp, concepts_of(cs).collect()));
    vs
}

fn concepts_of(cs: &CodeSystem) -> impl Iterator<Item = ExpansionContains> + '_ {
    cs.concept.iter().map(|concept| ExpansionContains {
        system: cs.url.clone(),
        code: concept.code.clone(),
        display: concept.display.clone(),
    })
}

/// Narrows `contains` in place. Timestamp and its side-car are left alone.
fn apply_filter(expansion: &mut ValueSetExpansion, filter: &str) {
    let needle = filter.to_lowercase();
    expansion.contains.retain(|entry| entry.matches(&needle));
    expansion.total = expansion.contains.len();
}
