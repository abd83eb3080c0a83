//! Loads CodeSystem and ValueSet definitions from an implementation guide.
//!
//! Definition files use a small line-oriented syntax:
//!
//! ```text
//! CodeSystem: BDDivisions
//! Id: bd-divisions
//! Title: "Bangladesh Divisions"
//! * ^url = "https://example.org/CodeSystem/bd-divisions"
//! * ^date = "2024-01-15"
//! * #10 "Barishal"
//!
//! ValueSet: BDDivisionsVS
//! * ^url = "https://example.org/ValueSet/bd-divisions"
//! * include codes from system https://example.org/CodeSystem/bd-divisions
//! ```

use crate::error::{Result, TerminologyError};
use crate::model::{CodeSystem, Concept, ValueSet, ValueSetCompose, ValueSetInclude};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use zh_fhir_primitives::FhirDateTime;

const DEFINITION_EXTENSION: &str = "fsh";
const DEFINITION_DIRS: [&str; 2] = ["codeSystems", "valueSets"];
const INCLUDE_SYSTEM_PREFIX: &str = "include codes from system ";

/// Terminology records indexed by canonical url.
#[derive(Debug, Default, Clone)]
pub struct TerminologyLoader {
    code_systems: HashMap<String, CodeSystem>,
    value_sets: HashMap<String, ValueSet>,
}

enum Record {
    CodeSystem(CodeSystem),
    ValueSet(ValueSet),
}

impl TerminologyLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.fsh` file under `<ig>/input/fsh/{codeSystems,valueSets}`.
    ///
    /// Missing directories are skipped. Files are read in name order so
    /// that a later definition of the same url deterministically wins.
    pub fn load_from_ig(&mut self, ig_path: impl AsRef<Path>) -> Result<()> {
        let fsh_root = ig_path.as_ref().join("input").join("fsh");
        for dir in DEFINITION_DIRS {
            let dir = fsh_root.join(dir);
            if !dir.is_dir() {
                tracing::debug!(
                    path = %dir.display(),
                    "definition directory not present, skipping"
                );
                continue;
            }

            let mut files = Vec::new();
            collect_definition_files(&dir, &mut files)?;
            for file in files {
                let source =
                    fs::read_to_string(&file).map_err(|e| TerminologyError::io(&file, e))?;
                self.load_str(&source, &file.display().to_string())?;
            }
        }

        tracing::info!(
            code_systems = self.code_systems.len(),
            value_sets = self.value_sets.len(),
            ig = %ig_path.as_ref().display(),
            "loaded terminology"
        );
        Ok(())
    }

    /// Parses definitions from `source`. `origin` names the source in errors.
    pub fn load_str(&mut self, source: &str, origin: &str) -> Result<()> {
        let mut current: Option<Record> = None;

        for (index, raw) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            if let Some(name) = line.strip_prefix("CodeSystem:") {
                self.finish(current.take(), origin);
                current = Some(Record::CodeSystem(CodeSystem::new(name.trim())));
                continue;
            }
            if let Some(name) = line.strip_prefix("ValueSet:") {
                self.finish(current.take(), origin);
                current = Some(Record::ValueSet(ValueSet::new(name.trim())));
                continue;
            }

            let Some(record) = current.as_mut() else {
                tracing::debug!(
                    origin,
                    line = line_no,
                    "statement outside any definition, ignoring"
                );
                continue;
            };

            if let Some(value) = line.strip_prefix("Id:") {
                record.set_id(value.trim());
            } else if let Some(value) = line.strip_prefix("Title:") {
                record.set_title(unquote(value));
            } else if let Some(value) = line.strip_prefix("Description:") {
                record.set_description(unquote(value));
            } else if let Some(rule) = line.strip_prefix("* ^") {
                apply_caret_rule(record, rule, origin, line_no)?;
            } else if let Some(concept) = line.strip_prefix("* #") {
                match record {
                    Record::CodeSystem(cs) => cs.concept.push(parse_concept(concept)),
                    Record::ValueSet(_) => {
                        tracing::warn!(
                            origin,
                            line = line_no,
                            "concept inside a ValueSet, ignoring"
                        );
                    }
                }
            } else if let Some(system) = line
                .strip_prefix("* ")
                .and_then(|r| r.strip_prefix(INCLUDE_SYSTEM_PREFIX))
            {
                match record {
                    Record::ValueSet(vs) => vs
                        .compose
                        .get_or_insert_with(ValueSetCompose::default)
                        .include
                        .push(ValueSetInclude {
                            system: unquote(system),
                        }),
                    Record::CodeSystem(_) => {
                        tracing::warn!(
                            origin,
                            line = line_no,
                            "include inside a CodeSystem, ignoring"
                        );
                    }
                }
            } else {
                tracing::debug!(
                    origin,
                    line = line_no,
                    statement = line,
                    "unsupported statement, ignoring"
                );
            }
        }

        self.finish(current, origin);
        Ok(())
    }

    fn finish(&mut self, record: Option<Record>, origin: &str) {
        match record {
            Some(Record::CodeSystem(cs)) => match cs.url.clone() {
                Some(url) => {
                    if self.code_systems.insert(url.clone(), cs).is_some() {
                        tracing::warn!(origin, url, "CodeSystem redefined, keeping the later one");
                    }
                }
                None => tracing::warn!(
                    origin,
                    name = ?cs.name,
                    "CodeSystem without ^url, skipping"
                ),
            },
            Some(Record::ValueSet(vs)) => match vs.url.clone() {
                Some(url) => {
                    if self.value_sets.insert(url.clone(), vs).is_some() {
                        tracing::warn!(origin, url, "ValueSet redefined, keeping the later one");
                    }
                }
                None => tracing::warn!(origin, name = ?vs.name, "ValueSet without ^url, skipping"),
            },
            None => {}
        }
    }

    pub fn code_system(&self, url: &str) -> Option<&CodeSystem> {
        self.code_systems.get(url)
    }

    pub fn value_set(&self, url: &str) -> Option<&ValueSet> {
        self.value_sets.get(url)
    }

    pub fn code_systems(&self) -> impl Iterator<Item = &CodeSystem> {
        self.code_systems.values()
    }

    pub fn value_sets(&self) -> impl Iterator<Item = &ValueSet> {
        self.value_sets.values()
    }

    pub fn is_empty(&self) -> bool {
        self.code_systems.is_empty() && self.value_sets.is_empty()
    }
}

impl Record {
    fn set_id(&mut self, value: &str) {
        let value = Some(value.to_string());
        match self {
            Self::CodeSystem(cs) => cs.id = value,
            Self::ValueSet(vs) => vs.id = value,
        }
    }

    fn set_title(&mut self, value: String) {
        match self {
            Self::CodeSystem(cs) => cs.title = Some(value),
            Self::ValueSet(vs) => vs.title = Some(value),
        }
    }

    fn set_description(&mut self, value: String) {
        match self {
            Self::CodeSystem(cs) => cs.description = Some(value),
            Self::ValueSet(vs) => vs.description = Some(value),
        }
    }

    fn set_url(&mut self, value: String) {
        match self {
            Self::CodeSystem(cs) => cs.url = Some(value),
            Self::ValueSet(vs) => vs.url = Some(value),
        }
    }

    fn set_version(&mut self, value: String) {
        match self {
            Self::CodeSystem(cs) => cs.version = Some(value),
            Self::ValueSet(vs) => vs.version = Some(value),
        }
    }

    fn set_date(&mut self, value: FhirDateTime) {
        match self {
            Self::CodeSystem(cs) => cs.date = Some(value),
            Self::ValueSet(vs) => vs.date = Some(value),
        }
    }
}

/// `url = "..."` style metadata rules.
fn apply_caret_rule(record: &mut Record, rule: &str, origin: &str, line_no: usize) -> Result<()> {
    let Some((key, value)) = rule.split_once('=') else {
        return Err(TerminologyError::definition(
            origin,
            line_no,
            format!("expected '* ^<key> = <value>', found '* ^{rule}'"),
        ));
    };
    let value = unquote(value);

    match key.trim() {
        "url" => record.set_url(value),
        "version" => record.set_version(value),
        "date" => {
            let date = FhirDateTime::new(value)
                .map_err(|e| TerminologyError::definition(origin, line_no, e.to_string()))?;
            record.set_date(date);
        }
        other => tracing::debug!(
            origin,
            line = line_no,
            key = other,
            "unsupported metadata key, ignoring"
        ),
    }
    Ok(())
}

/// `code "Display"` or a bare `code`.
fn parse_concept(rest: &str) -> Concept {
    let (code, display) = match rest.find(|c: char| c.is_whitespace() || c == '"') {
        Some(split) => (&rest[..split], unquote(&rest[split..])),
        None => (rest, String::new()),
    };
    Concept {
        code: code.to_string(),
        display: (!display.is_empty()).then_some(display),
    }
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').to_string()
}

fn collect_definition_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| TerminologyError::io(dir, e))?;
    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| TerminologyError::io(dir, e))?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_definition_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == DEFINITION_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVISIONS: &str = r#"
// Administrative divisions
CodeSystem: BDDivisions
Id: bd-divisions
Title: "Bangladesh Divisions"
Description: "Administrative divisions of Bangladesh"
* ^url = "https://example.org/CodeSystem/bd-divisions"
* ^version = "1.0.0"
* ^date = "2024-01-15"
* #10 "Barishal"
* #20 "Chattogram"
* #30
"#;

    #[test]
    fn test_load_code_system() {
        let mut loader = TerminologyLoader::new();
        loader.load_str(DIVISIONS, "divisions.fsh").unwrap();

        let cs = loader
            .code_system("https://example.org/CodeSystem/bd-divisions")
            .unwrap();
        assert_eq!(cs.id.as_deref(), Some("bd-divisions"));
        assert_eq!(cs.name.as_deref(), Some("BDDivisions"));
        assert_eq!(cs.title.as_deref(), Some("Bangladesh Divisions"));
        assert_eq!(cs.description.as_deref(), Some("Administrative divisions of Bangladesh"));
        assert_eq!(cs.version.as_deref(), Some("1.0.0"));
        assert_eq!(cs.date.as_ref().map(FhirDateTime::as_str), Some("2024-01-15"));
        assert_eq!(cs.status, "active");
        assert_eq!(cs.content, "complete");
        assert_eq!(
            cs.concept,
            vec![
                Concept { code: "10".into(), display: Some("Barishal".into()) },
                Concept { code: "20".into(), display: Some("Chattogram".into()) },
                Concept { code: "30".into(), display: None },
            ]
        );
    }

    #[test]
    fn test_load_value_set_with_includes() {
        let source = r#"
ValueSet: BDDivisionsVS
Title: "Divisions"
* ^url = "https://example.org/ValueSet/bd-divisions"
* include codes from system https://example.org/CodeSystem/bd-divisions
* include codes from system "https://example.org/CodeSystem/extra"
"#;
        let mut loader = TerminologyLoader::new();
        loader.load_str(source, "vs.fsh").unwrap();

        let vs = loader.value_set("https://example.org/ValueSet/bd-divisions").unwrap();
        assert_eq!(vs.status, "active");
        assert_eq!(
            vs.included_systems().collect::<Vec<_>>(),
            vec![
                "https://example.org/CodeSystem/bd-divisions",
                "https://example.org/CodeSystem/extra"
            ]
        );
    }

    #[test]
    fn test_several_records_in_one_source() {
        let source = format!(
            "{DIVISIONS}\nValueSet: Other\n* ^url = \"https://example.org/ValueSet/other\"\n"
        );
        let mut loader = TerminologyLoader::new();
        loader.load_str(&source, "mixed.fsh").unwrap();
        assert_eq!(loader.code_systems().count(), 1);
        assert_eq!(loader.value_sets().count(), 1);
        // Concepts after the ValueSet header do not leak back into the CodeSystem.
        let cs = loader.code_system("https://example.org/CodeSystem/bd-divisions").unwrap();
        assert_eq!(cs.concept.len(), 3);
    }

    #[test]
    fn test_invalid_date_reports_location() {
        let source = "CodeSystem: Bad\n* ^url = \"urn:bad\"\n* ^date = \"15/01/2024\"\n";
        let mut loader = TerminologyLoader::new();
        let err = loader.load_str(source, "bad.fsh").unwrap_err();
        match err {
            TerminologyError::Definition { path, line, message } => {
                assert_eq!(path, "bad.fsh");
                assert_eq!(line, 3);
                assert!(message.contains("15/01/2024"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_caret_rule() {
        let mut loader = TerminologyLoader::new();
        let err = loader
            .load_str("CodeSystem: X\n* ^url \"urn:x\"\n", "x.fsh")
            .unwrap_err();
        assert!(matches!(err, TerminologyError::Definition { line: 2, .. }));
    }

    #[test]
    fn test_record_without_url_is_skipped() {
        let mut loader = TerminologyLoader::new();
        loader.load_str("CodeSystem: Anonymous\n* #a \"A\"\n", "anon.fsh").unwrap();
        assert!(loader.is_empty());
    }

    #[test]
    fn test_later_definition_wins() {
        let mut loader = TerminologyLoader::new();
        loader
            .load_str("CodeSystem: A\n* ^url = \"urn:cs\"\n* #a \"First\"\n", "a.fsh")
            .unwrap();
        loader
            .load_str("CodeSystem: B\n* ^url = \"urn:cs\"\n* #b \"Second\"\n", "b.fsh")
            .unwrap();
        let cs = loader.code_system("urn:cs").unwrap();
        assert_eq!(cs.name.as_deref(), Some("B"));
    }

    #[test]
    fn test_parse_concept() {
        assert_eq!(
            parse_concept("M \"Male\""),
            Concept { code: "M".into(), display: Some("Male".into()) }
        );
        assert_eq!(
            parse_concept("unk\"Unknown value\""),
            Concept { code: "unk".into(), display: Some("Unknown value".into()) }
        );
        assert_eq!(parse_concept("x"), Concept { code: "x".into(), display: None });
    }
}
