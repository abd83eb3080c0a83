use std::fs;
use std::path::Path;

use assert_json_diff::assert_json_include;
use serde_json::json;
use time::macros::datetime;
use zh_fhir_terminology::{TerminologyError, TerminologyLoader, TerminologyService};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent dir")).expect("create dirs");
    fs::write(path, content).expect("write definition");
}

fn sample_ig() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tmp dir");
    write(
        dir.path(),
        "input/fsh/codeSystems/divisions.fsh",
        r#"
CodeSystem: BDDivisions
Id: bd-divisions
Title: "Bangladesh Divisions"
* ^url = "https://example.org/CodeSystem/bd-divisions"
* #10 "Barishal"
* #20 "Chattogram"
* #30 "Dhaka"
"#,
    );
    write(
        dir.path(),
        "input/fsh/codeSystems/nested/religion.fsh",
        r#"
CodeSystem: Religion
* ^url = "https://example.org/CodeSystem/religion"
* #ISL "Islam"
"#,
    );
    write(
        dir.path(),
        "input/fsh/valueSets/divisions.fsh",
        r#"
ValueSet: BDDivisionsVS
Title: "Divisions of Bangladesh"
* ^url = "https://example.org/ValueSet/bd-divisions"
* ^date = "2024-01"
* include codes from system https://example.org/CodeSystem/bd-divisions
"#,
    );
    write(dir.path(), "input/fsh/valueSets/README.md", "not a definition");
    dir
}

#[test]
fn loads_ig_and_expands_value_set() {
    let ig = sample_ig();
    let mut loader = TerminologyLoader::new();
    loader.load_from_ig(ig.path()).expect("load ig");
    assert_eq!(loader.code_systems().count(), 2);
    assert_eq!(loader.value_sets().count(), 1);

    let service = TerminologyService::new(loader);
    let vs = service
        .expand_at(
            "https://example.org/ValueSet/bd-divisions",
            Some("dhaka"),
            datetime!(2024-01-15 10:30:00 UTC),
        )
        .expect("expand");

    assert_json_include!(
        actual: serde_json::to_value(&vs).unwrap(),
        expected: json!({
            "resourceType": "ValueSet",
            "url": "https://example.org/ValueSet/bd-divisions",
            "title": "Divisions of Bangladesh",
            "date": "2024-01",
            "expansion": {
                "timestamp": "2024-01-15T10:30:00Z",
                "total": 1,
                "contains": [{
                    "system": "https://example.org/CodeSystem/bd-divisions",
                    "code": "30",
                    "display": "Dhaka"
                }]
            }
        })
    );
}

#[test]
fn nested_directories_are_walked() {
    let ig = sample_ig();
    let mut loader = TerminologyLoader::new();
    loader.load_from_ig(ig.path()).expect("load ig");
    assert!(loader.code_system("https://example.org/CodeSystem/religion").is_some());
}

#[test]
fn missing_directories_are_skipped() {
    let dir = tempfile::tempdir().expect("tmp dir");
    write(
        dir.path(),
        "input/fsh/codeSystems/only.fsh",
        "CodeSystem: Only\n* ^url = \"urn:only\"\n* #a \"A\"\n",
    );

    let mut loader = TerminologyLoader::new();
    loader.load_from_ig(dir.path()).expect("load ig without valueSets");
    assert_eq!(loader.code_systems().count(), 1);

    let empty = tempfile::tempdir().expect("tmp dir");
    let mut loader = TerminologyLoader::new();
    loader.load_from_ig(empty.path()).expect("load empty ig");
    assert!(loader.is_empty());
}

#[test]
fn invalid_date_names_file_and_line() {
    let dir = tempfile::tempdir().expect("tmp dir");
    write(
        dir.path(),
        "input/fsh/valueSets/broken.fsh",
        "ValueSet: Broken\n* ^url = \"urn:broken\"\n* ^date = \"yesterday\"\n",
    );

    let mut loader = TerminologyLoader::new();
    let err = loader.load_from_ig(dir.path()).unwrap_err();
    match &err {
        TerminologyError::Definition { path, line, .. } => {
            assert!(path.ends_with("broken.fsh"), "unexpected path {path}");
            assert_eq!(*line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("yesterday"));
}

#[test]
fn unknown_url_is_not_found() {
    let ig = sample_ig();
    let mut loader = TerminologyLoader::new();
    loader.load_from_ig(ig.path()).expect("load ig");
    let err = TerminologyService::new(loader)
        .expand("https://example.org/ValueSet/unknown", None)
        .unwrap_err();
    assert!(err.is_not_found());
}
