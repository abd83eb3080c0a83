use assert_json_diff::assert_json_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use zh_fhir_primitives::{
    Extension, ExtensionValue, FhirDate, FhirDateTime, FhirInstant, FhirTime, Precision,
    PrimitiveExtension, PrimitiveExtensionExt, is_absent,
};

/// A record holding primitives with their `_field` side-cars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Observation {
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_date: Option<FhirDate>,
    #[serde(rename = "_birthDate", default, skip_serializing_if = "is_absent")]
    birth_date_ext: Option<PrimitiveExtension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    effective_date_time: Option<FhirDateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    issued: Option<FhirInstant>,
    #[serde(rename = "_issued", default, skip_serializing_if = "is_absent")]
    issued_ext: Option<PrimitiveExtension>,

    #[serde(skip_serializing_if = "Option::is_none")]
    value_time: Option<FhirTime>,
}

fn precision_note(code: &str) -> Extension {
    Extension::new("http://example.org/fhir/StructureDefinition/precision-note")
        .with_value(ExtensionValue::Code(code.to_string()))
}

#[test]
fn record_with_side_car_roundtrips() {
    let input = json!({
        "birthDate": "1974-12",
        "_birthDate": {
            "id": "bd",
            "extension": [{
                "url": "http://example.org/fhir/StructureDefinition/precision-note",
                "valueCode": "month"
            }]
        },
        "effectiveDateTime": "2024-01-15T10:30:00+00:00",
        "issued": "2024-01-15T10:30:00.120Z",
        "valueTime": "08:00:00"
    });

    let record: Observation = serde_json::from_value(input.clone()).unwrap();
    assert_eq!(
        record.birth_date.as_ref().map(FhirDate::precision),
        Some(Precision::Month)
    );
    assert!(record.birth_date_ext.has_extension());
    assert!(!record.issued_ext.has_extension());

    // Text is kept exactly as written, including offset spelling and trailing zeros.
    assert_json_eq!(serde_json::to_value(&record).unwrap(), input);
}

#[test]
fn empty_side_car_is_omitted() {
    let record = Observation {
        birth_date: Some(FhirDate::from_static("2024-01-15")),
        birth_date_ext: Some(PrimitiveExtension::new()),
        effective_date_time: None,
        issued: None,
        issued_ext: None,
        value_time: None,
    };

    assert_json_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({ "birthDate": "2024-01-15" })
    );
}

#[test]
fn side_car_without_value() {
    let mut side_car = PrimitiveExtension::new();
    side_car.add_extension(precision_note("unknown"));

    let record = Observation {
        birth_date: None,
        birth_date_ext: Some(side_car),
        effective_date_time: None,
        issued: None,
        issued_ext: None,
        value_time: None,
    };

    let value = serde_json::to_value(&record).unwrap();
    assert_json_eq!(
        value,
        json!({
            "_birthDate": {
                "extension": [{
                    "url": "http://example.org/fhir/StructureDefinition/precision-note",
                    "valueCode": "unknown"
                }]
            }
        })
    );

    let back: Observation = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}

#[test]
fn invalid_primitive_fails_the_whole_record() {
    let err = serde_json::from_value::<Observation>(json!({ "birthDate": "15/01/2024" }))
        .unwrap_err()
        .to_string();
    assert!(err.contains("15/01/2024"), "unexpected error: {err}");

    let err = serde_json::from_value::<Observation>(json!({ "issued": "2024-01-15T10:30:00" }))
        .unwrap_err()
        .to_string();
    assert!(err.contains("instant"), "unexpected error: {err}");
}

#[test]
fn parsed_values_resolve_consistently() {
    let record: Observation = serde_json::from_value(json!({
        "effectiveDateTime": "2024-01-15T11:30:00+01:00",
        "issued": "2024-01-15T10:30:00Z"
    }))
    .unwrap();

    let effective = record.effective_date_time.unwrap().to_offset_date_time().unwrap();
    let issued = record.issued.unwrap().to_offset_date_time().unwrap();
    assert_eq!(effective, issued);
}

#[test]
fn generated_values_pass_their_own_grammar() {
    let now = time::OffsetDateTime::now_utc();

    let values = [
        FhirDate::from_offset_date_time(now).unwrap().to_string(),
        FhirDateTime::from_offset_date_time(now).unwrap().to_string(),
        FhirInstant::from_offset_date_time_nanos(now).unwrap().to_string(),
    ];
    assert!(FhirDate::new(values[0].clone()).is_ok());
    assert!(FhirDateTime::new(values[1].clone()).is_ok());
    assert!(FhirInstant::new(values[2].clone()).is_ok());
    assert!(FhirTime::new(FhirTime::from_offset_date_time(now).to_string()).is_ok());
}
