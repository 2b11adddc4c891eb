mod common;

use common::*;
use octofhir_hl7v2_vs::*;
use proptest::prelude::*;
use std::io::Write;

fn arb_entry() -> impl Strategy<Value = Entry> {
    (
        any::<u32>(),
        any::<u32>(),
        "[A-Z]{3}-[0-9]{1,2}",
        ".{0,40}",
        "[A-Za-z ]{0,20}",
        prop_oneof![
            Just("Error".to_string()),
            Just("Warning".to_string()),
            Just("Alert".to_string()),
            Just("Affirmative".to_string()),
        ],
    )
        .prop_map(|(line, column, path, description, category, classification)| Entry {
            line,
            column,
            path,
            description,
            category,
            classification,
            stack_trace: None,
            meta_data: None,
        })
}

proptest! {
    #[test]
    fn test_to_alert_is_idempotent(entry in arb_entry()) {
        let detections = detections();
        let once = detections.to_alert(&entry);
        let twice = detections.to_alert(&once);

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.classification.as_str(), detections.alert_classification());
        prop_assert_eq!(Entry { classification: entry.classification.clone(), ..once }, entry);
    }
}

#[test]
fn test_config_loaded_from_file() {
    let reference = DetectionConfig::reference().unwrap();
    let overrides = r#"{
        "report": {
            "classification": {"alert": "Note"},
            "code-not-found-simple": {"classification": "Fatal"}
        }
    }"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(overrides.as_bytes()).unwrap();

    let custom = DetectionConfig::from_path(file.path()).unwrap();
    let detections =
        std::sync::Arc::new(ConfigurableDetections::new(reference.overlay(&custom)).unwrap());
    let validator = Validator::new(detections);
    let library = create_test_library();

    let entries =
        validator.check_message(&bound_field("PID-8", 8, "X", "HL70001", Usage::R), &library);
    assert_eq!(entries[0].classification, "Fatal");

    let entries =
        validator.check_message(&bound_field("PID-8", 8, "X", "HL70001", Usage::O), &library);
    assert_eq!(entries[0].classification, "Note");
}

#[test]
fn test_incomplete_config_is_rejected() {
    let config = DetectionConfig::reference()
        .unwrap()
        .overlay(&DetectionConfig::new().with("report.rvs.category", "Required"));
    assert!(ConfigurableDetections::new(config).is_ok());

    let missing = DetectionConfig::from_json_str(
        r#"{"report": {"classification": {"alert": "Alert", "warning": "Warning"}}}"#,
    )
    .unwrap();
    let err = ConfigurableDetections::new(missing).unwrap_err();
    assert!(matches!(err, ConformanceError::Configuration { .. }));
}

#[test]
fn test_cascade_per_binding_strength() {
    let library = create_test_library();
    let validator = validator();

    let suggested: Element = SimpleElement::new(8, loc("PID-8"), "X")
        .with_req(Req::new(Usage::R).with_spec(
            ValueSetSpec::new("HL70001").with_strength(BindingStrength::Suggested),
        ))
        .into();
    let required: Element = SimpleElement::new(8, loc("PID-8"), "X")
        .with_req(Req::new(Usage::R).with_spec(
            ValueSetSpec::new("HL70001").with_strength(BindingStrength::Required),
        ))
        .into();

    assert_eq!(validator.check_message(&suggested, &library)[0].classification, "Warning");
    assert_eq!(validator.check_message(&required, &library)[0].classification, "Error");
}

#[test]
fn test_cascade_stability_axis() {
    let config = DetectionConfig::reference().unwrap().overlay(
        &DetectionConfig::from_json_str(
            r#"{"report": {"code-not-found-simple": {"overrides": {
                "no-value": {"closed": {"static": {"category": "Static Miss"}}}
            }}}}"#,
        )
        .unwrap(),
    );
    let detections = ConfigurableDetections::new(config).unwrap();

    let resolved = detections.resolve(
        DetectionKind::CodeNotFoundSimple,
        &SeverityAxes::new(None, Some(Extensibility::Closed), Some(Stability::Static)),
    );
    assert_eq!(resolved.category, "Static Miss");
    assert_eq!(resolved.classification, "Error");

    let resolved = detections.resolve(
        DetectionKind::CodeNotFoundSimple,
        &SeverityAxes::new(None, Some(Extensibility::Open), Some(Stability::Static)),
    );
    assert_eq!(resolved.category, "Code Not Found");
}

#[test]
fn test_entries_serialize_for_reports() {
    let entries = validator().check_message(
        &bound_field("PID-8", 8, "X", "HL70001", Usage::R),
        &create_test_library(),
    );
    let json = serde_json::to_value(&entries).unwrap();
    assert_eq!(json[0]["path"], "PID-8");
    assert_eq!(json[0]["metaData"]["valueSet"]["id"], "HL70001");
    assert_eq!(json[0]["metaData"]["valueSet"]["extensibility"], "closed");
}
