use octofhir_hl7v2_vs::*;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

#[allow(dead_code)]
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[allow(dead_code)]
pub fn detections() -> Arc<ConfigurableDetections> {
    Arc::new(ConfigurableDetections::reference().unwrap())
}

#[allow(dead_code)]
pub fn validator() -> Validator {
    init_tracing();
    Validator::new(detections())
}

#[allow(dead_code)]
pub fn loc(path: &str) -> Location {
    Location::new(path, "", 1, 1)
}

#[allow(dead_code)]
pub fn sex_value_set(id: &str) -> ValueSet {
    ValueSet::new(id)
        .with_code(Code::new("M", "HL70001", CodeUsage::Required))
        .with_code(Code::new("F", "HL70001", CodeUsage::Required))
}

#[allow(dead_code)]
pub fn create_test_library() -> InMemoryValueSetLibrary {
    InMemoryValueSetLibrary::new()
        .with_value_set(sex_value_set("HL70001").with_extensibility(Extensibility::Closed))
        .with_value_set(sex_value_set("HL70001_OPEN").with_extensibility(Extensibility::Open))
        .with_value_set(
            ValueSet::new("0396").with_code(Code::new("LN", "HL70396", CodeUsage::Excluded)),
        )
        .with_value_set(ValueSet::new("0396_EMPTY"))
        .with_value_set(
            ValueSet::new("LAB")
                .with_code(Code::new("8867-4", "LN", CodeUsage::Required))
                .with_code(Code::new("8480-6", "LN", CodeUsage::Permitted)),
        )
        .with_value_set(
            ValueSet::new("LOINC_VS")
                .with_code(Code::new("8867-4", "LN", CodeUsage::Required))
                .with_code(Code::new("8310-5", "LN", CodeUsage::Required)),
        )
        .with_value_set(
            ValueSet::new("SCT_VS")
                .with_code(Code::new("386661006", "SCT", CodeUsage::Required))
                .with_code(Code::new("8310-5", "SCT", CodeUsage::Required)),
        )
        .with_excluded("HL70005")
}

/// A simple field bound to `value_set_id`.
#[allow(dead_code)]
pub fn bound_field(
    path: &str,
    position: u32,
    value: &str,
    value_set_id: &str,
    usage: Usage,
) -> Element {
    SimpleElement::new(position, loc(path), value)
        .with_req(Req::new(usage).with_spec(ValueSetSpec::new(value_set_id)))
        .into()
}

/// A CWE with one triplet per `(position, code, code system)`.
#[allow(dead_code)]
pub fn coded_element(path: &str, triplets: &[(u32, &str, &str)]) -> ComplexElement {
    triplets.iter().fold(
        ComplexElement::new(3, loc(path)).with_datatype("CWE"),
        |element, (position, code, code_system)| {
            element
                .with_child(SimpleElement::new(
                    *position,
                    loc(&format!("{path}.{position}")),
                    *code,
                ))
                .with_child(SimpleElement::new(
                    position + 2,
                    loc(&format!("{path}.{}", position + 2)),
                    *code_system,
                ))
        },
    )
}

#[allow(dead_code)]
pub fn segment(path: &str, children: Vec<Element>) -> Element {
    children
        .into_iter()
        .fold(ComplexElement::new(1, loc(path)), |segment, child| {
            segment.with_child(child)
        })
        .into()
}
