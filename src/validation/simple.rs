//! Validation of a single scalar value against one value set.

use regex::Regex;
use std::sync::Arc;
use std::sync::LazyLock;

use super::result::CheckResult;
use crate::report::{ConfigurableDetections, DetectionKind};
use crate::storage::ValueSetLibrary;
use crate::types::{CodeUsage, Location, SimpleElement, ValueSet, ValueSetSpec};

static LEGACY_TABLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(HL7)?0396(_[a-zA-Z0-9]+)?$").unwrap());
static LEGACY_LOCAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(HL7[0-9]{4}|99[a-zA-Z0-9]{3})$").unwrap());

/// Locally defined codes of the coding system table are never looked up.
pub fn skip_code_check(value_set_id: &str, value: &str) -> bool {
    LEGACY_TABLE_ID.is_match(value_set_id) && LEGACY_LOCAL_CODE.is_match(value)
}

#[derive(Debug, Clone)]
pub struct SimpleElementValidator {
    detections: Arc<ConfigurableDetections>,
}

impl SimpleElementValidator {
    pub fn new(detections: Arc<ConfigurableDetections>) -> Self {
        Self { detections }
    }

    /// Checks a simple element; explicit HL7 nulls are not checked.
    pub fn check_element(
        &self,
        element: &SimpleElement,
        spec: Option<&ValueSetSpec>,
        library: &dyn ValueSetLibrary,
    ) -> CheckResult {
        if element.is_null() {
            return CheckResult::conformant();
        }
        self.check(&element.location, &element.value, spec, library)
    }

    pub fn check(
        &self,
        location: &Location,
        value: &str,
        spec: Option<&ValueSetSpec>,
        library: &dyn ValueSetLibrary,
    ) -> CheckResult {
        let Some(spec) = spec else {
            return CheckResult::conformant();
        };

        if spec.is_multi_binding() {
            return CheckResult::failed(self.detections.vs_error(
                location,
                "Value Set Specification error, multiple bindings can only be specified for Coded Elements",
                None,
                Some(spec),
            ));
        }

        if library.is_excluded_from_validation(&spec.value_set_id) {
            return CheckResult::failed(self.detections.vs_no_validation(location, spec));
        }

        match library.get(&spec.value_set_id) {
            Ok(vs) => self.check_value_set(location, value, &vs, Some(spec)),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(value_set = %spec.value_set_id, location = %location, "{e}");
                CheckResult::failed(self.detections.vs_not_found(location, value, spec))
            }
        }
    }

    /// Checks `value` against an already resolved value set.
    pub fn check_value_set(
        &self,
        location: &Location,
        value: &str,
        vs: &ValueSet,
        spec: Option<&ValueSetSpec>,
    ) -> CheckResult {
        if vs.is_empty() {
            return CheckResult::failed(self.detections.empty_vs(location, vs, spec));
        }

        if skip_code_check(&vs.id, value) {
            return CheckResult::conformant();
        }

        match vs.codes_for(value).as_slice() {
            [] => CheckResult::failed(
                self.detections
                    .code_not_found_simple(location, value, vs, spec),
            ),
            [code] => {
                let (kind, passed) = match code.usage {
                    CodeUsage::Excluded => (DetectionKind::Evs, false),
                    CodeUsage::Permitted => (DetectionKind::Pvs, true),
                    CodeUsage::Required => (DetectionKind::Rvs, true),
                };
                CheckResult {
                    detection: Some(self.detections.code_found(kind, location, value, vs, spec)),
                    passed,
                }
            }
            _ => CheckResult::failed(self.detections.vs_error(
                location,
                &format!("Multiple occurrences of the code '{value}' found."),
                Some(vs),
                spec,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{EmptyValueSetLibrary, InMemoryValueSetLibrary};
    use crate::types::Code;

    fn validator() -> SimpleElementValidator {
        SimpleElementValidator::new(Arc::new(ConfigurableDetections::reference().unwrap()))
    }

    fn library() -> InMemoryValueSetLibrary {
        InMemoryValueSetLibrary::new()
            .with_value_set(
                ValueSet::new("HL70001")
                    .with_code(Code::new("M", "HL70001", CodeUsage::Required))
                    .with_code(Code::new("F", "HL70001", CodeUsage::Permitted))
                    .with_code(Code::new("Z", "HL70001", CodeUsage::Excluded))
                    .with_code(Code::new("D", "HL70001", CodeUsage::Required))
                    .with_code(Code::new("D", "HL70001", CodeUsage::Required)),
            )
            .with_value_set(ValueSet::new("0396"))
            .with_excluded("HL70005")
    }

    fn kind_of(result: &CheckResult) -> Option<DetectionKind> {
        result.detection.as_ref().map(|d| d.kind)
    }

    fn location() -> Location {
        Location::new("PID-8", "Administrative Sex", 1, 42)
    }

    #[test]
    fn test_no_spec() {
        let result = validator().check(&location(), "M", None, &library());
        assert_eq!(result, CheckResult::conformant());
    }

    #[test]
    fn test_code_usages() {
        let validator = validator();
        let library = library();
        let spec = ValueSetSpec::new("HL70001");

        let required = validator.check(&location(), "M", Some(&spec), &library);
        assert!(required.passed);
        assert_eq!(kind_of(&required), Some(DetectionKind::Rvs));

        let permitted = validator.check(&location(), "F", Some(&spec), &library);
        assert!(permitted.passed);
        assert_eq!(kind_of(&permitted), Some(DetectionKind::Pvs));

        let excluded = validator.check(&location(), "Z", Some(&spec), &library);
        assert!(!excluded.passed);
        assert_eq!(kind_of(&excluded), Some(DetectionKind::Evs));
    }

    #[test]
    fn test_code_not_found() {
        let result = validator().check(
            &location(),
            "X",
            Some(&ValueSetSpec::new("HL70001")),
            &library(),
        );
        assert!(!result.passed);
        assert_eq!(kind_of(&result), Some(DetectionKind::CodeNotFoundSimple));
    }

    #[test]
    fn test_duplicate_code_is_value_set_error() {
        let result = validator().check(
            &location(),
            "D",
            Some(&ValueSetSpec::new("HL70001")),
            &library(),
        );
        assert!(!result.passed);
        let detection = result.detection.unwrap();
        assert_eq!(detection.kind, DetectionKind::VsError);
        assert!(
            detection
                .entry
                .description
                .contains("Multiple occurrences of the code 'D' found.")
        );
    }

    #[test]
    fn test_multi_binding_is_rejected() {
        let result = validator().check(
            &location(),
            "M",
            Some(&ValueSetSpec::new("A:B")),
            &library(),
        );
        assert_eq!(kind_of(&result), Some(DetectionKind::VsError));
        assert!(!result.passed);
    }

    #[test]
    fn test_excluded_value_set() {
        let result = validator().check(
            &location(),
            "M",
            Some(&ValueSetSpec::new("HL70005")),
            &library(),
        );
        assert!(!result.passed);
        assert_eq!(kind_of(&result), Some(DetectionKind::VsNoValidation));
    }

    #[test]
    fn test_value_set_not_found() {
        let result = validator().check(
            &location(),
            "M",
            Some(&ValueSetSpec::new("HL70001")),
            &EmptyValueSetLibrary,
        );
        assert!(!result.passed);
        assert_eq!(kind_of(&result), Some(DetectionKind::VsNotFound));
    }

    #[test]
    fn test_empty_value_set_precedes_legacy_skip() {
        let result = validator().check(
            &location(),
            "HL70001",
            Some(&ValueSetSpec::new("0396")),
            &library(),
        );
        assert_eq!(kind_of(&result), Some(DetectionKind::EmptyVs));
    }

    #[test]
    fn test_hl7_null_is_not_checked() {
        let element = SimpleElement::new(8, location(), "\"\"");
        let result =
            validator().check_element(&element, Some(&ValueSetSpec::new("HL70001")), &library());
        assert_eq!(result, CheckResult::conformant());
    }

    #[test]
    fn test_skip_code_check() {
        assert!(skip_code_check("0396", "HL70001"));
        assert!(skip_code_check("HL70396", "99ABC"));
        assert!(skip_code_check("HL70396_v2", "99zz9"));
        assert!(!skip_code_check("0396", "HL7001"));
        assert!(!skip_code_check("0396", "99ABCD"));
        assert!(!skip_code_check("HL70001", "HL70001"));
        assert!(!skip_code_check("X0396", "HL70001"));
    }
}
