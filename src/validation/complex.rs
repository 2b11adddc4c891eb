// Validation of complex elements bound to a value set

use std::sync::Arc;

use super::coded::CodedElementValidator;
use super::result::{CheckResult, PositionOutcome};
use super::simple::SimpleElementValidator;
use super::xor::arbitrate;
use crate::report::ConfigurableDetections;
use crate::storage::ValueSetLibrary;
use crate::types::{BindingLocation, ComplexElement, Trace, ValueSet, ValueSetSpec};

/// Dispatches coded elements to the triplet checks and checks every other
/// complex element as a single value at the bound position.
#[derive(Debug, Clone)]
pub struct ComplexElementValidator {
    detections: Arc<ConfigurableDetections>,
    simple: SimpleElementValidator,
    coded: CodedElementValidator,
}

impl ComplexElementValidator {
    pub fn new(detections: Arc<ConfigurableDetections>, simple: SimpleElementValidator) -> Self {
        let coded = CodedElementValidator::new(Arc::clone(&detections), simple.clone());
        Self {
            detections,
            simple,
            coded,
        }
    }

    pub fn check(
        &self,
        element: &ComplexElement,
        spec: Option<&ValueSetSpec>,
        library: &dyn ValueSetLibrary,
    ) -> Vec<CheckResult> {
        let Some(spec) = spec else {
            return Vec::new();
        };

        if element.is_coded_element() {
            return self.coded.check(element, spec, library);
        }

        if spec.is_multi_binding() {
            return vec![CheckResult::failed(self.detections.vs_error(
                &element.location,
                "Value Set Specification error, multiple bindings can only be specified for Coded Elements",
                None,
                Some(spec),
            ))];
        }

        if library.is_excluded_from_validation(&spec.value_set_id) {
            return vec![CheckResult::failed(
                self.detections.vs_no_validation(&element.location, spec),
            )];
        }

        let vs = match library.get(&spec.value_set_id) {
            Ok(vs) => vs,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(location = %element.location, "{e}");
                return vec![CheckResult::failed(
                    self.detections.vs_not_found_binding(&element.location, spec),
                )];
            }
        };

        if vs.is_empty() {
            return vec![CheckResult::failed(self.detections.empty_vs(
                &element.location,
                &vs,
                Some(spec),
            ))];
        }

        let location = match self.coded.binding_location(spec) {
            Ok(location) => location,
            Err(e) => {
                return vec![CheckResult::failed(self.detections.vs_error(
                    &element.location,
                    &e.detail(),
                    Some(vs.as_ref()),
                    Some(spec),
                ))];
            }
        };

        match location {
            BindingLocation::Position(p) => {
                self.check_position(element, p, &vs, spec).into_results()
            }
            BindingLocation::Xor(p1, p2) => {
                let first = self.check_position(element, p1, &vs, spec);
                let second = self.check_position(element, p2, &vs, spec);
                arbitrate(&self.detections, first, second, |reasons| {
                    self.detections.coded_element_xor(
                        &element.location,
                        &format!(
                            "One of the elements (but not both) should be valued from the value set '{}'",
                            vs.id
                        ),
                        Some(vs.as_ref()),
                        spec,
                        if reasons.is_empty() {
                            Vec::new()
                        } else {
                            vec![Trace::new("", reasons)]
                        },
                    )
                })
            }
        }
    }

    fn check_position(
        &self,
        element: &ComplexElement,
        position: u32,
        vs: &ValueSet,
        spec: &ValueSetSpec,
    ) -> CheckResult {
        match element.query_simple(position) {
            Ok(simple) => self
                .simple
                .check_value_set(&simple.location, &simple.value, vs, Some(spec)),
            Err(e) => CheckResult::failed(self.detections.binding_location(
                &element.location,
                &e.detail(),
                Some(vs),
                Some(spec),
            )),
        }
    }
}
