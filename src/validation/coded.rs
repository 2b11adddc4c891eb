//! Coded element (CE, CNE, CWE) validation.
//!
//! A coded element carries one triplet per binding position `p`: the code at
//! `p`, its text at `p + 1` and the code system at `p + 2`.

use indexmap::IndexMap;
use std::sync::Arc;

use super::result::{CheckResult, PositionOutcome, TripletResult};
use super::simple::{SimpleElementValidator, skip_code_check};
use super::xor::arbitrate;
use crate::error::{ConformanceError, Result};
use crate::report::ConfigurableDetections;
use crate::storage::ValueSetLibrary;
use crate::types::{BindingLocation, ComplexElement, SimpleElement, ValueSet, ValueSetSpec};

/// Offset of the code system component from the code component.
const CODE_SYSTEM_OFFSET: u32 = 2;

/// Candidate value set ids of a multi-binding, grouped by their code system.
pub type CodeSystemPartition = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone)]
pub struct CodedElementValidator {
    detections: Arc<ConfigurableDetections>,
    simple: SimpleElementValidator,
}

impl CodedElementValidator {
    pub fn new(detections: Arc<ConfigurableDetections>, simple: SimpleElementValidator) -> Self {
        Self { detections, simple }
    }

    pub fn check(
        &self,
        element: &ComplexElement,
        spec: &ValueSetSpec,
        library: &dyn ValueSetLibrary,
    ) -> Vec<CheckResult> {
        if spec.is_multi_binding() {
            return self.check_multiple(element, spec, library);
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

        let location = match self.binding_location(spec) {
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
                arbitrate(&self.detections, first, second, |_| {
                    self.detections.coded_element_xor(
                        &element.location,
                        &format!(
                            "One of the triplet (but not both) should be valued from the value set '{}'",
                            vs.id
                        ),
                        Some(vs.as_ref()),
                        spec,
                        Vec::new(),
                    )
                })
            }
        }
    }

    pub(crate) fn binding_location(&self, spec: &ValueSetSpec) -> Result<BindingLocation> {
        let location = spec
            .binding_location
            .ok_or_else(|| ConformanceError::specification("The binding location is missing"))?;
        location.validate()?;
        Ok(location)
    }

    fn resolve_triplet<'a>(
        &self,
        element: &'a ComplexElement,
        position: u32,
    ) -> Result<(&'a SimpleElement, &'a SimpleElement)> {
        let code = element.query_simple(position)?;
        let code_system_position = position.checked_add(CODE_SYSTEM_OFFSET).ok_or_else(|| {
            ConformanceError::binding_location(format!(
                "Position '{position}' of {} has no room for a code system component",
                element.location.pretty()
            ))
        })?;
        let code_system = element.query_simple(code_system_position)?;
        Ok((code, code_system))
    }

    fn check_position(
        &self,
        element: &ComplexElement,
        position: u32,
        vs: &ValueSet,
        spec: &ValueSetSpec,
    ) -> TripletResult {
        match self.resolve_triplet(element, position) {
            Ok((code, code_system)) => self.check_triplet(code, code_system, vs, spec),
            Err(e) => TripletResult::unresolved(self.detections.binding_location(
                &element.location,
                &e.detail(),
                Some(vs),
                Some(spec),
            )),
        }
    }

    /// Validates the code, then, only when it passes, its code system.
    pub fn check_triplet(
        &self,
        code: &SimpleElement,
        code_system: &SimpleElement,
        vs: &ValueSet,
        spec: &ValueSetSpec,
    ) -> TripletResult {
        let value = self
            .simple
            .check_value_set(&code.location, &code.value, vs, Some(spec));

        let mut code_system_result = CheckResult::conformant();
        if value.passed && !skip_code_check(&vs.id, &code.value) {
            if let Some(matched) = vs.codes_for(&code.value).first() {
                if matched.code_system != code_system.value {
                    code_system_result = CheckResult::failed(self.detections.invalid_code_system(
                        &code_system.location,
                        &matched.code_system,
                        &code_system.value,
                        vs,
                        Some(spec),
                    ));
                }
            }
        }

        TripletResult::new(value, code_system_result)
    }

    /// Groups the candidate ids of a multi-binding by code system.
    ///
    /// Unresolvable candidates are tolerated unless none resolves; every
    /// resolved candidate must use a single code system.
    pub fn partition(
        &self,
        spec: &ValueSetSpec,
        library: &dyn ValueSetLibrary,
    ) -> Result<CodeSystemPartition> {
        let mut partition = CodeSystemPartition::new();
        let mut total = 0;
        let mut not_found = 0;

        for id in spec.candidate_ids() {
            total += 1;
            let vs = match library.get(id) {
                Ok(vs) => vs,
                Err(ConformanceError::ValueSetNotFound { .. }) => {
                    not_found += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let code_system = vs.uniform_code_system().ok_or_else(|| {
                ConformanceError::specification(
                    "Value Set Specification error, the value sets specified for multiple bindings should have codes from the same Code System",
                )
            })?;

            partition
                .entry(code_system.to_string())
                .or_default()
                .push(id.to_string());
        }

        if not_found == total {
            return Err(ConformanceError::specification(format!(
                "Value Set Specification error, no value set was found from the list {}",
                spec.value_set_id
            )));
        }

        Ok(partition)
    }

    fn check_multiple(
        &self,
        element: &ComplexElement,
        spec: &ValueSetSpec,
        library: &dyn ValueSetLibrary,
    ) -> Vec<CheckResult> {
        let vs_error = |message: &str| {
            vec![CheckResult::failed(self.detections.vs_error(
                &element.location,
                message,
                None,
                Some(spec),
            ))]
        };

        let partition = match self.partition(spec, library) {
            Ok(partition) => partition,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    location = %element.location,
                    value_sets = %spec.value_set_id,
                    "{e}"
                );
                return vs_error(&e.detail());
            }
        };

        let location = match self.binding_location(spec) {
            Ok(location) => location,
            Err(e) => return vs_error(&e.detail()),
        };

        match location {
            BindingLocation::Position(p) => self
                .check_position_multiple(element, p, spec, library, &partition)
                .into_results(),
            BindingLocation::Xor(p1, p2) => {
                let first = self.check_position_multiple(element, p1, spec, library, &partition);
                let second = self.check_position_multiple(element, p2, spec, library, &partition);
                arbitrate(&self.detections, first, second, |_| {
                    self.detections.coded_element_xor(
                        &element.location,
                        &format!(
                            "One of the triplet (but not both) should be valued from the value sets '{}'",
                            spec.candidate_ids().collect::<Vec<_>>().join(" or ")
                        ),
                        None,
                        spec,
                        Vec::new(),
                    )
                })
            }
        }
    }

    fn check_position_multiple(
        &self,
        element: &ComplexElement,
        position: u32,
        spec: &ValueSetSpec,
        library: &dyn ValueSetLibrary,
        partition: &CodeSystemPartition,
    ) -> CheckResult {
        let (code, code_system) = match self.resolve_triplet(element, position) {
            Ok(triplet) => triplet,
            Err(e) => {
                return CheckResult::failed(self.detections.binding_location(
                    &element.location,
                    &e.detail(),
                    None,
                    Some(spec),
                ));
            }
        };

        let Some(candidates) = partition.get(&code_system.value) else {
            return CheckResult::failed(self.detections.coded_element(
                &code_system.location,
                &format!(
                    "Code System : {}, not found in any of the Value Sets bindings",
                    code_system.value
                ),
                None,
                None,
            ));
        };

        for id in candidates {
            let Ok(vs) = library.get(id) else { continue };
            let result = self
                .simple
                .check_value_set(&code.location, &code.value, &vs, Some(spec));
            if result.passed {
                return result;
            }
        }

        CheckResult::failed(self.detections.code_not_found(
            &code.location,
            &code.value,
            &candidates.join(" or "),
            Some(spec),
        ))
    }
}
