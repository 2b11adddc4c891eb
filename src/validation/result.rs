// Uniform outcome types shared by the value set checks

use crate::report::{ConfigurableDetections, Detection};

/// Outcome of one check: an optional detection plus whether the check passed.
///
/// A passing check may still carry an informational detection, such as the
/// note emitted for a required or permitted code.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub detection: Option<Detection>,
    pub passed: bool,
}

impl CheckResult {
    /// Nothing to report.
    pub fn conformant() -> Self {
        Self {
            detection: None,
            passed: true,
        }
    }

    pub fn failed(detection: Detection) -> Self {
        Self {
            detection: Some(detection),
            passed: false,
        }
    }

    pub fn noted(detection: Detection) -> Self {
        Self {
            detection: Some(detection),
            passed: true,
        }
    }

    pub fn has_detection(&self) -> bool {
        self.detection.is_some()
    }
}

/// Code and code system sub-results of one coded element triplet.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletResult {
    pub value: CheckResult,
    pub code_system: CheckResult,
}

impl TripletResult {
    pub fn new(value: CheckResult, code_system: CheckResult) -> Self {
        Self { value, code_system }
    }

    /// A triplet whose positions could not be resolved.
    pub fn unresolved(detection: Detection) -> Self {
        Self::new(CheckResult::failed(detection), CheckResult::conformant())
    }

    pub fn pass_value(&self) -> bool {
        self.value.passed
    }

    pub fn pass_code_system(&self) -> bool {
        self.code_system.passed
    }

    pub fn is_valid(&self) -> bool {
        self.pass_value() && self.pass_code_system()
    }
}

/// Common view over the per-position outcomes arbitrated by an XOR binding.
pub trait PositionOutcome: Sized {
    fn passes(&self) -> bool;

    /// Results that carry a detection, in report order.
    fn into_results(self) -> Vec<CheckResult>;

    fn alerted(self, detections: &ConfigurableDetections) -> Self;

    fn descriptions(&self) -> Vec<String>;
}

impl PositionOutcome for CheckResult {
    fn passes(&self) -> bool {
        self.passed
    }

    fn into_results(self) -> Vec<CheckResult> {
        if self.has_detection() { vec![self] } else { Vec::new() }
    }

    fn alerted(self, detections: &ConfigurableDetections) -> Self {
        Self {
            detection: self.detection.map(|d| detections.alert(&d)),
            passed: self.passed,
        }
    }

    fn descriptions(&self) -> Vec<String> {
        self.detection
            .iter()
            .map(|d| d.entry.description.clone())
            .collect()
    }
}

impl PositionOutcome for TripletResult {
    fn passes(&self) -> bool {
        self.is_valid()
    }

    fn into_results(self) -> Vec<CheckResult> {
        let mut results = self.value.into_results();
        results.extend(self.code_system.into_results());
        results
    }

    fn alerted(self, detections: &ConfigurableDetections) -> Self {
        Self::new(
            self.value.alerted(detections),
            self.code_system.alerted(detections),
        )
    }

    fn descriptions(&self) -> Vec<String> {
        let mut descriptions = self.value.descriptions();
        descriptions.extend(self.code_system.descriptions());
        descriptions
    }
}
