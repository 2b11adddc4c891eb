// Exclusive-or arbitration between two bound positions

use super::result::{CheckResult, PositionOutcome};
use crate::report::{ConfigurableDetections, Detection};

/// Combines the outcomes of the two positions of an XOR binding.
///
/// | first | second | output                                      |
/// |-------|--------|---------------------------------------------|
/// | fail  | fail   | both outcomes                               |
/// | pass  | pass   | both outcomes and an ambiguity detection    |
/// | fail  | pass   | second outcome, first outcome as alert      |
/// | pass  | fail   | first outcome, second outcome as alert      |
///
/// `ambiguous` receives the descriptions of both outcomes.
pub fn arbitrate<T, F>(
    detections: &ConfigurableDetections,
    first: T,
    second: T,
    ambiguous: F,
) -> Vec<CheckResult>
where
    T: PositionOutcome,
    F: FnOnce(Vec<String>) -> Detection,
{
    let mut results = Vec::new();
    match (first.passes(), second.passes()) {
        (false, false) => {
            results.extend(first.into_results());
            results.extend(second.into_results());
        }
        (true, true) => {
            let mut reasons = first.descriptions();
            reasons.extend(second.descriptions());
            results.extend(first.into_results());
            results.extend(second.into_results());
            results.push(CheckResult::failed(ambiguous(reasons)));
        }
        (false, true) => {
            results.extend(second.into_results());
            results.extend(first.alerted(detections).into_results());
        }
        (true, false) => {
            results.extend(first.into_results());
            results.extend(second.alerted(detections).into_results());
        }
    }
    results
}
