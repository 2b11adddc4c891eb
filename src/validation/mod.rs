//! Value set conformance checks.
//!
//! [`Validator`] walks a message tree and dispatches each bound element to
//! the simple, complex or coded element checks. Every check reports a
//! [`CheckResult`]; XOR bindings are arbitrated by [`xor::arbitrate`].

pub mod coded;
pub mod complex;
pub mod engine;
pub mod result;
pub mod simple;
pub mod xor;

pub use coded::{CodeSystemPartition, CodedElementValidator};
pub use complex::ComplexElementValidator;
pub use engine::Validator;
pub use result::{CheckResult, PositionOutcome, TripletResult};
pub use simple::{SimpleElementValidator, skip_code_check};
