//! # OctoFHIR HL7 v2 Value Sets
//!
//! Value set and coded element conformance checks for HL7 v2 message trees.
//!
//! ## Features
//!
//! - **Bindings**: single position, exclusive-or of two positions and
//!   multi-binding dispatch by code system
//! - **Coded elements**: code and code system consistency of CE, CNE and CWE triplets
//! - **Classification**: configurable severity cascade over binding strength,
//!   extensibility and stability
//! - **Batches**: concurrent validation of independent messages
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use octofhir_hl7v2_vs::*;
//!
//! # fn example() -> Result<()> {
//! let library = InMemoryValueSetLibrary::new().with_value_set(
//!     ValueSet::new("HL70001")
//!         .with_code(Code::new("M", "HL70001", CodeUsage::Required))
//!         .with_code(Code::new("F", "HL70001", CodeUsage::Required)),
//! );
//!
//! let sex = SimpleElement::new(8, Location::new("PID-8", "Administrative Sex", 1, 40), "X")
//!     .with_req(Req::new(Usage::R).with_spec(ValueSetSpec::new("HL70001")));
//!
//! let validator = Validator::with_reference_config()?;
//! let entries = validator.check_message(&sex.into(), &library);
//! assert_eq!(entries.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod report;
pub mod storage;
pub mod types;
pub mod utils;
pub mod validation;

pub use crate::core::{DetectionConfig, PerformanceConfig, ValidatorOptions};
pub use error::{ConformanceError, Result};
pub use report::{ConfigurableDetections, Detection, DetectionKind, EntryTemplate, SeverityAxes};
pub use storage::*;
pub use types::*;
pub use validation::{
    CheckResult, CodedElementValidator, ComplexElementValidator, SimpleElementValidator,
    TripletResult, Validator,
};
