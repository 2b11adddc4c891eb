use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{BindingStrength, Extensibility, Stability};

/// Every finding the engine can emit, keyed by its configuration name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionKind {
    CodeNotFoundSimple,
    CodeNotFound,
    Rvs,
    Pvs,
    Evs,
    VsNotFound,
    VsNotFoundBinding,
    EmptyVs,
    VsError,
    BindingLocation,
    VsNoValidation,
    CodedElement,
    CodedElementXor,
    InvalidCodeSystem,
}

impl DetectionKind {
    /// In discriminant order.
    pub const ALL: [DetectionKind; 14] = [
        Self::CodeNotFoundSimple,
        Self::CodeNotFound,
        Self::Rvs,
        Self::Pvs,
        Self::Evs,
        Self::VsNotFound,
        Self::VsNotFoundBinding,
        Self::EmptyVs,
        Self::VsError,
        Self::BindingLocation,
        Self::VsNoValidation,
        Self::CodedElement,
        Self::CodedElementXor,
        Self::InvalidCodeSystem,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::CodeNotFoundSimple => "code-not-found-simple",
            Self::CodeNotFound => "code-not-found",
            Self::Rvs => "rvs",
            Self::Pvs => "pvs",
            Self::Evs => "evs",
            Self::VsNotFound => "vs-not-found",
            Self::VsNotFoundBinding => "vs-not-found-binding",
            Self::EmptyVs => "empty-vs",
            Self::VsError => "vs-error",
            Self::BindingLocation => "binding-location",
            Self::VsNoValidation => "vs-no-validation",
            Self::CodedElement => "coded-element",
            Self::CodedElementXor => "coded-element-xor",
            Self::InvalidCodeSystem => "invalid-code-system",
        }
    }

    /// Kinds whose severity is resolved through the override cascade.
    pub fn is_cascading(&self) -> bool {
        matches!(
            self,
            Self::CodeNotFoundSimple
                | Self::CodeNotFound
                | Self::Rvs
                | Self::Pvs
                | Self::Evs
                | Self::CodedElementXor
        )
    }

    pub fn is_code_not_found(&self) -> bool {
        matches!(self, Self::CodeNotFoundSimple | Self::CodeNotFound)
    }
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The three orthogonal axes walked by the override cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityAxes {
    pub strength: Option<BindingStrength>,
    pub extensibility: Option<Extensibility>,
    pub stability: Option<Stability>,
}

pub const NO_VALUE: &str = "no-value";

impl SeverityAxes {
    pub fn new(
        strength: Option<BindingStrength>,
        extensibility: Option<Extensibility>,
        stability: Option<Stability>,
    ) -> Self {
        Self {
            strength,
            extensibility,
            stability,
        }
    }

    /// Override path steps in walk order: strength, extensibility, stability.
    pub fn steps(&self) -> [&'static str; 3] {
        [
            self.strength.map_or(NO_VALUE, |s| s.as_str()),
            self.extensibility.map_or(NO_VALUE, |e| e.as_str()),
            self.stability.map_or(NO_VALUE, |s| s.as_str()),
        ]
    }
}
