// Value set bindings declared by a conformance profile

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConformanceError, Result};

/// Separator used by multi-binding value set ids.
pub const MULTI_BINDING_SEPARATOR: char = ':';

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BindingStrength {
    #[serde(rename = "R")]
    Required,
    #[serde(rename = "S")]
    Suggested,
}

impl BindingStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Suggested => "suggested",
        }
    }
}

impl fmt::Display for BindingStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position(s) of an element that carry the bound value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BindingLocation {
    Position(u32),
    Xor(u32, u32),
}

impl BindingLocation {
    /// Rejects locations no element can satisfy.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Position(0) => Err(ConformanceError::binding_location(format!(
                "Invalid binding location {self}"
            ))),
            Self::Xor(p1, p2) if p1 == 0 || p2 == 0 || p1 == p2 => Err(
                ConformanceError::binding_location(format!("Invalid binding location {self}")),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for BindingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(p) => write!(f, "{p}"),
            Self::Xor(p1, p2) => write!(f, "{p1} or {p2}"),
        }
    }
}

impl FromStr for BindingLocation {
    type Err = ConformanceError;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                ConformanceError::binding_location(format!("Invalid binding location {s}"))
            })
        };

        let normalized = s.trim().to_ascii_lowercase();
        let parts: Vec<&str> = if normalized.contains(':') {
            normalized.split(':').collect()
        } else {
            normalized.split("or").collect()
        };

        match parts.as_slice() {
            [p] => Ok(Self::Position(parse(p)?)),
            [p1, p2] => Ok(Self::Xor(parse(p1)?, parse(p2)?)),
            _ => Err(ConformanceError::binding_location(format!(
                "Invalid binding location {s}"
            ))),
        }
    }
}

/// A value set binding attached to an element by the profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValueSetSpec {
    pub value_set_id: String,
    #[serde(default)]
    pub binding_location: Option<BindingLocation>,
    #[serde(default)]
    pub binding_strength: Option<BindingStrength>,
}

impl ValueSetSpec {
    pub fn new(value_set_id: impl Into<String>) -> Self {
        Self {
            value_set_id: value_set_id.into(),
            binding_location: None,
            binding_strength: None,
        }
    }

    pub fn with_location(mut self, location: BindingLocation) -> Self {
        self.binding_location = Some(location);
        self
    }

    pub fn with_strength(mut self, strength: BindingStrength) -> Self {
        self.binding_strength = Some(strength);
        self
    }

    pub fn is_multi_binding(&self) -> bool {
        self.value_set_id.contains(MULTI_BINDING_SEPARATOR)
    }

    /// Candidate ids of a multi-binding, in declaration order.
    pub fn candidate_ids(&self) -> impl Iterator<Item = &str> {
        self.value_set_id
            .split(MULTI_BINDING_SEPARATOR)
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
