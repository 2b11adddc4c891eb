// Value set catalog entries

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CodeUsage {
    #[serde(rename = "R")]
    Required,
    #[serde(rename = "P")]
    Permitted,
    #[serde(rename = "E")]
    Excluded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Extensibility {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    Static,
    Dynamic,
}

impl Extensibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl Stability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for Extensibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Code {
    pub value: String,
    #[serde(rename = "codeSys")]
    pub code_system: String,
    pub usage: CodeUsage,
}

impl Code {
    pub fn new(value: impl Into<String>, code_system: impl Into<String>, usage: CodeUsage) -> Self {
        Self {
            value: value.into(),
            code_system: code_system.into(),
            usage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueSet {
    pub id: String,
    #[serde(default)]
    pub codes: Vec<Code>,
    #[serde(default)]
    pub extensibility: Option<Extensibility>,
    #[serde(default)]
    pub stability: Option<Stability>,
}

impl ValueSet {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            codes: Vec::new(),
            extensibility: None,
            stability: None,
        }
    }

    pub fn with_code(mut self, code: Code) -> Self {
        self.codes.push(code);
        self
    }

    pub fn with_extensibility(mut self, extensibility: Extensibility) -> Self {
        self.extensibility = Some(extensibility);
        self
    }

    pub fn with_stability(mut self, stability: Stability) -> Self {
        self.stability = Some(stability);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All codes whose value equals `value`, in catalog order.
    pub fn codes_for(&self, value: &str) -> Vec<&Code> {
        self.codes.iter().filter(|c| c.value == value).collect()
    }

    /// The code system shared by every code of the set, if there is exactly one.
    pub fn uniform_code_system(&self) -> Option<&str> {
        let first = self.codes.first()?.code_system.as_str();
        self.codes
            .iter()
            .all(|c| c.code_system == first)
            .then_some(first)
    }
}
