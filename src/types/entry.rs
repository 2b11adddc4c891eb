// Report entries produced by the validators

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::binding::{BindingLocation, BindingStrength, ValueSetSpec};
use super::element::Location;
use super::value_set::{Extensibility, Stability, ValueSet};

/// Metadata key under which value set details are attached.
pub const VALUE_SET_METADATA_KEY: &str = "valueSet";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trace {
    pub assertion: String,
    pub reasons: Vec<String>,
}

impl Trace {
    pub fn new(assertion: impl Into<String>, reasons: Vec<String>) -> Self {
        Self {
            assertion: assertion.into(),
            reasons,
        }
    }
}

/// One classified finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub line: u32,
    pub column: u32,
    pub path: String,
    pub description: String,
    pub category: String,
    pub classification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<Vec<Trace>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<BTreeMap<String, serde_json::Value>>,
}

impl Entry {
    pub fn new(
        location: &Location,
        description: impl Into<String>,
        category: impl Into<String>,
        classification: impl Into<String>,
    ) -> Self {
        Self {
            line: location.line,
            column: location.column,
            path: location.path.clone(),
            description: description.into(),
            category: category.into(),
            classification: classification.into(),
            stack_trace: None,
            meta_data: None,
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: Vec<Trace>) -> Self {
        self.stack_trace = Some(stack_trace);
        self
    }

    pub fn with_value_set_details(mut self, details: ValueSetDetails) -> Self {
        let value = serde_json::to_value(details).unwrap_or(serde_json::Value::Null);
        self.meta_data
            .get_or_insert_with(BTreeMap::new)
            .insert(VALUE_SET_METADATA_KEY.to_string(), value);
        self
    }

    /// Copy of this entry with only the classification replaced.
    pub fn reclassified(&self, classification: &str) -> Self {
        Self {
            classification: classification.to_string(),
            ..self.clone()
        }
    }

    pub fn value_set_details(&self) -> Option<ValueSetDetails> {
        let value = self.meta_data.as_ref()?.get(VALUE_SET_METADATA_KEY)?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// Value set descriptor carried in `metaData` of value set findings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValueSetDetails {
    pub id: Option<String>,
    pub stability: Option<Stability>,
    pub extensibility: Option<Extensibility>,
    pub binding_strength: Option<BindingStrength>,
    pub binding_location: Option<BindingLocation>,
}

impl ValueSetDetails {
    pub fn from_parts(vs: Option<&ValueSet>, spec: Option<&ValueSetSpec>) -> Self {
        Self {
            id: vs
                .map(|v| v.id.clone())
                .or_else(|| spec.map(|s| s.value_set_id.clone())),
            stability: vs.and_then(|v| v.stability),
            extensibility: vs.and_then(|v| v.extensibility),
            binding_strength: spec.and_then(|s| s.binding_strength),
            binding_location: spec.and_then(|s| s.binding_location),
        }
    }
}
