use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConformanceError, Result};

const REFERENCE_DETECTIONS: &str = include_str!("reference_detections.json");

/// Dotted-key configuration consumed by the detection classifier.
///
/// Nested JSON objects are flattened so that `{"report": {"rvs": {"category": "x"}}}`
/// is addressed as `report.rvs.category`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfig {
    entries: BTreeMap<String, String>,
}

impl DetectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration shipped with the crate.
    pub fn reference() -> Result<Self> {
        Self::from_json_str(REFERENCE_DETECTIONS)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(_) = value else {
            return Err(ConformanceError::configuration(
                "Detection configuration must be a JSON object",
            ));
        };

        let mut entries = BTreeMap::new();
        flatten_into(&mut entries, String::new(), value)?;
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            ConformanceError::configuration(format!("Missing mandatory configuration key '{key}'"))
        })
    }

    /// True when `path` is a leaf key or the prefix of at least one key.
    pub fn has_path(&self, path: &str) -> bool {
        if self.entries.contains_key(path) {
            return true;
        }
        let prefix = format!("{path}.");
        self.entries
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Layers `other` on top of `self`; keys of `other` win.
    pub fn overlay(mut self, other: &DetectionConfig) -> Self {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn flatten_into(
    entries: &mut BTreeMap<String, String>,
    prefix: String,
    value: &Value,
) -> Result<()> {
    let scalar = match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(entries, path, child)?;
            }
            return Ok(());
        }
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) => {
            return Err(ConformanceError::configuration(format!(
                "Unsupported value for configuration key '{prefix}', expected a string, number or boolean"
            )));
        }
    };
    entries.insert(prefix, scalar);
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    pub max_concurrent_validations: usize,
    pub enable_metrics: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_validations: num_cpus::get(),
            enable_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Keep informational entries of passing checks in the message report.
    pub report_passing_codes: bool,
    pub performance_config: PerformanceConfig,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            report_passing_codes: false,
            performance_config: PerformanceConfig::default(),
        }
    }
}

impl ValidatorOptions {
    pub fn with_passing_codes(mut self, enabled: bool) -> Self {
        self.report_passing_codes = enabled;
        self
    }

    pub fn with_performance_config(mut self, performance_config: PerformanceConfig) -> Self {
        self.performance_config = performance_config;
        self
    }

    pub fn with_max_concurrent_validations(mut self, max: usize) -> Self {
        self.performance_config.max_concurrent_validations = max.max(1);
        self
    }
}
