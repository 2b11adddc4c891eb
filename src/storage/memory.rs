use papaya::HashMap as PapayaMap;
use std::sync::Arc;

use crate::error::{ConformanceError, Result};
use crate::storage::{LibraryStats, ValueSetLibrary};
use crate::types::ValueSet;

/// Value set library held in memory, safe for concurrent readers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryValueSetLibrary {
    value_sets: Arc<PapayaMap<String, Arc<ValueSet>>>,
    excluded: Arc<PapayaMap<String, ()>>,
}

impl InMemoryValueSetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value_sets(value_sets: impl IntoIterator<Item = ValueSet>) -> Self {
        let library = Self::new();
        for vs in value_sets {
            library.insert(vs);
        }
        library
    }

    /// Loads a JSON array of value sets.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value_sets: Vec<ValueSet> = serde_json::from_str(json)?;
        Ok(Self::from_value_sets(value_sets))
    }

    pub fn insert(&self, vs: ValueSet) {
        self.value_sets.pin().insert(vs.id.clone(), Arc::new(vs));
    }

    pub fn exclude(&self, id: impl Into<String>) {
        self.excluded.pin().insert(id.into(), ());
    }

    pub fn with_value_set(self, vs: ValueSet) -> Self {
        self.insert(vs);
        self
    }

    pub fn with_excluded(self, id: impl Into<String>) -> Self {
        self.exclude(id);
        self
    }

    pub fn len(&self) -> usize {
        self.value_sets.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats {
            value_sets_count: self.len(),
            excluded_count: self.excluded.pin().len(),
        }
    }
}

impl ValueSetLibrary for InMemoryValueSetLibrary {
    fn is_excluded_from_validation(&self, id: &str) -> bool {
        self.excluded.pin().contains_key(id)
    }

    fn get(&self, id: &str) -> Result<Arc<ValueSet>> {
        self.value_sets
            .pin()
            .get(id)
            .cloned()
            .ok_or_else(|| ConformanceError::value_set_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Code, CodeUsage};

    #[test]
    fn test_insert_and_get() {
        let library = InMemoryValueSetLibrary::new().with_value_set(
            ValueSet::new("HL70001").with_code(Code::new("M", "HL70001", CodeUsage::Required)),
        );
        assert_eq!(library.len(), 1);
        assert_eq!(library.get("HL70001").unwrap().codes.len(), 1);
        assert!(matches!(
            library.get("HL79999"),
            Err(ConformanceError::ValueSetNotFound { .. })
        ));
    }

    #[test]
    fn test_excluded() {
        let library = InMemoryValueSetLibrary::new().with_excluded("HL70005");
        assert!(library.is_excluded_from_validation("HL70005"));
        assert!(!library.is_excluded_from_validation("HL70001"));
        assert_eq!(library.stats().excluded_count, 1);
    }

    #[test]
    fn test_from_json_str() {
        let library = InMemoryValueSetLibrary::from_json_str(
            r#"[{"id": "HL70001", "codes": [{"value": "F", "codeSys": "HL70001", "usage": "R"}]}]"#,
        )
        .unwrap();
        assert!(library.contains("HL70001"));
    }

    #[test]
    fn test_clones_share_storage() {
        let library = InMemoryValueSetLibrary::new();
        let clone = library.clone();
        clone.insert(ValueSet::new("HL70001"));
        assert!(library.contains("HL70001"));
    }
}
