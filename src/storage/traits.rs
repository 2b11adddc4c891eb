use std::sync::Arc;

use crate::error::{ConformanceError, Result};
use crate::types::ValueSet;

/// Read-only value set catalog consulted during validation.
///
/// Implementations must tolerate unbounded concurrent reads.
pub trait ValueSetLibrary: Send + Sync {
    /// Value sets that are bound in profiles but deliberately not checked.
    fn is_excluded_from_validation(&self, id: &str) -> bool;

    /// Looks up a value set, failing with [`ConformanceError::ValueSetNotFound`].
    fn get(&self, id: &str) -> Result<Arc<ValueSet>>;

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }
}

/// A library with no value sets at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyValueSetLibrary;

impl ValueSetLibrary for EmptyValueSetLibrary {
    fn is_excluded_from_validation(&self, _id: &str) -> bool {
        false
    }

    fn get(&self, id: &str) -> Result<Arc<ValueSet>> {
        Err(ConformanceError::value_set_not_found(id))
    }
}

impl<T: ValueSetLibrary + ?Sized> ValueSetLibrary for Arc<T> {
    fn is_excluded_from_validation(&self, id: &str) -> bool {
        (**self).is_excluded_from_validation(id)
    }

    fn get(&self, id: &str) -> Result<Arc<ValueSet>> {
        (**self).get(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LibraryStats {
    pub value_sets_count: usize,
    pub excluded_count: usize,
}
