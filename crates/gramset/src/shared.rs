//! Thread-safe handle for a fuzzy set shared between readers and writers

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use gramset_core::{FuzzyMatch, FuzzySet};

/// Cloneable handle to one fuzzy set.
///
/// Searches share a read lock; `add` takes the write lock, so concurrent
/// searches never observe a half-indexed entry.
#[derive(Debug, Clone, Default)]
pub struct SharedFuzzySet {
    inner: Arc<RwLock<FuzzySet>>,
}

impl SharedFuzzySet {
    pub fn new(set: FuzzySet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
        }
    }

    /// Insert a string (write lock)
    pub fn add(&self, original: &str) -> bool {
        self.inner.write().add(original)
    }

    /// Ranked matches (read lock)
    pub fn search(&self, query: &str, min_score: f64) -> Vec<FuzzyMatch> {
        self.inner.read().search(query, min_score)
    }

    pub fn best_match(&self, query: &str, min_score: f64) -> Option<FuzzyMatch> {
        self.inner.read().best_match(query, min_score)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Hold the read lock for several operations
    pub fn read(&self) -> RwLockReadGuard<'_, FuzzySet> {
        self.inner.read()
    }
}

impl From<FuzzySet> for SharedFuzzySet {
    fn from(set: FuzzySet) -> Self {
        Self::new(set)
    }
}
