//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::error::{GramError, Result};

/// Immutable engine configuration, fixed at construction.
///
/// Deserializing from a partial document fills the missing fields with
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GramConfig {
    /// Smallest gram size indexed (inclusive)
    pub gram_size_lower: usize,
    /// Largest gram size indexed (inclusive)
    pub gram_size_upper: usize,
    /// Rescore the top cosine candidates by normalized edit distance
    pub use_levenshtein: bool,
    /// How many cosine candidates per gram size the edit-distance pass rescores
    pub levenshtein_candidates: usize,
}

impl Default for GramConfig {
    fn default() -> Self {
        Self {
            gram_size_lower: 2,
            gram_size_upper: 3,
            use_levenshtein: false,
            levenshtein_candidates: 50,
        }
    }
}

impl GramConfig {
    /// Config with a custom gram size range and defaults elsewhere.
    pub fn with_gram_sizes(lower: usize, upper: usize) -> Self {
        Self {
            gram_size_lower: lower,
            gram_size_upper: upper,
            ..Self::default()
        }
    }

    /// Check the invariants every engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.gram_size_lower < 2 || self.gram_size_lower > self.gram_size_upper {
            return Err(GramError::InvalidGramRange {
                lower: self.gram_size_lower,
                upper: self.gram_size_upper,
            });
        }
        if self.use_levenshtein && self.levenshtein_candidates == 0 {
            return Err(GramError::InvalidConfig(
                "levenshtein_candidates must be at least 1 when use_levenshtein is set".into(),
            ));
        }
        Ok(())
    }

    /// Configured gram sizes, largest first (search order).
    pub fn sizes_descending(&self) -> impl Iterator<Item = usize> {
        (self.gram_size_lower..=self.gram_size_upper).rev()
    }
}
