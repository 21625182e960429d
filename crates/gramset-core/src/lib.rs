//! gramset Core Engine
//!
//! Approximate string matching over a growing collection of reference
//! strings. Every string is indexed once per configured n-gram size; a query
//! is scored against the strings it shares grams with using cosine
//! similarity of gram-count vectors, and results are ranked by score.
//!
//! # Example
//!
//! ```rust
//! use gramset_core::{FuzzySet, GramConfig};
//!
//! let set = FuzzySet::from_strings(
//!     GramConfig::default(),
//!     ["Banana", "Blueberry", "Raspberry", "Cherry", "Apple"],
//! )
//! .unwrap();
//!
//! let matches = set.search("Aple", 0.33);
//! assert_eq!(matches[0].value, "Apple");
//! ```

pub mod config;
pub mod error;
pub mod fuzzy;
pub mod grams;
pub mod normalize;
pub mod similarity;

// Re-export main types at crate root
pub use config::GramConfig;
pub use error::{GramError, Result};
pub use fuzzy::{FuzzyMatch, FuzzySet, GramIndex, DEFAULT_MIN_SCORE};
pub use grams::{gram_counts, grams, GramVector, PAD};
pub use normalize::normalize;
