//! Fuzzy Matching Engine
//!
//! Multi-resolution n-gram matching:
//!
//! 1. Every inserted string is normalized and indexed once per gram size.
//! 2. A query is scored per size by cosine similarity of gram-count vectors,
//!    largest size first.
//! 3. The first size with a candidate at or above the threshold decides the
//!    result; smaller (fuzzier) sizes are only a fallback.
//! 4. Optionally, the top candidates are rescored by edit distance.
//!
//! # Example
//!
//! ```rust
//! use gramset_core::fuzzy::FuzzySet;
//!
//! let mut set = FuzzySet::new();
//! set.add("Raspberry");
//! set.add("Blueberry");
//!
//! let best = set.best_match("rasberry", 0.5).unwrap();
//! assert_eq!(best.value, "Raspberry");
//! ```

mod engine;
mod index;

pub use engine::{FuzzyMatch, FuzzySet, DEFAULT_MIN_SCORE};
pub use index::{GramIndex, Posting};
