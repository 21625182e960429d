//! gramset fuzzy string sets
//!
//! Builds on [`gramset_core`] with the pieces callers need around the
//! matching engine:
//!
//! - [`FuzzySetContainer`] - associate payload records with indexed strings
//! - [`SharedFuzzySet`] - concurrent readers, exclusive writers
//! - [`tracing`] - subscriber setup
//!
//! ## Usage
//!
//! ```rust
//! use gramset::{ContainerConfig, Entry, FuzzySetContainer, Resolved};
//! use serde_json::json;
//!
//! let config = ContainerConfig::with_payload_key("fruit");
//! let mut fruits = FuzzySetContainer::new(config).unwrap();
//! fruits.add(Entry::Record(json!({ "fruit": "Apple", "color": "red" }))).unwrap();
//! fruits.add("Banana").unwrap();
//!
//! let (_, best) = fruits.get_first("aple", 0.33).unwrap();
//! match best {
//!     Resolved::Record(record) => assert_eq!(record["color"], "red"),
//!     Resolved::Text(_) => unreachable!(),
//! }
//! ```

pub mod container;
pub mod error;
pub mod shared;
pub mod tracing;

// Re-export main types
pub use container::{ContainerConfig, Entry, FuzzySetContainer, Resolved, SearchKey};
pub use error::{Error, Result};
pub use shared::SharedFuzzySet;

pub use gramset_core::{FuzzyMatch, FuzzySet, GramConfig, GramError, DEFAULT_MIN_SCORE};
