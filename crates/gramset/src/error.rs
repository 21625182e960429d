//! Common error types for gramset.

use thiserror::Error;

use gramset_core::GramError;

/// Error type for container operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Engine configuration error
    #[error("configuration error: {0}")]
    Gram(#[from] GramError),

    /// Record lacks the identifying key
    #[error("cannot add record {record}: it has no search key `{key}`")]
    MissingKey { key: String, record: String },
}

/// Result type alias using gramset Error.
pub type Result<T> = std::result::Result<T, Error>;
