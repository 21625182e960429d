//! Engine error types

use thiserror::Error;

/// Errors raised while constructing an engine.
///
/// Search never fails; only configuration is validated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GramError {
    /// Gram size range is empty or contains sizes below 2
    #[error("invalid gram size range {lower}..={upper}: sizes must satisfy 2 <= lower <= upper")]
    InvalidGramRange { lower: usize, upper: usize },

    /// Any other invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, GramError>;
