//! Error type for delta computation (§4.5).

use thiserror::Error;

/// Result type for delta operations.
pub type Result<T> = std::result::Result<T, DeltaError>;

/// Errors raised while diffing or applying a [`crate::delta::SchemaDelta`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeltaError {
    /// A prop value could not be serialized for canonical comparison.
    #[error("failed to serialize a prop value for comparison: {0}")]
    Serialization(#[from] serde_json::Error),
}
