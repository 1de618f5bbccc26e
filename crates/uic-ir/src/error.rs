//! Error types for IR construction and validation.

use thiserror::Error;

/// Result type for IR operations.
pub type Result<T> = std::result::Result<T, IrError>;

/// Errors raised while building or validating an [`crate::Ir`].
///
/// These correspond to the `InvariantError` kind in the error-handling design:
/// every variant here is fatal (§3.2) and aborts the in-progress IR.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Two nodes in the same IR share an id (invariant 1).
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),

    /// The node graph contains a cycle (invariant 2).
    #[error("cycle detected at node {0}")]
    Cycle(String),

    /// A `StateRef` does not name an in-scope state variable (invariant 3).
    #[error("dangling state reference: {0}")]
    DanglingStateRef(String),

    /// An `EventRef` does not name a known event binding or handler (invariant 3).
    #[error("dangling event reference: {0}")]
    DanglingEventRef(String),

    /// A node's `animations` set references an id with no matching schema (invariant 4).
    #[error("dangling animation reference: {0}")]
    DanglingAnimationRef(String),

    /// Two routes share a name or path pattern (invariant 5).
    #[error("duplicate route: {0}")]
    DuplicateRoute(String),

    /// The bundle's schema-version is below the minimum required by a construct (invariant 8).
    #[error("schema version {found} is below the minimum required version {required}")]
    SchemaVersionTooLow {
        /// Version carried by the IR.
        found: semver::Version,
        /// Minimum version required by some construct in the IR.
        required: semver::Version,
    },

    /// Canonical serialization failed.
    #[error("canonical serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
