//! Error type for the bundler pipeline (§4.4 "Failure semantics").

use thiserror::Error;

/// Result type for bundler operations.
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Errors raised while assembling, compressing, or validating a bundle.
///
/// Every variant here is fatal (§4.4 "Failure semantics"): the bundler does
/// not partially distribute a bundle it could not fully assemble.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BundlerError {
    /// The entry path did not resolve to an IR via the supplied source.
    #[error("entry `{0}` could not be resolved")]
    MissingEntry(String),

    /// A component/navigation reference named a path the source could not resolve.
    #[error("dependency `{0}` referenced from `{1}` could not be resolved")]
    MissingDependency(String, String),

    /// An asset reference named a path the source could not resolve.
    #[error("asset `{0}` could not be resolved")]
    MissingAsset(String),

    /// The IR dependency graph contains a cycle (component A depends on B depends on A).
    #[error("cycle in IR dependency graph at `{0}`")]
    DependencyCycle(String),

    /// An IR's `schema_version` is incompatible with the bundler's supported range.
    #[error("schema version {found} at `{path}` violates the bundle's version constraint")]
    VersionViolation {
        /// Path of the offending IR.
        path: String,
        /// Version found.
        found: semver::Version,
    },

    /// Recomputed checksum did not match the manifest entry during validation.
    #[error("checksum mismatch for `{0}`")]
    ChecksumMismatch(String),

    /// Stream compression failed.
    #[error("compression failed: {0}")]
    Compression(String),

    /// A manifest signature did not verify against the supplied public key.
    #[error("signature verification failed: {0}")]
    InvalidSignature(String),

    /// An underlying IR operation (serialization, validation) failed.
    #[error(transparent)]
    Ir(#[from] uic_ir::IrError),
}
