//! Top-level error aggregation (§1.2, §7).
//!
//! Every sub-crate's own error type folds into [`CompileError`] via
//! `thiserror`'s `#[from]`, mirroring the teacher workspace's top-level
//! error aggregation over its sub-crates. Recoverable trouble never
//! reaches this type at all — it lives in a `Diagnostics` list attached to
//! the produced artifact instead.

use thiserror::Error;

/// Result type for the compiler facade.
pub type Result<T> = std::result::Result<T, CompileError>;

/// A fatal error from anywhere in the pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// JSX/TS lowering failed fatally.
    #[error(transparent)]
    JsxFrontend(#[from] uic_frontend_jsx::JsxFrontendError),

    /// Dart lowering failed fatally.
    #[error(transparent)]
    DartFrontend(#[from] uic_frontend_dart::DartFrontendError),

    /// JSX/TS emission failed.
    #[error(transparent)]
    JsxBackend(#[from] uic_backend_jsx::JsxBackendError),

    /// Dart emission failed.
    #[error(transparent)]
    DartBackend(#[from] uic_backend_dart::DartBackendError),

    /// A semantic bridge could not translate a cross-cutting schema.
    #[error(transparent)]
    Bridge(#[from] uic_bridges::BridgeError),

    /// Bundling failed.
    #[error(transparent)]
    Bundler(#[from] uic_bundler::BundlerError),

    /// Delta computation or application failed.
    #[error(transparent)]
    Delta(#[from] uic_delta::DeltaError),

    /// A live-update session failed fatally.
    #[error(transparent)]
    Session(#[from] uic_session::SessionError),

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration could not be serialized back to TOML.
    #[error("could not serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// A diagnostics list could not be serialized to JSON.
    #[error("could not serialize diagnostics: {0}")]
    DiagnosticsSerialize(#[from] serde_json::Error),
}
