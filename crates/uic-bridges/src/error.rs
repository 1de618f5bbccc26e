//! Error type for semantic bridge translation (§4.3).

use thiserror::Error;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors raised while translating a cross-cutting IR schema into a
/// dialect-specific emission plan.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// A route referenced by name (e.g. a guard or transition target)
    /// doesn't exist in the schema.
    #[error("unknown route `{0}`")]
    UnknownRoute(String),

    /// An animation's `kind` doesn't match the physics config carried
    /// alongside it (e.g. `Spring` kind with no `spring` config).
    #[error("animation `{id}` has kind {kind:?} but no matching physics config")]
    InconsistentAnimationConfig {
        /// Animation id.
        id: String,
        /// The animation's declared kind.
        kind: uic_ir::AnimationKind,
    },
}
