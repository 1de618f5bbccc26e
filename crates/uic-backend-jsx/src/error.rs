//! Error type for JSX/TS emission (§4.2 "Back-ends").

use thiserror::Error;

/// Result type for JSX/TS emission.
pub type Result<T> = std::result::Result<T, JsxBackendError>;

/// Errors raised while emitting source from an IR document.
///
/// These only arise from a malformed or hand-constructed `Ir` (e.g. a
/// dangling reference introduced by a bundler transform) — an `Ir` that
/// has passed `uic_ir::invariants::validate` cannot trigger them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsxBackendError {
    /// A root id didn't resolve to a node in the arena.
    #[error("root node `{0}` not found in the IR arena")]
    MissingRootNode(String),

    /// A child id didn't resolve to a node in the arena.
    #[error("child node `{0}` not found in the IR arena")]
    MissingChildNode(String),
}
