//! Error types for the JSX/TS front-end (§4.1 "Error conditions").

use thiserror::Error;

/// Result type for JSX/TS lowering.
pub type Result<T> = std::result::Result<T, JsxFrontendError>;

/// Fatal errors from the JSX/TS front-end (§7 kind 3/non-recoverable IO).
///
/// Recoverable trouble (malformed attribute, unrecognized hook, missing
/// `else` branch) is recorded in a [`uic_ir::Diagnostics`] list instead and
/// does not appear here; lowering continues with an `Unknown` placeholder.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsxFrontendError {
    /// Source bytes were not valid UTF-8.
    #[error("source is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// No component declaration could be located in the source unit at all.
    #[error("no component declaration found in {path}")]
    NoComponentFound {
        /// Source path that was scanned.
        path: String,
    },

    /// The JSX parser hit malformed markup it could not recover from
    /// (unbalanced tags), which is distinct from an *unrecognized* construct.
    #[error("malformed JSX in {path} at line {line}, column {column}: {message}")]
    MalformedJsx {
        /// Source path.
        path: String,
        /// 1-based line.
        line: u32,
        /// 1-based column.
        column: u32,
        /// Description of the problem.
        message: String,
    },

    /// Building the resulting IR violated a structural invariant.
    #[error("invariant violation while lowering {path}: {source}")]
    Invariant {
        /// Source path.
        path: String,
        /// Underlying invariant error.
        #[source]
        source: uic_ir::IrError,
    },
}
