//! Error types for the Dart front-end (§4.2, §7 "Error conditions").

use thiserror::Error;

/// Result type for Dart lowering.
pub type Result<T> = std::result::Result<T, DartFrontendError>;

/// Fatal errors from the Dart front-end.
///
/// Recoverable trouble (an unrecognized widget constructor, a malformed
/// constructor parameter list) is recorded in a [`uic_ir::Diagnostics`] list
/// instead and does not appear here; lowering continues with an `Unknown`
/// placeholder.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DartFrontendError {
    /// Source bytes were not valid UTF-8.
    #[error("source is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// No widget class could be located in the source unit at all.
    #[error("no widget class found in {path}")]
    NoWidgetFound {
        /// Source path that was scanned.
        path: String,
    },

    /// The widget-tree parser hit malformed Dart it could not recover from.
    #[error("malformed Dart in {path} at offset {offset}: {message}")]
    MalformedDart {
        /// Source path.
        path: String,
        /// Byte offset into the scanned text.
        offset: usize,
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
