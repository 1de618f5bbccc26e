//! Dart/Flutter back-end: emits a UI compiler IR document as Dart widget
//! source (§4.2).

pub mod emit;
pub mod error;
pub mod options;

pub use emit::emit_source;
pub use error::{DartBackendError, Result};
pub use options::EmitOptions;
