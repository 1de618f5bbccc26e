//! JSX/TS back-end: emits a UI compiler IR document as JSX/TypeScript
//! source (§4.2).

pub mod emit;
pub mod error;
pub mod options;

pub use emit::emit_source;
pub use error::{JsxBackendError, Result};
pub use options::EmitOptions;
