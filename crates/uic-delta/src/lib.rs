//! Delta engine: computes and applies `SchemaDelta` between two IR
//! documents (§4.5 "Delta computation").

pub mod delta;
pub mod error;

pub use delta::{apply_delta, diff_ir, prefer_delta, SchemaDelta, DEFAULT_DELTA_THRESHOLD};
pub use error::{DeltaError, Result};
