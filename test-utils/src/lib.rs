//! Shared test fixtures, snapshot helpers, an in-memory transport, and
//! `proptest` generators used across this workspace's test suites (§1.4).

pub mod duplex;
pub mod fixtures;
pub mod ir_strategy;
pub mod snapshot;

pub use duplex::{duplex_pair, DuplexEnd};
pub use fixtures::{empty_ir, simple_view_with_text, view_with_n_text_children};
pub use ir_strategy::arb_small_ir;
