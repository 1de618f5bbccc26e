//! Deterministic node id generation (§4.1 "Determinism", applied identically
//! to the Dart front-end so ids stay comparable across dialects for the same
//! logical source unit).

use sha2::{Digest, Sha256};
use uic_ir::NodeId;

/// Compute the stable per-file salt used to prefix every id minted while
/// lowering `path`.
pub fn path_salt(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hex::encode(hasher.finalize())[..8].to_string()
}

/// Mints node ids in traversal order for a single source unit.
pub struct IdGenerator {
    salt: String,
    next_index: u32,
}

impl IdGenerator {
    /// Build a generator salted for `path`, starting at traversal index 0.
    pub fn new(path: &str) -> Self {
        Self {
            salt: path_salt(path),
            next_index: 0,
        }
    }

    /// Mint the next id in traversal order.
    pub fn next(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}-{:04}", self.salt, self.next_index));
        self.next_index += 1;
        id
    }
}
