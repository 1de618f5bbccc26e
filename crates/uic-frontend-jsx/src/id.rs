//! Deterministic node id generation (§4.1 "Determinism").
//!
//! Ids are a per-file salt (first 8 hex characters of the path's SHA-256)
//! joined with a zero-padded traversal index, e.g. `a1b2c3d4-0007`. This
//! keeps ids stable across re-lowers of an unchanged file without needing a
//! persistent id table, at the accepted cost that inserting a node earlier in
//! traversal order than an existing one re-mints every id after it.

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_yields_same_salt() {
        assert_eq!(path_salt("Counter.tsx"), path_salt("Counter.tsx"));
        assert_ne!(path_salt("Counter.tsx"), path_salt("Other.tsx"));
    }

    #[test]
    fn ids_are_salted_and_sequential() {
        let mut gen = IdGenerator::new("Counter.tsx");
        let first = gen.next();
        let second = gen.next();
        assert!(first.as_str().ends_with("-0000"));
        assert!(second.as_str().ends_with("-0001"));
        assert_eq!(
            &first.as_str()[..8],
            &second.as_str()[..8]
        );
    }
}
