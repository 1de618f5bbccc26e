//! Content-addressed cache keys (§5 "AST cache").

use std::fmt;

use sha2::{Digest, Sha256};

/// A hex-encoded SHA-256 digest of a source file's bytes, used as the AST
/// cache key so that two front-end instances parsing identical source share
/// one cached parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash `source` to produce a cache key.
    pub fn of(source: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// The hex digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_source_hashes_identically() {
        assert_eq!(ContentHash::of("const x = 1;"), ContentHash::of("const x = 1;"));
    }

    #[test]
    fn different_source_hashes_differently() {
        assert_ne!(ContentHash::of("a"), ContentHash::of("b"));
    }
}
