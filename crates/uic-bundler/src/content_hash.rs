//! Content-addressed hashing for bundle entries (§4.4, §6).
//!
//! Every schema and asset in a bundle is identified by the SHA-256 hash of
//! its canonical bytes, recorded in the manifest and in `checksums.txt`
//! (§6 "Bundle file format").

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{BundlerError, Result};

/// A SHA-256 content hash, displayed and serialized as `sha256:<hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash `data` with SHA-256.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Parse a hash from its `sha256:<hex>` (or bare hex) representation.
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex_str = s.strip_prefix("sha256:").unwrap_or(s);
        if hex_str.len() != 64 {
            return Err(BundlerError::ChecksumMismatch(format!(
                "expected 64 hex characters, got {}",
                hex_str.len()
            )));
        }
        let bytes = hex::decode(hex_str)
            .map_err(|e| BundlerError::ChecksumMismatch(format!("invalid hex: {e}")))?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| BundlerError::ChecksumMismatch(format!("hash must be 32 bytes, got {}", v.len())))?;
        Ok(Self(array))
    }

    /// Hex-encoded hash, without the `sha256:` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Whether `data` hashes to this value.
    pub fn verify(&self, data: &[u8]) -> bool {
        Self::from_bytes(data) == *self
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.to_string()
    }
}

impl TryFrom<String> for ContentHash {
    type Error = BundlerError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_deterministic_and_self_verifying() {
        let a = ContentHash::from_bytes(b"hello world");
        let b = ContentHash::from_bytes(b"hello world");
        assert_eq!(a, b);
        assert!(a.verify(b"hello world"));
        assert!(!a.verify(b"goodbye world"));
    }

    #[test]
    fn round_trips_through_display_and_from_hex() {
        let hash = ContentHash::from_bytes(b"payload");
        let text = hash.to_string();
        assert!(text.starts_with("sha256:"));
        let parsed = ContentHash::from_hex(&text).unwrap();
        assert_eq!(parsed, hash);
    }
}
