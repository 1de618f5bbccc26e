//! Ed25519 signing and verification for bundle manifests.
//!
//! Every distributed bundle may carry one or more signatures over its
//! manifest checksum, the same Ed25519 scheme the teacher's package
//! registry uses to sign published packages.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::{BundlerError, Result};
use crate::manifest::Manifest;

/// A public key for manifest signature verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKey {
    /// Key id: hex-encoded first 8 bytes of the public key.
    pub key_id: String,
    /// The full public key bytes.
    #[serde(with = "hex_bytes")]
    pub bytes: [u8; 32],
    /// Human-readable owner of this key.
    pub owner: String,
}

impl PublicKey {
    /// Build a `PublicKey` from raw bytes.
    pub fn from_bytes(bytes: [u8; 32], owner: String) -> Self {
        let key_id = hex::encode(&bytes[..8]);
        Self { key_id, bytes, owner }
    }

    fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_bytes(&self.bytes)
            .map_err(|e| BundlerError::InvalidSignature(e.to_string()))
    }
}

/// A key pair used to sign bundle manifests.
pub struct KeyPair {
    signing_key: SigningKey,
    /// The public half of this pair.
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a fresh random key pair for `owner`.
    pub fn generate(owner: String) -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let public_key = PublicKey::from_bytes(signing_key.verifying_key().to_bytes(), owner);
        Self { signing_key, public_key }
    }

    /// Sign a manifest's checksum, binding the signature to this exact
    /// bundle content.
    pub fn sign_manifest(&self, manifest: &Manifest) -> ManifestSignature {
        let signed_content = signed_content(manifest);
        let signature = self.signing_key.sign(&signed_content);
        ManifestSignature {
            key_id: self.public_key.key_id.clone(),
            signature: signature.to_bytes().to_vec(),
        }
    }
}

/// A signature over a bundle manifest's checksum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSignature {
    /// Id of the key that produced this signature.
    pub key_id: String,
    /// The raw signature bytes.
    #[serde(with = "hex_vec")]
    pub signature: Vec<u8>,
}

impl ManifestSignature {
    /// Verify this signature against `manifest` using `public_key`.
    pub fn verify(&self, manifest: &Manifest, public_key: &PublicKey) -> Result<bool> {
        if self.key_id != public_key.key_id {
            return Ok(false);
        }
        let verifying_key = public_key.verifying_key()?;
        let sig_bytes: [u8; 64] = self.signature.clone().try_into().map_err(|v: Vec<u8>| {
            BundlerError::InvalidSignature(format!("signature must be 64 bytes, got {}", v.len()))
        })?;
        let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);
        let signed_content = signed_content(manifest);
        Ok(verifying_key.verify(&signed_content, &signature).is_ok())
    }
}

/// The canonical bytes a manifest signature covers: the entry path and the
/// overall manifest checksum, so a signature can never be replayed onto a
/// differently-named bundle that happens to share content.
fn signed_content(manifest: &Manifest) -> Vec<u8> {
    format!("uic-bundle:{}:{}", manifest.entry, manifest.checksum).into_bytes()
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        hex::encode(bytes.as_ref()).serialize(serializer)
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        let actual_len = bytes.len();
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom(format!("wrong byte length: expected {N}, got {actual_len}")))
    }
}

mod hex_vec {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        hex::encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_hash::ContentHash;

    fn sample_manifest() -> Manifest {
        Manifest {
            version: semver::Version::new(1, 0, 0),
            entry: "main".to_string(),
            schemas: vec![],
            assets: vec![],
            dependencies: vec![],
            checksum: ContentHash::from_bytes(b"bundle-content"),
        }
    }

    #[test]
    fn a_signature_verifies_against_the_signing_keys_owner() {
        let keypair = KeyPair::generate("ci".to_string());
        let manifest = sample_manifest();
        let signature = keypair.sign_manifest(&manifest);
        assert!(signature.verify(&manifest, &keypair.public_key).unwrap());
    }

    #[test]
    fn a_signature_does_not_verify_against_a_different_manifest() {
        let keypair = KeyPair::generate("ci".to_string());
        let manifest = sample_manifest();
        let signature = keypair.sign_manifest(&manifest);

        let mut other = sample_manifest();
        other.entry = "other".to_string();
        assert!(!signature.verify(&other, &keypair.public_key).unwrap());
    }

    #[test]
    fn a_signature_does_not_verify_against_a_different_key() {
        let keypair = KeyPair::generate("ci".to_string());
        let impostor = KeyPair::generate("impostor".to_string());
        let manifest = sample_manifest();
        let signature = keypair.sign_manifest(&manifest);
        assert!(!signature.verify(&manifest, &impostor.public_key).unwrap());
    }
}
