//! Bundle manifest and file-format types (§4.4 step 5, §6 "Bundle file format").

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::content_hash::ContentHash;

/// One `schemas/<path>.ir` entry in a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Canonical path of the IR this entry describes.
    pub path: String,
    /// `[start, end)` byte offsets of this schema's body within the bundle.
    pub byte_range: (usize, usize),
    /// SHA-256 checksum over the canonical (pre-compression) serialization.
    pub checksum: ContentHash,
    /// Body length before compression, recorded per §4.4 step 4.
    pub uncompressed_len: usize,
}

/// One `assets/<path>` entry in a [`Manifest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Canonical path of the asset.
    pub path: String,
    /// Size in bytes.
    pub size: usize,
    /// SHA-256 checksum of the raw asset bytes.
    pub checksum: ContentHash,
}

/// The bundle manifest (§4.4 step 5, §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Schema version of the bundle format itself.
    pub version: semver::Version,
    /// Canonical path of the entry IR.
    pub entry: String,
    /// Every schema carried by the bundle, entry first.
    pub schemas: Vec<SchemaEntry>,
    /// Every asset carried by the bundle.
    pub assets: Vec<AssetEntry>,
    /// Canonical paths of every IR the entry (transitively) depends on.
    pub dependencies: Vec<String>,
    /// SHA-256 over the concatenation of every schema and asset checksum,
    /// in manifest order — the bundle's overall checksum.
    pub checksum: ContentHash,
}

/// A fully assembled bundle: the manifest plus the bytes it describes.
#[derive(Debug, Clone)]
pub struct Bundle {
    /// The manifest.
    pub manifest: Manifest,
    /// `schemas/<path>.ir` bodies, keyed by path. Compressed if the bundle
    /// config enabled compression.
    pub schema_bodies: IndexMap<String, Vec<u8>>,
    /// `assets/<path>` bodies, keyed by path.
    pub asset_bodies: IndexMap<String, Vec<u8>>,
}

impl Bundle {
    /// Render the `checksums.txt` file: one `<algorithm>:<hex>  <path>` line
    /// per schema and asset entry, in manifest order (§6).
    pub fn checksums_txt(&self) -> String {
        let mut out = String::new();
        for schema in &self.manifest.schemas {
            out.push_str(&format!("sha256:{}  schemas/{}.ir\n", schema.checksum.to_hex(), schema.path));
        }
        for asset in &self.manifest.assets {
            out.push_str(&format!("sha256:{}  assets/{}\n", asset.checksum.to_hex(), asset.path));
        }
        out
    }
}
