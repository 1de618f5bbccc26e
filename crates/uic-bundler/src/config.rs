//! Bundle configuration (§4.4 "Inputs").

/// Inputs to one bundling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Canonical path of the entry IR.
    pub entry: String,
    /// Destination path for the assembled bundle archive.
    pub output: String,
    /// Strip non-rendering metadata and rewrite node ids densely.
    pub minify: bool,
    /// Apply stream compression to the serialized bundle body.
    pub compress: bool,
    /// Drop IR subtrees/animations/platform blocks unreachable from the entry.
    pub tree_shake: bool,
    /// Emit source-map entries alongside minified output (not yet implemented
    /// downstream of the manifest; recorded so callers can gate on support).
    pub source_maps: bool,
}

impl BundleConfig {
    /// A config with every optional pass enabled, for `entry`/`output`.
    pub fn new(entry: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            output: output.into(),
            minify: true,
            compress: true,
            tree_shake: true,
            source_maps: false,
        }
    }
}
