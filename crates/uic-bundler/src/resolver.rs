//! Pluggable IR/asset sourcing for the collect pass (§4.4 step 1).
//!
//! The bundler itself has no opinion on where IRs and assets live; a
//! [`BundleSource`] is the seam a caller plugs a filesystem, a package
//! registry, or (in tests) an in-memory fixture into.

use indexmap::IndexMap;
use uic_ir::Ir;

use crate::error::Result;

/// Resolves canonical paths to IR documents and raw asset bytes.
pub trait BundleSource {
    /// Load and lower the IR at `path`.
    fn load_ir(&self, path: &str) -> Result<Ir>;

    /// Load the raw bytes of the asset at `path`.
    fn load_asset(&self, path: &str) -> Result<Vec<u8>>;

    /// Resolve a custom widget/component name to the canonical path of the
    /// IR that declares it, if known. Used to follow component-reference
    /// props and navigation component references during collection.
    fn component_path(&self, component_name: &str) -> Option<String>;
}

/// An in-memory [`BundleSource`] fixture, keyed by canonical path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    irs: IndexMap<String, Ir>,
    assets: IndexMap<String, Vec<u8>>,
    components: IndexMap<String, String>,
}

impl MemorySource {
    /// Build an empty in-memory source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an IR at `path`, additionally indexing it under the widget
    /// names it declares in `metadata.custom_widgets`.
    #[must_use]
    pub fn with_ir(mut self, path: impl Into<String>, ir: Ir) -> Self {
        let path = path.into();
        for name in ir.metadata.custom_widgets.keys() {
            self.components.insert(name.clone(), path.clone());
        }
        self.irs.insert(path, ir);
        self
    }

    /// Register an asset's raw bytes at `path`.
    #[must_use]
    pub fn with_asset(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.assets.insert(path.into(), bytes.into());
        self
    }

    /// Explicitly map a component name to the path that declares it,
    /// overriding the automatic `custom_widgets` indexing.
    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.components.insert(name.into(), path.into());
        self
    }
}

impl BundleSource for MemorySource {
    fn load_ir(&self, path: &str) -> Result<Ir> {
        self.irs
            .get(path)
            .cloned()
            .ok_or_else(|| crate::error::BundlerError::MissingEntry(path.to_string()))
    }

    fn load_asset(&self, path: &str) -> Result<Vec<u8>> {
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| crate::error::BundlerError::MissingAsset(path.to_string()))
    }

    fn component_path(&self, component_name: &str) -> Option<String> {
        self.components.get(component_name).cloned()
    }
}
