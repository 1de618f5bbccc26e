//! Builder registry (§5 "Builder registry"): the renderer-side table
//! mapping a widget kind to the function that constructs it. It is built
//! once at startup and never mutated again, so dispatch needs no
//! synchronization at all.

use std::collections::HashMap;

/// Accumulates builder registrations before freezing them into a
/// [`BuilderRegistry`].
pub struct BuilderRegistryBuilder<T> {
    builders: HashMap<String, T>,
}

impl<T> BuilderRegistryBuilder<T> {
    /// An empty builder.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Register a builder for `widget_kind`, overwriting any prior
    /// registration for the same kind.
    #[must_use]
    pub fn register(mut self, widget_kind: impl Into<String>, builder: T) -> Self {
        self.builders.insert(widget_kind.into(), builder);
        self
    }

    /// Freeze the accumulated registrations into a read-only registry.
    pub fn build(self) -> BuilderRegistry<T> {
        BuilderRegistry {
            builders: self.builders,
        }
    }
}

impl<T> Default for BuilderRegistryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A read-only table from widget kind to its builder, frozen after
/// registration.
pub struct BuilderRegistry<T> {
    builders: HashMap<String, T>,
}

impl<T> BuilderRegistry<T> {
    /// Look up the builder registered for `widget_kind`.
    pub fn get(&self, widget_kind: &str) -> Option<&T> {
        self.builders.get(widget_kind)
    }

    /// Whether a builder is registered for `widget_kind`.
    pub fn contains(&self, widget_kind: &str) -> bool {
        self.builders.contains_key(widget_kind)
    }

    /// Number of registered builders.
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Whether no builders are registered.
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_builders_are_retrievable() {
        let registry = BuilderRegistryBuilder::new()
            .register("Text", 1u32)
            .register("View", 2u32)
            .build();

        assert_eq!(registry.get("Text"), Some(&1));
        assert_eq!(registry.get("View"), Some(&2));
        assert_eq!(registry.get("Missing"), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn later_registration_overwrites_earlier() {
        let registry = BuilderRegistryBuilder::new()
            .register("Text", 1u32)
            .register("Text", 2u32)
            .build();

        assert_eq!(registry.get("Text"), Some(&2));
        assert_eq!(registry.len(), 1);
    }
}
