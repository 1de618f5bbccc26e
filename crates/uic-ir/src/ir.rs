//! The root [`Ir`] document (§3.1) and its flat node arena.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationSchema;
use crate::navigation::NavigationSchema;
use crate::network::NetworkSchema;
use crate::node::{Node, NodeId};
use crate::platform::{PlatformSchema, SourceLanguage};
use crate::state::StateDefinition;

/// A flat arena of nodes, indexed by id (design note "Arena + indices").
///
/// Insertion order is preserved, which is convenient for deterministic
/// traversal, but canonical serialization (§3.2 invariant 7) re-sorts by id
/// regardless of this order.
pub type NodeTable = IndexMap<NodeId, Node>;

/// The parameter surface of a custom (non-core) widget, recorded so a
/// back-end can regenerate a matching definition (§4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomWidgetDescriptor {
    /// Widget/component name.
    pub name: String,
    /// Declared parameter names, in order.
    pub params: Vec<String>,
    /// Parameter names that are required (no default).
    pub required_params: Vec<String>,
}

/// Document-level metadata (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrMetadata {
    /// Which surface dialect this IR was lowered from.
    pub source_dialect: SourceLanguage,
    /// Path of the source unit this IR was lowered from.
    pub source_path: String,
    /// When this IR was generated (RFC 3339).
    pub generated_at: String,
    /// Custom widget/component descriptors referenced anywhere in this IR.
    pub custom_widgets: IndexMap<String, CustomWidgetDescriptor>,
    /// Free-form type annotation text keyed by declared name (§4.1 `typeDefinitions`).
    pub type_definitions: IndexMap<String, String>,
}

impl IrMetadata {
    /// Build metadata with the required fields; optional tables start empty.
    pub fn new(
        source_dialect: SourceLanguage,
        source_path: impl Into<String>,
        generated_at: impl Into<String>,
    ) -> Self {
        Self {
            source_dialect,
            source_path: source_path.into(),
            generated_at: generated_at.into(),
            custom_widgets: IndexMap::new(),
            type_definitions: IndexMap::new(),
        }
    }
}

/// The root IR document (§3.1).
///
/// Immutable once produced (§3.3): every mutating helper here returns a new
/// value rather than mutating in place, except during incremental
/// construction by a front-end, which owns its own `Ir` until it returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ir {
    /// Schema version, semantic triple (invariant 8).
    pub schema_version: semver::Version,
    /// Document metadata.
    pub metadata: IrMetadata,
    /// Flat node arena.
    pub nodes: NodeTable,
    /// Ordered top-level node ids.
    pub roots: Vec<NodeId>,
    /// State side-tables, one per distinct scope in use (§3.1, §4.1 hook-3:
    /// a component's local `useState` variables and any `useContext`
    /// references it consumes are recorded as separate entries here, the
    /// latter with `scope = global`).
    pub state: Vec<StateDefinition>,
    /// Optional navigation side-table.
    pub navigation: Option<NavigationSchema>,
    /// Animation side-table entries.
    pub animations: Vec<AnimationSchema>,
    /// Optional network side-table.
    pub network: Option<NetworkSchema>,
    /// Optional platform side-table.
    pub platform: Option<PlatformSchema>,
}

impl Ir {
    /// Build an empty IR with the given schema version and metadata.
    pub fn new(schema_version: semver::Version, metadata: IrMetadata) -> Self {
        Self {
            schema_version,
            metadata,
            nodes: NodeTable::new(),
            roots: Vec::new(),
            state: Vec::new(),
            navigation: None,
            animations: Vec::new(),
            network: None,
            platform: None,
        }
    }

    /// Insert a node into the arena, returning its id.
    ///
    /// Does not itself enforce uniqueness; call
    /// [`crate::invariants::validate`] after construction to check all
    /// invariants at once.
    pub fn insert_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Depth-first pre-order iterator starting from `self.roots`.
    ///
    /// Stops descending into (but still yields) a node whose id has already
    /// been visited, so that a malformed cyclic graph cannot loop forever;
    /// callers that need to *detect* a cycle as an error should use
    /// [`crate::invariants::validate`] instead.
    pub fn dfs(&self) -> impl Iterator<Item = &Node> {
        let mut stack: Vec<&NodeId> = self.roots.iter().rev().collect();
        let mut visited = std::collections::HashSet::new();
        std::iter::from_fn(move || loop {
            let id = stack.pop()?;
            if !visited.insert(id.clone()) {
                continue;
            }
            let node = match self.nodes.get(id) {
                Some(node) => node,
                None => continue,
            };
            for child in node.children.iter().rev() {
                stack.push(child);
            }
            return Some(node);
        })
    }

    /// Total node count in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn sample_ir() -> Ir {
        let mut ir = Ir::new(
            semver::Version::new(1, 0, 0),
            IrMetadata::new(SourceLanguage::JsxTs, "Counter.tsx", "2026-01-01T00:00:00Z"),
        );
        let child = Node::new("text-1", NodeKind::Text);
        let root = Node::new("view-1", NodeKind::View).with_child(child.id.clone());
        ir.insert_node(child);
        ir.insert_node(root.clone());
        ir.roots.push(root.id);
        ir
    }

    #[test]
    fn dfs_visits_root_then_children() {
        let ir = sample_ir();
        let ids: Vec<String> = ir.dfs().map(|n| n.id.to_string()).collect();
        assert_eq!(ids, vec!["view-1".to_string(), "text-1".to_string()]);
    }

    #[test]
    fn dfs_does_not_infinite_loop_on_cycle() {
        let mut ir = Ir::new(
            semver::Version::new(1, 0, 0),
            IrMetadata::new(SourceLanguage::JsxTs, "Cyclic.tsx", "2026-01-01T00:00:00Z"),
        );
        let a = Node::new("a", NodeKind::View).with_child("b");
        let b = Node::new("b", NodeKind::View).with_child("a");
        ir.insert_node(a.clone());
        ir.insert_node(b);
        ir.roots.push(a.id);
        let visited: Vec<_> = ir.dfs().collect();
        assert_eq!(visited.len(), 2);
    }
}
