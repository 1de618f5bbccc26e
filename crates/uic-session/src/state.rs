//! Node-local state preservation across updates (§4.5 "State preservation
//! across update"): state persists for ids that survive an update, is
//! discarded for removed ids, and is freshly initialized for added ids.

use std::collections::HashMap;

use uic_delta::SchemaDelta;
use uic_ir::{Ir, NodeId};

/// Opaque, renderer-owned state attached to one Node id.
///
/// The session layer never interprets this payload; it only decides which
/// ids keep, lose, or gain an entry as updates are applied.
pub type NodeState = serde_json::Value;

/// Per-session table of node-local renderer state, keyed by Node id.
#[derive(Debug, Default)]
pub struct RendererState {
    by_id: HashMap<NodeId, NodeState>,
}

impl RendererState {
    /// An empty state table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The state currently held for `id`, if any.
    pub fn get(&self, id: &NodeId) -> Option<&NodeState> {
        self.by_id.get(id)
    }

    /// Replace the full state table with one freshly initialized from every
    /// Node in `ir`, as happens on a full (non-incremental) update.
    pub fn reset_from_full_ir(&mut self, ir: &Ir) {
        self.by_id = ir
            .nodes
            .keys()
            .map(|id| (id.clone(), NodeState::Null))
            .collect();
    }

    /// Apply a [`SchemaDelta`]: drop state for every removed id, initialize
    /// state for every added id, and leave modified/untouched ids alone.
    pub fn apply_delta(&mut self, delta: &SchemaDelta) {
        for id in &delta.removed {
            self.by_id.remove(id);
        }
        for node in &delta.added {
            self.by_id.entry(node.id.clone()).or_insert(NodeState::Null);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_ir::{IrMetadata, Node, NodeKind, SourceLanguage};

    #[test]
    fn removed_ids_discard_state() {
        let mut state = RendererState::new();
        state.by_id.insert(NodeId::new("a"), NodeState::Bool(true));
        state.apply_delta(&SchemaDelta {
            added: vec![],
            modified: vec![],
            removed: vec![NodeId::new("a")],
        });
        assert!(state.get(&NodeId::new("a")).is_none());
    }

    #[test]
    fn added_ids_initialize_fresh_state() {
        let mut state = RendererState::new();
        state.apply_delta(&SchemaDelta {
            added: vec![Node::new("b", NodeKind::View)],
            modified: vec![],
            removed: vec![],
        });
        assert_eq!(state.get(&NodeId::new("b")), Some(&NodeState::Null));
    }

    #[test]
    fn modified_nodes_keep_existing_state() {
        let mut state = RendererState::new();
        state.by_id.insert(NodeId::new("a"), NodeState::Bool(true));
        state.apply_delta(&SchemaDelta {
            added: vec![],
            modified: vec![Node::new("a", NodeKind::View)],
            removed: vec![],
        });
        assert_eq!(state.get(&NodeId::new("a")), Some(&NodeState::Bool(true)));
    }

    #[test]
    fn full_ir_reset_initializes_every_node() {
        let mut ir = Ir::new(
            semver::Version::new(1, 0, 0),
            IrMetadata::new(SourceLanguage::JsxTs, "x.tsx", "2026-01-01T00:00:00Z"),
        );
        ir.insert_node(Node::new("a", NodeKind::View));
        let mut state = RendererState::new();
        state.reset_from_full_ir(&ir);
        assert!(state.get(&NodeId::new("a")).is_some());
    }
}
