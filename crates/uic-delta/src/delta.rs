//! `SchemaDelta` computation and application (§4.5 "Delta computation").

use std::fmt;

use serde::{Deserialize, Serialize};
use uic_ir::{Ir, Node, NodeId, PropValue};

use crate::error::Result;

/// Maps with fewer entries than this are compared key-by-key with an
/// early exit on the first mismatch; larger maps/lists fall back to
/// canonical-serialization equality, which is cheaper than a per-key walk
/// once a substructure gets large (§4.5 "Structural equality").
const SMALL_MAP_THRESHOLD: usize = 10;

/// The result of diffing two IR node tables (§4.5).
///
/// Scoped to the Node tree only: `state`/`navigation`/`animations`/`network`/
/// `platform` side-tables are not diffed here and a full update carries them
/// whenever they change (§4.5 "Transport").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDelta {
    /// Nodes present in the new IR but absent from the old one.
    pub added: Vec<Node>,
    /// Nodes present in both, but structurally unequal.
    pub modified: Vec<Node>,
    /// Ids present in the old IR but absent from the new one.
    pub removed: Vec<NodeId>,
}

impl SchemaDelta {
    /// Total number of changed entries, used against the delta-vs-full
    /// threshold (§4.5).
    pub fn change_count(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }

    /// Whether this delta carries no changes at all (§8 boundary behavior:
    /// "Empty IR delta has added=removed=modified=[]").
    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }
}

impl fmt::Display for SchemaDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SchemaDelta {{ added: {}, modified: {}, removed: {} }}",
            self.added.len(),
            self.modified.len(),
            self.removed.len()
        )
    }
}

fn prop_values_equal(a: &PropValue, b: &PropValue) -> Result<bool> {
    match (a, b) {
        (PropValue::Map(ma), PropValue::Map(mb))
            if ma.len() < SMALL_MAP_THRESHOLD && mb.len() < SMALL_MAP_THRESHOLD =>
        {
            if ma.len() != mb.len() {
                return Ok(false);
            }
            for (key, value) in ma {
                let Some(other) = mb.get(key) else {
                    return Ok(false);
                };
                if !prop_values_equal(value, other)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (PropValue::List(la), PropValue::List(lb))
            if la.len() < SMALL_MAP_THRESHOLD && lb.len() < SMALL_MAP_THRESHOLD =>
        {
            if la.len() != lb.len() {
                return Ok(false);
            }
            for (x, y) in la.iter().zip(lb.iter()) {
                if !prop_values_equal(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (PropValue::Map(_) | PropValue::List(_), PropValue::Map(_) | PropValue::List(_)) => {
            Ok(serde_json::to_string(a)? == serde_json::to_string(b)?)
        }
        _ => Ok(a == b),
    }
}

/// Whether `old` and `new` (assumed to share an id) are structurally equal
/// per the quick-checks-then-shallow-comparison algorithm of §4.5.
fn nodes_structurally_equal(old: &Node, new: &Node) -> Result<bool> {
    if old.kind != new.kind {
        return Ok(false);
    }
    if old.children != new.children {
        return Ok(false);
    }
    if old.events != new.events || old.animations != new.animations {
        return Ok(false);
    }
    if old.lifecycle != new.lifecycle {
        return Ok(false);
    }
    if old.props.len() != new.props.len() {
        return Ok(false);
    }
    for (key, old_value) in &old.props {
        let Some(new_value) = new.props.get(key) else {
            return Ok(false);
        };
        if !prop_values_equal(old_value, new_value)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Diff `old` against `new`, following the three-step algorithm of §4.5.
#[tracing::instrument(skip(old, new))]
pub fn diff_ir(old: &Ir, new: &Ir) -> Result<SchemaDelta> {
    let mut added = Vec::new();
    let mut modified = Vec::new();

    for (id, new_node) in &new.nodes {
        match old.nodes.get(id) {
            None => added.push(new_node.clone()),
            Some(old_node) => {
                if !nodes_structurally_equal(old_node, new_node)? {
                    modified.push(new_node.clone());
                }
            }
        }
    }

    let removed: Vec<NodeId> = old
        .nodes
        .keys()
        .filter(|id| !new.nodes.contains_key(*id))
        .cloned()
        .collect();

    Ok(SchemaDelta {
        added,
        modified,
        removed,
    })
}

/// The configured threshold below which a delta is preferred over a full
/// update (§4.5 "A delta is preferred ... when below a configured threshold").
pub const DEFAULT_DELTA_THRESHOLD: usize = 32;

/// Whether `delta` should be sent as an incremental update rather than a
/// full IR, per the configured `threshold`.
pub fn prefer_delta(delta: &SchemaDelta, threshold: usize) -> bool {
    delta.change_count() < threshold
}

/// Apply `delta` to `base`, producing the node table `diff_ir(base, _)` was
/// computed against. Only the node arena and `roots` are reconciled; other
/// IR-level tables are assumed unchanged, matching §4.5's definition of
/// `SchemaDelta` as scoped to the Node tree.
pub fn apply_delta(base: &Ir, delta: &SchemaDelta) -> Ir {
    let mut result = base.clone();
    for id in &delta.removed {
        result.nodes.shift_remove(id);
    }
    for node in delta.added.iter().chain(delta.modified.iter()) {
        result.nodes.insert(node.id.clone(), node.clone());
    }
    let live_ids: std::collections::HashSet<NodeId> = result.nodes.keys().cloned().collect();
    result.roots.retain(|id| live_ids.contains(id));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_ir::{IrMetadata, NodeKind, SourceLanguage};

    fn ir_with_nodes(pairs: &[(&str, NodeKind)]) -> Ir {
        let mut ir = Ir::new(
            semver::Version::new(1, 0, 0),
            IrMetadata::new(SourceLanguage::JsxTs, "x.tsx", "2026-01-01T00:00:00Z"),
        );
        for (id, kind) in pairs {
            let node = Node::new(*id, kind.clone());
            ir.insert_node(node);
            ir.roots.push(NodeId::new(*id));
        }
        ir
    }

    #[test]
    fn empty_ir_delta_has_no_changes() {
        let ir = ir_with_nodes(&[]);
        let delta = diff_ir(&ir, &ir).unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn detects_added_modified_and_removed() {
        let old = ir_with_nodes(&[("a", NodeKind::View), ("b", NodeKind::Text)]);
        let mut new = ir_with_nodes(&[("a", NodeKind::View), ("c", NodeKind::Image)]);
        new.nodes
            .get_mut(&NodeId::new("a"))
            .unwrap()
            .props
            .insert("changed".to_string(), PropValue::Bool(true));

        let delta = diff_ir(&old, &new).unwrap();
        assert_eq!(delta.added.len(), 1);
        assert_eq!(delta.added[0].id.as_str(), "c");
        assert_eq!(delta.modified.len(), 1);
        assert_eq!(delta.modified[0].id.as_str(), "a");
        assert_eq!(delta.removed, vec![NodeId::new("b")]);
    }

    #[test]
    fn unchanged_node_is_neither_added_nor_modified() {
        let old = ir_with_nodes(&[("a", NodeKind::View)]);
        let new = ir_with_nodes(&[("a", NodeKind::View)]);
        let delta = diff_ir(&old, &new).unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn small_map_prop_change_is_detected() {
        let mut old = ir_with_nodes(&[("a", NodeKind::View)]);
        let mut new = old.clone();
        let mut map = indexmap::IndexMap::new();
        map.insert("x".to_string(), PropValue::Int(1));
        old.nodes.get_mut(&NodeId::new("a")).unwrap().props.insert("m".into(), PropValue::Map(map.clone()));
        map.insert("x".to_string(), PropValue::Int(2));
        new.nodes.get_mut(&NodeId::new("a")).unwrap().props.insert("m".into(), PropValue::Map(map));

        let delta = diff_ir(&old, &new).unwrap();
        assert_eq!(delta.modified.len(), 1);
    }

    #[test]
    fn large_map_prop_change_is_detected_via_canonical_fallback() {
        let mut old = ir_with_nodes(&[("a", NodeKind::View)]);
        let mut new = old.clone();
        let mut old_map = indexmap::IndexMap::new();
        let mut new_map = indexmap::IndexMap::new();
        for i in 0..15 {
            old_map.insert(format!("k{i}"), PropValue::Int(i));
            new_map.insert(format!("k{i}"), PropValue::Int(i));
        }
        new_map.insert("k0".to_string(), PropValue::Int(999));
        old.nodes.get_mut(&NodeId::new("a")).unwrap().props.insert("m".into(), PropValue::Map(old_map));
        new.nodes.get_mut(&NodeId::new("a")).unwrap().props.insert("m".into(), PropValue::Map(new_map));

        let delta = diff_ir(&old, &new).unwrap();
        assert_eq!(delta.modified.len(), 1);
    }

    #[test]
    fn delta_below_threshold_is_preferred() {
        let old = ir_with_nodes(&[("a", NodeKind::View)]);
        let new = ir_with_nodes(&[("a", NodeKind::View), ("b", NodeKind::Text)]);
        let delta = diff_ir(&old, &new).unwrap();
        assert!(prefer_delta(&delta, DEFAULT_DELTA_THRESHOLD));
    }

    #[test]
    fn delta_soundness_round_trip() {
        let old = ir_with_nodes(&[("a", NodeKind::View), ("b", NodeKind::Text)]);
        let mut new = ir_with_nodes(&[("a", NodeKind::View), ("c", NodeKind::Image)]);
        new.nodes
            .get_mut(&NodeId::new("a"))
            .unwrap()
            .props
            .insert("changed".to_string(), PropValue::Bool(true));

        let delta = diff_ir(&old, &new).unwrap();
        let applied = apply_delta(&old, &delta);
        assert!(uic_ir::canonical::equals_modulo_spans(&applied, &new).unwrap());
    }

    proptest::proptest! {
        /// §8 "applying the computed delta to the old IR reproduces the new IR".
        #[test]
        fn diff_then_apply_reproduces_the_new_ir(
            old in uic_test_utils::arb_small_ir(),
            new in uic_test_utils::arb_small_ir(),
        ) {
            let delta = diff_ir(&old, &new).expect("arbitrary small IRs diff cleanly");
            let applied = apply_delta(&old, &delta);
            proptest::prop_assert!(uic_ir::canonical::equals_modulo_spans(&applied, &new).unwrap());
        }
    }
}
