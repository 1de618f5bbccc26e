//! `proptest` strategies for generating small, structurally valid IR
//! documents (§1.4, §8 round-trip/determinism properties).

use proptest::prelude::*;
use uic_ir::{Ir, IrMetadata, Node, NodeKind, SourceLanguage};

/// A `View` root with 0-6 flat children, each either `Text` or `Button`,
/// small enough to keep property tests fast while still exercising
/// add/modify/remove across a run.
pub fn arb_small_ir() -> impl Strategy<Value = Ir> {
    prop::collection::vec(prop::bool::ANY, 0..=6).prop_map(|child_is_button| {
        let mut ir = Ir::new(
            semver::Version::new(1, 0, 0),
            IrMetadata::new(SourceLanguage::JsxTs, "fixture.tsx", "2026-01-01T00:00:00Z"),
        );

        let mut root = Node::new("root", NodeKind::View);
        for (i, is_button) in child_is_button.into_iter().enumerate() {
            let kind = if is_button { NodeKind::Button } else { NodeKind::Text };
            let child_id = ir.insert_node(Node::new(format!("child-{i}"), kind));
            root.children.push(child_id);
        }
        let root_id = ir.insert_node(root);
        ir.roots.push(root_id);

        ir
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_ir_roots_reference_real_nodes(ir in arb_small_ir()) {
            for root in &ir.roots {
                prop_assert!(ir.node(root).is_some());
            }
        }
    }
}
