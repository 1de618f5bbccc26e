//! Small, hand-built IR fixtures shared across the workspace's test suites
//! (§1.4 "fixture builders").

use uic_ir::{Ir, IrMetadata, Node, NodeKind, PropValue, SourceLanguage};

/// An empty IR for `path`, lowered (nominally) from `dialect`, with no
/// nodes or roots. Useful as a base to build up fixtures incrementally.
pub fn empty_ir(dialect: SourceLanguage, path: &str) -> Ir {
    Ir::new(
        semver::Version::new(1, 0, 0),
        IrMetadata::new(dialect, path, "2026-01-01T00:00:00Z"),
    )
}

/// The smallest non-trivial fixture: a `View` root with one `Text` child
/// carrying a `content` prop.
pub fn simple_view_with_text(dialect: SourceLanguage, path: &str) -> Ir {
    let mut ir = empty_ir(dialect, path);

    let mut text = Node::new("text-1", NodeKind::Text);
    text.props
        .insert("content".to_string(), PropValue::Str("hello".to_string()));
    let text_id = ir.insert_node(text);

    let mut root = Node::new("root", NodeKind::View);
    root.children.push(text_id);
    let root_id = ir.insert_node(root);
    ir.roots.push(root_id);

    ir
}

/// A `View` root with `child_count` flat `Text` children, named
/// `text-0`..`text-{n-1}`.
pub fn view_with_n_text_children(dialect: SourceLanguage, path: &str, child_count: usize) -> Ir {
    let mut ir = empty_ir(dialect, path);

    let mut root = Node::new("root", NodeKind::View);
    for i in 0..child_count {
        let child_id = ir.insert_node(Node::new(format!("text-{i}"), NodeKind::Text));
        root.children.push(child_id);
    }
    let root_id = ir.insert_node(root);
    ir.roots.push(root_id);

    ir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_fixture_has_one_root_and_one_child() {
        let ir = simple_view_with_text(SourceLanguage::JsxTs, "x.tsx");
        assert_eq!(ir.roots.len(), 1);
        assert_eq!(ir.len(), 2);
    }

    #[test]
    fn n_children_fixture_matches_requested_count() {
        let ir = view_with_n_text_children(SourceLanguage::Dart, "x.dart", 3);
        assert_eq!(ir.len(), 4);
    }
}
