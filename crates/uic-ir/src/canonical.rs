//! Canonical serialization and equality (§3.2 invariant 7, §6).
//!
//! Canonical form is UTF-8 JSON with mapping keys sorted lexicographically
//! and no insignificant whitespace. Because this crate's map-valued fields
//! are plain `IndexMap`s (insertion-ordered) but `serde_json::Value`'s
//! object representation is a `BTreeMap` (sorted) when the `preserve_order`
//! feature is not enabled, round-tripping any IR value through
//! `serde_json::Value` is sufficient to produce the canonical key order;
//! set members (e.g. a node's `animations`) are already `BTreeSet`s and
//! sort themselves, and array/children order is preserved as-is.

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::ir::Ir;

/// Serialize `ir` to its canonical JSON string.
pub fn canonical_string(ir: &Ir) -> Result<String> {
    let value = serde_json::to_value(ir)?;
    Ok(serde_json::to_string(&value)?)
}

/// SHA-256 hash (hex-encoded) of `ir`'s canonical serialization, used for
/// bundle manifests and checksums (§4.4, §6).
pub fn canonical_hash(ir: &Ir) -> Result<String> {
    let canonical = canonical_string(ir)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Produce a copy of `ir` with the metadata fields that round-trip fidelity
/// (§4.2 invariant 1, §8) is defined modulo: per-node source spans, their
/// opaque-preservation warnings, and the document's generation timestamp.
/// Type-annotation surface that cannot be expressed in the other dialect is
/// intentionally *not* stripped here — callers comparing across dialects
/// should additionally ignore `metadata.type_definitions` themselves, since
/// which entries are inexpressible depends on the target dialect.
pub fn normalize_for_equality(ir: &Ir) -> Ir {
    let mut normalized = ir.clone();
    normalized.metadata.generated_at = String::new();
    for node in normalized.nodes.values_mut() {
        node.metadata.span = None;
        node.metadata.warnings.clear();
    }
    normalized
}

/// Canonical-serialization equality modulo source-span metadata (§8 "Core-subset round-trip").
pub fn equals_modulo_spans(a: &Ir, b: &Ir) -> Result<bool> {
    let a = canonical_string(&normalize_for_equality(a))?;
    let b = canonical_string(&normalize_for_equality(b))?;
    Ok(a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SourceSpan;
    use crate::ir::IrMetadata;
    use crate::node::{Node, NodeKind};
    use crate::platform::SourceLanguage;

    fn ir_with_span(span: Option<SourceSpan>) -> Ir {
        let mut ir = Ir::new(
            semver::Version::new(1, 0, 0),
            IrMetadata::new(SourceLanguage::JsxTs, "a.tsx", "2026-01-01T00:00:00Z"),
        );
        let mut node = Node::new("n1", NodeKind::Text);
        node.metadata.span = span;
        ir.insert_node(node.clone());
        ir.roots.push(node.id);
        ir
    }

    #[test]
    fn canonical_hash_is_deterministic() {
        let ir = ir_with_span(None);
        assert_eq!(canonical_hash(&ir).unwrap(), canonical_hash(&ir).unwrap());
    }

    #[test]
    fn equality_ignores_span_but_not_content() {
        let a = ir_with_span(Some(SourceSpan {
            path: "a.tsx".into(),
            line: 1,
            column: 1,
        }));
        let b = ir_with_span(Some(SourceSpan {
            path: "a.tsx".into(),
            line: 99,
            column: 5,
        }));
        assert!(equals_modulo_spans(&a, &b).unwrap());

        let mut c = ir_with_span(None);
        c.roots.clear();
        c.nodes.clear();
        assert!(!equals_modulo_spans(&a, &c).unwrap());
    }
}
