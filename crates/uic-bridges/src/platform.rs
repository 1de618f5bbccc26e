//! Platform-conditional bridge (§4.3 "Platform").
//!
//! A `PlatformCodeBlock` emits, in each dialect, an `if/else if/else`
//! dispatch keyed on that dialect's platform oracle: string-compare in
//! JSX (`Platform.OS === "ios"`), boolean predicates in Dart
//! (`Platform.isIOS`). A missing fallback is not an error here — it
//! degrades to a no-op branch with a warning, matching the bridge's
//! role as the last point before code generation.

use uic_ir::{PlatformCodeBlock, PlatformTag, SourceLanguage};

/// One branch of a rendered platform dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchBranch {
    /// The guard condition text in the target dialect's idiom, e.g.
    /// `Platform.OS === "ios"` or `Platform.isIOS`.
    pub condition: String,
    /// Verbatim branch body, preserved from the IR.
    pub code: String,
}

/// A fully-resolved platform dispatch, ready for a back-end to render as
/// an `if/else if/else` chain.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDispatch {
    /// Non-fallback branches, in declaration order.
    pub branches: Vec<DispatchBranch>,
    /// The `else` body. Always present: a missing fallback is synthesized
    /// as a no-op with a warning comment (§4.3).
    pub fallback_code: String,
    /// Set when the fallback was synthesized rather than carried from the
    /// IR, so the back-end can render the warning comment.
    pub fallback_synthesized: bool,
}

fn condition_for(tags: &[PlatformTag], dialect: SourceLanguage) -> String {
    let parts: Vec<String> = tags
        .iter()
        .map(|tag| match dialect {
            SourceLanguage::JsxTs => format!("Platform.OS === \"{}\"", tag.jsx_os_literal()),
            SourceLanguage::Dart => tag.dart_predicate().to_string(),
        })
        .collect();
    parts.join(" || ")
}

/// Resolve `block` into a dispatch ready to render for `dialect`.
pub fn resolve_dispatch(block: &PlatformCodeBlock, dialect: SourceLanguage) -> PlatformDispatch {
    let branches = block
        .implementations
        .iter()
        .map(|implementation| DispatchBranch {
            condition: condition_for(&implementation.platforms, dialect),
            code: implementation.code.clone(),
        })
        .collect();

    let (fallback_code, fallback_synthesized) = match &block.fallback {
        Some(code) => (code.clone(), false),
        None => ("/* no-op: platform conditional has no fallback branch */".to_string(), true),
    };

    PlatformDispatch {
        branches,
        fallback_code,
        fallback_synthesized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_ir::PlatformImplementation;

    fn block(fallback: Option<&str>) -> PlatformCodeBlock {
        PlatformCodeBlock {
            id: "p1".into(),
            implementations: vec![PlatformImplementation {
                platforms: vec![PlatformTag::Ios],
                code: "pickIos();".into(),
                language: SourceLanguage::JsxTs,
            }],
            fallback: fallback.map(str::to_string),
            warnings: vec![],
        }
    }

    #[test]
    fn jsx_dispatch_uses_string_comparison() {
        let dispatch = resolve_dispatch(&block(Some("pickOther();")), SourceLanguage::JsxTs);
        assert_eq!(dispatch.branches[0].condition, "Platform.OS === \"ios\"");
        assert!(!dispatch.fallback_synthesized);
    }

    #[test]
    fn dart_dispatch_uses_boolean_predicate() {
        let dispatch = resolve_dispatch(&block(Some("pickOther();")), SourceLanguage::Dart);
        assert_eq!(dispatch.branches[0].condition, "Platform.isIOS");
    }

    #[test]
    fn missing_fallback_synthesizes_a_noop_branch() {
        let dispatch = resolve_dispatch(&block(None), SourceLanguage::Dart);
        assert!(dispatch.fallback_synthesized);
        assert!(dispatch.fallback_code.contains("no-op"));
    }
}
