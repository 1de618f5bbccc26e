//! Lowers parsed [`crate::component::ComponentSource`] values into a
//! [`uic_ir::Ir`] (§4.1 lowering contract).

use std::collections::HashSet;

use indexmap::IndexMap;
use uic_ir::{
    recognize_platform_map, Diagnostic, Diagnostics, EventBinding, HelperBinding, Ir, IrMetadata,
    LifecycleBinding, LifecyclePhase, Node, NodeId, NodeKind, PlatformCodeBlock,
    PlatformImplementation, PlatformSchema, PlatformTag, PropValue, RefBinding, SemanticType,
    SourceLanguage, SourceSpan, StateDefinition, StateRef, StateScope, StateVariable,
};

use crate::component::{parse_components, PlatformConditional};
use crate::error::{JsxFrontendError, Result};
use crate::id::IdGenerator;
use crate::jsx::{parse_jsx, JsxAttrValue, JsxChild, JsxElement};

/// Lower a single JSX/TS source unit into an [`Ir`] plus any diagnostics
/// raised along the way. `generated_at` should be an RFC 3339 timestamp
/// supplied by the caller (this crate never reads the clock itself).
pub fn lower_source(source: &str, path: &str, generated_at: &str) -> Result<(Ir, Diagnostics)> {
    let (components, mut diagnostics) = parse_components(source, path);
    if components.is_empty() {
        return Err(JsxFrontendError::NoComponentFound {
            path: path.to_string(),
        });
    }

    let mut ir = Ir::new(
        semver::Version::new(1, 0, 0),
        IrMetadata::new(SourceLanguage::JsxTs, path, generated_at),
    );
    let mut ids = IdGenerator::new(path);

    for decl in crate::component::extract_type_declarations(source) {
        ir.metadata.type_definitions.insert(decl.name, decl.text);
    }

    let mut state_vars = Vec::new();
    let mut context_vars = Vec::new();
    let mut platform_blocks = Vec::new();

    for component in &components {
        let known_state: HashSet<String> = component
            .state_hooks
            .iter()
            .map(|hook| hook.value_name.clone())
            .collect();

        for hook in &component.state_hooks {
            let initial = literal_prop_value(&hook.initial_expr);
            state_vars.push(StateVariable {
                name: hook.value_name.clone(),
                ty: SemanticType::infer_from(&initial),
                initial,
                mutable: true,
            });
        }

        let ref_bindings: Vec<RefBinding> = component
            .ref_hooks
            .iter()
            .map(|hook| RefBinding {
                name: hook.binding.clone(),
                initial: hook.initial_expr.clone(),
            })
            .collect();

        for hook in &component.context_hooks {
            context_vars.push(StateVariable {
                name: hook.binding.clone(),
                ty: SemanticType::Unknown,
                initial: PropValue::Str(hook.context_name.clone()),
                mutable: false,
            });
        }

        let helper_bindings: Vec<HelperBinding> = component
            .memo_hooks
            .iter()
            .map(|hook| HelperBinding {
                name: hook.binding.clone(),
                kind: if hook.kind == "useMemo" {
                    "memo".to_string()
                } else {
                    "callback".to_string()
                },
                deps: hook.deps.clone(),
                body: hook.body.clone(),
            })
            .collect();

        let lifecycle_bindings: Vec<LifecycleBinding> = component
            .effect_hooks
            .iter()
            .map(|hook| {
                let deps = hook.deps.clone().unwrap_or_default();
                let phase = if matches!(&hook.deps, Some(d) if d.is_empty()) {
                    LifecyclePhase::Mount
                } else if effect_body_returns_cleanup(&hook.body) {
                    LifecyclePhase::Unmount
                } else {
                    LifecyclePhase::Update
                };
                LifecycleBinding {
                    phase,
                    handler: hook.body.clone(),
                    deps,
                }
            })
            .collect();

        for (index, conditional) in component.platform_conditionals.iter().enumerate() {
            platform_blocks.push(lower_platform_conditional(
                conditional,
                &format!("{}-platform-{index}", component.name),
                &mut diagnostics,
                path,
            ));
        }

        match parse_jsx(&component.jsx, path) {
            Ok(root) => {
                let root_id =
                    lower_element(&root, path, &mut ir, &mut ids, &known_state, &mut diagnostics);
                if let Some(root_node) = ir.nodes.get_mut(&root_id) {
                    root_node.metadata.extra.insert(
                        "componentName".to_string(),
                        serde_json::Value::String(component.name.clone()),
                    );
                    root_node.metadata.refs = ref_bindings;
                    root_node.metadata.helpers = helper_bindings;
                    root_node.lifecycle = lifecycle_bindings;
                }
                ir.roots.push(root_id);
            }
            Err(err) => {
                let placeholder = Node::unknown(ids.next(), err.to_string());
                let id = ir.insert_node(placeholder);
                ir.roots.push(id);
                diagnostics.push(Diagnostic::error(format!(
                    "{path}: could not parse JSX for component `{}`: {err}",
                    component.name
                )));
            }
        }
    }

    if !state_vars.is_empty() {
        ir.state.push(StateDefinition {
            scope: StateScope::Local,
            variables: state_vars,
        });
    }
    if !context_vars.is_empty() {
        ir.state.push(StateDefinition {
            scope: StateScope::Global,
            variables: context_vars,
        });
    }
    if !platform_blocks.is_empty() {
        ir.platform = Some(PlatformSchema {
            blocks: platform_blocks,
        });
    }

    let required = uic_ir::invariants::required_minimum_version(&ir);
    if required > ir.schema_version {
        ir.schema_version = required;
    }

    uic_ir::invariants::validate(&ir).map_err(|source| JsxFrontendError::Invariant {
        path: path.to_string(),
        source,
    })?;

    Ok((ir, diagnostics))
}

fn is_event_attr(name: &str) -> bool {
    name.len() > 2 && name.starts_with("on") && name.as_bytes()[2].is_ascii_uppercase()
}

fn event_name_from_attr(name: &str) -> String {
    let rest = &name[2..];
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn lower_element(
    element: &JsxElement,
    path: &str,
    ir: &mut Ir,
    ids: &mut IdGenerator,
    known_state: &HashSet<String>,
    diagnostics: &mut Diagnostics,
) -> NodeId {
    let id = ids.next();
    let kind = if element.tag.is_empty() {
        NodeKind::View
    } else {
        NodeKind::from_tag(&element.tag)
    };
    let mut node = Node::new(id.clone(), kind);
    node.metadata.span = Some(SourceSpan {
        path: path.to_string(),
        line: element.line,
        column: element.column,
    });

    for attr in &element.attrs {
        if is_event_attr(&attr.name) {
            let handler = match &attr.value {
                JsxAttrValue::Expression(expr) => expr.clone(),
                JsxAttrValue::StringLiteral(s) => s.clone(),
                JsxAttrValue::BoolTrue => String::new(),
            };
            let event_name = event_name_from_attr(&attr.name);
            let (params, is_async) = inspect_handler_signature(&handler);
            node = node.with_event(EventBinding {
                name: event_name,
                handler,
                params,
                is_async,
            });
            continue;
        }
        let value = match &attr.value {
            JsxAttrValue::StringLiteral(s) => PropValue::Str(s.clone()),
            JsxAttrValue::BoolTrue => PropValue::Bool(true),
            JsxAttrValue::Expression(expr) => classify_prop_expression(expr, known_state),
        };
        node = node.with_prop(attr.name.clone(), value);
    }

    for child in &element.children {
        match child {
            JsxChild::Element(child_element) => {
                let child_id =
                    lower_element(child_element, path, ir, ids, known_state, diagnostics);
                node = node.with_child(child_id);
            }
            JsxChild::Text(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                let text_id = ids.next();
                let text_node = Node::new(text_id.clone(), NodeKind::Text)
                    .with_prop("text", PropValue::Str(text.trim().to_string()));
                ir.insert_node(text_node);
                node = node.with_child(text_id);
            }
            JsxChild::Expression(expr) => {
                let text_id = ids.next();
                let value = classify_prop_expression(expr, known_state);
                let text_node =
                    Node::new(text_id.clone(), NodeKind::Text).with_prop("text", value);
                ir.insert_node(text_node);
                node = node.with_child(text_id);
            }
        }
    }

    ir.insert_node(node);
    id
}

fn lower_platform_conditional(
    conditional: &PlatformConditional,
    id: &str,
    diagnostics: &mut Diagnostics,
    path: &str,
) -> PlatformCodeBlock {
    let mut implementations = Vec::new();
    let mut warnings = Vec::new();
    for branch in &conditional.branches {
        let tags: Vec<PlatformTag> = branch
            .tags
            .iter()
            .filter_map(|tag| PlatformTag::parse(tag))
            .collect();
        if tags.len() != branch.tags.len() {
            let message = format!(
                "{path}: platform conditional {id} has an unrecognized platform tag in {:?}",
                branch.tags
            );
            warnings.push(message.clone());
            diagnostics.push(Diagnostic::warning(message));
        }
        implementations.push(PlatformImplementation {
            platforms: tags,
            code: branch.body.clone(),
            language: SourceLanguage::JsxTs,
        });
    }
    if conditional.fallback.is_none() {
        let message = format!("{path}: platform conditional {id} has no fallback/else branch");
        warnings.push(message.clone());
        diagnostics.push(Diagnostic::warning(message));
    }
    PlatformCodeBlock {
        id: id.to_string(),
        implementations,
        fallback: conditional.fallback.clone(),
        warnings,
    }
}

/// Interpret a literal JS expression (number, string, boolean, null) as a
/// [`PropValue`]; anything else is preserved verbatim as an opaque string.
fn literal_prop_value(expr: &str) -> PropValue {
    let trimmed = expr.trim();
    match trimmed {
        "true" => return PropValue::Bool(true),
        "false" => return PropValue::Bool(false),
        "null" | "undefined" => return PropValue::Null,
        _ => {}
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return PropValue::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return PropValue::Decimal(f);
    }
    if is_quoted(trimmed) {
        return PropValue::Str(trimmed[1..trimmed.len() - 1].to_string());
    }
    PropValue::Str(trimmed.to_string())
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"'))
            || (s.starts_with('\'') && s.ends_with('\'')))
}

/// Classify a brace-unwrapped attribute/child expression: a bare identifier
/// naming an in-scope state variable becomes a `StateRef`; an object literal
/// that structurally qualifies becomes a `PlatformMap` or plain `Map`;
/// everything else falls back to a literal or opaque string (§4.1 "JSX
/// element").
fn classify_prop_expression(expr: &str, known_state: &HashSet<String>) -> PropValue {
    let trimmed = expr.trim();
    if known_state.contains(trimmed) {
        return PropValue::StateRef(StateRef(trimmed.to_string()));
    }
    if let Some(object) = try_parse_object_literal(trimmed) {
        if let Some(platform_map) = recognize_platform_map(&object) {
            return PropValue::PlatformMap(platform_map);
        }
        return PropValue::Map(object);
    }
    literal_prop_value(trimmed)
}

/// Parse a `{ key: value, key2: value2 }` JS object literal into an ordered
/// map of literal prop values. Returns `None` for anything that doesn't fit
/// this shape (nested call expressions, spreads, computed keys, ...).
fn try_parse_object_literal(expr: &str) -> Option<IndexMap<String, PropValue>> {
    let inner = expr.strip_prefix('{')?.strip_suffix('}')?;
    let mut map = IndexMap::new();
    for entry in split_top_level(inner, ',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let colon = find_top_level_colon(entry)?;
        let key = entry[..colon]
            .trim()
            .trim_matches(|c| c == '\'' || c == '"')
            .to_string();
        let value_expr = entry[colon + 1..].trim();
        map.insert(key, literal_prop_value(value_expr));
    }
    Some(map)
}

/// Split `s` on `sep`, ignoring separators nested inside brackets/braces/
/// parens or string literals.
fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    let mut in_quote: Option<char> = None;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if let Some(quote) = in_quote {
            current.push(c);
            if c == '\\' {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            } else if c == quote {
                in_quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => {
                in_quote = Some(c);
                current.push(c);
            }
            '{' | '[' | '(' => {
                depth += 1;
                current.push(c);
            }
            '}' | ']' | ')' => {
                depth -= 1;
                current.push(c);
            }
            c if c == sep && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}

/// Find the byte offset of the first top-level `:` in `s`, if any.
fn find_top_level_colon(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_quote: Option<char> = None;
    let mut offset = 0usize;
    for c in s.chars() {
        if let Some(quote) = in_quote {
            if c == quote {
                in_quote = None;
            }
            offset += c.len_utf8();
            continue;
        }
        match c {
            '\'' | '"' | '`' => in_quote = Some(c),
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            ':' if depth == 0 => return Some(offset),
            _ => {}
        }
        offset += c.len_utf8();
    }
    None
}

/// Whether an effect body's closing statements include a `return` of a
/// function value, the shallow signal for a `useEffect` cleanup/unmount
/// handler (§4.1 hook-2).
fn effect_body_returns_cleanup(body: &str) -> bool {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"return\s*(\(\s*\)\s*=>|function\b)").expect("static regex"))
        .is_match(body)
}

/// Shallow pattern inspection of a handler expression's parameter list
/// (§4.1 "Event attributes"): returns the flattened parameter names
/// (identifier lists and destructured objects/arrays are both flattened to
/// their bound names) and whether the handler is declared `async`.
fn inspect_handler_signature(handler: &str) -> (Vec<String>, bool) {
    let trimmed = handler.trim();
    let mut rest = trimmed;
    let mut is_async = starts_with_keyword(rest, "async");
    if is_async {
        rest = rest["async".len()..].trim_start();
    }
    if let Some(after) = strip_keyword(rest, "function") {
        rest = after.trim_start();
        let name_len = rest.chars().take_while(|c| c.is_alphanumeric() || *c == '_').count();
        rest = rest[name_len..].trim_start();
    }

    let (params_text, after_params) = if rest.starts_with('(') {
        match capture_parens_with_rest(rest) {
            Some((inner, tail)) => (inner, tail),
            None => (String::new(), rest),
        }
    } else {
        let ident_len = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .count();
        (rest[..ident_len].to_string(), &rest[ident_len..])
    };

    if !is_async && starts_with_keyword(after_params.trim_start(), "async") {
        is_async = true;
    }

    let params = split_top_level(&params_text, ',')
        .into_iter()
        .flat_map(|segment| flatten_param_segment(&segment))
        .collect();
    (params, is_async)
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    s.strip_prefix(keyword)
        .map(|rest| rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace()))
        .unwrap_or(false)
}

fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    if starts_with_keyword(s, keyword) {
        Some(&s[keyword.len()..])
    } else {
        None
    }
}

/// Capture the contents of a `(...)` group starting at `s[0]`, tracking
/// nested parens; returns the inner text and whatever follows the closing
/// paren.
fn capture_parens_with_rest(s: &str) -> Option<(String, &str)> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'(') {
        return None;
    }
    let mut depth = 0i32;
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((s[1..i].to_string(), &s[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Flatten one top-level parameter segment into the bound names it
/// introduces: a plain identifier yields itself; `{a, b}`/`[a, b]`
/// destructuring yields each entry's bound name.
fn flatten_param_segment(segment: &str) -> Vec<String> {
    let segment = segment.trim();
    if segment.is_empty() {
        return vec![];
    }
    if let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        return split_top_level(inner, ',')
            .into_iter()
            .filter_map(|entry| bare_identifier(&entry))
            .collect();
    }
    if let Some(inner) = segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return split_top_level(inner, ',')
            .into_iter()
            .filter_map(|entry| bare_identifier(&entry))
            .collect();
    }
    bare_identifier(segment).into_iter().collect()
}

/// Reduce a parameter/destructure-entry fragment to its bound identifier,
/// dropping a type annotation (`: Type`), default value (`= expr`), or rest
/// marker (`...`).
fn bare_identifier(text: &str) -> Option<String> {
    let text = text.trim();
    let before_colon = text.split(':').next().unwrap_or(text).trim();
    let before_eq = before_colon.split('=').next().unwrap_or(before_colon).trim();
    let ident = before_eq.trim_start_matches("...");
    if !ident.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        return None;
    }
    Some(
        ident
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect(),
    )
}
