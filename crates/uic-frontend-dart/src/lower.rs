//! Lowers parsed [`crate::class::WidgetClass`] values into a [`uic_ir::Ir`]
//! (§4.2 lowering contract).

use std::collections::HashSet;

use uic_ir::{
    Diagnostic, Diagnostics, EventBinding, Ir, IrMetadata, Node, NodeId, NodeKind,
    PlatformCodeBlock, PlatformImplementation, PlatformSchema, PlatformTag, PropValue,
    SemanticType, SourceLanguage, StateDefinition, StateRef, StateScope, StateVariable,
};

use crate::class::{parse_widget_classes, PlatformConditional, WidgetClass};
use crate::dart::{parse_widget_expr, DartArg, DartCall, DartExpr};
use crate::error::{DartFrontendError, Result};
use crate::id::IdGenerator;

/// Lower a single Dart source unit into an [`Ir`] plus any diagnostics
/// raised along the way. `generated_at` should be an RFC 3339 timestamp
/// supplied by the caller.
pub fn lower_source(source: &str, path: &str, generated_at: &str) -> Result<(Ir, Diagnostics)> {
    let (classes, mut diagnostics) = parse_widget_classes(source, path);
    if classes.is_empty() {
        return Err(DartFrontendError::NoWidgetFound {
            path: path.to_string(),
        });
    }

    let mut ir = Ir::new(
        semver::Version::new(1, 0, 0),
        IrMetadata::new(SourceLanguage::Dart, path, generated_at),
    );
    let mut ids = IdGenerator::new(path);

    let mut state_vars = Vec::new();
    let mut platform_blocks = Vec::new();

    for class in &classes {
        let known_state: HashSet<String> = class
            .state_fields
            .iter()
            .map(|f| f.name.clone())
            .collect();

        for field in &class.state_fields {
            let mut ty = field
                .initial_expr
                .as_deref()
                .map(literal_prop_value)
                .map(|v| SemanticType::infer_from(&v))
                .unwrap_or(SemanticType::Unknown);
            if field.nullable {
                ty = ty.nullable();
            }
            state_vars.push(StateVariable {
                name: field.name.clone(),
                ty,
                initial: field
                    .initial_expr
                    .as_deref()
                    .map(literal_prop_value)
                    .unwrap_or(PropValue::Null),
                mutable: field.mutable,
            });
        }

        for (index, conditional) in class.platform_conditionals.iter().enumerate() {
            platform_blocks.push(lower_platform_conditional(
                conditional,
                &format!("{}-platform-{index}", class.name),
                &mut diagnostics,
                path,
            ));
        }

        match parse_widget_expr(&class.build_expr, path) {
            Ok(call) => {
                let root_id = lower_call(&call, path, &mut ir, &mut ids, &known_state);
                if let Some(root_node) = ir.nodes.get_mut(&root_id) {
                    root_node.metadata.extra.insert(
                        "componentName".to_string(),
                        serde_json::Value::String(class.name.clone()),
                    );
                }
                ir.roots.push(root_id);
            }
            Err(err) => {
                let placeholder = Node::unknown(ids.next(), err.to_string());
                let id = ir.insert_node(placeholder);
                ir.roots.push(id);
                diagnostics.push(Diagnostic::error(format!(
                    "{path}: could not parse build() expression for widget `{}`: {err}",
                    class.name
                )));
            }
        }

        record_params(class, &mut ir);
    }

    if !state_vars.is_empty() {
        ir.state.push(StateDefinition {
            scope: StateScope::Local,
            variables: state_vars,
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

    uic_ir::invariants::validate(&ir).map_err(|source| DartFrontendError::Invariant {
        path: path.to_string(),
        source,
    })?;

    Ok((ir, diagnostics))
}

fn record_params(class: &WidgetClass, ir: &mut Ir) {
    if class.params.is_empty() {
        return;
    }
    let required_params: Vec<String> = class
        .params
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.clone())
        .collect();
    let params: Vec<String> = class.params.iter().map(|p| p.name.clone()).collect();
    ir.metadata.custom_widgets.insert(
        class.name.clone(),
        uic_ir::CustomWidgetDescriptor {
            name: class.name.clone(),
            params,
            required_params,
        },
    );
}

fn is_event_arg(name: &str) -> bool {
    name.len() > 2 && name.starts_with("on") && name.as_bytes()[2].is_ascii_uppercase()
}

fn event_name_from_arg(name: &str) -> String {
    let rest = &name[2..];
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn arg_text(arg: &DartArg) -> String {
    match &arg.value {
        DartExpr::StringLiteral(s) => s.clone(),
        DartExpr::Opaque(s) => s.clone(),
        DartExpr::Call(call) => call.name.clone(),
        DartExpr::ListLiteral(_) => String::new(),
    }
}

fn lower_call(
    call: &DartCall,
    path: &str,
    ir: &mut Ir,
    ids: &mut IdGenerator,
    known_state: &HashSet<String>,
) -> NodeId {
    let id = ids.next();
    let kind = NodeKind::from_tag(&call.name);
    let mut node = Node::new(id.clone(), kind);

    for arg in &call.args {
        let Some(name) = &arg.name else {
            // A positional argument; preserve opaquely rather than guess its role.
            node = node.with_prop("_positional", PropValue::Str(arg_text(arg)));
            continue;
        };

        if name == "children" {
            if let DartExpr::ListLiteral(items) = &arg.value {
                for item in items {
                    if let DartExpr::Call(child_call) = item {
                        let child_id = lower_call(child_call, path, ir, ids, known_state);
                        node = node.with_child(child_id);
                    }
                }
            }
            continue;
        }

        if let DartExpr::Call(child_call) = &arg.value {
            if name == "child" {
                let child_id = lower_call(child_call, path, ir, ids, known_state);
                node = node.with_child(child_id);
                continue;
            }
        }

        if is_event_arg(name) {
            let handler = arg_text(arg);
            let (params, is_async) = inspect_handler_signature(&handler);
            node = node.with_event(EventBinding {
                name: event_name_from_arg(name),
                handler,
                params,
                is_async,
            });
            continue;
        }

        let value = classify_arg_value(&arg.value, known_state);
        node = node.with_prop(name.clone(), value);
    }

    ir.insert_node(node);
    id
}

fn classify_arg_value(expr: &DartExpr, known_state: &HashSet<String>) -> PropValue {
    match expr {
        DartExpr::StringLiteral(s) => PropValue::Str(s.clone()),
        DartExpr::Opaque(text) => {
            if known_state.contains(text.as_str()) {
                return PropValue::StateRef(StateRef(text.clone()));
            }
            literal_prop_value(text)
        }
        DartExpr::Call(call) => PropValue::Str(call.name.clone()),
        DartExpr::ListLiteral(items) => PropValue::List(
            items
                .iter()
                .map(|item| classify_arg_value(item, known_state))
                .collect(),
        ),
    }
}

fn literal_prop_value(expr: &str) -> PropValue {
    let trimmed = expr.trim();
    match trimmed {
        "true" => return PropValue::Bool(true),
        "false" => return PropValue::Bool(false),
        "null" => return PropValue::Null,
        _ => {}
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return PropValue::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return PropValue::Decimal(f);
    }
    PropValue::Str(trimmed.to_string())
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
        implementations.push(PlatformImplementation {
            platforms: tags,
            code: branch.body.clone(),
            language: SourceLanguage::Dart,
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

/// Shallow pattern inspection of a handler expression's parameter list
/// (§4.1 "Event attributes"): returns the flattened parameter names
/// (identifier lists and destructured maps are both flattened to their
/// bound names) and whether the handler is declared `async`.
fn inspect_handler_signature(handler: &str) -> (Vec<String>, bool) {
    let trimmed = handler.trim();
    let (params_text, after_params) = if trimmed.starts_with('(') {
        match capture_parens_with_rest(trimmed) {
            Some((inner, tail)) => (inner, tail),
            None => (String::new(), trimmed),
        }
    } else {
        let ident_len = trimmed
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .count();
        (trimmed[..ident_len].to_string(), &trimmed[ident_len..])
    };
    let is_async = starts_with_keyword(after_params.trim_start(), "async");
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
            '\'' | '"' => {
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

/// Flatten one top-level parameter segment into the bound names it
/// introduces: a plain identifier yields itself; `{a, b}` destructuring
/// yields each entry's bound name.
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
    bare_identifier(segment).into_iter().collect()
}

/// Reduce a parameter/destructure-entry fragment to its bound identifier,
/// dropping a type annotation (leading type name before the bound name),
/// default value (`= expr`), or `required`/`this.` prefix.
fn bare_identifier(text: &str) -> Option<String> {
    let text = text.trim();
    let before_eq = text.split('=').next().unwrap_or(text).trim();
    let ident = before_eq
        .rsplit(|c: char| c.is_whitespace() || c == '.')
        .next()
        .unwrap_or(before_eq);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowers_stateful_counter() {
        let src = r#"
class Counter extends StatefulWidget {
  const Counter({Key? key}) : super(key: key);
  @override
  _CounterState createState() => _CounterState();
}

class _CounterState extends State<Counter> {
  int c = 0;

  @override
  Widget build(BuildContext context) {
    return View(children: [Text(text: c), Button(title: "+", onPressed: () { setState(() { c = c + 1; }); })]);
  }
}
"#;
        let (ir, diagnostics) = lower_source(src, "counter.dart", "2026-01-01T00:00:00Z").unwrap();
        assert!(!diagnostics.has_errors());
        let state = ir.state.first().expect("state table");
        assert_eq!(state.variables[0].name, "c");
        assert_eq!(state.variables[0].initial, PropValue::Int(0));

        let root = ir.node(&ir.roots[0]).unwrap();
        assert_eq!(root.kind, NodeKind::View);
        assert_eq!(root.children.len(), 2);
        let text = ir.node(&root.children[0]).unwrap();
        assert_eq!(
            text.props.get("text"),
            Some(&PropValue::StateRef(StateRef("c".to_string())))
        );
        let button = ir.node(&root.children[1]).unwrap();
        assert!(button.events.contains_key("pressed"));
    }

    #[test]
    fn lowers_platform_conditional_chain() {
        let src = r#"
class Picker extends StatelessWidget {
  const Picker({Key? key}) : super(key: key);
  @override
  Widget build(BuildContext context) {
    if (Platform.isIOS) { A(); } else if (Platform.isAndroid) { B(); } else { C(); }
    return View();
  }
}
"#;
        let (ir, _diagnostics) = lower_source(src, "picker.dart", "2026-01-01T00:00:00Z").unwrap();
        let schema = ir.platform.as_ref().expect("platform schema");
        assert_eq!(schema.blocks[0].implementations.len(), 2);
        assert_eq!(
            schema.blocks[0].implementations[0].platforms,
            vec![PlatformTag::Ios]
        );
        assert_eq!(schema.blocks[0].fallback.as_deref(), Some("C();"));
    }

    #[test]
    fn event_handler_params_are_extracted_by_shallow_pattern_inspection() {
        let src = r#"
class Field extends StatelessWidget {
  const Field({Key? key}) : super(key: key);
  @override
  Widget build(BuildContext context) {
    return TextInput(onChanged: (value) { setV(value); });
  }
}
"#;
        let (ir, _diagnostics) = lower_source(src, "field.dart", "2026-01-01T00:00:00Z").unwrap();
        let root = ir.node(&ir.roots[0]).unwrap();
        assert_eq!(root.events["changed"].params, vec!["value".to_string()]);
        assert!(!root.events["changed"].is_async);
    }

    #[test]
    fn async_event_handler_is_recognized() {
        let src = r#"
class Field extends StatelessWidget {
  const Field({Key? key}) : super(key: key);
  @override
  Widget build(BuildContext context) {
    return Button(onPressed: () async { await submit(); });
  }
}
"#;
        let (ir, _diagnostics) = lower_source(src, "field.dart", "2026-01-01T00:00:00Z").unwrap();
        let root = ir.node(&ir.roots[0]).unwrap();
        assert!(root.events["pressed"].params.is_empty());
        assert!(root.events["pressed"].is_async);
    }
}
