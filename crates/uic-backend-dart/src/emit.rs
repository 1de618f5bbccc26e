//! Renders an [`Ir`] document as Dart/Flutter source (§4.2 "Back-ends").

use std::fmt::Write as _;

use indexmap::IndexMap;
use uic_bridges::platform::resolve_dispatch;
use uic_ir::{
    CustomWidgetDescriptor, Ir, Node, NodeId, NodeKind, PlatformCodeBlock, PropValue, SemanticType,
    SourceLanguage, StateScope,
};

use crate::error::{DartBackendError, Result};
use crate::options::EmitOptions;

/// Emit `ir` as a complete Dart source unit.
pub fn emit_source(ir: &Ir, options: &EmitOptions) -> Result<String> {
    let mut out = String::new();

    emit_imports(ir, options, &mut out);

    for decl in ir.metadata.type_definitions.values() {
        out.push_str(decl);
        out.push('\n');
    }
    if !ir.metadata.type_definitions.is_empty() {
        out.push('\n');
    }

    let platform_by_component = group_platform_blocks(ir);

    for root_id in &ir.roots {
        let node = ir
            .node(root_id)
            .ok_or_else(|| DartBackendError::MissingRootNode(root_id.to_string()))?;
        let name = component_name(node, root_id);
        let platform_blocks = platform_by_component.get(&name).map(Vec::as_slice).unwrap_or(&[]);
        let params = ir.metadata.custom_widgets.get(&name);
        if ir.state.iter().any(|s| s.scope == StateScope::Local) {
            emit_stateful_widget(ir, node, &name, params, platform_blocks, options, &mut out)?;
        } else {
            emit_stateless_widget(ir, node, &name, params, platform_blocks, options, &mut out)?;
        }
        out.push('\n');
    }

    Ok(out)
}

fn emit_imports(ir: &Ir, options: &EmitOptions, out: &mut String) {
    let mut lines = vec!["import 'package:flutter/material.dart';".to_string()];
    if !options.dedupe_imports {
        lines.push("import 'package:flutter/widgets.dart';".to_string());
    }
    if ir.platform.is_some() {
        lines.push("import 'dart:io' show Platform;".to_string());
    }
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
}

fn component_name(root: &Node, root_id: &NodeId) -> String {
    root.metadata
        .extra
        .get("componentName")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Component_{}", root_id.as_str()))
}

/// Platform blocks are keyed `"{componentName}-platform-{index}"` by both
/// front-ends; group them back by component so each can be re-inserted into
/// its originating `build()` method.
fn group_platform_blocks(ir: &Ir) -> IndexMap<String, Vec<&PlatformCodeBlock>> {
    let mut grouped: IndexMap<String, Vec<&PlatformCodeBlock>> = IndexMap::new();
    let Some(schema) = &ir.platform else {
        return grouped;
    };
    for block in &schema.blocks {
        if let Some(idx) = block.id.rfind("-platform-") {
            grouped.entry(block.id[..idx].to_string()).or_default().push(block);
        }
    }
    grouped
}

fn emit_constructor(name: &str, params: Option<&CustomWidgetDescriptor>, options: &EmitOptions, out: &mut String) {
    let const_kw = if options.const_qualify { "const " } else { "" };
    match params {
        Some(desc) if !desc.params.is_empty() => {
            let parts: Vec<String> = desc
                .params
                .iter()
                .map(|p| {
                    if desc.required_params.contains(p) {
                        format!("required this.{p}")
                    } else {
                        format!("this.{p}")
                    }
                })
                .collect();
            let _ = writeln!(
                out,
                "  {const_kw}{name}({{Key? key, {}}}) : super(key: key);",
                parts.join(", ")
            );
            for p in &desc.params {
                let _ = writeln!(out, "  final dynamic {p};");
            }
        }
        _ => {
            let _ = writeln!(out, "  {const_kw}{name}({{Key? key}}) : super(key: key);");
        }
    }
}

fn emit_stateless_widget(
    ir: &Ir,
    root: &Node,
    name: &str,
    params: Option<&CustomWidgetDescriptor>,
    platform_blocks: &[&PlatformCodeBlock],
    options: &EmitOptions,
    out: &mut String,
) -> Result<()> {
    let _ = writeln!(out, "class {name} extends StatelessWidget {{");
    emit_constructor(name, params, options, out);
    out.push_str("  @override\n");
    out.push_str("  Widget build(BuildContext context) {\n");
    for block in platform_blocks {
        emit_platform_dispatch(block, options, out);
    }
    out.push_str("    return ");
    emit_widget_expr(ir, root, 2, options, out)?;
    out.push_str(";\n");
    out.push_str("  }\n");
    out.push_str("}\n");
    Ok(())
}

fn emit_stateful_widget(
    ir: &Ir,
    root: &Node,
    name: &str,
    params: Option<&CustomWidgetDescriptor>,
    platform_blocks: &[&PlatformCodeBlock],
    options: &EmitOptions,
    out: &mut String,
) -> Result<()> {
    let _ = writeln!(out, "class {name} extends StatefulWidget {{");
    emit_constructor(name, params, options, out);
    out.push_str("  @override\n");
    let _ = writeln!(out, "  _{name}State createState() => _{name}State();");
    out.push_str("}\n\n");

    let _ = writeln!(out, "class _{name}State extends State<{name}> {{");
    for state in ir.state.iter().filter(|s| s.scope == StateScope::Local) {
        for var in &state.variables {
            let ty = dart_type_for(&var.ty);
            let _ = writeln!(out, "  {ty} {} = {};", var.name, render_expr(&var.initial));
        }
    }
    out.push_str("  @override\n");
    out.push_str("  Widget build(BuildContext context) {\n");
    for block in platform_blocks {
        emit_platform_dispatch(block, options, out);
    }
    out.push_str("    return ");
    emit_widget_expr(ir, root, 2, options, out)?;
    out.push_str(";\n");
    out.push_str("  }\n");
    out.push_str("}\n");
    Ok(())
}

fn dart_type_for(ty: &SemanticType) -> String {
    match ty {
        SemanticType::String => "String".to_string(),
        SemanticType::Integer => "int".to_string(),
        SemanticType::Decimal => "double".to_string(),
        SemanticType::Boolean => "bool".to_string(),
        SemanticType::List { element } => format!("List<{}>", dart_type_for(element)),
        SemanticType::Map { key, value } => format!("Map<{}, {}>", dart_type_for(key), dart_type_for(value)),
        SemanticType::Nullable { inner } => format!("{}?", dart_type_for(inner)),
        SemanticType::Unknown => "dynamic".to_string(),
    }
}

fn emit_platform_dispatch(block: &PlatformCodeBlock, options: &EmitOptions, out: &mut String) {
    let dispatch = resolve_dispatch(block, SourceLanguage::Dart);
    let indent = if options.format { "    " } else { "" };
    for (idx, branch) in dispatch.branches.iter().enumerate() {
        let keyword = if idx == 0 { "if" } else { "} else if" };
        let _ = writeln!(
            out,
            "{indent}{keyword} ({}) {{ {} }}",
            branch.condition,
            strip_debug_calls(&branch.code, options)
        );
    }
    if dispatch.fallback_synthesized {
        let _ = writeln!(out, "{indent}// warning: platform conditional has no fallback/else branch");
    }
    if !dispatch.branches.is_empty() {
        let _ = writeln!(
            out,
            "{indent}}} else {{ {} }}",
            strip_debug_calls(&dispatch.fallback_code, options)
        );
    }
}

fn strip_debug_calls(code: &str, options: &EmitOptions) -> String {
    if !options.strip_debug {
        return code.to_string();
    }
    if let Some(start) = code.find("debugPrint(") {
        if let Some(end) = code[start..].find(');') {
            let mut stripped = String::with_capacity(code.len());
            stripped.push_str(&code[..start]);
            stripped.push_str(&code[start + end + 2..]);
            return stripped;
        }
    }
    code.to_string()
}

fn positional_text(value: &PropValue) -> String {
    match value {
        PropValue::Str(s) => s.clone(),
        other => render_expr(other),
    }
}

/// A widget constructor can only be marked `const` if none of its own props
/// reference mutable state (a `StateRef` reads an instance field, which
/// Dart's `const` evaluator rejects), it binds no event handlers, and every
/// descendant is const-safe too — a `const` argument list requires the
/// whole subtree to be const.
fn subtree_const_safe(ir: &Ir, node: &Node) -> bool {
    if !node.events.is_empty() {
        return false;
    }
    if node.props.values().any(|v| matches!(v, PropValue::StateRef(_))) {
        return false;
    }
    node.children
        .iter()
        .all(|child_id| ir.node(child_id).is_some_and(|child| subtree_const_safe(ir, child)))
}

fn emit_widget_expr(ir: &Ir, node: &Node, depth: usize, options: &EmitOptions, out: &mut String) -> Result<()> {
    if node.kind == NodeKind::Custom("Unknown".to_string()) {
        let reason = match node.props.get("reason") {
            Some(PropValue::Str(s)) => s.clone(),
            _ => "unrecognized construct".to_string(),
        };
        let _ = write!(out, "/* unrecognized: {reason} */ const SizedBox.shrink()");
        return Ok(());
    }

    let tag = node.kind.as_tag();
    let const_kw = if options.const_qualify && subtree_const_safe(ir, node) {
        "const "
    } else {
        ""
    };
    let _ = write!(out, "{const_kw}{tag}(");

    let mut parts: Vec<String> = Vec::new();
    for (key, value) in &node.props {
        if key == "_positional" {
            parts.push(positional_text(value));
        } else {
            parts.push(format!("{key}: {}", render_expr(value)));
        }
    }
    for event in node.events.values() {
        let handler = strip_debug_calls(&event.handler, options);
        parts.push(format!("on{}: {handler}", capitalize(&event.name)));
    }

    if !node.children.is_empty() {
        let newline = if options.format { "\n" } else { "" };
        let indent = if options.format { "  ".repeat(depth + 1) } else { String::new() };
        let closing_indent = if options.format { "  ".repeat(depth) } else { String::new() };
        let mut children_text = String::new();
        children_text.push_str("children: [");
        children_text.push_str(newline);
        for (idx, child_id) in node.children.iter().enumerate() {
            let child = ir
                .node(child_id)
                .ok_or_else(|| DartBackendError::MissingChildNode(child_id.to_string()))?;
            children_text.push_str(&indent);
            emit_widget_expr(ir, child, depth + 1, options, &mut children_text)?;
            if idx + 1 < node.children.len() {
                children_text.push(',');
            }
            children_text.push_str(newline);
        }
        children_text.push_str(&closing_indent);
        children_text.push(']');
        parts.push(children_text);
    }

    out.push_str(&parts.join(", "));
    out.push(')');
    Ok(())
}

/// Render a `PropValue` as a Dart expression (named-argument values, list
/// items, and map-literal entries).
fn render_expr(value: &PropValue) -> String {
    match value {
        PropValue::Null => "null".to_string(),
        PropValue::Bool(b) => b.to_string(),
        PropValue::Int(i) => i.to_string(),
        PropValue::Decimal(f) => f.to_string(),
        PropValue::Str(s) => format!("{s:?}"),
        PropValue::List(items) => {
            let inner: Vec<String> = items.iter().map(render_expr).collect();
            format!("[{}]", inner.join(", "))
        }
        PropValue::Map(map) => {
            let inner: Vec<String> = map.iter().map(|(k, v)| format!("'{k}': {}", render_expr(v))).collect();
            format!("{{{}}}", inner.join(", "))
        }
        PropValue::PlatformMap(platform_map) => {
            let mut entries: Vec<String> = platform_map
                .by_platform
                .iter()
                .map(|(tag, v)| format!("'{}': {}", tag.as_str(), render_expr(v)))
                .collect();
            if let Some(fallback) = &platform_map.fallback {
                entries.push(format!("'fallback': {}", render_expr(fallback)));
            }
            format!("{{{}}}", entries.join(", "))
        }
        PropValue::StateRef(r) => r.0.clone(),
        PropValue::EventRef(r) => r.0.clone(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_frontend_dart::lower_source;

    const COUNTER_SRC: &str = r#"
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

    #[test]
    fn emits_counter_widget_with_state_and_event() {
        let (ir, _diagnostics) = lower_source(COUNTER_SRC, "counter.dart", "2026-01-01T00:00:00Z").unwrap();
        let out = emit_source(&ir, &EmitOptions::default()).unwrap();
        assert!(out.contains("class Counter extends StatefulWidget {"));
        assert!(out.contains("class _CounterState extends State<Counter> {"));
        assert!(out.contains("int c = 0;"));
        assert!(out.contains("View("));
        assert!(out.contains("onPressed: () { setState(() { c = c + 1; }); }"));
    }

    #[test]
    fn disabling_all_optimizations_still_produces_valid_source() {
        let (ir, _diagnostics) = lower_source(COUNTER_SRC, "counter.dart", "2026-01-01T00:00:00Z").unwrap();
        let options = EmitOptions {
            strip_debug: false,
            const_qualify: false,
            dedupe_imports: false,
            format: false,
        };
        let out = emit_source(&ir, &options).unwrap();
        assert!(out.contains("class Counter extends StatefulWidget {"));
        assert!(out.contains("View("));
    }

    #[test]
    fn platform_conditional_round_trips_into_if_else_chain() {
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
        let out = emit_source(&ir, &EmitOptions::default()).unwrap();
        assert!(out.contains("Platform.isIOS"));
        assert!(out.contains("A();"));
        assert!(out.contains("B();"));
        assert!(out.contains("C();"));
    }

    #[test]
    fn emits_source_for_a_hand_built_fixture() {
        let ir = uic_test_utils::simple_view_with_text(uic_ir::SourceLanguage::Dart, "x.dart");
        let out = emit_source(&ir, &EmitOptions::default()).unwrap();
        assert!(out.contains("View"));
        assert!(out.contains("Text"));
    }
}
