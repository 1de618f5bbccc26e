//! Renders an [`Ir`] document as JSX/TypeScript source (§4.2 "Back-ends").

use std::fmt::Write as _;

use indexmap::IndexMap;
use uic_bridges::platform::resolve_dispatch;
use uic_ir::{Ir, Node, NodeId, NodeKind, PlatformCodeBlock, PropValue, SourceLanguage, StateScope};

use crate::error::{JsxBackendError, Result};
use crate::options::EmitOptions;

/// Emit `ir` as a complete JSX/TS source unit.
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
            .ok_or_else(|| JsxBackendError::MissingRootNode(root_id.to_string()))?;
        let name = component_name(node, root_id);
        let platform_blocks = platform_by_component.get(&name).map(Vec::as_slice).unwrap_or(&[]);
        emit_component(ir, node, &name, platform_blocks, options, &mut out)?;
        out.push('\n');
    }

    Ok(out)
}

fn emit_imports(ir: &Ir, options: &EmitOptions, out: &mut String) {
    let mut react_symbols = Vec::new();
    if ir.state.iter().any(|s| s.scope == StateScope::Local) {
        react_symbols.push("useState");
    }
    if ir.state.iter().any(|s| s.scope == StateScope::Global) {
        react_symbols.push("useContext");
    }
    let mut lines = Vec::new();
    if !react_symbols.is_empty() {
        if options.dedupe_imports {
            lines.push(format!("import {{ {} }} from 'react';", react_symbols.join(", ")));
        } else {
            for symbol in &react_symbols {
                lines.push(format!("import {{ {symbol} }} from 'react';"));
            }
        }
    }
    if ir.platform.is_some() {
        lines.push("import { Platform } from 'react-native';".to_string());
    }
    for line in &lines {
        out.push_str(line);
        out.push('\n');
    }
    if !lines.is_empty() {
        out.push('\n');
    }
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
/// its originating function body.
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

fn emit_component(
    ir: &Ir,
    root: &Node,
    name: &str,
    platform_blocks: &[&PlatformCodeBlock],
    options: &EmitOptions,
    out: &mut String,
) -> Result<()> {
    let signature = if options.const_qualify {
        format!("const {name} = () => {{")
    } else {
        format!("function {name}() {{")
    };
    out.push_str(&signature);
    out.push('\n');

    for state in &ir.state {
        match state.scope {
            StateScope::Local => {
                for var in &state.variables {
                    let setter = format!("set{}", capitalize(&var.name));
                    let _ = writeln!(
                        out,
                        "  const [{}, {}] = useState({});",
                        var.name,
                        setter,
                        render_expr(&var.initial)
                    );
                }
            }
            StateScope::Global => {
                for var in &state.variables {
                    let context_name = match &var.initial {
                        PropValue::Str(name) => name.clone(),
                        other => render_expr(other),
                    };
                    let _ = writeln!(out, "  const {} = useContext({});", var.name, context_name);
                }
            }
        }
    }

    for block in platform_blocks {
        emit_platform_dispatch(block, options, out);
    }

    out.push_str("  return (\n");
    emit_element(ir, root, 2, options, out)?;
    out.push_str("\n  );\n");
    out.push_str("};\n");
    Ok(())
}

fn emit_platform_dispatch(block: &PlatformCodeBlock, options: &EmitOptions, out: &mut String) {
    let dispatch = resolve_dispatch(block, SourceLanguage::JsxTs);
    let indent = if options.format { "  " } else { "" };
    for (idx, branch) in dispatch.branches.iter().enumerate() {
        let keyword = if idx == 0 { "if" } else { "} else if" };
        let _ = writeln!(out, "{indent}{keyword} ({}) {{ {} }}", branch.condition, strip_debug_calls(&branch.code, options));
    }
    if dispatch.fallback_synthesized {
        let _ = writeln!(out, "{indent}// warning: platform conditional has no fallback/else branch");
    }
    if !dispatch.branches.is_empty() {
        let _ = writeln!(out, "{indent}}} else {{ {} }}", strip_debug_calls(&dispatch.fallback_code, options));
    }
}

fn strip_debug_calls(code: &str, options: &EmitOptions) -> String {
    if !options.strip_debug {
        return code.to_string();
    }
    if let Some(start) = code.find("console.log(") {
        if let Some(end) = code[start..].find(');') {
            let mut stripped = String::with_capacity(code.len());
            stripped.push_str(&code[..start]);
            stripped.push_str(&code[start + end + 2..]);
            return stripped;
        }
    }
    code.to_string()
}

fn emit_element(ir: &Ir, node: &Node, depth: usize, options: &EmitOptions, out: &mut String) -> Result<()> {
    let indent = if options.format { "  ".repeat(depth) } else { String::new() };
    let newline = if options.format { "\n" } else { "" };

    if node.kind == NodeKind::Custom("Unknown".to_string()) {
        let reason = match node.props.get("reason") {
            Some(PropValue::Str(s)) => s.clone(),
            _ => "unrecognized construct".to_string(),
        };
        let _ = write!(out, "{indent}{{/* unrecognized: {reason} */}}");
        return Ok(());
    }

    let tag = node.kind.as_tag();
    let _ = write!(out, "{indent}<{tag}");

    for (key, value) in &node.props {
        if key == "text" && node.kind == NodeKind::Text {
            continue;
        }
        let _ = write!(out, " {}", render_attr(key, value));
    }
    for event in node.events.values() {
        let attr_name = format!("on{}", capitalize(&event.name));
        let handler = strip_debug_calls(&event.handler, options);
        let _ = write!(out, " {attr_name}={{{handler}}}");
    }

    if node.kind == NodeKind::Text {
        let text_value = node.props.get("text");
        match text_value {
            Some(PropValue::Str(s)) => {
                let _ = write!(out, ">{s}</{tag}>");
            }
            Some(other) => {
                let _ = write!(out, ">{{{}}}</{tag}>", render_expr(other));
            }
            None => out.push_str("/>"),
        }
        return Ok(());
    }

    if node.children.is_empty() {
        out.push_str("/>");
        return Ok(());
    }

    let _ = write!(out, ">{newline}");
    for (idx, child_id) in node.children.iter().enumerate() {
        let child = ir
            .node(child_id)
            .ok_or_else(|| JsxBackendError::MissingChildNode(child_id.to_string()))?;
        emit_element(ir, child, depth + 1, options, out)?;
        if idx + 1 < node.children.len() {
            out.push_str(newline);
        }
    }
    let _ = write!(out, "{newline}{indent}</{tag}>");
    Ok(())
}

fn render_attr(key: &str, value: &PropValue) -> String {
    match value {
        PropValue::Str(s) => format!("{key}=\"{s}\""),
        PropValue::Bool(true) => key.to_string(),
        PropValue::Bool(false) => format!("{key}={{false}}"),
        other => format!("{key}={{{}}}", render_expr(other)),
    }
}

/// Render a `PropValue` as a JS expression (used inside `{}`, list items,
/// and object-literal entries).
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
            let inner: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {}", render_expr(v))).collect();
            format!("{{{}}}", inner.join(", "))
        }
        PropValue::PlatformMap(platform_map) => {
            let mut entries: Vec<String> = platform_map
                .by_platform
                .iter()
                .map(|(tag, v)| format!("{}: {}", tag.as_str(), render_expr(v)))
                .collect();
            if let Some(fallback) = &platform_map.fallback {
                entries.push(format!("fallback: {}", render_expr(fallback)));
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
