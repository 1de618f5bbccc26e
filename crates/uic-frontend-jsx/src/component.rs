//! Coarse, regex-based extraction of component-level constructs from a JSX/TS
//! source unit (§4.1): the component declaration itself, its `useState`
//! (hook-1) / `useEffect` (hook-2) / `useContext` (hook-3) / `useRef`
//! (hook-4) / `useMemo` and `useCallback` (hook-5, hook-6) calls, its
//! `Platform.OS` conditionals, and its top-level type declarations.
//!
//! This front-end does not implement a full JS/TS grammar; it recognizes the
//! surface patterns a component written against this dialect is expected to
//! use, and falls back to an opaque, unlowered representation (recorded as a
//! diagnostic) for anything else.

use regex::Regex;
use std::sync::OnceLock;

use uic_ir::{Diagnostic, Diagnostics};

/// A single `useState` declaration.
#[derive(Debug, Clone)]
pub struct StateHook {
    /// The state variable's read binding, e.g. `c`.
    pub value_name: String,
    /// The setter binding, e.g. `setC`.
    pub setter_name: String,
    /// Verbatim initializer expression text, e.g. `0`.
    pub initial_expr: String,
}

/// A single `useEffect` declaration.
#[derive(Debug, Clone)]
pub struct EffectHook {
    /// Verbatim effect body text.
    pub body: String,
    /// Verbatim dependency array entries, if a dependency array was present.
    pub deps: Option<Vec<String>>,
}

/// A single `useContext` declaration.
#[derive(Debug, Clone)]
pub struct ContextHook {
    /// Local binding name.
    pub binding: String,
    /// The context identifier being consumed.
    pub context_name: String,
}

/// A single `useRef` declaration.
#[derive(Debug, Clone)]
pub struct RefHook {
    /// Local binding name.
    pub binding: String,
    /// Verbatim initializer expression text.
    pub initial_expr: String,
}

/// A single `useMemo`/`useCallback` declaration.
#[derive(Debug, Clone)]
pub struct MemoHook {
    /// Local binding name.
    pub binding: String,
    /// Which of the two memoization hooks this is (`"useMemo"` or `"useCallback"`).
    pub kind: String,
    /// Verbatim dependency array entries.
    pub deps: Vec<String>,
    /// Verbatim factory/callback expression text (the first argument).
    pub body: String,
}

/// A declared top-level type (`interface`, `type`, or `enum`).
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    /// Declared name.
    pub name: String,
    /// Verbatim declaration text.
    pub text: String,
}

/// One `Platform.OS === "..."` branch of an `if`/`else` chain or ternary.
#[derive(Debug, Clone)]
pub struct PlatformBranch {
    /// Platform tag string(s) this branch matches (usually one).
    pub tags: Vec<String>,
    /// Verbatim branch body.
    pub body: String,
}

/// A platform-conditional construct (§4.1, §4.3).
#[derive(Debug, Clone)]
pub struct PlatformConditional {
    /// Non-fallback branches, in source order.
    pub branches: Vec<PlatformBranch>,
    /// The trailing `else`/ternary-alternative body, if present.
    pub fallback: Option<String>,
}

/// Everything extracted from one component declaration.
#[derive(Debug, Clone)]
pub struct ComponentSource {
    /// Component function/identifier name.
    pub name: String,
    /// Verbatim JSX text of the component's `return` expression.
    pub jsx: String,
    /// `useState` declarations found in the component body, in order.
    pub state_hooks: Vec<StateHook>,
    /// `useEffect` declarations found in the component body, in order.
    pub effect_hooks: Vec<EffectHook>,
    /// `useContext` declarations found in the component body, in order.
    pub context_hooks: Vec<ContextHook>,
    /// `useRef` declarations found in the component body, in order.
    pub ref_hooks: Vec<RefHook>,
    /// `useMemo`/`useCallback` declarations found in the component body, in order.
    pub memo_hooks: Vec<MemoHook>,
    /// Platform-conditional constructs found in the component body, in order.
    pub platform_conditionals: Vec<PlatformConditional>,
}

fn component_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:export\s+)?(?:default\s+)?function\s+([A-Z]\w*)\s*\([^)]*\)\s*\{|(?:export\s+)?const\s+([A-Z]\w*)\s*(?::\s*[\w<>.\[\] ]+)?=\s*\([^)]*\)\s*(?::\s*[\w<>.\[\] ]+)?=>\s*\{",
        )
        .expect("static regex")
    })
}

/// Find the text of a brace-delimited block starting at `open_brace`
/// (which must index a `{` byte), tracking nested braces and string/template
/// literals. Returns the inner text (excluding the outer braces) and the
/// offset just past the matching `}`.
fn balanced_block(src: &str, open_brace: usize) -> Option<(&str, usize)> {
    let bytes = src.as_bytes();
    if bytes.get(open_brace) != Some(&b'{') {
        return None;
    }
    let mut depth = 1i32;
    let mut i = open_brace + 1;
    let start = i;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            b'"' | b'\'' | b'`' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\\' {
                        i += 1;
                    } else if bytes[i] == quote {
                        break;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return None;
    }
    Some((&src[start..i - 1], i))
}

fn balanced_parens(src: &str, open_paren: usize) -> Option<(&str, usize)> {
    let bytes = src.as_bytes();
    if bytes.get(open_paren) != Some(&b'(') {
        return None;
    }
    let mut depth = 1i32;
    let mut i = open_paren + 1;
    let start = i;
    while i < bytes.len() && depth > 0 {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'"' | b'\'' | b'`' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\\' {
                        i += 1;
                    } else if bytes[i] == quote {
                        break;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return None;
    }
    Some((&src[start..i - 1], i))
}

/// Find every component declaration in `source`, extracting its body text.
pub fn find_components(source: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for caps in component_decl_re().captures_iter(source) {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string());
        let Some(name) = name else { continue };
        let whole = caps.get(0).unwrap();
        let open_brace = whole.end() - 1;
        if let Some((body, _)) = balanced_block(source, open_brace) {
            out.push((name, body.to_string()));
        }
    }
    out
}

fn state_hook_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"const\s*\[\s*(\w+)\s*,\s*(\w+)\s*\]\s*=\s*useState(?:<[^>]*>)?\(").unwrap()
    })
}

fn context_hook_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"const\s+(\w+)\s*=\s*useContext\(\s*(\w+)\s*\)").unwrap())
}

fn ref_hook_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"const\s+(\w+)\s*=\s*useRef(?:<[^>]*>)?\(").unwrap())
}

fn memo_hook_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"const\s+(\w+)\s*=\s*use(Memo|Callback)\(").unwrap()
    })
}

fn effect_hook_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"useEffect\(\s*\(\)\s*=>\s*\{").unwrap())
}

fn type_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:export\s+)?(interface|type|enum)\s+(\w+)").unwrap()
    })
}

fn platform_check_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"Platform\.OS\s*===?\s*['"](\w+)['"]"#).unwrap()
    })
}

/// Extract every `useState` call in `body`.
pub fn extract_state_hooks(body: &str) -> Vec<StateHook> {
    let mut out = Vec::new();
    for caps in state_hook_re().captures_iter(body) {
        let whole = caps.get(0).unwrap();
        let open_paren = whole.end() - 1;
        if let Some((initial_expr, _)) = balanced_parens(body, open_paren) {
            out.push(StateHook {
                value_name: caps[1].to_string(),
                setter_name: caps[2].to_string(),
                initial_expr: initial_expr.trim().to_string(),
            });
        }
    }
    out
}

/// Extract every `useEffect` call in `body`.
pub fn extract_effect_hooks(body: &str) -> Vec<EffectHook> {
    let mut out = Vec::new();
    for m in effect_hook_re().find_iter(body) {
        let open_brace = m.end() - 1;
        let Some((effect_body, after_body)) = balanced_block(body, open_brace) else {
            continue;
        };
        let rest = &body[after_body..];
        let deps = rest
            .trim_start()
            .strip_prefix(',')
            .and_then(|rest| {
                let rest = rest.trim_start();
                let bracket = rest.find('[')?;
                let close = rest.find(']')?;
                if close < bracket {
                    return None;
                }
                Some(
                    rest[bracket + 1..close]
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>(),
                )
            });
        out.push(EffectHook {
            body: effect_body.trim().to_string(),
            deps,
        });
    }
    out
}

/// Extract every `useContext` call in `body`.
pub fn extract_context_hooks(body: &str) -> Vec<ContextHook> {
    context_hook_re()
        .captures_iter(body)
        .map(|caps| ContextHook {
            binding: caps[1].to_string(),
            context_name: caps[2].to_string(),
        })
        .collect()
}

/// Extract every `useRef` call in `body`.
pub fn extract_ref_hooks(body: &str) -> Vec<RefHook> {
    let mut out = Vec::new();
    for caps in ref_hook_re().captures_iter(body) {
        let whole = caps.get(0).unwrap();
        let open_paren = whole.end() - 1;
        if let Some((initial_expr, _)) = balanced_parens(body, open_paren) {
            out.push(RefHook {
                binding: caps[1].to_string(),
                initial_expr: initial_expr.trim().to_string(),
            });
        }
    }
    out
}

/// Extract every `useMemo`/`useCallback` call in `body`.
pub fn extract_memo_hooks(body: &str) -> Vec<MemoHook> {
    let mut out = Vec::new();
    for caps in memo_hook_re().captures_iter(body) {
        let whole = caps.get(0).unwrap();
        let open_paren = whole.end() - 1;
        let Some((args, _)) = balanced_parens(body, open_paren) else {
            continue;
        };
        let deps_bounds = args
            .rfind('[')
            .zip(args.rfind(']'))
            .filter(|(open, close)| open < close);
        let deps = deps_bounds
            .map(|(open, close)| {
                args[open + 1..close]
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let body = match deps_bounds {
            Some((open, _)) => args[..open].trim().trim_end_matches(',').trim().to_string(),
            None => args.trim().to_string(),
        };
        out.push(MemoHook {
            binding: caps[1].to_string(),
            kind: format!("use{}", &caps[2]),
            deps,
            body,
        });
    }
    out
}

/// Extract every top-level type declaration in `source` (component-independent).
pub fn extract_type_declarations(source: &str) -> Vec<TypeDeclaration> {
    let mut out = Vec::new();
    for caps in type_decl_re().captures_iter(source) {
        let whole = caps.get(0).unwrap();
        let name = caps[2].to_string();
        let keyword = &caps[1];
        let text = if keyword == "type" {
            source[whole.start()..]
                .find(';')
                .map(|end| source[whole.start()..whole.start() + end].trim().to_string())
                .unwrap_or_else(|| whole.as_str().to_string())
        } else {
            let brace = source[whole.end()..].find('{').map(|o| whole.end() + o);
            match brace.and_then(|b| balanced_block(source, b)) {
                Some((body, end)) => source[whole.start()..end].trim().to_string(),
                None => whole.as_str().to_string(),
            }
        };
        out.push(TypeDeclaration { name, text });
    }
    out
}

/// Extract `if (Platform.OS === "...") {...} else if (...) {...} else {...}`
/// chains from `body` (§4.1/§4.3). Ternary-form conditionals are not
/// recognized by this extractor and are left for opaque preservation.
pub fn extract_platform_conditionals(body: &str) -> Vec<PlatformConditional> {
    let mut out = Vec::new();
    let if_re = Regex::new(r"if\s*\(").unwrap();
    for m in if_re.find_iter(body) {
        // Skip `else if (...)`: it belongs to a chain already handled when
        // the chain's leading `if` was matched.
        if body[..m.start()].trim_end().ends_with("else") {
            continue;
        }
        let open_paren = m.end() - 1;
        let Some((cond, after_cond)) = balanced_parens(body, open_paren) else {
            continue;
        };
        let Some(caps) = platform_check_re().captures(cond) else {
            continue;
        };
        let mut branches = vec![];
        let mut tags = vec![caps[1].to_string()];
        // An `a === 'ios' || a === 'android'` compound condition.
        for extra in platform_check_re().captures_iter(cond).skip(1) {
            tags.push(extra[1].to_string());
        }

        let rest = body[after_cond..].trim_start();
        let Some(brace_offset) = rest.find('{') else {
            continue;
        };
        let abs_brace = body.len() - rest.len() + brace_offset;
        let Some((branch_body, mut cursor)) = balanced_block(body, abs_brace) else {
            continue;
        };
        branches.push(PlatformBranch {
            tags,
            body: branch_body.trim().to_string(),
        });

        let mut fallback = None;
        loop {
            let tail = body[cursor..].trim_start();
            let Some(else_rel) = tail.find("else") else {
                break;
            };
            if else_rel != 0 {
                break;
            }
            let after_else = tail[4..].trim_start();
            if let Some(if_rel) = after_else.strip_prefix("if") {
                let if_rel = if_rel.trim_start();
                if !if_rel.starts_with('(') {
                    break;
                }
                let paren_abs = body.len() - if_rel.len();
                let Some((cond2, after_cond2)) = balanced_parens(body, paren_abs) else {
                    break;
                };
                let mut tags2 = vec![];
                for extra in platform_check_re().captures_iter(cond2) {
                    tags2.push(extra[1].to_string());
                }
                if tags2.is_empty() {
                    break;
                }
                let rest2 = body[after_cond2..].trim_start();
                let Some(b2) = rest2.find('{') else { break };
                let abs2 = body.len() - rest2.len() + b2;
                let Some((body2, cursor2)) = balanced_block(body, abs2) else {
                    break;
                };
                branches.push(PlatformBranch {
                    tags: tags2,
                    body: body2.trim().to_string(),
                });
                cursor = cursor2;
                continue;
            }
            if !after_else.starts_with('{') {
                break;
            }
            let abs3 = body.len() - after_else.len();
            let Some((fb_body, cursor3)) = balanced_block(body, abs3) else {
                break;
            };
            fallback = Some(fb_body.trim().to_string());
            cursor = cursor3;
            break;
        }

        out.push(PlatformConditional { branches, fallback });
    }
    out
}

/// Parse every component out of `source`, paired with diagnostics raised
/// while scanning (e.g. no component found at all).
pub fn parse_components(source: &str, path: &str) -> (Vec<ComponentSource>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut components = Vec::new();

    for (name, body) in find_components(source) {
        let jsx = match extract_return_jsx(&body) {
            Some(jsx) => jsx,
            None => {
                diagnostics.push(Diagnostic::warning(format!(
                    "component {name} in {path} has no JSX return expression"
                )));
                continue;
            }
        };
        components.push(ComponentSource {
            name,
            jsx,
            state_hooks: extract_state_hooks(&body),
            effect_hooks: extract_effect_hooks(&body),
            context_hooks: extract_context_hooks(&body),
            ref_hooks: extract_ref_hooks(&body),
            memo_hooks: extract_memo_hooks(&body),
            platform_conditionals: extract_platform_conditionals(&body),
        });
    }

    if components.is_empty() {
        diagnostics.push(Diagnostic::error(format!(
            "no component declaration found in {path}"
        )));
    }

    (components, diagnostics)
}

/// Locate the `return <...>;` expression inside a component body and return
/// its verbatim JSX text (braces/parens around the JSX, if any, stripped).
fn extract_return_jsx(body: &str) -> Option<String> {
    let return_re = Regex::new(r"return\s*\(?\s*<").unwrap();
    let m = return_re.find(body)?;
    let lt = m.end() - 1;
    Some(body[lt..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_counter_component_and_state_hook() {
        let src = "function Counter(){ const [c,setC]=useState(0); return <View><Text text={c}/><Button title=\"+\" onPress={()=>setC(c+1)}/></View>; }";
        let (components, diagnostics) = parse_components(src, "Counter.tsx");
        assert!(diagnostics.0.is_empty());
        assert_eq!(components.len(), 1);
        let c = &components[0];
        assert_eq!(c.name, "Counter");
        assert_eq!(c.state_hooks.len(), 1);
        assert_eq!(c.state_hooks[0].value_name, "c");
        assert_eq!(c.state_hooks[0].setter_name, "setC");
        assert_eq!(c.state_hooks[0].initial_expr, "0");
        assert!(c.jsx.starts_with("<View>"));
    }

    #[test]
    fn extracts_platform_if_else_chain() {
        let body = r#"
            if (Platform.OS === 'ios') { doIos(); }
            else if (Platform.OS === 'android') { doAndroid(); }
            else { doOther(); }
        "#;
        let conditionals = extract_platform_conditionals(body);
        assert_eq!(conditionals.len(), 1);
        let cond = &conditionals[0];
        assert_eq!(cond.branches.len(), 2);
        assert_eq!(cond.branches[0].tags, vec!["ios".to_string()]);
        assert_eq!(cond.branches[1].tags, vec!["android".to_string()]);
        assert_eq!(cond.fallback.as_deref(), Some("doOther();"));
    }

    #[test]
    fn arrow_component_is_recognized() {
        let src = "const Greeting = (props) => { return <Text text={props.name}/>; }";
        let (components, _) = parse_components(src, "Greeting.tsx");
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].name, "Greeting");
    }
}
