//! Coarse, regex-based extraction of widget classes, constructors, state
//! fields, and platform conditionals from a Dart source unit (§4.2).

use regex::Regex;
use std::sync::OnceLock;

use uic_ir::{Diagnostic, Diagnostics};

/// One constructor parameter.
#[derive(Debug, Clone)]
pub struct ConstructorParam {
    /// Parameter name (the bound field name for a `this.x` shorthand).
    pub name: String,
    /// Whether this parameter carries a `required` modifier.
    pub required: bool,
    /// Verbatim default-value expression text, if any.
    pub default: Option<String>,
}

/// One field declared on a widget's associated `State` class.
#[derive(Debug, Clone)]
pub struct StateField {
    /// Field name.
    pub name: String,
    /// Verbatim declared type text (without a trailing `?`).
    pub type_name: String,
    /// Whether the declared type carries a `?` nullability suffix.
    pub nullable: bool,
    /// Verbatim initializer expression, if any.
    pub initial_expr: Option<String>,
    /// Whether the field can be reassigned (`false` for `final`).
    pub mutable: bool,
}

/// One branch of a `Platform.isXxx` conditional chain.
#[derive(Debug, Clone)]
pub struct PlatformBranch {
    /// Platform tag(s) this branch matches (lowercase, e.g. `"ios"`).
    pub tags: Vec<String>,
    /// Verbatim branch body.
    pub body: String,
}

/// A platform-conditional construct extracted from a Dart method body.
#[derive(Debug, Clone)]
pub struct PlatformConditional {
    /// Non-fallback branches, in source order.
    pub branches: Vec<PlatformBranch>,
    /// The trailing `else` body, if present.
    pub fallback: Option<String>,
}

/// Everything extracted from one widget class declaration.
#[derive(Debug, Clone)]
pub struct WidgetClass {
    /// Class name.
    pub name: String,
    /// Whether this widget extends `StatefulWidget` (vs `StatelessWidget`).
    pub is_stateful: bool,
    /// Constructor parameters, in declaration order.
    pub params: Vec<ConstructorParam>,
    /// Verbatim text of the `build()` method's returned widget expression.
    pub build_expr: String,
    /// State-class fields (only populated for stateful widgets).
    pub state_fields: Vec<StateField>,
    /// Platform-conditional constructs found in `build()`.
    pub platform_conditionals: Vec<PlatformConditional>,
}

pub(crate) fn balanced_block(src: &str, open_brace: usize) -> Option<(&str, usize)> {
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
            b'"' | b'\'' => {
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

pub(crate) fn balanced_parens(src: &str, open_paren: usize) -> Option<(&str, usize)> {
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
            b'"' | b'\'' => {
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

fn class_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"class\s+(\w+)\s+extends\s+(StatelessWidget|StatefulWidget)\s*\{").unwrap()
    })
}

fn state_class_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"class\s+(\w+)\s+extends\s+State<(\w+)>\s*\{").unwrap())
}

/// Maps a `Platform.isXxx` suffix to its lowercase tag string.
fn platform_suffix_to_tag(suffix: &str) -> Option<&'static str> {
    match suffix {
        "IOS" => Some("ios"),
        "Android" => Some("android"),
        "Web" => Some("web"),
        "MacOS" => Some("macos"),
        "Windows" => Some("windows"),
        "Linux" => Some("linux"),
        _ => None,
    }
}

fn platform_check_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Platform\.is(\w+)").unwrap())
}

/// Extract a class's constructor parameter list, from either a `{...}`
/// named-parameter block or a flat positional list, whichever the first
/// `ClassName(` call in the class body uses.
fn extract_constructor_params(class_body: &str, class_name: &str) -> Vec<ConstructorParam> {
    let ctor_re = match Regex::new(&format!(r"(?:const\s+)?{class_name}\s*\(")) {
        Ok(re) => re,
        Err(_) => return vec![],
    };
    let Some(m) = ctor_re.find(class_body) else {
        return vec![];
    };
    let open_paren = m.end() - 1;
    let Some((raw_params, _)) = balanced_parens(class_body, open_paren) else {
        return vec![];
    };
    let raw_params = raw_params.trim();
    let inner = raw_params
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(raw_params);

    let mut params = Vec::new();
    for raw in split_top_level_commas(inner) {
        let mut entry = raw.trim();
        if entry.is_empty() {
            continue;
        }
        let required = entry.starts_with("required ") || entry.starts_with("required\t");
        if required {
            entry = entry["required".len()..].trim_start();
        }
        let (decl, default) = match entry.find('=') {
            Some(idx) => (entry[..idx].trim(), Some(entry[idx + 1..].trim().to_string())),
            None => (entry, None),
        };
        // `this.name` shorthand, a typed bare parameter, or `Type? name`.
        let name = decl
            .strip_prefix("this.")
            .map(str::to_string)
            .or_else(|| decl.split_whitespace().last().map(str::to_string))
            .unwrap_or_else(|| decl.to_string());
        if name == "key" || name == "Key" {
            continue;
        }
        params.push(ConstructorParam {
            name,
            required,
            default,
        });
    }
    params
}

fn split_top_level_commas(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            b')' | b']' | b'}' | b'>' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < s.len() {
        parts.push(&s[start..]);
    }
    parts
}

fn extract_build_expr(class_body: &str) -> Option<String> {
    let build_re = Regex::new(r"Widget\s+build\s*\([^)]*\)\s*\{").ok()?;
    let m = build_re.find(class_body)?;
    let open_brace = m.end() - 1;
    let (method_body, _) = balanced_block(class_body, open_brace)?;
    let return_re = Regex::new(r"return\s*").ok()?;
    let return_match = return_re.find(method_body)?;
    let rest = method_body[return_match.end()..].trim_start();
    let semicolon = rest.find(';')?;
    Some(rest[..semicolon].trim().to_string())
}

fn extract_state_fields(state_class_body: &str) -> Vec<StateField> {
    let prefix_end = state_class_body
        .find("Widget build")
        .unwrap_or(state_class_body.len());
    let prefix = &state_class_body[..prefix_end];
    let field_re = Regex::new(
        r"(?m)^\s*(final\s+)?([A-Za-z_][\w<>.]*)(\??)\s+(\w+)\s*(?:=\s*([^;]+))?;\s*$",
    )
    .unwrap();
    let mut fields = Vec::new();
    for caps in field_re.captures_iter(prefix) {
        let name = caps[4].to_string();
        if name == "build" {
            continue;
        }
        fields.push(StateField {
            name,
            type_name: caps[2].to_string(),
            nullable: &caps[3] == "?",
            initial_expr: caps.get(5).map(|m| m.as_str().trim().to_string()),
            mutable: caps.get(1).is_none(),
        });
    }
    fields
}

/// Extract `if (Platform.isXxx) {...} else if (...) {...} else {...}`
/// chains from `body` (§4.2).
fn extract_platform_conditionals(body: &str) -> Vec<PlatformConditional> {
    let mut out = Vec::new();
    let if_re = Regex::new(r"if\s*\(").unwrap();
    for m in if_re.find_iter(body) {
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
        let mut tags = vec![];
        if let Some(tag) = platform_suffix_to_tag(&caps[1]) {
            tags.push(tag.to_string());
        }
        for extra in platform_check_re().captures_iter(cond).skip(1) {
            if let Some(tag) = platform_suffix_to_tag(&extra[1]) {
                tags.push(tag.to_string());
            }
        }
        if tags.is_empty() {
            continue;
        }

        let rest = body[after_cond..].trim_start();
        let Some(brace_offset) = rest.find('{') else {
            continue;
        };
        let abs_brace = body.len() - rest.len() + brace_offset;
        let Some((branch_body, mut cursor)) = balanced_block(body, abs_brace) else {
            continue;
        };
        let mut branches = vec![PlatformBranch {
            tags,
            body: branch_body.trim().to_string(),
        }];

        let mut fallback = None;
        loop {
            let tail = body[cursor..].trim_start();
            if !tail.starts_with("else") {
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
                    if let Some(tag) = platform_suffix_to_tag(&extra[1]) {
                        tags2.push(tag.to_string());
                    }
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

/// Parse every widget class out of `source`, paired with diagnostics raised
/// while scanning.
pub fn parse_widget_classes(source: &str, path: &str) -> (Vec<WidgetClass>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut classes = Vec::new();

    let mut state_bodies: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    for caps in state_class_decl_re().captures_iter(source) {
        let whole = caps.get(0).unwrap();
        let open_brace = whole.end() - 1;
        if let Some((body, _)) = balanced_block(source, open_brace) {
            state_bodies.insert(caps[2].to_string(), body.to_string());
        }
    }

    for caps in class_decl_re().captures_iter(source) {
        let name = caps[1].to_string();
        let is_stateful = &caps[2] == "StatefulWidget";
        let whole = caps.get(0).unwrap();
        let open_brace = whole.end() - 1;
        let Some((class_body, _)) = balanced_block(source, open_brace) else {
            continue;
        };

        let build_source = if is_stateful {
            state_bodies.get(&name).cloned().unwrap_or_default()
        } else {
            class_body.to_string()
        };

        let Some(build_expr) = extract_build_expr(&build_source) else {
            diagnostics.push(Diagnostic::warning(format!(
                "widget {name} in {path} has no recognizable build() return expression"
            )));
            continue;
        };

        classes.push(WidgetClass {
            params: extract_constructor_params(class_body, &name),
            state_fields: if is_stateful {
                extract_state_fields(&build_source)
            } else {
                vec![]
            },
            platform_conditionals: extract_platform_conditionals(&build_source),
            name,
            is_stateful,
            build_expr,
        });
    }

    if classes.is_empty() {
        diagnostics.push(Diagnostic::error(format!(
            "no widget class found in {path}"
        )));
    }

    (classes, diagnostics)
}
