//! A hand-written recursive-descent parser for the Dart widget-construction
//! expression subset this front-end understands: `Widget(named: value, ...)`
//! constructor calls, list literals, string literals, and opaque expressions
//! (anything else, captured verbatim). This is deliberately not a general
//! Dart grammar — only the shape a `build()` method's returned widget tree is
//! expected to take.

use crate::error::{DartFrontendError, Result};

/// One parsed Dart widget-construction call, e.g. `Text(data: "hi")`.
#[derive(Debug, Clone, PartialEq)]
pub struct DartCall {
    /// The constructor/widget identifier, e.g. `Text`, `Padding`.
    pub name: String,
    /// Arguments, in source order.
    pub args: Vec<DartArg>,
}

/// One constructor argument.
#[derive(Debug, Clone, PartialEq)]
pub struct DartArg {
    /// `Some(name)` for a named argument (`text: "hi"`); `None` for positional.
    pub name: Option<String>,
    /// The argument's value.
    pub value: DartExpr,
}

/// A parsed Dart expression, classified only as far as this front-end needs.
#[derive(Debug, Clone, PartialEq)]
pub enum DartExpr {
    /// A nested widget/constructor call.
    Call(DartCall),
    /// A `[a, b, c]` list literal.
    ListLiteral(Vec<DartExpr>),
    /// A single- or double-quoted string literal (unescaped content).
    StringLiteral(String),
    /// Anything else, preserved verbatim (numbers, bools, null, member
    /// accesses, closures, binary expressions, ...).
    Opaque(String),
}

struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    path: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, path: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            path,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn err(&self, message: impl Into<String>) -> DartFrontendError {
        DartFrontendError::MalformedDart {
            path: self.path.to_string(),
            offset: self.pos,
            message: message.into(),
        }
    }

    /// Parse a dotted identifier (`Platform.isIOS`, `MyWidget`), skipping a
    /// leading `const`/`new` keyword if present. Returns `None` without
    /// advancing if the cursor isn't at an identifier start.
    fn try_parse_dotted_identifier(&mut self) -> Option<String> {
        let checkpoint = self.pos;
        for keyword in ["const ", "new "] {
            if self.src[self.pos..].starts_with(keyword) {
                self.pos += keyword.len();
                self.skip_ws();
            }
        }
        let start = self.pos;
        if !matches!(self.peek(), Some(b) if b.is_ascii_alphabetic() || b == b'_') {
            self.pos = checkpoint;
            return None;
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
        {
            self.pos += 1;
        }
        Some(self.src[start..self.pos].to_string())
    }

    fn parse_string_literal(&mut self) -> Result<String> {
        let quote = self.peek().ok_or_else(|| self.err("expected a string"))?;
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b) if b == quote => {
                    let text = self.src[start..self.pos].to_string();
                    self.pos += 1;
                    return Ok(text);
                }
                Some(b'\\') => self.pos += 2,
                Some(_) => self.pos += 1,
                None => return Err(self.err("unterminated string literal")),
            }
        }
    }

    /// Capture raw text from `self.pos` up to (but not including) the next
    /// top-level `,`, `)`, or `]`, tracking nested brackets/quotes so commas
    /// inside a closure body or nested list don't terminate early.
    fn capture_opaque_expr(&mut self) -> String {
        let start = self.pos;
        let mut depth = 0i32;
        loop {
            match self.peek() {
                Some(b'(') | Some(b'[') | Some(b'{') => {
                    depth += 1;
                    self.pos += 1;
                }
                Some(b')') | Some(b']') | Some(b'}') if depth > 0 => {
                    depth -= 1;
                    self.pos += 1;
                }
                Some(b')') | Some(b']') | Some(b',') if depth == 0 => break,
                Some(b'"') | Some(b'\'') => {
                    let quote = self.bytes[self.pos];
                    self.pos += 1;
                    while let Some(b) = self.peek() {
                        self.pos += 1;
                        if b == b'\\' {
                            self.pos += 1;
                        } else if b == quote {
                            break;
                        }
                    }
                }
                Some(_) => self.pos += 1,
                None => break,
            }
        }
        self.src[start..self.pos].trim().to_string()
    }

    fn parse_expr(&mut self) -> Result<DartExpr> {
        self.skip_ws();
        match self.peek() {
            Some(b'[') => {
                self.pos += 1;
                let mut items = Vec::new();
                loop {
                    self.skip_ws();
                    if self.peek() == Some(b']') {
                        self.pos += 1;
                        break;
                    }
                    items.push(self.parse_expr()?);
                    self.skip_ws();
                    match self.peek() {
                        Some(b',') => {
                            self.pos += 1;
                        }
                        Some(b']') => {
                            self.pos += 1;
                            break;
                        }
                        _ => return Err(self.err("expected ',' or ']' in list literal")),
                    }
                }
                Ok(DartExpr::ListLiteral(items))
            }
            Some(b'"') | Some(b'\'') => Ok(DartExpr::StringLiteral(self.parse_string_literal()?)),
            _ => {
                let checkpoint = self.pos;
                if let Some(name) = self.try_parse_dotted_identifier() {
                    self.skip_ws();
                    if self.peek() == Some(b'(') {
                        let args = self.parse_args()?;
                        return Ok(DartExpr::Call(DartCall { name, args }));
                    }
                }
                self.pos = checkpoint;
                Ok(DartExpr::Opaque(self.capture_opaque_expr()))
            }
        }
    }

    fn parse_args(&mut self) -> Result<Vec<DartArg>> {
        if self.peek() != Some(b'(') {
            return Err(self.err("expected '('"));
        }
        self.pos += 1;
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b')') {
                self.pos += 1;
                break;
            }
            let name = self.try_parse_named_arg_prefix();
            let value = self.parse_expr()?;
            args.push(DartArg { name, value });
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.err("expected ',' or ')' in argument list")),
            }
        }
        Ok(args)
    }

    /// Recognize a `name:` prefix (a named argument) without consuming a
    /// positional expression that merely happens to start with an
    /// identifier (e.g. a nested call or a bare `Platform.isIOS`).
    fn try_parse_named_arg_prefix(&mut self) -> Option<String> {
        let checkpoint = self.pos;
        let start = self.pos;
        if !matches!(self.peek(), Some(b) if b.is_ascii_alphabetic() || b == b'_') {
            return None;
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            self.pos += 1;
        }
        let name = self.src[start..self.pos].to_string();
        self.skip_ws();
        if self.peek() == Some(b':') && self.bytes.get(self.pos + 1) != Some(&b':') {
            self.pos += 1;
            Some(name)
        } else {
            self.pos = checkpoint;
            None
        }
    }
}

/// Parse a single Dart widget-construction expression at the start of `src`.
pub fn parse_widget_expr(src: &str, path: &str) -> Result<DartCall> {
    let mut cursor = Cursor::new(src.trim_start(), path);
    match cursor.parse_expr()? {
        DartExpr::Call(call) => Ok(call),
        other => Err(cursor.err(format!("expected a widget constructor call, found {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_widget_tree() {
        let src = r#"View(children: [Text(data: c), Button(title: "+", onPressed: () { setC(c + 1); })])"#;
        let call = parse_widget_expr(src, "counter.dart").unwrap();
        assert_eq!(call.name, "View");
        assert_eq!(call.args.len(), 1);
        assert_eq!(call.args[0].name.as_deref(), Some("children"));
        let DartExpr::ListLiteral(items) = &call.args[0].value else {
            panic!("expected list literal");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn positional_and_named_args_mix() {
        let src = r#"Padding(const EdgeInsets.all(8), child: Text("hi"))"#;
        let call = parse_widget_expr(src, "x.dart").unwrap();
        assert_eq!(call.args[0].name, None);
        assert_eq!(call.args[1].name.as_deref(), Some("child"));
    }

    #[test]
    fn opaque_closure_argument_is_captured_verbatim() {
        let src = r#"Button(onPressed: () { setState(() { c = c + 1; }); })"#;
        let call = parse_widget_expr(src, "x.dart").unwrap();
        let DartExpr::Opaque(text) = &call.args[0].value else {
            panic!("expected opaque expression");
        };
        assert!(text.contains("setState"));
    }
}
