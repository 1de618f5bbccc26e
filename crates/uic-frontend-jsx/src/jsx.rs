//! A hand-written recursive-descent parser for the JSX subset this front-end
//! understands: elements, fragments, attributes (string literal /
//! brace-wrapped expression), and children (elements, text, braced
//! expressions). This is deliberately *not* a general JSX/TS parser — only
//! the markup shape needed to drive §4.1 lowering is recognized; anything
//! else surfaces as a [`crate::error::JsxFrontendError::MalformedJsx`] or is
//! captured as an opaque expression string.

use crate::error::{JsxFrontendError, Result};

/// One parsed JSX attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct JsxAttr {
    /// Attribute name, e.g. `onPress`, `title`.
    pub name: String,
    /// The attribute's value.
    pub value: JsxAttrValue,
}

/// An attribute's value, before semantic interpretation (§4.1 "JSX element").
#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttrValue {
    /// A plain string literal, e.g. `title="+"`.
    StringLiteral(String),
    /// A brace-wrapped expression, e.g. `{c}` or `{() => setC(c + 1)}`,
    /// captured verbatim (without the braces).
    Expression(String),
    /// A bare boolean-true attribute with no value, e.g. `<Checkbox checked />`.
    BoolTrue,
}

/// One parsed JSX child.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxChild {
    /// A nested element.
    Element(JsxElement),
    /// Non-whitespace text content.
    Text(String),
    /// A brace-wrapped expression child, e.g. `{items.map(...)}`.
    Expression(String),
}

/// One parsed JSX element (or fragment, represented with an empty tag).
#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    /// Tag name; empty string for a fragment (`<>...</>`).
    pub tag: String,
    /// Attributes, in source order.
    pub attrs: Vec<JsxAttr>,
    /// Children, in source order; whitespace-only text is discarded by the caller.
    pub children: Vec<JsxChild>,
    /// 1-based line the opening tag started on.
    pub line: u32,
    /// 1-based column the opening tag started on.
    pub column: u32,
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

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn line_col(&self, pos: usize) -> (u32, u32) {
        let mut line = 1u32;
        let mut col = 1u32;
        for &b in &self.bytes[..pos.min(self.bytes.len())] {
            if b == b'\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    fn err_here(&self, message: impl Into<String>) -> JsxFrontendError {
        let (line, column) = self.line_col(self.pos);
        JsxFrontendError::MalformedJsx {
            path: self.path.to_string(),
            line,
            column,
            message: message.into(),
        }
    }

    fn expect_byte(&mut self, byte: u8) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.err_here(format!("expected '{}'", byte as char)))
        }
    }

    fn parse_identifier(&mut self) -> Result<String> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'-')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.err_here("expected an identifier"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    /// Read a `{...}` expression body, tracking nested braces and string
    /// literals so braces/quotes inside the expression don't terminate early.
    fn parse_braced_expression(&mut self) -> Result<String> {
        self.expect_byte(b'{')?;
        let start = self.pos;
        let mut depth = 1i32;
        while depth > 0 {
            match self.advance() {
                Some(b'{') => depth += 1,
                Some(b'}') => depth -= 1,
                Some(b'"') | Some(b'\'') | Some(b'`') => {
                    let quote = self.bytes[self.pos - 1];
                    while let Some(b) = self.advance() {
                        if b == b'\\' {
                            self.advance();
                        } else if b == quote {
                            break;
                        }
                    }
                }
                Some(_) => {}
                None => return Err(self.err_here("unterminated expression")),
            }
        }
        Ok(self.src[start..self.pos - 1].trim().to_string())
    }

    fn parse_string_literal(&mut self) -> Result<String> {
        let quote = self.advance().ok_or_else(|| self.err_here("expected a string"))?;
        let start = self.pos;
        while let Some(b) = self.advance() {
            if b == quote {
                return Ok(self.src[start..self.pos - 1].to_string());
            }
        }
        Err(self.err_here("unterminated string literal"))
    }

    fn parse_attrs(&mut self) -> Result<Vec<JsxAttr>> {
        let mut attrs = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'/') | Some(b'>') | None => break,
                _ => {}
            }
            let name = self.parse_identifier()?;
            self.skip_ws();
            let value = if self.peek() == Some(b'=') {
                self.pos += 1;
                self.skip_ws();
                match self.peek() {
                    Some(b'"') | Some(b'\'') => {
                        JsxAttrValue::StringLiteral(self.parse_string_literal()?)
                    }
                    Some(b'{') => JsxAttrValue::Expression(self.parse_braced_expression()?),
                    _ => return Err(self.err_here("expected attribute value")),
                }
            } else {
                JsxAttrValue::BoolTrue
            };
            attrs.push(JsxAttr { name, value });
        }
        Ok(attrs)
    }

    fn parse_element(&mut self) -> Result<JsxElement> {
        let (line, column) = self.line_col(self.pos);
        self.expect_byte(b'<')?;
        self.skip_ws();

        // Fragment: `<>` ... `</>`.
        if self.peek() == Some(b'>') {
            self.pos += 1;
            let children = self.parse_children("")?;
            return Ok(JsxElement {
                tag: String::new(),
                attrs: vec![],
                children,
                line,
                column,
            });
        }

        let tag = self.parse_identifier()?;
        let attrs = self.parse_attrs()?;
        self.skip_ws();

        if self.peek() == Some(b'/') {
            self.pos += 1;
            self.expect_byte(b'>')?;
            return Ok(JsxElement {
                tag,
                attrs,
                children: vec![],
                line,
                column,
            });
        }

        self.expect_byte(b'>')?;
        let children = self.parse_children(&tag)?;
        Ok(JsxElement {
            tag,
            attrs,
            children,
            line,
            column,
        })
    }

    fn parse_children(&mut self, own_tag: &str) -> Result<Vec<JsxChild>> {
        let mut children = Vec::new();
        loop {
            // Closing tag: `</tag>` or `</>`.
            if self.peek() == Some(b'<') && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                self.skip_ws();
                let closing = if self.peek() == Some(b'>') {
                    String::new()
                } else {
                    self.parse_identifier()?
                };
                self.skip_ws();
                self.expect_byte(b'>')?;
                if closing != own_tag {
                    return Err(self.err_here(format!(
                        "mismatched closing tag: expected </{own_tag}>, found </{closing}>"
                    )));
                }
                return Ok(children);
            }
            if self.peek() == Some(b'<') {
                children.push(JsxChild::Element(self.parse_element()?));
                continue;
            }
            if self.peek() == Some(b'{') {
                let expr = self.parse_braced_expression()?;
                children.push(JsxChild::Expression(expr));
                continue;
            }
            let start = self.pos;
            while !matches!(self.peek(), Some(b'<') | Some(b'{') | None) {
                self.pos += 1;
            }
            if self.pos == start {
                return Err(self.err_here("unterminated element: missing closing tag"));
            }
            let text = self.src[start..self.pos].to_string();
            children.push(JsxChild::Text(text));
        }
    }
}

/// Parse a single top-level JSX expression starting at `src[0]` (which must
/// be `<`). Trailing content after the element is ignored.
pub fn parse_jsx(src: &str, path: &str) -> Result<JsxElement> {
    let trimmed = src.trim_start();
    let mut cursor = Cursor::new(trimmed, path);
    cursor.skip_ws();
    cursor.parse_element()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_attrs_and_events() {
        let src = r#"<View><Text text={c}/><Button title="+" onPress={()=>setC(c+1)}/></View>"#;
        let root = parse_jsx(src, "Counter.tsx").unwrap();
        assert_eq!(root.tag, "View");
        assert_eq!(root.children.len(), 2);
        let JsxChild::Element(button) = &root.children[1] else {
            panic!("expected element child");
        };
        assert_eq!(button.tag, "Button");
        assert_eq!(
            button.attrs[1].value,
            JsxAttrValue::Expression("()=>setC(c+1)".to_string())
        );
    }

    #[test]
    fn parses_fragments_and_text() {
        let src = "<>Hello <Text text={name}/></>";
        let root = parse_jsx(src, "f.tsx").unwrap();
        assert_eq!(root.tag, "");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0], JsxChild::Text("Hello ".to_string()));
    }

    #[test]
    fn mismatched_closing_tag_is_malformed() {
        let src = "<View><Text></View></Text>";
        let err = parse_jsx(src, "bad.tsx").unwrap_err();
        assert!(matches!(err, JsxFrontendError::MalformedJsx { .. }));
    }
}
