//! Mustache templates.
//!
//! Supports escaped and raw variables (`{{name}}`, `{{{name}}}`, `{{&name}}`), dotted names,
//! the implicit iterator `{{.}}`, sections, inverted sections, comments and delimiter
//! changes (`{{=<% %>=}}`). Section, comment and delimiter tags that sit alone on a line
//! remove that whole line. Partials and lambdas are not supported.
//!
//! Name resolution is strict: a name found nowhere in the context stack is an error, as is
//! a dotted name whose head resolves but whose tail does not.

use std::borrow::Cow;

use serde_json::Value;

use crate::context::{lookup_in, Context};
use crate::renderer::RenderError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Variable { name: String, escape: bool, line: usize },
    Open { name: String, inverted: bool, line: usize },
    Close { name: String, line: usize },
}

enum Tag {
    Token(Token),
    Comment,
    Delimiters(String, String),
}

impl Tag {
    fn can_stand_alone(&self) -> bool {
        !matches!(self, Tag::Token(Token::Variable { .. }))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Variable { name: String, escape: bool, line: usize },
    Section { name: String, inverted: bool, line: usize, children: Vec<Node> },
}

/// A parsed template, ready to be rendered against any number of contexts.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses `source`.
    ///
    /// # Errors
    /// * `RenderError` on unclosed tags, unbalanced sections, bad delimiters or partials
    pub fn compile(source: &str) -> Result<Self, RenderError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self { nodes: build_tree(tokens)? })
    }

    /// Renders the template against `context`.
    ///
    /// # Errors
    /// * `RenderError` when a name cannot be resolved
    pub fn render(&self, context: &Context) -> Result<String, RenderError> {
        let mut out = String::new();
        render_nodes(&self.nodes, context, &mut Vec::new(), &mut out)?;
        Ok(out)
    }
}

struct Lexer<'s> {
    source: &'s str,
    pos: usize,
    open: String,
    close: String,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Self {
        Self { source, pos: 0, open: "{{".to_string(), close: "}}".to_string() }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, RenderError> {
        let mut tokens = Vec::new();

        while let Some(offset) = self.source[self.pos..].find(self.open.as_str()) {
            let tag_start = self.pos + offset;
            let (tag, tag_end) = self.read_tag(tag_start)?;

            let standalone = standalone_span(self.source, self.pos, tag_start, tag_end);
            let (text_end, next) = match standalone {
                Some(span) if tag.can_stand_alone() => span,
                _ => (tag_start, tag_end),
            };
            push_text(&mut tokens, &self.source[self.pos..text_end]);

            match tag {
                Tag::Token(token) => tokens.push(token),
                Tag::Comment => {}
                Tag::Delimiters(open, close) => {
                    self.open = open;
                    self.close = close;
                }
            }
            self.pos = next;
        }

        push_text(&mut tokens, &self.source[self.pos..]);
        Ok(tokens)
    }

    /// Reads the tag opening at `tag_start`, returning it with the position right after it.
    fn read_tag(&self, tag_start: usize) -> Result<(Tag, usize), RenderError> {
        let line = line_of(self.source, tag_start);
        let inner_start = tag_start + self.open.len();
        let rest = &self.source[inner_start..];
        let sigil = rest.chars().next();

        if sigil == Some('{') && self.open == "{{" {
            let closing = format!("}}{}", self.close);
            let end = rest.find(&closing).ok_or_else(|| unclosed_tag(line))?;
            let name = checked_name(&rest[1..end], line)?;
            let token = Token::Variable { name, escape: false, line };
            return Ok((Tag::Token(token), inner_start + end + closing.len()));
        }

        let end = rest.find(self.close.as_str()).ok_or_else(|| unclosed_tag(line))?;
        let content = &rest[..end];
        let tag_end = inner_start + end + self.close.len();

        let tag = match sigil {
            Some('!') => Tag::Comment,
            Some('=') => parse_delimiters(content, line)?,
            Some('>') => return Err(error_at(line, "partials are not supported")),
            Some('#') => Tag::Token(Token::Open {
                name: checked_name(&content[1..], line)?,
                inverted: false,
                line,
            }),
            Some('^') => Tag::Token(Token::Open {
                name: checked_name(&content[1..], line)?,
                inverted: true,
                line,
            }),
            Some('/') => Tag::Token(Token::Close { name: checked_name(&content[1..], line)?, line }),
            Some('&') => Tag::Token(Token::Variable {
                name: checked_name(&content[1..], line)?,
                escape: false,
                line,
            }),
            _ => Tag::Token(Token::Variable { name: checked_name(content, line)?, escape: true, line }),
        };
        Ok((tag, tag_end))
    }
}

/// If the tag spanning `tag_start..tag_end` is the only thing on its line, returns where the
/// preceding text has to stop and where scanning resumes (past the line break).
fn standalone_span(
    source: &str,
    text_start: usize,
    tag_start: usize,
    tag_end: usize,
) -> Option<(usize, usize)> {
    let line_begin = source[..tag_start].rfind('\n').map_or(0, |i| i + 1);
    // another tag earlier on the same line
    if line_begin < text_start {
        return None;
    }
    if !is_blank(&source[line_begin..tag_start]) {
        return None;
    }

    let rest = &source[tag_end..];
    let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
    let trailing = rest[..line_len].trim_end_matches('\n').trim_end_matches('\r');
    if !is_blank(trailing) {
        return None;
    }
    Some((line_begin, tag_end + line_len))
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c == ' ' || c == '\t')
}

fn parse_delimiters(content: &str, line: usize) -> Result<Tag, RenderError> {
    let invalid = || error_at(line, format!("invalid delimiter tag '{content}'"));
    let inner = content
        .strip_prefix('=')
        .and_then(|c| c.strip_suffix('='))
        .ok_or_else(invalid)?;
    let parts: Vec<&str> = inner.split_whitespace().collect();
    match parts.as_slice() {
        [open, close] if !open.contains('=') && !close.contains('=') => {
            Ok(Tag::Delimiters(open.to_string(), close.to_string()))
        }
        _ => Err(invalid()),
    }
}

fn checked_name(raw: &str, line: usize) -> Result<String, RenderError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(error_at(line, "empty tag"));
    }
    if name.contains(char::is_whitespace) {
        return Err(error_at(line, format!("invalid name '{name}'")));
    }
    Ok(name.to_string())
}

fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if !text.is_empty() {
        tokens.push(Token::Text(text.to_string()));
    }
}

struct OpenSection {
    name: String,
    inverted: bool,
    line: usize,
    children: Vec<Node>,
}

fn build_tree(tokens: Vec<Token>) -> Result<Vec<Node>, RenderError> {
    let mut root = Vec::new();
    let mut open: Vec<OpenSection> = Vec::new();

    for token in tokens {
        match token {
            Token::Text(text) => current(&mut open, &mut root).push(Node::Text(text)),
            Token::Variable { name, escape, line } => {
                current(&mut open, &mut root).push(Node::Variable { name, escape, line })
            }
            Token::Open { name, inverted, line } => {
                open.push(OpenSection { name, inverted, line, children: Vec::new() })
            }
            Token::Close { name, line } => {
                let section = open.pop().ok_or_else(|| {
                    error_at(line, format!("closing tag '{name}' has no open section"))
                })?;
                if section.name != name {
                    return Err(error_at(
                        line,
                        format!("closing tag '{name}' does not match section '{}'", section.name),
                    ));
                }
                current(&mut open, &mut root).push(Node::Section {
                    name: section.name,
                    inverted: section.inverted,
                    line: section.line,
                    children: section.children,
                });
            }
        }
    }

    match open.pop() {
        Some(section) => {
            Err(error_at(section.line, format!("section '{}' is never closed", section.name)))
        }
        None => Ok(root),
    }
}

fn current<'a>(open: &'a mut [OpenSection], root: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match open.last_mut() {
        Some(section) => &mut section.children,
        None => root,
    }
}

fn render_nodes<'v>(
    nodes: &[Node],
    context: &'v Context,
    stack: &mut Vec<&'v Value>,
    out: &mut String,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable { name, escape, line } => {
                let value = resolve(name, context, stack).ok_or_else(|| undefined(name, *line))?;
                let text = display(value);
                if *escape {
                    escape_html(&text, out);
                } else {
                    out.push_str(&text);
                }
            }
            Node::Section { name, inverted: true, line, children } => {
                let value = resolve(name, context, stack).ok_or_else(|| undefined(name, *line))?;
                if !is_truthy(value) {
                    render_nodes(children, context, stack, out)?;
                }
            }
            Node::Section { name, inverted: false, line, children } => {
                let value = resolve(name, context, stack).ok_or_else(|| undefined(name, *line))?;
                match value {
                    Value::Array(items) => {
                        for item in items {
                            stack.push(item);
                            render_nodes(children, context, stack, out)?;
                            stack.pop();
                        }
                    }
                    value if is_truthy(value) => {
                        stack.push(value);
                        render_nodes(children, context, stack, out)?;
                        stack.pop();
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

/// Looks `name` up from the innermost section outwards, then in the context itself.
///
/// The first frame holding the head of a dotted name wins; the tail is resolved inside
/// that frame only.
fn resolve<'v>(name: &str, context: &'v Context, stack: &[&'v Value]) -> Option<&'v Value> {
    if name == "." {
        return stack.last().copied();
    }
    let head = name.split('.').next()?;
    for &frame in stack.iter().rev() {
        if frame.as_object().is_some_and(|map| map.contains_key(head)) {
            return lookup_in(frame, name);
        }
    }
    if context.contains_head(name) {
        context.lookup(name)
    } else {
        None
    }
}

fn display(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn line_of(source: &str, pos: usize) -> usize {
    source[..pos].matches('\n').count() + 1
}

fn error_at<S: AsRef<str>>(line: usize, message: S) -> RenderError {
    RenderError::new(format!("{} at line {line}", message.as_ref()))
}

fn unclosed_tag(line: usize) -> RenderError {
    error_at(line, "unclosed tag")
}

fn undefined(name: &str, line: usize) -> RenderError {
    error_at(line, format!("undefined name '{name}'"))
}
