//! HTML → Telegraph content nodes.
//!
//! Telegraph pages are a JSON array where each node is either a string or
//! `{"tag": .., "attrs": {..}, "children": [..]}`. Only a small tag set is accepted.

use std::collections::BTreeMap;

use serde::Serialize;

use tgu_core::{errors::Error, Result};

const ALLOWED_TAGS: &[&str] = &[
    "a", "aside", "b", "blockquote", "br", "code", "em", "figcaption", "figure", "h3", "h4", "hr",
    "i", "iframe", "img", "li", "ol", "p", "pre", "s", "strong", "u", "ul", "video",
];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "menuitem",
    "meta", "param", "source", "track", "wbr",
];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "canvas", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "li", "main", "nav", "noscript", "ol", "output", "p", "pre", "section",
    "table", "tfoot", "ul", "video",
];

const ALLOWED_ATTRS: &[&str] = &["href", "src"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    Close(String),
    Text(&'a str),
}

/// Convert an HTML fragment into Telegraph nodes.
///
/// Fails with [`Error::Rejected`] on tags Telegraph does not support, on unbalanced
/// markup, and on empty content.
pub fn html_to_nodes(html: &str) -> Result<Vec<Node>> {
    let mut builder = NodeBuilder::default();
    for token in tokenize(html) {
        match token {
            Token::Open {
                name,
                attrs,
                self_closing,
            } => {
                builder.open(&name, attrs)?;
                if self_closing {
                    builder.close(&name)?;
                }
            }
            Token::Close(name) => builder.close(&name)?,
            Token::Text(raw) => builder.text(&html_escape::decode_html_entities(raw)),
        }
    }
    builder.finish()
}

#[derive(Default)]
struct NodeBuilder {
    root: Vec<Node>,
    stack: Vec<Element>,
    last_text: Option<String>,
}

impl NodeBuilder {
    fn current(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(el) => &mut el.children,
            None => &mut self.root,
        }
    }

    fn in_pre(&self) -> bool {
        self.stack.iter().any(|el| el.tag == "pre")
    }

    fn open(&mut self, name: &str, attrs: Vec<(String, String)>) -> Result<()> {
        if !ALLOWED_TAGS.contains(&name) {
            return Err(Error::Rejected(format!("'{name}' tag is not allowed")));
        }
        if BLOCK_TAGS.contains(&name) {
            self.last_text = None;
        }

        let mut el = Element::new(name);
        for (k, v) in attrs {
            if ALLOWED_ATTRS.contains(&k.as_str()) {
                el.attrs.insert(k, v);
            }
        }

        if VOID_TAGS.contains(&name) {
            self.current().push(Node::Element(el));
        } else {
            self.stack.push(el);
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        if VOID_TAGS.contains(&name) {
            return Ok(());
        }
        let Some(el) = self.stack.pop() else {
            return Err(Error::Rejected(format!("'{name}' missing start tag")));
        };
        if el.tag != name {
            return Err(Error::Rejected(format!(
                "'{name}' tag closed instead of '{}'",
                el.tag
            )));
        }
        self.current().push(Node::Element(el));
        Ok(())
    }

    fn text(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }

        let s = if self.in_pre() {
            s.to_string()
        } else {
            let collapsed = collapse_whitespace(s);
            let collapsed = match &self.last_text {
                Some(prev) if !prev.ends_with(' ') => collapsed,
                _ => collapsed.trim_start_matches(' ').to_string(),
            };
            if collapsed.is_empty() {
                self.last_text = None;
                return;
            }
            self.last_text = Some(collapsed.clone());
            collapsed
        };

        let current = self.current();
        if let Some(Node::Text(prev)) = current.last_mut() {
            prev.push_str(&s);
        } else {
            current.push(Node::Text(s));
        }
    }

    fn finish(self) -> Result<Vec<Node>> {
        if let Some(open) = self.stack.last() {
            return Err(Error::Rejected(format!("'{}' tag is not closed", open.tag)));
        }
        if self.root.is_empty() {
            return Err(Error::Rejected("content is empty".to_string()));
        }
        Ok(self.root)
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    out
}

fn tokenize(mut s: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    while !s.is_empty() {
        let Some(start) = s.find('<') else {
            out.push(Token::Text(s));
            break;
        };
        if start > 0 {
            out.push(Token::Text(&s[..start]));
            s = &s[start..];
        }

        // Comments are dropped.
        if let Some(rest) = s.strip_prefix("<!--") {
            s = match rest.find("-->") {
                Some(end) => &rest[end + 3..],
                None => "",
            };
            continue;
        }

        // `<` that does not start a tag is plain text.
        let next = s[1..].chars().next();
        let starts_tag = matches!(next, Some(c) if c.is_ascii_alphabetic() || c == '/');
        let end = s.find('>');
        match (starts_tag, end) {
            (true, Some(end)) => {
                out.push(parse_tag(&s[1..end]));
                s = &s[end + 1..];
            }
            _ => {
                let cut = s[1..].find('<').map(|i| i + 1).unwrap_or(s.len());
                out.push(Token::Text(&s[..cut]));
                s = &s[cut..];
            }
        }
    }
    out
}

fn parse_tag(inner: &str) -> Token<'static> {
    if let Some(name) = inner.strip_prefix('/') {
        return Token::Close(name.trim().to_ascii_lowercase());
    }

    let (inner, self_closing) = match inner.trim_end().strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    Token::Open {
        name,
        attrs: parse_attrs(&inner[name_end..]),
        self_closing,
    }
}

fn parse_attrs(mut s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        s = s.trim_start();
        if s.is_empty() {
            break;
        }

        let key_end = s
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(s.len());
        let key = s[..key_end].to_ascii_lowercase();
        s = s[key_end..].trim_start();

        let value = if let Some(rest) = s.strip_prefix('=') {
            let rest = rest.trim_start();
            let (value, remaining) = match rest.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &rest[1..];
                    match body.find(q) {
                        Some(end) => (&body[..end], &body[end + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                    (&rest[..end], &rest[end..])
                }
            };
            s = remaining;
            html_escape::decode_html_entities(value).into_owned()
        } else {
            String::new()
        };

        if !key.is_empty() {
            attrs.push((key, value));
        }
    }
    attrs
}
