//! Minimal HTML fragment parser and serializer.
//!
//! Section fragments are small, hand-authored documents: nested elements,
//! attributes, text, the odd comment. This parser covers exactly that
//! subset and recovers from everything else — unknown constructs are
//! skipped, unclosed elements are closed at end of input, stray close tags
//! are dropped. A fragment never fails to parse; it can only fail to
//! contain a usable section root, which the loader treats as "not found".
//!
//! Zero external dependencies — pure Rust, one pass over the input.

use crate::dom::{Document, NodeId};
use std::collections::BTreeMap;

/// Parsed markup before it joins a document.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
        children: Vec<RawNode>,
    },
    Text(String),
}

/// Elements that never have children or close tags.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Parse a fragment into a list of top-level nodes.
pub fn parse_fragment(input: &str) -> Vec<RawNode> {
    let mut parser = Parser {
        bytes: input.as_bytes(),
        pos: 0,
    };
    parser.parse_nodes(None)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos..].starts_with(s.as_bytes())
    }

    fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Parse sibling nodes until end of input or a close tag for
    /// `enclosing` (or any ancestor — recovery for mismatched closes).
    fn parse_nodes(&mut self, enclosing: Option<&str>) -> Vec<RawNode> {
        let mut nodes = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(b'<') => {
                    if self.starts_with("<!--") {
                        self.skip_comment();
                    } else if self.starts_with("<!") || self.starts_with("<?") {
                        // Doctype or processing instruction: skip to '>'.
                        self.skip_until(b'>');
                    } else if self.starts_with("</") {
                        let save = self.pos;
                        let close = self.read_close_tag();
                        match (&close, enclosing) {
                            // Our own close tag: rewind and stop; the
                            // caller consumes it exactly once.
                            (Some(tag), Some(open)) if tag == open => {
                                self.pos = save;
                                break;
                            }
                            // Stray or mismatched close: drop it and keep
                            // going. Good enough for tolerant recovery of
                            // hand-written fragments.
                            _ => {}
                        }
                    } else if let Some(node) = self.parse_element() {
                        nodes.push(node);
                    }
                }
                Some(_) => {
                    let text = self.read_text();
                    if !text.is_empty() {
                        nodes.push(RawNode::Text(text));
                    }
                }
            }
        }
        nodes
    }

    fn parse_element(&mut self) -> Option<RawNode> {
        self.pos += 1; // consume '<'
        let tag = self.read_name();
        if tag.is_empty() {
            // A lone '<' in text. Treat it as text and move on.
            return Some(RawNode::Text("<".to_string()));
        }
        let attrs = self.read_attrs();

        let self_closing = self.remaining().starts_with(b"/>");
        if self_closing {
            self.pos += 2;
        } else if self.peek() == Some(b'>') {
            self.pos += 1;
        }

        let children = if self_closing || is_void(&tag) {
            Vec::new()
        } else {
            let children = self.parse_nodes(Some(tag.as_str()));
            // parse_nodes stops at our close tag without consuming it.
            self.consume_close_tag(&tag);
            children
        };

        Some(RawNode::Element {
            tag,
            attrs,
            children,
        })
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'-' || c == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).to_lowercase()
    }

    fn read_attrs(&mut self) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(b'>') => break,
                Some(b'/') if self.remaining().starts_with(b"/>") => break,
                _ => {}
            }
            let name = self.read_attr_name();
            if name.is_empty() {
                // Unparseable junk before '>': skip one byte and retry.
                self.pos += 1;
                continue;
            }
            self.skip_whitespace();
            let value = if self.peek() == Some(b'=') {
                self.pos += 1;
                self.skip_whitespace();
                self.read_attr_value()
            } else {
                String::new() // bare attribute
            };
            attrs.insert(name, value);
        }
        attrs
    }

    fn read_attr_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':' {
                self.pos += 1;
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).to_lowercase()
    }

    fn read_attr_value(&mut self) -> String {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == quote {
                        break;
                    }
                    self.pos += 1;
                }
                let value = String::from_utf8_lossy(&self.bytes[start..self.pos]).to_string();
                if self.peek() == Some(quote) {
                    self.pos += 1;
                }
                decode_entities(&value)
            }
            _ => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_ascii_whitespace() || c == b'>' {
                        break;
                    }
                    self.pos += 1;
                }
                decode_entities(&String::from_utf8_lossy(&self.bytes[start..self.pos]))
            }
        }
    }

    fn read_text(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == b'<' {
                break;
            }
            self.pos += 1;
        }
        decode_entities(&String::from_utf8_lossy(&self.bytes[start..self.pos]))
    }

    /// Read a `</name>` tag. Returns the name, or `None` for junk.
    fn read_close_tag(&mut self) -> Option<String> {
        self.pos += 2; // consume '</'
        let name = self.read_name();
        self.skip_until(b'>');
        if name.is_empty() { None } else { Some(name) }
    }

    /// Consume the close tag for `tag` if it is next, without rescanning.
    fn consume_close_tag(&mut self, tag: &str) {
        let save = self.pos;
        if self.starts_with("</") {
            self.pos += 2;
            let name = self.read_name();
            if name == tag {
                self.skip_until(b'>');
                return;
            }
        }
        self.pos = save;
    }

    fn skip_comment(&mut self) {
        self.pos += 4; // consume '<!--'
        while self.pos < self.bytes.len() {
            if self.remaining().starts_with(b"-->") {
                self.pos += 3;
                return;
            }
            self.pos += 1;
        }
    }

    fn skip_until(&mut self, byte: u8) {
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == byte {
                break;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn encode_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn encode_attr(s: &str) -> String {
    encode_text(s).replace('"', "&quot;")
}

/// Find the single top-level `<section>` element of a fragment.
///
/// A fragment is expected to carry exactly one section at the top level
/// (surrounding whitespace and comments are fine). Anything else — no
/// section, or more than one — is not a usable fragment.
pub fn section_root(nodes: &[RawNode]) -> Option<&RawNode> {
    let mut sections = nodes
        .iter()
        .filter(|n| matches!(n, RawNode::Element { tag, .. } if tag == "section"));
    let first = sections.next()?;
    if sections.next().is_some() {
        return None;
    }
    // Reject fragments whose top level mixes the section with other
    // elements — "exactly one top-level section" is the contract.
    let other_elements = nodes
        .iter()
        .filter(|n| !matches!(n, RawNode::Text(t) if t.trim().is_empty()))
        .filter(|n| !matches!(n, RawNode::Element { tag, .. } if tag == "section"))
        .count();
    if other_elements > 0 {
        return None;
    }
    Some(first)
}

/// Build a parsed node into `doc` as a detached subtree.
///
/// `class` and `style` attributes are split into the element's class list
/// and style map; all other attributes land in the attribute map.
pub fn instantiate(doc: &mut Document, node: &RawNode) -> NodeId {
    match node {
        RawNode::Text(text) => doc.create_text(text),
        RawNode::Element {
            tag,
            attrs,
            children,
        } => {
            let id = doc.create_element(tag);
            for (name, value) in attrs {
                match name.as_str() {
                    "class" => {
                        for class in value.split_ascii_whitespace() {
                            doc.get_mut(id).add_class(class);
                        }
                    }
                    "style" => {
                        for (prop, val) in parse_style(value) {
                            doc.get_mut(id).set_style(&prop, &val);
                        }
                    }
                    _ => doc.get_mut(id).set_attr(name, value),
                }
            }
            for child in children {
                let child_id = instantiate(doc, child);
                doc.append_child(id, child_id);
            }
            id
        }
    }
}

/// Split an inline `style` attribute into property/value pairs.
fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            let value = value.trim();
            if prop.is_empty() {
                None
            } else {
                Some((prop.to_string(), value.to_string()))
            }
        })
        .collect()
}

/// Render a subtree back to HTML text.
pub fn serialize(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    let el = doc.get(node);
    if el.is_text() {
        out.push_str(&encode_text(&el.text));
        return;
    }
    out.push('<');
    out.push_str(&el.tag);
    if !el.classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", encode_attr(&el.classes.join(" "))));
    }
    for (name, value) in &el.attrs {
        if value.is_empty() {
            out.push_str(&format!(" {name}"));
        } else {
            out.push_str(&format!(" {}=\"{}\"", name, encode_attr(value)));
        }
    }
    if !el.style.is_empty() {
        let style: Vec<String> = el
            .style
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect();
        out.push_str(&format!(" style=\"{}\"", encode_attr(&style.join("; "))));
    }
    out.push('>');
    if is_void(&el.tag) {
        return;
    }
    for &child in el.children() {
        write_node(doc, child, out);
    }
    out.push_str(&format!("</{}>", el.tag));
}
