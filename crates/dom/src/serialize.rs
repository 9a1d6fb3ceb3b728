//! Deterministic HTML serialization of arena subtrees.
//!
//! Contract:
//! - Text escapes `&`, `<`, `>`; attribute values additionally escape `"`.
//! - Attributes always serialize as `name="value"`, empty values included, in
//!   stored order.
//! - Void elements emit no end tag; `<script>`/`<style>` content is written
//!   verbatim.
//! - Document nodes emit their doctype (when present) followed by children.
//!
//! Equal subtrees serialize identically; the head-merge keying relies on this.

use crate::tokenizer::is_void_element;
use crate::tree::{Document, NodeData, NodeId};
use memchr::memchr3;

/// Serializes `node` including its own tag.
pub fn outer_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(&mut out, doc, node);
    out
}

/// Serializes the children of `node`.
pub fn inner_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_children(&mut out, doc, node);
    out
}

fn write_node(out: &mut String, doc: &Document, node: NodeId) {
    match doc.data(node) {
        NodeData::Document { doctype } => {
            if let Some(doctype) = doctype {
                out.push_str("<!");
                out.push_str(doctype);
                out.push('>');
            }
            write_children(out, doc, node);
        }
        NodeData::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (name, value) in &element.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(out, value, true);
                out.push('"');
            }
            out.push('>');
            if is_void_element(&element.name) {
                return;
            }
            if matches!(element.name.as_str(), "script" | "style") {
                for &child in doc.children(node) {
                    if let Some(text) = doc.text(child) {
                        out.push_str(text);
                    }
                }
            } else {
                write_children(out, doc, node);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
        NodeData::Text(text) => escape_into(out, text, false),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

fn write_children(out: &mut String, doc: &Document, node: NodeId) {
    for &child in doc.children(node) {
        write_node(out, doc, child);
    }
}

fn escape_into(out: &mut String, value: &str, attribute: bool) {
    let bytes = value.as_bytes();
    let needs_escape = if attribute {
        memchr3(b'&', b'<', b'"', bytes).is_some()
    } else {
        memchr3(b'&', b'<', b'>', bytes).is_some()
    };
    if !needs_escape {
        out.push_str(value);
        return;
    }
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
