//! Deterministic DOM snapshots and equality for tests.
//! Not a public stable format; intended for internal test comparisons.
//!
//! Equivalence rules:
//! - Node kinds and element names must match.
//! - Attribute list order is significant; names and values must match.
//! - Text and comments must match exactly (post entity decode).
//! - Arena node ids are ignored unless requested.
//! - Live form state (effective value plus checked/disabled/selected) is
//!   compared only when `include_live_state` is set.

use crate::tree::{Document, NodeData, NodeId};
use std::fmt::{self, Write};
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug)]
pub struct SnapshotOptions {
    pub ignore_node_ids: bool,
    pub include_live_state: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            ignore_node_ids: true,
            include_live_state: false,
        }
    }
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(doc: &Document, root: NodeId, options: SnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(doc, root, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct DomMismatch<'a> {
    path: String,
    detail: String,
    expected: String,
    actual: String,
    expected_at: (&'a Document, NodeId),
    actual_at: (&'a Document, NodeId),
    options: SnapshotOptions,
    expected_subtree: OnceLock<String>,
    actual_subtree: OnceLock<String>,
}

impl fmt::Display for DomMismatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected_subtree = self.expected_subtree.get_or_init(|| {
            DomSnapshot::new(self.expected_at.0, self.expected_at.1, self.options).render()
        });
        let actual_subtree = self.actual_subtree.get_or_init(|| {
            DomSnapshot::new(self.actual_at.0, self.actual_at.1, self.options).render()
        });
        writeln!(f, "DOM mismatch at {}: {}", self.path, self.detail)?;
        writeln!(f, "expected: {}", self.expected)?;
        writeln!(f, "actual:   {}", self.actual)?;
        writeln!(f, "expected subtree:\n{expected_subtree}")?;
        writeln!(f, "actual subtree:\n{actual_subtree}")?;
        Ok(())
    }
}

impl std::error::Error for DomMismatch<'_> {}

pub fn assert_dom_eq(
    expected_doc: &Document,
    expected: NodeId,
    actual_doc: &Document,
    actual: NodeId,
    options: SnapshotOptions,
) {
    if let Err(mismatch) = compare_dom(expected_doc, expected, actual_doc, actual, options) {
        panic!("{mismatch}");
    }
}

pub fn compare_dom<'a>(
    expected_doc: &'a Document,
    expected: NodeId,
    actual_doc: &'a Document,
    actual: NodeId,
    options: SnapshotOptions,
) -> Result<(), Box<DomMismatch<'a>>> {
    let mut path = vec![node_label(expected_doc, expected)];
    compare_nodes(
        (expected_doc, expected),
        (actual_doc, actual),
        &options,
        &mut path,
    )
}

fn compare_nodes<'a>(
    expected_at: (&'a Document, NodeId),
    actual_at: (&'a Document, NodeId),
    options: &SnapshotOptions,
    path: &mut Vec<String>,
) -> Result<(), Box<DomMismatch<'a>>> {
    let (expected_doc, expected) = expected_at;
    let (actual_doc, actual) = actual_at;

    if !options.ignore_node_ids && expected != actual {
        return Err(mismatch(path, "node id", expected_at, actual_at, options));
    }

    match (expected_doc.data(expected), actual_doc.data(actual)) {
        (
            NodeData::Document {
                doctype: expected_doctype,
            },
            NodeData::Document {
                doctype: actual_doctype,
            },
        ) => {
            if expected_doctype != actual_doctype {
                return Err(mismatch(path, "doctype", expected_at, actual_at, options));
            }
        }
        (NodeData::Element(expected_el), NodeData::Element(actual_el)) => {
            if expected_el.name != actual_el.name {
                return Err(mismatch(
                    path,
                    "element name",
                    expected_at,
                    actual_at,
                    options,
                ));
            }
            if expected_el.attributes.len() != actual_el.attributes.len() {
                return Err(mismatch(
                    path,
                    "attribute count",
                    expected_at,
                    actual_at,
                    options,
                ));
            }
            for (i, (exp, act)) in expected_el
                .attributes
                .iter()
                .zip(actual_el.attributes.iter())
                .enumerate()
            {
                if exp != act {
                    return Err(mismatch(
                        path,
                        &format!("attribute at index {i}"),
                        expected_at,
                        actual_at,
                        options,
                    ));
                }
            }
            if options.include_live_state && live_state(expected_doc, expected) != live_state(actual_doc, actual)
            {
                return Err(mismatch(
                    path,
                    "live form state",
                    expected_at,
                    actual_at,
                    options,
                ));
            }
        }
        (NodeData::Text(expected_text), NodeData::Text(actual_text)) => {
            if expected_text != actual_text {
                return Err(mismatch(path, "text", expected_at, actual_at, options));
            }
        }
        (NodeData::Comment(expected_text), NodeData::Comment(actual_text)) => {
            if expected_text != actual_text {
                return Err(mismatch(path, "comment", expected_at, actual_at, options));
            }
        }
        _ => {
            return Err(mismatch(path, "node kind", expected_at, actual_at, options));
        }
    }

    let expected_children = expected_doc.children(expected);
    let actual_children = actual_doc.children(actual);
    if expected_children.len() != actual_children.len() {
        return Err(mismatch(
            path,
            &format!(
                "child count (expected {}, actual {})",
                expected_children.len(),
                actual_children.len()
            ),
            expected_at,
            actual_at,
            options,
        ));
    }
    for (idx, (&exp, &act)) in expected_children
        .iter()
        .zip(actual_children.iter())
        .enumerate()
    {
        path.push(format!("{}[{}]", node_label(expected_doc, exp), idx));
        let result = compare_nodes((expected_doc, exp), (actual_doc, act), options, path);
        path.pop();
        result?;
    }
    Ok(())
}

/// Effective form state used for equality: (value, checked, disabled, selected).
fn live_state(doc: &Document, id: NodeId) -> (String, bool, bool, bool) {
    (
        doc.value(id),
        doc.boolean_property(id, "checked"),
        doc.boolean_property(id, "disabled"),
        doc.boolean_property(id, "selected"),
    )
}

fn mismatch<'a>(
    path: &[String],
    detail: &str,
    expected_at: (&'a Document, NodeId),
    actual_at: (&'a Document, NodeId),
    options: &SnapshotOptions,
) -> Box<DomMismatch<'a>> {
    let path = format!("/{}", path.join("/"));
    let expected_line = format_node_line(expected_at.0, expected_at.1, options);
    let actual_line = format_node_line(actual_at.0, actual_at.1, options);
    Box::new(DomMismatch {
        path,
        detail: detail.to_string(),
        expected: truncate_line(expected_line, 160),
        actual: truncate_line(actual_line, 160),
        expected_at,
        actual_at,
        options: *options,
        expected_subtree: OnceLock::new(),
        actual_subtree: OnceLock::new(),
    })
}

fn node_label(doc: &Document, id: NodeId) -> String {
    match doc.data(id) {
        NodeData::Document { .. } => "#document".to_string(),
        NodeData::Element(element) => {
            let mut label = element.name.clone();
            if let Some(html_id) = doc.html_id(id) {
                label.push('#');
                write_escaped(&mut label, html_id);
            }
            label
        }
        NodeData::Text(_) => "#text".to_string(),
        NodeData::Comment(_) => "#comment".to_string(),
    }
}

fn truncate_line(mut line: String, max_len: usize) -> String {
    if line.len() > max_len {
        line.truncate(max_len.saturating_sub(3));
        line.push_str("...");
    }
    line
}

fn walk_snapshot(
    doc: &Document,
    node: NodeId,
    options: &SnapshotOptions,
    indent_level: usize,
    out: &mut Vec<String>,
) {
    const INDENT_STEP: usize = 2;
    let mut line = " ".repeat(indent_level * INDENT_STEP);
    write_node_line(&mut line, doc, node, options);
    out.push(line);
    for &child in doc.children(node) {
        walk_snapshot(doc, child, options, indent_level + 1, out);
    }
}

fn format_node_line(doc: &Document, node: NodeId, options: &SnapshotOptions) -> String {
    let mut line = String::new();
    write_node_line(&mut line, doc, node, options);
    line
}

fn write_node_line(out: &mut String, doc: &Document, node: NodeId, options: &SnapshotOptions) {
    match doc.data(node) {
        NodeData::Document { doctype } => {
            out.push_str("#document");
            if let Some(doctype) = doctype {
                out.push_str(" doctype=\"");
                write_escaped(out, doctype);
                out.push('"');
            }
        }
        NodeData::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (name, value) in &element.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                write_escaped(out, value);
                out.push('"');
            }
            out.push('>');
            if options.include_live_state {
                let (value, checked, disabled, selected) = live_state(doc, node);
                out.push_str(" value=\"");
                write_escaped(out, &value);
                out.push('"');
                for (flag, set) in [
                    ("checked", checked),
                    ("disabled", disabled),
                    ("selected", selected),
                ] {
                    if set {
                        out.push(' ');
                        out.push_str(flag);
                    }
                }
            }
        }
        NodeData::Text(text) => {
            out.push('"');
            write_escaped(out, text);
            out.push('"');
        }
        NodeData::Comment(text) => {
            out.push_str("<!-- ");
            write_escaped(out, text);
            out.push_str(" -->");
        }
    }
    if !options.ignore_node_ids {
        out.push_str(" node-id=");
        let _ = write!(out, "{}", node.0);
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}
