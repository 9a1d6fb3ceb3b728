//! Token stream to arena document construction.
//!
//! Contract:
//! - Elements nest via an open-element stack; a close tag pops to its nearest
//!   matching open element and is ignored when nothing matches.
//! - Void elements never take children, with or without a `/>`.
//! - Duplicate attributes keep the first occurrence.
//! - [`parse_document`] guarantees an `html` element containing `head` and
//!   `body` children, synthesizing the missing ones. [`parse_fragment`] builds
//!   nodes verbatim under the document root.
//! - [`parse_content`] picks the mode from closing-tag markers the way a
//!   server response is classified: `</html>` means a full document,
//!   `</head>`/`</body>` mean a document shell whose `html` element is the
//!   content container, anything else is a fragment. Markers inside `<svg>`
//!   subtrees are not consulted.

use crate::tokenizer::{Token, is_void_element, starts_with_ignore_ascii_case_at, tokenize};
use crate::tree::{Document, NodeId};
use memchr::memchr;

pub fn parse_document(html: &str) -> Document {
    let mut doc = build(tokenize(html));
    ensure_document_structure(&mut doc);
    doc
}

pub fn parse_fragment(html: &str) -> Document {
    build(tokenize(html))
}

/// Parses `html` and returns the document together with the node whose
/// children are the content: the document root for full documents and
/// fragments, the `html` element for document shells.
pub fn parse_content(html: &str) -> (Document, NodeId) {
    match detect_content_kind(html) {
        ContentKind::FullDocument => {
            log::trace!(target: "dom.parse", "content classified as full document");
            let doc = parse_document(html);
            let root = doc.root();
            (doc, root)
        }
        ContentKind::Shell => {
            log::trace!(target: "dom.parse", "content classified as document shell");
            let mut doc = build(tokenize(html));
            let html_element = ensure_document_structure(&mut doc);
            (doc, html_element)
        }
        ContentKind::Fragment => {
            log::trace!(target: "dom.parse", "content classified as fragment");
            let doc = parse_fragment(html);
            let root = doc.root();
            (doc, root)
        }
    }
}

fn build(tokens: Vec<Token>) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    let mut open: Vec<NodeId> = Vec::new();

    for token in tokens {
        let parent = open.last().copied().unwrap_or(root);
        match token {
            Token::Doctype(value) => doc.set_doctype(Some(value)),
            Token::Comment(text) => {
                let node = doc.create_comment(&text);
                doc.append_child(parent, node);
            }
            Token::Text(text) => {
                let node = doc.create_text(&text);
                doc.append_child(parent, node);
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let element = doc.create_element(&name);
                for (key, value) in &attributes {
                    if !doc.has_attribute(element, key) {
                        doc.set_attribute(element, key, value.as_deref().unwrap_or(""));
                    }
                }
                doc.append_child(parent, element);
                if !self_closing && !is_void_element(&name) {
                    open.push(element);
                }
            }
            Token::EndTag(name) => {
                if name.is_empty() {
                    continue;
                }
                if let Some(at) = open
                    .iter()
                    .rposition(|&element| doc.name(element) == Some(name.as_str()))
                {
                    open.truncate(at);
                }
            }
        }
    }

    doc
}

/// Guarantees the `html` > `head` + `body` skeleton, returning the `html`
/// element. Stray `html` children are sorted into `head` (metadata elements)
/// or `body` (everything else).
fn ensure_document_structure(doc: &mut Document) -> NodeId {
    let root = doc.root();
    let top: Vec<NodeId> = doc.children(root).to_vec();
    let top_elements: Vec<NodeId> = top
        .iter()
        .copied()
        .filter(|&node| doc.is_element(node))
        .collect();

    let html = match top_elements.as_slice() {
        [only] if doc.name(*only) == Some("html") => *only,
        _ => {
            let html = doc.create_element("html");
            for child in top {
                doc.move_before(child, html, None);
            }
            doc.append_child(root, html);
            html
        }
    };

    let find_child = |doc: &Document, name: &str| {
        doc.children(html)
            .iter()
            .copied()
            .find(|&node| doc.name(node) == Some(name))
    };
    let head = match find_child(doc, "head") {
        Some(head) => head,
        None => {
            let head = doc.create_element("head");
            let first = doc.first_child(html);
            doc.insert_before(html, head, first);
            head
        }
    };
    let body = match find_child(doc, "body") {
        Some(body) => body,
        None => {
            let body = doc.create_element("body");
            doc.append_child(html, body);
            body
        }
    };

    let strays: Vec<NodeId> = doc
        .children(html)
        .iter()
        .copied()
        .filter(|&node| node != head && node != body)
        .collect();
    for stray in strays {
        let target = if is_metadata_element(doc, stray) {
            head
        } else {
            body
        };
        doc.move_before(stray, target, None);
    }

    html
}

fn is_metadata_element(doc: &Document, node: NodeId) -> bool {
    matches!(
        doc.name(node),
        Some("base" | "link" | "meta" | "noscript" | "script" | "style" | "template" | "title")
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContentKind {
    FullDocument,
    Shell,
    Fragment,
}

fn detect_content_kind(html: &str) -> ContentKind {
    let bytes = html.as_bytes();
    let mut svg_depth = 0usize;
    let (mut saw_head, mut saw_body) = (false, false);
    let mut i = 0;
    while let Some(rel) = memchr(b'<', &bytes[i..]) {
        let at = i + rel;
        if is_close_marker(bytes, at, b"svg") {
            svg_depth = svg_depth.saturating_sub(1);
        } else if is_open_marker(bytes, at, b"svg") {
            svg_depth += 1;
        } else if svg_depth == 0 {
            if is_close_marker(bytes, at, b"html") {
                return ContentKind::FullDocument;
            }
            saw_head |= is_close_marker(bytes, at, b"head");
            saw_body |= is_close_marker(bytes, at, b"body");
        }
        i = at + 1;
    }
    if saw_head || saw_body {
        ContentKind::Shell
    } else {
        ContentKind::Fragment
    }
}

fn is_close_marker(bytes: &[u8], at: usize, name: &[u8]) -> bool {
    if bytes.get(at + 1) != Some(&b'/') {
        return false;
    }
    if !starts_with_ignore_ascii_case_at(bytes, at + 2, name) {
        return false;
    }
    let mut k = at + 2 + name.len();
    while k < bytes.len() && bytes[k].is_ascii_whitespace() {
        k += 1;
    }
    bytes.get(k) == Some(&b'>')
}

fn is_open_marker(bytes: &[u8], at: usize, name: &[u8]) -> bool {
    if !starts_with_ignore_ascii_case_at(bytes, at + 1, name) {
        return false;
    }
    matches!(
        bytes.get(at + 1 + name.len()),
        Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    #[test]
    fn fragment_builds_nested_structure() {
        let doc = parse_fragment("<ul><li>a</li><li>b</li></ul>");
        let root = doc.root();
        assert_eq!(doc.children(root).len(), 1);
        let ul = doc.children(root)[0];
        assert_eq!(doc.name(ul), Some("ul"));
        let items = doc.children(ul);
        assert_eq!(items.len(), 2);
        assert_eq!(doc.text_content(items[0]), "a");
        assert_eq!(doc.text_content(items[1]), "b");
    }

    #[test]
    fn first_attribute_occurrence_wins() {
        let doc = parse_fragment("<div class=\"a\" class=\"b\"></div>");
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.attribute(div, "class"), Some("a"));
        assert_eq!(doc.attributes(div).len(), 1);
    }

    #[test]
    fn void_elements_take_no_children() {
        let doc = parse_fragment("<div><br>text<img src=\"x\">more</div>");
        let div = doc.children(doc.root())[0];
        let kinds: Vec<NodeKind> = doc
            .children(div)
            .iter()
            .map(|&child| doc.kind(child))
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Element,
                NodeKind::Text,
                NodeKind::Element,
                NodeKind::Text
            ]
        );
        assert!(doc.children(doc.children(div)[0]).is_empty());
    }

    #[test]
    fn stray_end_tag_is_ignored() {
        let doc = parse_fragment("<div>a</span>b</div>c");
        let root = doc.root();
        let div = doc.children(root)[0];
        assert_eq!(doc.text_content(div), "ab");
        assert_eq!(doc.text(doc.children(root)[1]), Some("c"));
    }

    #[test]
    fn end_tag_pops_through_unclosed_children() {
        let doc = parse_fragment("<div><span>a</div>b");
        let root = doc.root();
        let div = doc.children(root)[0];
        let span = doc.children(div)[0];
        assert_eq!(doc.text_content(span), "a");
        assert_eq!(doc.text(doc.children(root)[1]), Some("b"));
    }

    #[test]
    fn document_parse_synthesizes_skeleton() {
        let doc = parse_document("<p>hi</p>");
        let html = doc.children(doc.root())[0];
        assert_eq!(doc.name(html), Some("html"));
        let names: Vec<&str> = doc
            .children(html)
            .iter()
            .filter_map(|&node| doc.name(node))
            .collect();
        assert_eq!(names, vec!["head", "body"]);
        let body = doc.children(html)[1];
        assert_eq!(doc.text_content(body), "hi");
    }

    #[test]
    fn document_parse_keeps_existing_skeleton() {
        let doc =
            parse_document("<!DOCTYPE html><html><head><title>t</title></head><body>x</body></html>");
        assert_eq!(doc.doctype(), Some("DOCTYPE html"));
        let html = doc.children(doc.root())[0];
        let head = doc.children(html)[0];
        let body = doc.children(html)[1];
        assert_eq!(doc.name(head), Some("head"));
        assert_eq!(doc.name(body), Some("body"));
        assert_eq!(doc.children(head).len(), 1);
        assert_eq!(doc.text_content(body), "x");
    }

    #[test]
    fn metadata_strays_go_to_head() {
        let doc = parse_document("<title>t</title><div>x</div>");
        let html = doc.children(doc.root())[0];
        let head = doc.children(html)[0];
        let body = doc.children(html)[1];
        assert_eq!(doc.children(head).len(), 1);
        assert_eq!(doc.name(doc.children(head)[0]), Some("title"));
        assert_eq!(doc.name(doc.children(body)[0]), Some("div"));
    }

    #[test]
    fn content_kind_detection() {
        assert_eq!(
            detect_content_kind("<html><body>x</body></html>"),
            ContentKind::FullDocument
        );
        assert_eq!(
            detect_content_kind("<head><link></head>"),
            ContentKind::Shell
        );
        assert_eq!(detect_content_kind("<body>x</body>"), ContentKind::Shell);
        assert_eq!(detect_content_kind("<div>x</div>"), ContentKind::Fragment);
        assert_eq!(
            detect_content_kind("</HTML >"),
            ContentKind::FullDocument,
            "markers are case-insensitive and may pad the close bracket"
        );
    }

    #[test]
    fn svg_subtrees_do_not_trigger_document_modes() {
        assert_eq!(
            detect_content_kind("<div><svg></head></svg></div>"),
            ContentKind::Fragment
        );
        assert_eq!(
            detect_content_kind("<svg viewBox=\"0 0 1 1\"><title>t</title></svg>"),
            ContentKind::Fragment
        );
        // A real marker after the svg closes still counts.
        assert_eq!(
            detect_content_kind("<svg></svg><body>x</body>"),
            ContentKind::Shell
        );
    }

    #[test]
    fn parse_content_containers_by_mode() {
        let (doc, container) = parse_content("<html><body>x</body></html>");
        assert_eq!(container, doc.root());

        let (doc, container) = parse_content("<head><meta charset=\"utf-8\"></head>");
        assert_eq!(doc.name(container), Some("html"));
        let names: Vec<&str> = doc
            .children(container)
            .iter()
            .filter_map(|&node| doc.name(node))
            .collect();
        assert_eq!(names, vec!["head", "body"]);

        let (doc, container) = parse_content("<li>a</li><li>b</li>");
        assert_eq!(container, doc.root());
        assert_eq!(doc.children(container).len(), 2);
    }
}
