//! New-content normalization.
//!
//! Every [`ContentSource`] form reduces to a read-only document plus a
//! [`ContentView`]: either a real container whose children are the desired
//! content, or a window over existing nodes. The window never reparents the
//! nodes it covers; they are templates, not donors.

use dom::{Document, NodeId, parse_content};

/// Where the desired content comes from.
#[derive(Clone, Copy, Debug)]
pub enum ContentSource<'a> {
    /// Markup to parse. A closing `</html>`, `</head>` or `</body>` marker
    /// selects full-document parsing; anything else parses as a fragment.
    Html(&'a str),
    /// No desired content; the reconciled region empties out.
    Empty,
    /// A single existing node.
    Node(&'a Document, NodeId),
    /// A sequence of existing sibling-independent nodes, in order.
    Nodes(&'a Document, &'a [NodeId]),
}

pub(crate) enum NewContent<'a> {
    Owned(Document),
    Borrowed(&'a Document),
}

impl NewContent<'_> {
    pub(crate) fn doc(&self) -> &Document {
        match self {
            NewContent::Owned(doc) => doc,
            NewContent::Borrowed(doc) => doc,
        }
    }
}

pub(crate) enum ContentView {
    Container(NodeId),
    Window(Vec<NodeId>),
}

impl ContentView {
    /// The content nodes, in order.
    pub(crate) fn child_ids(&self, doc: &Document) -> Vec<NodeId> {
        match self {
            ContentView::Container(container) => doc.children(*container).to_vec(),
            ContentView::Window(nodes) => nodes.clone(),
        }
    }

    /// Roots that halt upward id-map propagation.
    pub(crate) fn id_scope_roots(&self) -> Vec<NodeId> {
        match self {
            ContentView::Container(container) => vec![*container],
            ContentView::Window(nodes) => nodes.clone(),
        }
    }

    /// First `<head>` reachable from the view. Window nodes can match
    /// themselves; a container is only searched below itself.
    pub(crate) fn find_head(&self, doc: &Document) -> Option<NodeId> {
        match self {
            ContentView::Container(container) => doc
                .subtree(*container)
                .skip(1)
                .find(|&node| doc.name(node) == Some("head")),
            ContentView::Window(nodes) => nodes
                .iter()
                .flat_map(|&node| doc.subtree(node))
                .find(|&node| doc.name(node) == Some("head")),
        }
    }
}

pub(crate) fn normalize_source(source: ContentSource<'_>) -> (NewContent<'_>, ContentView) {
    match source {
        ContentSource::Html(html) => {
            let (doc, container) = parse_content(html);
            (NewContent::Owned(doc), ContentView::Container(container))
        }
        ContentSource::Empty => {
            let doc = Document::new();
            let container = doc.root();
            (NewContent::Owned(doc), ContentView::Container(container))
        }
        ContentSource::Node(doc, node) => {
            (NewContent::Borrowed(doc), ContentView::Window(vec![node]))
        }
        ContentSource::Nodes(doc, nodes) => {
            (NewContent::Borrowed(doc), ContentView::Window(nodes.to_vec()))
        }
    }
}
