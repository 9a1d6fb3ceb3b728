//! Arena-backed document tree.
//!
//! Contract:
//! - Nodes live in a flat arena owned by [`Document`]; a [`NodeId`] stays valid
//!   for the lifetime of the document and survives every move. Detached nodes
//!   keep their data and can be re-inserted later.
//! - Child lists are ordered; attribute lists preserve insertion order.
//! - [`Document::move_before`] repositions a node in one step. It never clears
//!   focus, selection, or form state, even when the node changes parents.
//! - [`Document::remove_subtree`] detaches a node and clears focus/selection if
//!   the active element was inside it.
//! - Form controls carry live `value`/`checked`/`disabled`/`selected` state
//!   that shadows the corresponding attribute once written. Until then the
//!   attribute (or, for `<textarea>`, the text content) is the value.
//!
//! The arena never reclaims storage; removed subtrees simply become
//! unreachable. Documents are per-task scratch structures, not long-lived
//! stores.

use std::collections::VecDeque;

pub type NodeIndex = u32;

/// Stable handle into a [`Document`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub NodeIndex);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Document { doctype: Option<String> },
    Element(ElementData),
    Text(String),
    Comment(String),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document { .. } => NodeKind::Document,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    live: LiveState,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
            live: LiveState::default(),
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// User-visible control state that can diverge from the reflected attributes
/// once a control has been interacted with.
#[derive(Debug, Clone, Default)]
struct LiveState {
    value: Option<String>,
    checked: Option<bool>,
    disabled: Option<bool>,
    selected: Option<bool>,
}

/// Text selection inside the active element, as character offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    root: NodeId,
    active_element: Option<NodeId>,
    selection: Option<SelectionRange>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root_entry = NodeEntry {
            data: NodeData::Document { doctype: None },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root_entry],
            root: NodeId(0),
            active_element: None,
            selection: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn doctype(&self) -> Option<&str> {
        match &self.entry(self.root).data {
            NodeData::Document { doctype } => doctype.as_deref(),
            _ => None,
        }
    }

    pub fn set_doctype(&mut self, value: Option<String>) {
        if let NodeData::Document { doctype } = &mut self.entry_mut(self.root).data {
            *doctype = value;
        }
    }

    fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.0 as usize]
    }

    fn entry_mut(&mut self, id: NodeId) -> &mut NodeEntry {
        &mut self.nodes[id.0 as usize]
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as NodeIndex);
        self.nodes.push(NodeEntry {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Creates a detached element. The name is stored ASCII-lowercased.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(name)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.entry(id).data
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.entry(id).data.kind()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.kind(id) == NodeKind::Element
    }

    /// Element tag name (lowercase), `None` for non-elements.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.entry(id).data {
            NodeData::Element(element) => Some(element.name.as_str()),
            _ => None,
        }
    }

    /// Character data of a text or comment node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.entry(id).data {
            NodeData::Text(text) | NodeData::Comment(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, value: &str) {
        match &mut self.entry_mut(id).data {
            NodeData::Text(text) | NodeData::Comment(text) => {
                text.clear();
                text.push_str(value);
            }
            _ => {
                debug_assert!(false, "set_text on a non-character node");
                log::warn!(target: "dom.tree", "set_text ignored for node {:?}", id);
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.entry(id).children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).children.first().copied()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.entry(id).parent?;
        let siblings = &self.entry(parent).children;
        let at = siblings.iter().position(|&child| child == id)?;
        siblings.get(at + 1).copied()
    }

    /// True when `id` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == ancestor {
                return true;
            }
            cursor = self.entry(node).parent;
        }
        false
    }

    /// Preorder iterator over `root` and its descendants.
    pub fn subtree(&self, root: NodeId) -> Subtree<'_> {
        Subtree {
            doc: self,
            stack: vec![root],
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Inserts a detached node under `parent`, before `before` (append when
    /// `None` or when `before` is not a child of `parent`).
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        debug_assert!(
            self.entry(child).parent.is_none(),
            "insert_before requires a detached child"
        );
        debug_assert!(
            !self.contains(child, parent),
            "insert_before would create a cycle"
        );
        let position = before.and_then(|anchor| {
            let at = self
                .entry(parent)
                .children
                .iter()
                .position(|&node| node == anchor);
            if at.is_none() {
                log::warn!(target: "dom.tree", "insert_before anchor {:?} not under {:?}; appending", anchor, parent);
            }
            at
        });
        let children = &mut self.entry_mut(parent).children;
        match position {
            Some(at) => children.insert(at, child),
            None => children.push(child),
        }
        self.entry_mut(child).parent = Some(parent);
    }

    /// Unlinks `child` from its parent, keeping its subtree intact. Focus and
    /// selection are untouched; use [`Document::remove_subtree`] for removal
    /// semantics.
    pub fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.entry(child).parent {
            self.entry_mut(parent)
                .children
                .retain(|&node| node != child);
            self.entry_mut(child).parent = None;
        }
    }

    /// Atomically repositions `child` under `parent`, before `before`. This is
    /// the move primitive: one splice, no detach/reattach lifecycle, so focus,
    /// selection, and live control state all survive, including across a
    /// parent change.
    pub fn move_before(&mut self, child: NodeId, parent: NodeId, before: Option<NodeId>) {
        debug_assert!(
            !self.contains(child, parent),
            "move_before would create a cycle"
        );
        self.detach(child);
        self.insert_before(parent, child, before);
    }

    /// Detaches `node` and treats it as destroyed: if the active element was
    /// inside, focus and selection are cleared.
    pub fn remove_subtree(&mut self, node: NodeId) {
        if let Some(active) = self.active_element
            && self.contains(node, active)
        {
            self.active_element = None;
            self.selection = None;
        }
        self.detach(node);
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        match &self.entry(id).data {
            NodeData::Element(element) => &element.attributes,
            _ => &[],
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.entry(id).data {
            NodeData::Element(element) => element.attribute(name),
            _ => None,
        }
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Sets an attribute, updating in place when present (attribute order is
    /// observable and preserved).
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let NodeData::Element(element) = &mut self.entry_mut(id).data else {
            debug_assert!(false, "set_attribute on a non-element");
            return;
        };
        if let Some((_, existing)) = element
            .attributes
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            existing.clear();
            existing.push_str(value);
        } else {
            element
                .attributes
                .push((name.to_ascii_lowercase(), value.to_string()));
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let NodeData::Element(element) = &mut self.entry_mut(id).data {
            element
                .attributes
                .retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        }
    }

    /// The element's html `id` attribute; empty ids count as absent.
    pub fn html_id(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id").filter(|value| !value.is_empty())
    }

    /// First element in `scope`'s subtree (scope included) whose html id
    /// matches.
    pub fn element_by_html_id(&self, scope: NodeId, html_id: &str) -> Option<NodeId> {
        self.subtree(scope)
            .find(|&node| self.html_id(node) == Some(html_id))
    }

    /// Deep-clones a subtree from another document into this one. The clone is
    /// detached; its root id is returned. Live control state is carried over.
    pub fn import(&mut self, source: &Document, node: NodeId) -> NodeId {
        let root = self.push(source.entry(node).data.clone());
        let mut queue: VecDeque<(NodeId, NodeId)> = VecDeque::new();
        queue.push_back((node, root));
        while let Some((src, dst)) = queue.pop_front() {
            for &src_child in source.children(src) {
                let dst_child = self.push(source.entry(src_child).data.clone());
                self.entry_mut(dst_child).parent = Some(dst);
                self.entry_mut(dst).children.push(dst_child);
                queue.push_back((src_child, dst_child));
            }
        }
        root
    }

    /// Concatenated text descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.subtree(id) {
            if let NodeData::Text(text) = &self.entry(node).data {
                out.push_str(text);
            }
        }
        out
    }

    /// Live value of a form control. Falls back to the `value` attribute, or
    /// to the text content for `<textarea>`.
    pub fn value(&self, id: NodeId) -> String {
        let NodeData::Element(element) = &self.entry(id).data else {
            return String::new();
        };
        if let Some(value) = &element.live.value {
            return value.clone();
        }
        if element.name == "textarea" {
            return self.text_content(id);
        }
        element.attribute("value").unwrap_or_default().to_string()
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        if let NodeData::Element(element) = &mut self.entry_mut(id).data {
            element.live.value = Some(value.to_string());
        }
    }

    /// Live boolean property (`checked`, `disabled`, or `selected`). Falls
    /// back to attribute presence.
    pub fn boolean_property(&self, id: NodeId, name: &str) -> bool {
        let NodeData::Element(element) = &self.entry(id).data else {
            return false;
        };
        let live = match name {
            "checked" => element.live.checked,
            "disabled" => element.live.disabled,
            "selected" => element.live.selected,
            _ => {
                debug_assert!(false, "unknown boolean property {name}");
                None
            }
        };
        live.unwrap_or_else(|| element.has_attribute(name))
    }

    pub fn set_boolean_property(&mut self, id: NodeId, name: &str, value: bool) {
        if let NodeData::Element(element) = &mut self.entry_mut(id).data {
            match name {
                "checked" => element.live.checked = Some(value),
                "disabled" => element.live.disabled = Some(value),
                "selected" => element.live.selected = Some(value),
                _ => debug_assert!(false, "unknown boolean property {name}"),
            }
        }
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    pub fn set_active_element(&mut self, id: Option<NodeId>) {
        debug_assert!(
            id.is_none_or(|node| self.is_element(node)),
            "only elements take focus"
        );
        self.active_element = id;
    }

    pub fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    pub fn set_selection(&mut self, range: Option<SelectionRange>) {
        self.selection = range;
    }
}

pub struct Subtree<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Subtree<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        // Children pushed in reverse so preorder pops them in document order.
        for &child in self.doc.children(node).iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
