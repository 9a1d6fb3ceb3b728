//! Extension hooks observed during a morph.

use dom::{Document, NodeId};

/// Whether an attribute write sets a value or removes the attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeUpdateKind {
    Update,
    Remove,
}

/// What a head merge did, reported to [`MorphCallbacks::after_head_morphed`].
///
/// `removed` lists every node the merge decided to drop, including ones a
/// `before_node_removed` veto then left in place.
#[derive(Clone, Debug, Default)]
pub struct HeadMorphOutcome {
    pub added: Vec<NodeId>,
    pub kept: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

/// A freshly appended head element that will trigger a fetch once the
/// embedder's platform sees it (it carries `href` or `src`). The engine only
/// reports these; waiting for them is the embedder's concern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingResource {
    pub node: NodeId,
    pub url: String,
}

/// Hook table for one morph pass.
///
/// Every hook has a no-op default; `before_*` hooks veto the mutation they
/// announce by returning `false`. Vetoes are ordinary control flow, never
/// errors. Hooks receive the document that owns the node they describe: a
/// node about to be added still lives in the new (template) document,
/// everything else lives in the document being morphed.
pub trait MorphCallbacks {
    fn before_node_added(&mut self, _doc: &Document, _node: NodeId) -> bool {
        true
    }

    fn after_node_added(&mut self, _doc: &Document, _node: NodeId) {}

    fn before_node_morphed(
        &mut self,
        _doc: &Document,
        _old_node: NodeId,
        _new_doc: &Document,
        _new_node: NodeId,
    ) -> bool {
        true
    }

    fn after_node_morphed(
        &mut self,
        _doc: &Document,
        _old_node: NodeId,
        _new_doc: &Document,
        _new_node: NodeId,
    ) {
    }

    fn before_node_removed(&mut self, _doc: &Document, _node: NodeId) -> bool {
        true
    }

    fn after_node_removed(&mut self, _doc: &Document, _node: NodeId) {}

    /// Announced for every attribute the morpher considers, whether or not
    /// the value actually differs.
    fn before_attribute_updated(
        &mut self,
        _name: &str,
        _doc: &Document,
        _node: NodeId,
        _kind: AttributeUpdateKind,
    ) -> bool {
        true
    }

    /// Keep this head element even when the new head no longer carries it.
    fn head_should_preserve(&mut self, doc: &Document, node: NodeId) -> bool {
        doc.attribute(node, "morph-preserve") == Some("true")
    }

    /// Remove this head element and append a fresh copy so the embedder
    /// re-executes it.
    fn head_should_re_append(&mut self, doc: &Document, node: NodeId) -> bool {
        doc.attribute(node, "morph-re-append") == Some("true")
    }

    /// Merge-style removal gate for head elements absent from the new head.
    fn head_should_remove(&mut self, _doc: &Document, _node: NodeId) -> bool {
        true
    }

    fn after_head_morphed(&mut self, _doc: &Document, _outcome: &HeadMorphOutcome) {}

    /// Invoked with the fetch-triggering appendees when `head.block` is set,
    /// after the head was handled but before anything else is morphed.
    fn block_on_head_resources(&mut self, _doc: &Document, _pending: &[PendingResource]) {}
}

/// The all-defaults hook table used by [`crate::morph`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCallbacks;

impl MorphCallbacks for DefaultCallbacks {}
