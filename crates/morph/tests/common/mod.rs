use dom::snapshot::{SnapshotOptions, assert_dom_eq};
use dom::{Document, NodeId, parse_fragment};
use morph::{
    AttributeUpdateKind, HeadMorphOutcome, MorphCallbacks, MorphOptions, MorphStyle,
    PendingResource,
};

/// Options for a children-only morph of the target.
#[allow(dead_code)]
pub fn inner_options() -> MorphOptions {
    MorphOptions {
        style: MorphStyle::InnerHtml,
        ..MorphOptions::default()
    }
}

/// Parse `html` and return the document plus its single top-level element.
pub fn fixture(html: &str) -> (Document, NodeId) {
    let doc = parse_fragment(html);
    let root = doc.children(doc.root())[0];
    (doc, root)
}

/// Assert `node` (subtree included) matches the single top-level element of
/// `expected`, ignoring arena ids and live state.
pub fn assert_markup_eq(doc: &Document, node: NodeId, expected: &str) {
    let (expected_doc, expected_node) = fixture(expected);
    assert_dom_eq(
        &expected_doc,
        expected_node,
        doc,
        node,
        SnapshotOptions::default(),
    );
}

/// One observed mutation, in the order it actually happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Added(NodeId),
    Morphed(NodeId),
    Removed(NodeId),
}

/// Hook table that records every mutation and can veto classes of them.
/// Attribute announcements are kept separately so ordering assertions on
/// structural events stay readable.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingCallbacks {
    pub events: Vec<Event>,
    pub attribute_events: Vec<(String, AttributeUpdateKind)>,
    pub head_outcomes: Vec<HeadMorphOutcome>,
    pub blocked: Vec<Vec<PendingResource>>,
    pub veto_additions: bool,
    pub veto_removals: bool,
    pub veto_morph_ids: Vec<String>,
    pub frozen_attributes: Vec<String>,
}

#[allow(dead_code)]
impl RecordingCallbacks {
    pub fn added(&self) -> Vec<NodeId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Added(node) => Some(*node),
                _ => None,
            })
            .collect()
    }

    pub fn removed(&self) -> Vec<NodeId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Removed(node) => Some(*node),
                _ => None,
            })
            .collect()
    }
}

impl MorphCallbacks for RecordingCallbacks {
    fn before_node_added(&mut self, _doc: &Document, _node: NodeId) -> bool {
        !self.veto_additions
    }

    fn after_node_added(&mut self, _doc: &Document, node: NodeId) {
        self.events.push(Event::Added(node));
    }

    fn before_node_morphed(
        &mut self,
        doc: &Document,
        old_node: NodeId,
        _new_doc: &Document,
        _new_node: NodeId,
    ) -> bool {
        !doc.html_id(old_node)
            .is_some_and(|id| self.veto_morph_ids.iter().any(|vetoed| vetoed == id))
    }

    fn after_node_morphed(
        &mut self,
        _doc: &Document,
        old_node: NodeId,
        _new_doc: &Document,
        _new_node: NodeId,
    ) {
        self.events.push(Event::Morphed(old_node));
    }

    fn before_node_removed(&mut self, _doc: &Document, _node: NodeId) -> bool {
        !self.veto_removals
    }

    fn after_node_removed(&mut self, _doc: &Document, node: NodeId) {
        self.events.push(Event::Removed(node));
    }

    fn before_attribute_updated(
        &mut self,
        name: &str,
        _doc: &Document,
        _node: NodeId,
        kind: AttributeUpdateKind,
    ) -> bool {
        self.attribute_events.push((name.to_string(), kind));
        !self.frozen_attributes.iter().any(|frozen| frozen == name)
    }

    fn after_head_morphed(&mut self, _doc: &Document, outcome: &HeadMorphOutcome) {
        self.head_outcomes.push(outcome.clone());
    }

    fn block_on_head_resources(&mut self, _doc: &Document, pending: &[PendingResource]) {
        self.blocked.push(pending.to_vec());
    }
}
