//! Per-call morph context.

use crate::callbacks::MorphCallbacks;
use crate::config::MorphOptions;
use crate::ids::{IdMap, IdSet};
use dom::{Document, NodeId, SelectionRange};

/// Everything one morph call threads through the walk. Lives for exactly one
/// top-level call; nothing survives it.
pub(crate) struct MorphContext<'a> {
    pub(crate) old: &'a mut Document,
    pub(crate) new: &'a Document,
    pub(crate) options: MorphOptions,
    pub(crate) callbacks: &'a mut dyn MorphCallbacks,
    pub(crate) persistent_ids: IdSet,
    pub(crate) id_map_old: IdMap,
    pub(crate) id_map_new: IdMap,
    /// The node the morph was asked to reconcile, after target normalization.
    pub(crate) target: NodeId,
    /// Detached scratch container holding persistent nodes that lost their
    /// place before their new one exists.
    pub(crate) pantry: NodeId,
    /// Set once a blocking pre-pass has already handled the head.
    pub(crate) head_ignore: bool,
}

impl MorphContext<'_> {
    /// Nodes still parked when the walk ends were dropped by the new content.
    /// They get removal callbacks and are discarded; the veto is not honored
    /// because the pantry itself is going away.
    pub(crate) fn drain_pantry(&mut self) {
        let stragglers: Vec<NodeId> = self.old.children(self.pantry).to_vec();
        for node in stragglers {
            log::trace!(target: "morph.walk", "pantry straggler {:?} discarded", node);
            self.callbacks.before_node_removed(self.old, node);
            self.old.remove_subtree(node);
            self.callbacks.after_node_removed(self.old, node);
        }
    }
}

/// Focus bookkeeping for `restore_focus`: remember the focused text control's
/// id and selection before the walk, re-resolve by id afterwards.
pub(crate) struct FocusSnapshot {
    id: Option<String>,
    selection: Option<SelectionRange>,
}

impl FocusSnapshot {
    pub(crate) fn record(doc: &Document) -> Option<FocusSnapshot> {
        let active = doc.active_element()?;
        match doc.name(active) {
            Some("input") | Some("textarea") => Some(FocusSnapshot {
                id: doc.html_id(active).map(str::to_owned),
                selection: doc.selection(),
            }),
            _ => None,
        }
    }

    pub(crate) fn restore(self, doc: &mut Document, search_root: NodeId) {
        let mut active = doc.active_element();
        if let Some(id) = self.id.as_deref() {
            let still_focused = active.is_some_and(|node| doc.html_id(node) == Some(id));
            if !still_focused
                && let Some(found) = doc.element_by_html_id(search_root, id)
            {
                log::trace!(target: "morph.focus", "restoring focus to #{id}");
                doc.set_active_element(Some(found));
                active = Some(found);
            }
        }
        if let Some(node) = active
            && !doc.boolean_property(node, "disabled")
        {
            doc.set_selection(self.selection);
        }
    }
}
