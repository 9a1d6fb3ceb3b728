//! In-place DOM reconciliation.
//!
//! [`morph`] mutates an existing tree until it matches new content, reusing
//! nodes instead of replacing them so that user-visible state (focus,
//! selection, live input values) survives an update. The contract:
//!
//! - the new content is never mutated; owned parses and borrowed nodes are
//!   read through the same view;
//! - an id that appears once per side on the same tag is persistent: the
//!   element carrying it is relocated, never destroyed and recreated, even
//!   across container boundaries (displaced nodes wait in a pantry);
//! - `<head>` elements are merged by serialized markup rather than walked,
//!   so scripts and stylesheets do not gratuitously re-execute;
//! - callbacks observe every mutation and may veto adds, morphs, removes,
//!   and attribute writes;
//! - one call is one transaction: identity analysis happens once, up front,
//!   against the pre-morph trees.

mod callbacks;
mod config;
mod content;
mod context;
mod head;
mod ids;
mod node;
mod walk;

pub use callbacks::{
    AttributeUpdateKind, DefaultCallbacks, HeadMorphOutcome, MorphCallbacks, PendingResource,
};
pub use config::{HeadOptions, HeadStyle, MorphOptions, MorphStyle, UnknownStyle};
pub use content::ContentSource;

use crate::content::normalize_source;
use crate::context::{FocusSnapshot, MorphContext};
use crate::head::head_blocking_prepass;
use crate::ids::build_identity_maps;
use crate::walk::morph_children;
use dom::{Document, NodeId, NodeKind};

/// Morph `target` (and, in the default outer style, the nodes spliced in
/// around it) to match `source`. Returns the nodes occupying the morphed
/// span afterwards, in order.
pub fn morph(
    doc: &mut Document,
    target: NodeId,
    source: ContentSource<'_>,
    options: &MorphOptions,
) -> Vec<NodeId> {
    morph_with_callbacks(doc, target, source, options, &mut DefaultCallbacks)
}

/// [`morph`], with every mutation announced to `callbacks` first.
pub fn morph_with_callbacks(
    doc: &mut Document,
    target: NodeId,
    source: ContentSource<'_>,
    options: &MorphOptions,
    callbacks: &mut dyn MorphCallbacks,
) -> Vec<NodeId> {
    let (content, view) = normalize_source(source);
    let new_doc = content.doc();
    let new_children = view.child_ids(new_doc);
    let (target, style) = normalize_target(doc, target, options.style);
    log::debug!(
        target: "morph.walk",
        "morphing {target:?} against {} new node(s), style {style}",
        new_children.len()
    );

    let maps = build_identity_maps(doc, target, new_doc, &view);
    let pantry = doc.create_element("div");
    let focus = if options.restore_focus {
        FocusSnapshot::record(doc)
    } else {
        None
    };

    let mut options = *options;
    options.style = style;
    let mut ctx = MorphContext {
        old: doc,
        new: new_doc,
        options,
        callbacks,
        persistent_ids: maps.persistent,
        id_map_old: maps.old,
        id_map_new: maps.new,
        target,
        pantry,
        head_ignore: false,
    };

    head_blocking_prepass(&mut ctx, &view);

    let morphed = match ctx.options.style {
        MorphStyle::InnerHtml => {
            morph_children(&mut ctx, target, &new_children, None, None);
            ctx.old.children(target).to_vec()
        }
        MorphStyle::OuterHtml => morph_outer(&mut ctx, &new_children),
    };

    if let Some(snapshot) = focus {
        let scope = top_ancestor(ctx.old, target);
        snapshot.restore(ctx.old, scope);
    }
    ctx.drain_pantry();
    morphed
}

/// A document-kind target stands for its root element. A document with no
/// element child has nothing to splice siblings around, so it degrades to
/// morphing children in place.
fn normalize_target(doc: &Document, target: NodeId, style: MorphStyle) -> (NodeId, MorphStyle) {
    if doc.kind(target) != NodeKind::Document {
        return (target, style);
    }
    let element = doc
        .children(target)
        .iter()
        .copied()
        .find(|&child| doc.is_element(child));
    match element {
        Some(element) => (element, style),
        None => {
            log::warn!(
                target: "morph.walk",
                "document target has no element child; morphing its children in place"
            );
            (target, MorphStyle::InnerHtml)
        }
    }
}

/// Outer-style morph: the target is one child in its parent's list, and the
/// new content replaces exactly the span it occupies. Siblings on either
/// side are out of bounds for the walk.
fn morph_outer(ctx: &mut MorphContext<'_>, new_children: &[NodeId]) -> Vec<NodeId> {
    let target = ctx.target;
    let parent = match ctx.old.parent(target) {
        Some(parent) => parent,
        None => {
            // A parentless target still needs a real sibling list to splice
            // into.
            let holder = ctx.old.create_element("div");
            ctx.old.append_child(holder, target);
            holder
        }
    };
    let siblings = ctx.old.children(parent);
    let index = siblings
        .iter()
        .position(|&node| node == target)
        .unwrap_or(0);
    let right_margin = siblings.len() - index - 1;
    let end = ctx.old.next_sibling(target);

    morph_children(ctx, parent, new_children, Some(target), end);

    let siblings = ctx.old.children(parent);
    let upper = siblings.len().saturating_sub(right_margin);
    siblings
        .get(index..upper)
        .map(<[NodeId]>::to_vec)
        .unwrap_or_default()
}

fn top_ancestor(doc: &Document, node: NodeId) -> NodeId {
    let mut current = node;
    while let Some(parent) = doc.parent(current) {
        current = parent;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::parse_document;

    #[test]
    fn document_targets_stand_for_their_root_element() {
        let doc = parse_document("<html><body><p>hi</p></body></html>");
        let (target, style) = normalize_target(&doc, doc.root(), MorphStyle::OuterHtml);
        assert_eq!(doc.name(target), Some("html"));
        assert_eq!(style, MorphStyle::OuterHtml);
    }

    #[test]
    fn empty_documents_degrade_to_inner_morphs() {
        let doc = Document::new();
        let (target, style) = normalize_target(&doc, doc.root(), MorphStyle::OuterHtml);
        assert_eq!(target, doc.root());
        assert_eq!(style, MorphStyle::InnerHtml);
    }

    #[test]
    fn top_ancestor_walks_to_the_document_node() {
        let doc = parse_document("<html><body><p>hi</p></body></html>");
        let html = doc.children(doc.root())[0];
        let body = doc.children(html)[1];
        let p = doc.children(body)[0];
        assert_eq!(top_ancestor(&doc, p), doc.root());
    }
}
