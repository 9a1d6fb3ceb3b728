//! Identity analysis.
//!
//! Invariants:
//! - An id is persistent only when it occurs exactly once in the old tree,
//!   exactly once in the new content, and both occurrences carry the same tag
//!   name. Duplicates are excluded even after a provisional inclusion.
//! - Empty `id` attributes never participate.
//! - Each side's id map sends a node to the set of persistent ids inside its
//!   subtree (the id-bearing element itself included). It is built bottom-up
//!   by walking parent links from each id element to its content root,
//!   inclusive.

use crate::content::ContentView;
use dom::{Document, NodeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub(crate) type IdSet = HashSet<Arc<str>>;
pub(crate) type IdMap = HashMap<NodeId, IdSet>;

pub(crate) struct IdentityMaps {
    pub(crate) persistent: IdSet,
    pub(crate) old: IdMap,
    pub(crate) new: IdMap,
}

pub(crate) fn build_identity_maps(
    old_doc: &Document,
    old_root: NodeId,
    new_doc: &Document,
    view: &ContentView,
) -> IdentityMaps {
    let old_elements = id_elements(old_doc, &[old_root]);
    let new_roots = view.id_scope_roots();
    let new_elements = id_elements(new_doc, &new_roots);
    let persistent = persistent_ids(old_doc, &old_elements, new_doc, &new_elements);

    let mut old = IdMap::new();
    populate_id_map(&mut old, &persistent, old_doc, &[old_root], &old_elements);
    let mut new = IdMap::new();
    populate_id_map(&mut new, &persistent, new_doc, &new_roots, &new_elements);

    log::debug!(
        target: "morph.ids",
        "identity analysis: {} persistent ids over {} old / {} new id elements",
        persistent.len(),
        old_elements.len(),
        new_elements.len()
    );

    IdentityMaps {
        persistent,
        old,
        new,
    }
}

/// Id-bearing elements under the given roots, roots themselves included.
fn id_elements(doc: &Document, roots: &[NodeId]) -> Vec<NodeId> {
    let mut out = Vec::new();
    for &root in roots {
        for node in doc.subtree(root) {
            if doc.html_id(node).is_some() {
                out.push(node);
            }
        }
    }
    out
}

fn persistent_ids(
    old_doc: &Document,
    old_elements: &[NodeId],
    new_doc: &Document,
    new_elements: &[NodeId],
) -> IdSet {
    let mut duplicates: HashSet<&str> = HashSet::new();
    let mut old_tags: HashMap<&str, &str> = HashMap::new();
    for &node in old_elements {
        let (Some(id), Some(tag)) = (old_doc.html_id(node), old_doc.name(node)) else {
            continue;
        };
        if old_tags.contains_key(id) {
            duplicates.insert(id);
        } else {
            old_tags.insert(id, tag);
        }
    }

    let mut persistent = IdSet::new();
    for &node in new_elements {
        let (Some(id), Some(tag)) = (new_doc.html_id(node), new_doc.name(node)) else {
            continue;
        };
        if persistent.contains(id) {
            duplicates.insert(id);
        } else if old_tags.get(id) == Some(&tag) {
            persistent.insert(Arc::from(id));
        }
        // a tag mismatch disqualifies: one tag cannot morph into another
    }

    for id in duplicates {
        persistent.remove(id);
    }
    persistent
}

fn populate_id_map(
    map: &mut IdMap,
    persistent: &IdSet,
    doc: &Document,
    roots: &[NodeId],
    elements: &[NodeId],
) {
    for &element in elements {
        let Some(shared) = doc.html_id(element).and_then(|id| persistent.get(id)) else {
            continue;
        };
        let mut current = element;
        loop {
            map.entry(current).or_default().insert(Arc::clone(shared));
            if roots.contains(&current) {
                break;
            }
            match doc.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::parse_fragment;

    fn maps_for(old_html: &str, new_html: &str) -> (Document, Document, IdentityMaps) {
        let old = parse_fragment(old_html);
        let new = parse_fragment(new_html);
        let view = ContentView::Container(new.root());
        let maps = build_identity_maps(&old, old.root(), &new, &view);
        (old, new, maps)
    }

    #[test]
    fn persistence_requires_the_same_tag_on_both_sides() {
        let (_, _, maps) = maps_for(
            "<div id=\"a\"></div><span id=\"b\"></span>",
            "<div id=\"a\"></div><div id=\"b\"></div>",
        );
        assert!(maps.persistent.contains("a"));
        assert!(!maps.persistent.contains("b"));
    }

    #[test]
    fn duplicates_on_either_side_are_excluded() {
        let (_, _, maps) = maps_for(
            "<b id=\"x\"></b><b id=\"x\"></b><b id=\"y\"></b>",
            "<b id=\"x\"></b><b id=\"y\"></b><b id=\"y\"></b>",
        );
        assert!(maps.persistent.is_empty());
    }

    #[test]
    fn empty_ids_never_participate() {
        let (_, _, maps) = maps_for("<div id=\"\"></div>", "<div id=\"\"></div>");
        assert!(maps.persistent.is_empty());
        assert!(maps.old.is_empty());
    }

    #[test]
    fn id_map_covers_every_ancestor_up_to_the_root() {
        let (old, _, maps) = maps_for(
            "<section><article><input id=\"field\"></article></section><aside></aside>",
            "<input id=\"field\">",
        );
        let root = old.root();
        let section = old.children(root)[0];
        let article = old.children(section)[0];
        let input = old.children(article)[0];
        let aside = old.children(root)[1];

        for node in [input, article, section, root] {
            let set = maps.old.get(&node).expect("ancestor chain entry");
            assert!(set.contains("field"));
        }
        assert!(!maps.old.contains_key(&aside));
    }

    #[test]
    fn window_roots_halt_upward_propagation() {
        let old = parse_fragment("<input id=\"field\">");
        let new = parse_fragment("<div><input id=\"field\"></div>");
        let div = new.children(new.root())[0];
        let view = ContentView::Window(vec![div]);
        let maps = build_identity_maps(&old, old.root(), &new, &view);
        assert!(maps.new.contains_key(&div));
        assert!(!maps.new.contains_key(&new.root()));
    }
}
