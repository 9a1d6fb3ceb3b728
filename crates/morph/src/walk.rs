//! Child-list reconciliation.
//!
//! The walker consumes the new children in order while an insertion cursor
//! moves through a bounded region of the old children. For each new child it
//! scans ahead of the cursor for the best reusable old node:
//!
//! - an id-set match (a soft match whose subtree shares a persistent id with
//!   the new child's subtree) wins immediately;
//! - otherwise the first soft-matching candidate that carries no persistent
//!   ids of its own is kept as a fallback;
//! - once two upcoming new siblings have soft-matched scanned candidates, the
//!   fallback is abandoned: those candidates are about to be claimed by the
//!   siblings, and consuming one here would cascade into rebuilding the rest.
//!
//! The scan also stops at the focused element (or an ancestor of it), because
//! claiming a match beyond it would detour that node through the pantry and
//! focus would not survive.

use crate::context::MorphContext;
use crate::node::{create_node, morph_node, move_before_by_id, remove_node};
use dom::{Document, NodeId};

pub(crate) fn morph_children(
    ctx: &mut MorphContext<'_>,
    old_parent: NodeId,
    new_children: &[NodeId],
    start: Option<NodeId>,
    end: Option<NodeId>,
) {
    let mut insertion_point = start.or_else(|| ctx.old.first_child(old_parent));

    for (index, &new_child) in new_children.iter().enumerate() {
        if let Some(cursor) = insertion_point
            && Some(cursor) != end
            && let Some(best) =
                find_best_match(ctx, new_child, &new_children[index + 1..], cursor, end)
        {
            if best != cursor {
                remove_nodes_between(ctx, cursor, best);
            }
            morph_node(ctx, best, new_child);
            insertion_point = ctx.old.next_sibling(best);
            continue;
        }

        // The matching node may sit elsewhere in the target, or in the pantry.
        let new_doc = ctx.new;
        if let Some(id) = new_doc.html_id(new_child)
            && ctx.persistent_ids.contains(id)
            && let Some(moved) = move_before_by_id(ctx, old_parent, id, insertion_point)
        {
            morph_node(ctx, moved, new_child);
            insertion_point = ctx.old.next_sibling(moved);
            continue;
        }

        // Last resort: materialize the new child from scratch.
        if let Some(inserted) = create_node(ctx, old_parent, new_child, insertion_point) {
            insertion_point = ctx.old.next_sibling(inserted);
        }
    }

    // Old children that never matched are surplus.
    while let Some(cursor) = insertion_point
        && Some(cursor) != end
    {
        insertion_point = ctx.old.next_sibling(cursor);
        remove_node(ctx, cursor);
    }
}

enum SoftSlot {
    Empty,
    Found(NodeId),
    Blocked,
}

fn find_best_match(
    ctx: &MorphContext<'_>,
    new_node: NodeId,
    upcoming: &[NodeId],
    start: NodeId,
    end: Option<NodeId>,
) -> Option<NodeId> {
    let old = &*ctx.old;
    let new = ctx.new;
    let mut slot = SoftSlot::Empty;
    let mut lookahead = upcoming.iter().copied();
    let mut next_new_sibling = lookahead.next();
    let mut upcoming_soft_matches = 0u32;

    let mut cursor = Some(start);
    while let Some(candidate) = cursor
        && Some(candidate) != end
    {
        if is_soft_match(old, candidate, new, new_node) {
            if is_id_set_match(ctx, candidate, new_node) {
                return Some(candidate);
            }
            if matches!(slot, SoftSlot::Empty) && !ctx.id_map_old.contains_key(&candidate) {
                // Candidates with persistent content stay available for an id
                // match further along.
                slot = SoftSlot::Found(candidate);
            }
        }

        if matches!(slot, SoftSlot::Empty)
            && let Some(sibling) = next_new_sibling
            && is_soft_match(old, candidate, new, sibling)
        {
            upcoming_soft_matches += 1;
            next_new_sibling = lookahead.next();
            if upcoming_soft_matches >= 2 {
                slot = SoftSlot::Blocked;
            }
        }

        if let Some(active) = old.active_element()
            && old.contains(candidate, active)
        {
            break;
        }

        cursor = old.next_sibling(candidate);
    }

    match slot {
        SoftSlot::Found(node) => Some(node),
        SoftSlot::Empty | SoftSlot::Blocked => None,
    }
}

/// Same kind and tag, and an old id (if any) that the new node repeats. An
/// old element carrying a different id may hold state destined for another
/// place in the tree, so it is not reusable here; an old node without an id
/// has no such claim and may take on the new node's id.
fn is_soft_match(old: &Document, old_node: NodeId, new: &Document, new_node: NodeId) -> bool {
    old.kind(old_node) == new.kind(new_node)
        && old.name(old_node) == new.name(new_node)
        && old
            .html_id(old_node)
            .is_none_or(|id| Some(id) == new.html_id(new_node))
}

/// Do the two subtrees share at least one persistent id?
fn is_id_set_match(ctx: &MorphContext<'_>, old_node: NodeId, new_node: NodeId) -> bool {
    let (Some(old_set), Some(new_set)) =
        (ctx.id_map_old.get(&old_node), ctx.id_map_new.get(&new_node))
    else {
        return false;
    };
    old_set.iter().any(|id| new_set.contains(id))
}

fn remove_nodes_between(ctx: &mut MorphContext<'_>, start: NodeId, end_exclusive: NodeId) {
    let mut cursor = Some(start);
    while let Some(node) = cursor
        && node != end_exclusive
    {
        cursor = ctx.old.next_sibling(node);
        remove_node(ctx, node);
    }
}
