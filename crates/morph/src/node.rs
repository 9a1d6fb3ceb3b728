//! Single-pair morphing: attributes, character data, form-control state, and
//! the add/remove/relocate primitives the walker drives.

use crate::callbacks::AttributeUpdateKind;
use crate::config::HeadStyle;
use crate::context::MorphContext;
use crate::head::handle_head_element;
use crate::walk::morph_children;
use dom::{NodeId, NodeKind};

/// Morph one matched pair. Returns `None` when the old node was skipped
/// because it holds focus and `ignore_active` is set.
pub(crate) fn morph_node(
    ctx: &mut MorphContext<'_>,
    old_node: NodeId,
    new_node: NodeId,
) -> Option<NodeId> {
    if ctx.options.ignore_active && ctx.old.active_element() == Some(old_node) {
        return None;
    }
    if !ctx
        .callbacks
        .before_node_morphed(ctx.old, old_node, ctx.new, new_node)
    {
        return Some(old_node);
    }

    let is_head = ctx.old.name(old_node) == Some("head");
    if is_head && (ctx.head_ignore || ctx.options.head.style == HeadStyle::None) {
        // Already handled by a blocking pre-pass, or deliberately left alone.
    } else if is_head && ctx.options.head.style != HeadStyle::Morph {
        handle_head_element(ctx, old_node, new_node);
    } else {
        morph_attributes(ctx, old_node, new_node);
        if !ignore_value_of_active_element(ctx, old_node) {
            let new_doc = ctx.new;
            morph_children(ctx, old_node, new_doc.children(new_node), None, None);
        }
    }

    ctx.callbacks
        .after_node_morphed(ctx.old, old_node, ctx.new, new_node);
    Some(old_node)
}

/// Remove an old node the walker no longer wants at its position. Nodes with
/// persistent content are parked in the pantry without callbacks; they may
/// still be claimed by id. Everything else is removed for real, subject to
/// the veto.
pub(crate) fn remove_node(ctx: &mut MorphContext<'_>, node: NodeId) {
    if ctx.id_map_old.contains_key(&node) {
        log::trace!(target: "morph.walk", "parking {:?} in the pantry", node);
        let pantry = ctx.pantry;
        ctx.old.move_before(node, pantry, None);
    } else {
        if !ctx.callbacks.before_node_removed(ctx.old, node) {
            return;
        }
        ctx.old.remove_subtree(node);
        ctx.callbacks.after_node_removed(ctx.old, node);
    }
}

/// Relocate the persistent element with `id` to sit before `before` under
/// `parent`, looking first in the target subtree and then in the pantry. The
/// move is a single splice; focus and live state survive it.
pub(crate) fn move_before_by_id(
    ctx: &mut MorphContext<'_>,
    parent: NodeId,
    id: &str,
    before: Option<NodeId>,
) -> Option<NodeId> {
    let found = ctx
        .old
        .element_by_html_id(ctx.target, id)
        .or_else(|| ctx.old.element_by_html_id(ctx.pantry, id));
    let Some(element) = found else {
        debug_assert!(false, "persistent id {id:?} missing from target and pantry");
        log::warn!(
            target: "morph.walk",
            "persistent id {id:?} not found; falling back to a fresh insert"
        );
        return None;
    };
    log::trace!(target: "morph.walk", "moving #{id} into place");
    remove_from_ancestor_id_sets(ctx, element);
    ctx.old.move_before(element, parent, before);
    Some(element)
}

/// The element is leaving its old spot for good; its former ancestors no
/// longer count as holding its id.
fn remove_from_ancestor_id_sets(ctx: &mut MorphContext<'_>, element: NodeId) {
    let Some(id) = ctx.old.html_id(element) else {
        return;
    };
    let mut current = ctx.old.parent(element);
    while let Some(node) = current {
        if let Some(set) = ctx.id_map_old.get_mut(&node) {
            set.remove(id);
            if set.is_empty() {
                ctx.id_map_old.remove(&node);
            }
        }
        current = ctx.old.parent(node);
    }
}

/// Materialize a new child in the old tree before `before`. When the child's
/// subtree contains persistent ids, an empty same-tag shell is inserted and
/// morphed so those elements can be pulled in by identity; otherwise a plain
/// deep copy suffices.
pub(crate) fn create_node(
    ctx: &mut MorphContext<'_>,
    old_parent: NodeId,
    new_child: NodeId,
    before: Option<NodeId>,
) -> Option<NodeId> {
    if !ctx.callbacks.before_node_added(ctx.new, new_child) {
        return None;
    }
    let new_doc = ctx.new;
    let inserted = if ctx.id_map_new.contains_key(&new_child)
        && let Some(tag) = new_doc.name(new_child)
    {
        let shell = ctx.old.create_element(tag);
        ctx.old.insert_before(old_parent, shell, before);
        morph_node(ctx, shell, new_child);
        shell
    } else {
        let clone = ctx.old.import(new_doc, new_child);
        ctx.old.insert_before(old_parent, clone, before);
        clone
    };
    ctx.callbacks.after_node_added(ctx.old, inserted);
    Some(inserted)
}

fn morph_attributes(ctx: &mut MorphContext<'_>, old_node: NodeId, new_node: NodeId) {
    let new_doc = ctx.new;
    match (ctx.old.kind(old_node), new_doc.kind(new_node)) {
        (NodeKind::Element, NodeKind::Element) => {
            for (name, value) in new_doc.attributes(new_node) {
                if ignore_attribute(ctx, name, old_node, AttributeUpdateKind::Update) {
                    continue;
                }
                if ctx.old.attribute(old_node, name) != Some(value.as_str()) {
                    ctx.old.set_attribute(old_node, name, value);
                }
            }
            // Removals sweep backwards over a snapshot of the old list.
            let stale: Vec<String> = ctx
                .old
                .attributes(old_node)
                .iter()
                .rev()
                .map(|(name, _)| name.clone())
                .filter(|name| !new_doc.has_attribute(new_node, name))
                .collect();
            for name in &stale {
                if ignore_attribute(ctx, name, old_node, AttributeUpdateKind::Remove) {
                    continue;
                }
                ctx.old.remove_attribute(old_node, name);
            }
            if !ignore_value_of_active_element(ctx, old_node) {
                sync_input_value(ctx, old_node, new_node);
            }
        }
        (NodeKind::Text, NodeKind::Text) | (NodeKind::Comment, NodeKind::Comment) => {
            if ctx.old.text(old_node) != new_doc.text(new_node)
                && let Some(text) = new_doc.text(new_node)
            {
                ctx.old.set_text(old_node, text);
            }
        }
        _ => {}
    }
}

fn ignore_attribute(
    ctx: &mut MorphContext<'_>,
    name: &str,
    element: NodeId,
    kind: AttributeUpdateKind,
) -> bool {
    if name == "value"
        && ctx.options.ignore_active_value
        && ctx.old.active_element() == Some(element)
    {
        return true;
    }
    !ctx.callbacks
        .before_attribute_updated(name, ctx.old, element, kind)
}

fn ignore_value_of_active_element(ctx: &MorphContext<'_>, node: NodeId) -> bool {
    ctx.options.ignore_active_value && ctx.old.active_element() == Some(node)
}

/// Form controls carry live state next to their attributes; morphing only the
/// attribute would leave what the user sees untouched. The new side's
/// effective value wins, and an absent `value` attribute clears both the live
/// value and the attribute. File inputs are exempt: their value cannot be
/// assigned.
fn sync_input_value(ctx: &mut MorphContext<'_>, old_node: NodeId, new_node: NodeId) {
    let new_doc = ctx.new;
    let Some(tag) = ctx.old.name(old_node).map(str::to_owned) else {
        return;
    };
    if new_doc.name(new_node) != Some(tag.as_str()) {
        return;
    }
    match tag.as_str() {
        "input" => {
            if new_doc
                .attribute(new_node, "type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("file"))
            {
                return;
            }
            let new_value = new_doc.value(new_node);
            let old_value = ctx.old.value(old_node);

            sync_boolean_attribute(ctx, old_node, new_node, "checked");
            sync_boolean_attribute(ctx, old_node, new_node, "disabled");

            if !new_doc.has_attribute(new_node, "value") {
                if !ignore_attribute(ctx, "value", old_node, AttributeUpdateKind::Remove) {
                    ctx.old.set_value(old_node, "");
                    ctx.old.remove_attribute(old_node, "value");
                }
            } else if old_value != new_value
                && !ignore_attribute(ctx, "value", old_node, AttributeUpdateKind::Update)
            {
                ctx.old.set_attribute(old_node, "value", &new_value);
                ctx.old.set_value(old_node, &new_value);
            }
        }
        "option" => sync_boolean_attribute(ctx, old_node, new_node, "selected"),
        "textarea" => {
            let new_value = new_doc.value(new_node);
            let old_value = ctx.old.value(old_node);
            if ignore_attribute(ctx, "value", old_node, AttributeUpdateKind::Update) {
                return;
            }
            if new_value != old_value {
                ctx.old.set_value(old_node, &new_value);
            }
            if let Some(first) = ctx.old.first_child(old_node)
                && ctx.old.text(first).is_some_and(|text| text != new_value)
            {
                ctx.old.set_text(first, &new_value);
            }
        }
        _ => {}
    }
}

/// Live boolean properties (`checked`, `disabled`, `selected`) sync from the
/// new side, and the attribute reflects the result: present-and-empty when
/// true, absent when false. Property write and attribute set share one
/// update gate; the attribute removal has its own.
fn sync_boolean_attribute(
    ctx: &mut MorphContext<'_>,
    old_node: NodeId,
    new_node: NodeId,
    name: &str,
) {
    let new_live = ctx.new.boolean_property(new_node, name);
    let old_live = ctx.old.boolean_property(old_node, name);
    if new_live == old_live {
        return;
    }
    let ignore_update = ignore_attribute(ctx, name, old_node, AttributeUpdateKind::Update);
    if !ignore_update {
        ctx.old.set_boolean_property(old_node, name, new_live);
    }
    if new_live {
        if !ignore_update {
            ctx.old.set_attribute(old_node, name, "");
        }
    } else if !ignore_attribute(ctx, name, old_node, AttributeUpdateKind::Remove) {
        ctx.old.remove_attribute(old_node, name);
    }
}
