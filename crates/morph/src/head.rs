//! Head merging. The `<head>` is not walked like ordinary content:
//!
//! - children are compared by serialized form, so an untouched `<script>` or
//!   `<link>` stays in place and never re-executes or re-fetches;
//! - appended children are recreated from markup rather than imported, which
//!   makes scripts eligible to run again;
//! - appends happen before removals so a replacement stylesheet is requested
//!   while the old one still applies.

use crate::callbacks::{HeadMorphOutcome, PendingResource};
use crate::config::HeadStyle;
use crate::content::ContentView;
use crate::context::MorphContext;
use dom::{Document, NodeId, NodeKind, outer_html, parse_fragment};

/// Merge `new_head` into `old_head` per the configured head style. Returns
/// the appended children that point at external resources, so callers can
/// block on them before continuing.
pub(crate) fn handle_head_element(
    ctx: &mut MorphContext<'_>,
    old_head: NodeId,
    new_head: NodeId,
) -> Vec<PendingResource> {
    let mut added = Vec::new();
    let mut kept = Vec::new();
    let mut removed = Vec::new();
    let mut to_append: Vec<String> = Vec::new();

    // New head children keyed by serialized form. A duplicate key keeps its
    // first position.
    let mut new_by_html: Vec<(String, NodeId)> = Vec::new();
    for &child in ctx.new.children(new_head) {
        if ctx.new.kind(child) != NodeKind::Element {
            continue;
        }
        let html = outer_html(ctx.new, child);
        if let Some(slot) = new_by_html.iter_mut().find(|(key, _)| *key == html) {
            slot.1 = child;
        } else {
            new_by_html.push((html, child));
        }
    }

    let old_children: Vec<NodeId> = ctx
        .old
        .children(old_head)
        .iter()
        .copied()
        .filter(|&child| ctx.old.kind(child) == NodeKind::Element)
        .collect();
    for child in old_children {
        let html = outer_html(ctx.old, child);
        let in_new = new_by_html.iter().any(|(key, _)| *key == html);
        let re_append = ctx.callbacks.head_should_re_append(ctx.old, child);
        let preserve = ctx.callbacks.head_should_preserve(ctx.old, child);
        if in_new || preserve {
            if re_append {
                removed.push(child);
            } else {
                new_by_html.retain(|(key, _)| *key != html);
                kept.push(child);
            }
        } else if ctx.options.head.style == HeadStyle::Append {
            if re_append {
                removed.push(child);
                to_append.push(html);
            }
        } else if ctx.callbacks.head_should_remove(ctx.old, child) {
            removed.push(child);
        }
    }

    to_append.extend(new_by_html.into_iter().map(|(html, _)| html));
    log::debug!(
        target: "morph.head",
        "head merge: {} to append, {} kept, {} to remove",
        to_append.len(),
        kept.len(),
        removed.len()
    );

    let mut pending = Vec::new();
    for html in &to_append {
        let Some(fresh) = recreate_from_html(ctx.old, html) else {
            continue;
        };
        if !ctx.callbacks.before_node_added(ctx.old, fresh) {
            ctx.old.remove_subtree(fresh);
            continue;
        }
        if let Some(url) = resource_url(ctx.old, fresh) {
            pending.push(PendingResource { node: fresh, url });
        }
        ctx.old.append_child(old_head, fresh);
        ctx.callbacks.after_node_added(ctx.old, fresh);
        added.push(fresh);
    }

    // Removals come last; see the module note on stylesheet swaps.
    for &child in &removed {
        if !ctx.callbacks.before_node_removed(ctx.old, child) {
            continue;
        }
        ctx.old.remove_subtree(child);
        ctx.callbacks.after_node_removed(ctx.old, child);
    }

    let outcome = HeadMorphOutcome {
        added,
        kept,
        removed,
    };
    ctx.callbacks.after_head_morphed(ctx.old, &outcome);
    pending
}

/// When head blocking is on, merge heads before any other content moves and
/// hand the resource-bearing appendees to the callback. The main walk then
/// treats the head as already done.
pub(crate) fn head_blocking_prepass(ctx: &mut MorphContext<'_>, view: &ContentView) {
    if !ctx.options.head.block || ctx.options.head.style == HeadStyle::None {
        return;
    }
    let old_head = ctx
        .old
        .subtree(ctx.target)
        .skip(1)
        .find(|&node| ctx.old.name(node) == Some("head"));
    let new_head = view.find_head(ctx.new);
    if let (Some(old_head), Some(new_head)) = (old_head, new_head) {
        log::debug!(target: "morph.head", "blocking head merge ahead of the walk");
        let pending = handle_head_element(ctx, old_head, new_head);
        ctx.callbacks.block_on_head_resources(ctx.old, &pending);
        ctx.head_ignore = true;
    }
}

/// Parse a serialized head child back into a detached node in `doc`. A fresh
/// parse, unlike an import, yields a node that has never executed.
fn recreate_from_html(doc: &mut Document, html: &str) -> Option<NodeId> {
    let fragment = parse_fragment(html);
    let first = fragment.children(fragment.root()).first().copied()?;
    Some(doc.import(&fragment, first))
}

fn resource_url(doc: &Document, node: NodeId) -> Option<String> {
    doc.attribute(node, "href")
        .or_else(|| doc.attribute(node, "src"))
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
}
