//! In-place DOM reconciliation for server-rendered HTML.
//!
//! Given a live document subtree and a desired replacement, `morph` mutates the
//! live tree into the new shape with as few node creations and removals as it
//! can manage, keeping elements with stable ids (and their form state, focus,
//! and selection) alive across the update.
//!
//! The workspace splits into two crates:
//! - `dom`: the arena document model, a practical HTML parser, and serializers.
//! - `morph`: the reconciliation engine itself, configured via [`MorphOptions`]
//!   and observed via the [`MorphCallbacks`] hook trait.
//!
//! This facade re-exports the public surface of both.

pub use dom::{
    Document, ElementData, NodeData, NodeId, NodeKind, SelectionRange, inner_html, outer_html,
    parse_content, parse_document, parse_fragment,
};
pub use morph::{
    AttributeUpdateKind, ContentSource, DefaultCallbacks, HeadMorphOutcome, HeadOptions, HeadStyle,
    MorphCallbacks, MorphOptions, MorphStyle, PendingResource, UnknownStyle, morph,
    morph_with_callbacks,
};
