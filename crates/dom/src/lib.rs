//! Arena-backed HTML document model and parser.
//!
//! Pipeline: `tokenizer` turns HTML source into a flat token stream,
//! `builder` assembles tokens into a [`tree::Document`], and `serialize`
//! renders subtrees back to HTML. The model tracks the state a reconciler
//! needs beyond plain markup:
//!
//! - live form state (value, checked, disabled, selected) that shadows
//!   attributes once written,
//! - an active (focused) element and its text selection range,
//! - atomic subtree moves via [`tree::Document::move_before`] that keep
//!   focus and live state intact.
//!
//! Parsing is intentionally lenient: unknown or malformed constructs decay
//! to text, mismatched end tags are dropped, and attribute entities are
//! decoded with a small named set plus numeric references. This is not a
//! conforming HTML5 parser and does not try to be; the error-recovery
//! behaviors it does implement are pinned by tests.

mod builder;
mod entities;
mod tokenizer;

pub mod serialize;
pub mod tree;

#[cfg(any(test, feature = "dom-snapshot"))]
pub mod snapshot;

pub use builder::{parse_content, parse_document, parse_fragment};
pub use serialize::{inner_html, outer_html};
pub use tree::{Document, ElementData, NodeData, NodeId, NodeKind, SelectionRange};
