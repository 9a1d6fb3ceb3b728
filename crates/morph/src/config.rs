//! Morph configuration.
//!
//! Styles are typed enums. The string forms accepted via [`FromStr`] exist for
//! embedders that configure from markup attributes; an unknown string fails
//! there, before any mutation has happened.

use std::fmt;
use std::str::FromStr;

/// How the target node participates in the morph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MorphStyle {
    /// Reconcile the target node itself against the new content.
    #[default]
    OuterHtml,
    /// Keep the target node as is; reconcile only its children.
    InnerHtml,
}

impl MorphStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            MorphStyle::OuterHtml => "outerHTML",
            MorphStyle::InnerHtml => "innerHTML",
        }
    }
}

impl fmt::Display for MorphStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MorphStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, UnknownStyle> {
        match s {
            "outerHTML" => Ok(MorphStyle::OuterHtml),
            "innerHTML" => Ok(MorphStyle::InnerHtml),
            _ => Err(UnknownStyle::new("morph", s)),
        }
    }
}

/// How `<head>` elements are reconciled when a morph reaches one.
///
/// Head children are sensitive to re-insertion (scripts execute once,
/// stylesheets re-fetch), so by default they are merged by exact markup
/// instead of walked like ordinary children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeadStyle {
    /// Keep matching children in place, append new ones, remove stale ones.
    #[default]
    Merge,
    /// Only append new children; never remove existing ones.
    Append,
    /// Treat the head like any other element and walk its children.
    Morph,
    /// Leave the old head entirely alone.
    None,
}

impl HeadStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            HeadStyle::Merge => "merge",
            HeadStyle::Append => "append",
            HeadStyle::Morph => "morph",
            HeadStyle::None => "none",
        }
    }
}

impl fmt::Display for HeadStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, UnknownStyle> {
        match s {
            "merge" => Ok(HeadStyle::Merge),
            "append" => Ok(HeadStyle::Append),
            "morph" => Ok(HeadStyle::Morph),
            "none" => Ok(HeadStyle::None),
            _ => Err(UnknownStyle::new("head", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeadOptions {
    pub style: HeadStyle,
    /// Handle the head before the rest of the document and hand the
    /// fetch-triggering appendees to the `block_on_head_resources` hook
    /// first. The remainder of the morph then treats the head as done.
    pub block: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MorphOptions {
    pub style: MorphStyle,
    /// Leave the focused element entirely alone.
    pub ignore_active: bool,
    /// Freeze the focused element's value and children while still updating
    /// its other attributes.
    pub ignore_active_value: bool,
    /// When the morph displaced focus, find the control again by its id and
    /// restore focus and selection.
    pub restore_focus: bool,
    pub head: HeadOptions,
}

impl Default for MorphOptions {
    fn default() -> Self {
        Self {
            style: MorphStyle::default(),
            ignore_active: false,
            ignore_active_value: false,
            restore_focus: true,
            head: HeadOptions::default(),
        }
    }
}

/// A style string that names no known style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStyle {
    pub option: &'static str,
    pub value: String,
}

impl UnknownStyle {
    fn new(option: &'static str, value: &str) -> Self {
        Self {
            option,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} style {:?}", self.option, self.value)
    }
}

impl std::error::Error for UnknownStyle {}
