//! Slot Content Tree
//!
//! The content nodes phrases are parsed into. A node is plain text, a named
//! reference to another slot, or a block of child nodes joined by a separator.
//! Slot references are resolved against a [`SlotMapping`] with [`Fillable::fill`];
//! once every reference is bound a node renders to plain text.

use crate::error::FillError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Named slot bindings for one recipient.
pub type SlotMapping = BTreeMap<String, Fillable>;

/// Structural role of a block. Also names the block constructors callers may
/// select when wrapping sampled content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Block,
    Sentence,
    Paragraph,
    Article,
}

impl BlockKind {
    /// Separator placed between children of a block of this kind.
    pub fn default_separator(self) -> &'static str {
        match self {
            BlockKind::Block | BlockKind::Sentence => "",
            BlockKind::Paragraph => " ",
            BlockKind::Article => "\n\n",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Block => "block",
            BlockKind::Sentence => "sentence",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Article => "article",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = FillError;

    /// Wrap kinds accepted by the block constructor lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(BlockKind::Block),
            "sentence" => Ok(BlockKind::Sentence),
            "paragraph" => Ok(BlockKind::Paragraph),
            _ => Err(FillError::UnknownWrapKind(s.to_string())),
        }
    }
}

/// A node of slot content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fillable {
    /// Literal text, rendered verbatim.
    Atom { text: String },
    /// Reference to another slot by name.
    Slot { name: String },
    /// Ordered children joined by `separator`.
    Block {
        kind: BlockKind,
        children: Vec<Fillable>,
        separator: String,
    },
}

impl Fillable {
    pub fn atom(text: impl Into<String>) -> Self {
        Fillable::Atom { text: text.into() }
    }

    pub fn slot(name: impl Into<String>) -> Self {
        Fillable::Slot { name: name.into() }
    }

    /// Block using the kind's default separator.
    pub fn block(kind: BlockKind, children: Vec<Fillable>) -> Self {
        Self::block_with_separator(kind, children, kind.default_separator())
    }

    pub fn block_with_separator(
        kind: BlockKind,
        children: Vec<Fillable>,
        separator: impl Into<String>,
    ) -> Self {
        Fillable::Block {
            kind,
            children,
            separator: separator.into(),
        }
    }

    /// Wrap parsed content with the block constructor named by `wrap_kind`.
    pub fn wrap(wrap_kind: &str, children: Vec<Fillable>) -> Result<Self, FillError> {
        let kind: BlockKind = wrap_kind.parse()?;
        Ok(Self::block(kind, children))
    }

    /// Resolve slot references in place against `bound`.
    ///
    /// References to names missing from `bound` are left untouched so a later
    /// fill (e.g. the genre skeleton against a full row mapping) can bind them.
    pub fn fill(&mut self, bound: &SlotMapping) {
        match self {
            Fillable::Atom { .. } => {}
            Fillable::Slot { name } => {
                if let Some(value) = bound.get(name.as_str()) {
                    *self = value.clone();
                }
            }
            Fillable::Block { children, .. } => {
                for child in children.iter_mut() {
                    child.fill(bound);
                }
            }
        }
    }

    /// Consuming variant of [`Fillable::fill`].
    pub fn filled(mut self, bound: &SlotMapping) -> Self {
        self.fill(bound);
        self
    }

    /// Names of slot references that are still unbound, sorted and deduplicated.
    pub fn unresolved_slots(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_unresolved(&mut out);
        out
    }

    fn collect_unresolved(&self, out: &mut BTreeSet<String>) {
        match self {
            Fillable::Atom { .. } => {}
            Fillable::Slot { name } => {
                out.insert(name.clone());
            }
            Fillable::Block { children, .. } => {
                for child in children {
                    child.collect_unresolved(out);
                }
            }
        }
    }

    /// Render to plain text. Unbound references render as `{name}`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Fillable::Atom { text } => out.push_str(text),
            Fillable::Slot { name } => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            Fillable::Block {
                children,
                separator,
                ..
            } => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push_str(separator);
                    }
                    child.render_into(out);
                }
            }
        }
    }
}

impl fmt::Display for Fillable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
