//! Phrase and template parsing into slot content.

use crate::content::{BlockKind, Fillable, SlotMapping};
use crate::error::FillError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity a raw phrase is parsed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    Sentence,
    Paragraph,
    Article,
}

impl Grain {
    /// Short prefix used in slot tags (`sent_overall`, `para_final`).
    pub fn tag_prefix(self) -> &'static str {
        match self {
            Grain::Sentence => "sent",
            Grain::Paragraph => "para",
            Grain::Article => "article",
        }
    }
}

impl fmt::Display for Grain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grain::Sentence => "sentence",
            Grain::Paragraph => "paragraph",
            Grain::Article => "article",
        };
        f.write_str(s)
    }
}

/// Turns raw text into slot content.
pub trait Parser {
    fn parse_sentence(&self, text: &str) -> Fillable;

    fn parse_paragraph(&self, text: &str) -> Fillable;

    fn parse_article(&self, text: &str) -> Fillable;

    /// Parse a free-form roster cell whose column name selects how it is parsed.
    /// Returns zero or more named slots.
    fn parse_by_tag(&self, tag: &str, text: &str) -> Result<SlotMapping, FillError>;

    fn parse(&self, text: &str, grain: Grain) -> Fillable {
        match grain {
            Grain::Sentence => self.parse_sentence(text),
            Grain::Paragraph => self.parse_paragraph(text),
            Grain::Article => self.parse_article(text),
        }
    }
}

/// Split `text` on `separator`, keeping trimmed non-empty segments.
pub fn nonempty_segments<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    text.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Plain-text template parser.
///
/// `{name}` marks a reference to the slot `name` (ASCII letters, digits and
/// underscores). Any other brace sequence is literal text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateParser;

impl TemplateParser {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Vec<Fillable> {
        let mut nodes = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if name_len > 0 && after[name_len..].starts_with('}') {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    nodes.push(Fillable::atom(std::mem::take(&mut literal)));
                }
                nodes.push(Fillable::slot(&after[..name_len]));
                rest = &after[name_len + 1..];
            } else {
                literal.push_str(&rest[..=open]);
                rest = after;
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            nodes.push(Fillable::atom(literal));
        }
        nodes
    }
}

impl Parser for TemplateParser {
    fn parse_sentence(&self, text: &str) -> Fillable {
        Fillable::block(BlockKind::Sentence, Self::tokenize(text.trim()))
    }

    fn parse_paragraph(&self, text: &str) -> Fillable {
        let sentences = nonempty_segments(text, "\n")
            .into_iter()
            .map(|line| self.parse_sentence(line))
            .collect();
        Fillable::block(BlockKind::Paragraph, sentences)
    }

    fn parse_article(&self, text: &str) -> Fillable {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(self.parse_paragraph(&current.join("\n")));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(self.parse_paragraph(&current.join("\n")));
        }
        Fillable::block(BlockKind::Article, paragraphs)
    }

    fn parse_by_tag(&self, tag: &str, text: &str) -> Result<SlotMapping, FillError> {
        let (prefix, _) = tag
            .split_once('_')
            .ok_or_else(|| FillError::UnknownTag(tag.to_string()))?;

        let node = match prefix {
            "atom" | "word" => Fillable::atom(text.trim()),
            "sent" => self.parse_sentence(text),
            "para" => self.parse_paragraph(text),
            _ => return Err(FillError::UnknownTag(tag.to_string())),
        };

        let mut out = SlotMapping::new();
        if !text.trim().is_empty() {
            out.insert(tag.to_string(), node);
        }
        Ok(out)
    }
}
