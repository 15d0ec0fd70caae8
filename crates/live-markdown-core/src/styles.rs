//! Markdown style configuration and per-type attribute resolution.
//!
//! Styles are opaque to the engine: each markdown type maps to a set of
//! name/value rendering attributes the surface applies verbatim. Hosts supply
//! partial configurations (typically as JSON) which are merged over the
//! built-in defaults.

use crate::ranges::MarkdownType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque rendering attributes for one markdown type.
pub type StyleAttributes = BTreeMap<String, String>;

/// Host-supplied per-type styling.
///
/// Field names follow the camelCase shape of the host-side configuration, so
/// an existing JSON style object deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkdownStyle {
    /// Attributes for literal delimiter characters.
    pub syntax: StyleAttributes,
    /// Attributes for emoji sequences.
    pub emoji: StyleAttributes,
    /// Attributes for links.
    pub link: StyleAttributes,
    /// Attributes for inline code.
    pub code: StyleAttributes,
    /// Attributes for fenced code blocks.
    pub pre: StyleAttributes,
    /// Attributes for block quotes.
    pub blockquote: StyleAttributes,
    /// Attributes for level-one headings.
    pub h1: StyleAttributes,
    /// Attributes for `@here` mentions.
    pub mention_here: StyleAttributes,
    /// Attributes for user mentions.
    pub mention_user: StyleAttributes,
    /// Attributes for report mentions.
    pub mention_report: StyleAttributes,
}

fn attrs(pairs: &[(&str, &str)]) -> StyleAttributes {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

impl Default for MarkdownStyle {
    fn default() -> Self {
        Self {
            syntax: attrs(&[("color", "gray")]),
            emoji: attrs(&[("fontSize", "20")]),
            link: attrs(&[("color", "blue")]),
            code: attrs(&[
                ("fontFamily", "monospace"),
                ("color", "black"),
                ("backgroundColor", "lightgray"),
            ]),
            pre: attrs(&[
                ("fontFamily", "monospace"),
                ("color", "black"),
                ("backgroundColor", "lightgray"),
            ]),
            blockquote: attrs(&[
                ("borderColor", "gray"),
                ("borderWidth", "6"),
                ("marginLeft", "6"),
                ("paddingLeft", "6"),
            ]),
            h1: attrs(&[("fontSize", "25")]),
            mention_here: attrs(&[("color", "green"), ("backgroundColor", "lime")]),
            mention_user: attrs(&[("color", "blue"), ("backgroundColor", "cyan")]),
            mention_report: StyleAttributes::new(),
        }
    }
}

impl MarkdownStyle {
    /// Parse a (possibly partial) host style configuration and merge it over
    /// the defaults, attribute by attribute.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let partial: MarkdownStyle = serde_json::from_str(json)?;
        Ok(Self::default().merged_with(partial))
    }

    /// Overlay `overrides` on top of `self`, per type and per attribute.
    pub fn merged_with(mut self, overrides: MarkdownStyle) -> Self {
        fn overlay(base: &mut StyleAttributes, extra: StyleAttributes) {
            base.extend(extra);
        }
        overlay(&mut self.syntax, overrides.syntax);
        overlay(&mut self.emoji, overrides.emoji);
        overlay(&mut self.link, overrides.link);
        overlay(&mut self.code, overrides.code);
        overlay(&mut self.pre, overrides.pre);
        overlay(&mut self.blockquote, overrides.blockquote);
        overlay(&mut self.h1, overrides.h1);
        overlay(&mut self.mention_here, overrides.mention_here);
        overlay(&mut self.mention_user, overrides.mention_user);
        overlay(&mut self.mention_report, overrides.mention_report);
        self
    }
}

/// Resolve the attributes a span of the given type carries.
///
/// Some types always apply fixed attributes on top of the host configuration
/// (bold is bold regardless of styling). The match is exhaustive over
/// [`MarkdownType`]: adding a variant without deciding its styling is a
/// compile error, not a runtime fallthrough.
pub fn attributes_for(style: &MarkdownStyle, ty: MarkdownType) -> StyleAttributes {
    fn with_fixed(mut base: StyleAttributes, fixed: &[(&str, &str)]) -> StyleAttributes {
        for (name, value) in fixed {
            base.insert(name.to_string(), value.to_string());
        }
        base
    }

    match ty {
        MarkdownType::Bold => attrs(&[("fontWeight", "bold")]),
        MarkdownType::Italic => attrs(&[("fontStyle", "italic")]),
        MarkdownType::Strikethrough => attrs(&[("textDecorationLine", "line-through")]),
        MarkdownType::Emoji => style.emoji.clone(),
        MarkdownType::Link => with_fixed(
            style.link.clone(),
            &[("textDecorationLine", "underline")],
        ),
        MarkdownType::Code => style.code.clone(),
        MarkdownType::Pre => style.pre.clone(),
        MarkdownType::Blockquote => with_fixed(
            style.blockquote.clone(),
            &[
                ("borderLeftStyle", "solid"),
                ("display", "inline-block"),
                ("maxWidth", "100%"),
                ("boxSizing", "border-box"),
            ],
        ),
        MarkdownType::H1 => with_fixed(style.h1.clone(), &[("fontWeight", "bold")]),
        MarkdownType::Syntax => style.syntax.clone(),
        MarkdownType::MentionHere => style.mention_here.clone(),
        MarkdownType::MentionUser => style.mention_user.clone(),
        MarkdownType::MentionReport => style.mention_report.clone(),
        MarkdownType::Text => StyleAttributes::new(),
    }
}
