//! Markdown range model and range normalization.
//!
//! Ranges arrive from a [`RangeClassifier`](crate::classify::RangeClassifier)
//! pre-ordered by `start`. Before the tree builder consumes them they are
//! expanded (grouped syntax tokens become individual ranges) and sanitized
//! (empty ranges dropped, overlong ranges clamped to the text length).

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// The closed set of markdown classifications a range can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkdownType {
    /// Bold emphasis content.
    Bold,
    /// Italic emphasis content.
    Italic,
    /// Struck-through content.
    Strikethrough,
    /// An emoji sequence rendered with its own styling.
    Emoji,
    /// A hyperlink target or label.
    Link,
    /// Inline code.
    Code,
    /// A fenced code block.
    Pre,
    /// A block quote (may span multiple lines).
    Blockquote,
    /// A level-one heading.
    H1,
    /// Literal delimiter characters (e.g. `**`); never nests other ranges.
    Syntax,
    /// An `@here` style mention.
    MentionHere,
    /// A mention of a specific user.
    MentionUser,
    /// A mention of a report/room.
    MentionReport,
    /// Unstyled text (also the classification of plain runs in the tree).
    Text,
}

/// A typed span of flat UTF-16 offsets produced by a range classifier.
///
/// `start` and `length` index the flat text buffer the user edits, not any
/// rendered structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownRange {
    /// The markdown classification of this span.
    #[serde(rename = "type")]
    pub ty: MarkdownType,
    /// Flat offset of the first code unit, in UTF-16 units.
    pub start: usize,
    /// Span length in UTF-16 code units.
    pub length: usize,
    /// Repetition count for grouped syntax tokens. A range with `depth = d`
    /// stands for `d` identical ranges at this position; [`expand_ranges`]
    /// removes the grouping and nothing downstream ever sees it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<NonZeroUsize>,
}

impl MarkdownRange {
    /// Create an ungrouped range.
    pub fn new(ty: MarkdownType, start: usize, length: usize) -> Self {
        Self {
            ty,
            start,
            length,
            depth: None,
        }
    }

    /// Create a range grouped `depth` times. `depth <= 1` means no grouping.
    pub fn with_depth(ty: MarkdownType, start: usize, length: usize, depth: usize) -> Self {
        Self {
            ty,
            start,
            length,
            depth: NonZeroUsize::new(depth).filter(|d| d.get() > 1),
        }
    }

    /// Exclusive end offset of this range.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Expand grouped ranges into individual flat ranges.
///
/// A range with `depth = d` is replaced by `d` copies of the same
/// `{ty, start, length}`; ungrouped ranges pass through as a single copy.
/// Classifier order is preserved (the sequence is never re-sorted), since
/// downstream nesting relies on the classifier's stable tie order.
pub fn expand_ranges(ranges: &[MarkdownRange]) -> Vec<MarkdownRange> {
    let mut expanded = Vec::with_capacity(ranges.len());
    for range in ranges {
        match range.depth {
            None => expanded.push(range.clone()),
            Some(depth) => {
                for _ in 0..depth.get() {
                    expanded.push(MarkdownRange::new(range.ty, range.start, range.length));
                }
            }
        }
    }
    expanded
}

/// Drop empty ranges and clamp overlong ones to `text_len` (UTF-16 units).
///
/// A classifier emitting a zero-length or out-of-bounds range is a caller
/// bug; rendering continues with the remaining ranges rather than aborting
/// the rebuild over one bad range.
pub fn sanitize_ranges(ranges: Vec<MarkdownRange>, text_len: usize) -> Vec<MarkdownRange> {
    ranges
        .into_iter()
        .filter_map(|mut range| {
            if range.length == 0 || range.start >= text_len {
                return None;
            }
            if range.end() > text_len {
                range.length = text_len - range.start;
            }
            Some(range)
        })
        .collect()
}
