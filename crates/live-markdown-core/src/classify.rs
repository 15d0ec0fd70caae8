//! The range classifier boundary.
//!
//! Classification (which substrings are bold, links, quotes) is external to
//! the engine: the session holds a classifier behind this trait and never
//! inspects how the ranges were produced, so grammars can be swapped and
//! versioned independently.

use crate::ranges::MarkdownRange;

/// Turns flat text into markdown ranges.
///
/// Implementations must emit ranges ordered by `start`; ties keep the
/// emission order, which downstream nesting preserves. Offsets are UTF-16
/// code units into `text`. Ranges may still carry `depth` grouping; the
/// engine expands it.
pub trait RangeClassifier {
    /// Classify `text` into start-ordered ranges.
    fn classify(&mut self, text: &str) -> Vec<MarkdownRange>;
}

/// The null classifier: everything is plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextClassifier;

impl RangeClassifier for PlainTextClassifier {
    fn classify(&mut self, _text: &str) -> Vec<MarkdownRange> {
        Vec::new()
    }
}

/// Any closure with the right shape is a classifier.
impl<F> RangeClassifier for F
where
    F: FnMut(&str) -> Vec<MarkdownRange>,
{
    fn classify(&mut self, text: &str) -> Vec<MarkdownRange> {
        self(text)
    }
}
