//! Line segmentation: flat text split into paragraphs carrying their ranges.
//!
//! Paragraphs are the unit the tree builder consumes. Segmentation happens in
//! three passes: split on line breaks, assign each range to the paragraph
//! containing its start, then merge paragraphs back together wherever a range
//! crosses a line boundary (block constructs such as quotes must render as
//! one continuous styled region).

use crate::ranges::MarkdownRange;
use crate::utf16::utf16_len;

/// A maximal line-break-delimited substring of the flat text.
///
/// After [`merge_spanning_paragraphs`] a paragraph may contain literal `\n`
/// characters: merged lines are re-joined with their separators restored so
/// the paragraph stays a faithful slice of the flat buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// The paragraph text, without a trailing separator.
    pub text: String,
    /// Flat UTF-16 offset of the first code unit.
    pub start: usize,
    /// Length in UTF-16 code units, excluding the trailing separator.
    pub length: usize,
    /// Ranges whose `start` falls inside this paragraph, in classifier order.
    /// Offsets stay in flat coordinates so every stage shares one coordinate
    /// system.
    pub ranges: Vec<MarkdownRange>,
}

impl Paragraph {
    /// Exclusive end offset of the paragraph text.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Split flat text on `\n`. N separators produce N + 1 paragraphs; the
/// separator is counted in the running offset but not in any paragraph's
/// `length`.
pub fn split_paragraphs(text: &str) -> Vec<Paragraph> {
    let mut start = 0;
    text.split('\n')
        .map(|line| {
            let length = utf16_len(line);
            let paragraph = Paragraph {
                text: line.to_string(),
                start,
                length,
                ranges: Vec::new(),
            };
            start += length + 1;
            paragraph
        })
        .collect()
}

/// Assign each range to the paragraph containing its start offset.
///
/// Ranges are classifier-ordered by `start`, so one forward scan over the
/// paragraphs suffices; nothing is re-sorted.
pub fn group_ranges(paragraphs: &mut [Paragraph], ranges: Vec<MarkdownRange>) {
    if paragraphs.is_empty() {
        return;
    }
    let mut index = 0;
    for range in ranges {
        while index + 1 < paragraphs.len() && range.start > paragraphs[index].end() {
            index += 1;
        }
        paragraphs[index].ranges.push(range);
    }
}

/// Fold paragraphs into their predecessor while a range spans the boundary.
///
/// Whenever a paragraph ends inside one of its ranges (`end()` of the range
/// past the paragraph's end), the following paragraph is concatenated onto it
/// with the `\n` separator restored, its ranges appended, and its entry
/// removed, repeating until every range is fully contained in one paragraph.
pub fn merge_spanning_paragraphs(paragraphs: Vec<Paragraph>) -> Vec<Paragraph> {
    let mut merged: Vec<Paragraph> = Vec::with_capacity(paragraphs.len());
    for paragraph in paragraphs {
        if let Some(previous) = merged.last_mut() {
            let open = previous
                .ranges
                .iter()
                .any(|range| range.end() > previous.end());
            if open {
                previous.text.push('\n');
                previous.text.push_str(&paragraph.text);
                previous.length += 1 + paragraph.length;
                previous.ranges.extend(paragraph.ranges);
                continue;
            }
        }
        merged.push(paragraph);
    }
    merged
}

/// Run all three segmentation passes.
pub fn segment(text: &str, ranges: Vec<MarkdownRange>) -> Vec<Paragraph> {
    let mut paragraphs = split_paragraphs(text);
    group_ranges(&mut paragraphs, ranges);
    merge_spanning_paragraphs(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::MarkdownType;

    #[test]
    fn test_split_counts_separators() {
        let paragraphs = split_paragraphs("ab\nc\n\nd");
        assert_eq!(paragraphs.len(), 4);
        assert_eq!((paragraphs[0].start, paragraphs[0].length), (0, 2));
        assert_eq!((paragraphs[1].start, paragraphs[1].length), (3, 1));
        assert_eq!((paragraphs[2].start, paragraphs[2].length), (5, 0));
        assert_eq!((paragraphs[3].start, paragraphs[3].length), (6, 1));
    }

    #[test]
    fn test_split_empty_text_is_one_empty_paragraph() {
        let paragraphs = split_paragraphs("");
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text, "");
    }

    #[test]
    fn test_split_utf16_lengths() {
        let paragraphs = split_paragraphs("👋\nx");
        assert_eq!((paragraphs[0].start, paragraphs[0].length), (0, 2));
        assert_eq!((paragraphs[1].start, paragraphs[1].length), (3, 1));
    }

    #[test]
    fn test_group_assigns_by_start() {
        let mut paragraphs = split_paragraphs("ab\ncd");
        group_ranges(
            &mut paragraphs,
            vec![
                MarkdownRange::new(MarkdownType::Bold, 0, 2),
                MarkdownRange::new(MarkdownType::Italic, 3, 2),
            ],
        );
        assert_eq!(paragraphs[0].ranges.len(), 1);
        assert_eq!(paragraphs[1].ranges.len(), 1);
        // Flat offsets are kept as-is.
        assert_eq!(paragraphs[1].ranges[0].start, 3);
    }

    #[test]
    fn test_merge_quote_spanning_two_lines() {
        let text = "> a\n> b";
        let mut paragraphs = split_paragraphs(text);
        group_ranges(
            &mut paragraphs,
            vec![MarkdownRange::new(MarkdownType::Blockquote, 0, 7)],
        );
        let merged = merge_spanning_paragraphs(paragraphs);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "> a\n> b");
        assert_eq!((merged[0].start, merged[0].length), (0, 7));
    }

    #[test]
    fn test_merge_repeats_until_contained() {
        let text = "q1\nq2\nq3\nplain";
        let mut paragraphs = split_paragraphs(text);
        group_ranges(
            &mut paragraphs,
            vec![MarkdownRange::new(MarkdownType::Blockquote, 0, 8)],
        );
        let merged = merge_spanning_paragraphs(paragraphs);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "q1\nq2\nq3");
        assert_eq!(merged[1].text, "plain");
        assert_eq!(merged[1].start, 9);
    }

    #[test]
    fn test_merge_closure_property() {
        // No paragraph boundary may survive inside any range span.
        let text = "a\nbb\nccc\ndddd";
        let mut paragraphs = split_paragraphs(text);
        group_ranges(
            &mut paragraphs,
            vec![MarkdownRange::new(MarkdownType::Pre, 2, 7)],
        );
        let merged = merge_spanning_paragraphs(paragraphs);
        for paragraph in &merged {
            for range in &paragraph.ranges {
                assert!(range.start >= paragraph.start);
                assert!(range.end() <= paragraph.end());
            }
        }
    }

    #[test]
    fn test_merge_keeps_follow_up_ranges() {
        // A line merged into a quote can itself carry inline ranges.
        let text = "> a\n> **b**";
        let mut paragraphs = split_paragraphs(text);
        group_ranges(
            &mut paragraphs,
            vec![
                MarkdownRange::new(MarkdownType::Blockquote, 0, 11),
                MarkdownRange::new(MarkdownType::Bold, 8, 1),
            ],
        );
        let merged = merge_spanning_paragraphs(paragraphs);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].ranges.len(), 2);
        assert_eq!(merged[0].ranges[1].ty, MarkdownType::Bold);
    }
}
