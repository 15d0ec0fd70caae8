//! `live-markdown-classify-simple` - Simple (regex-based) markdown range
//! classifier for `live-markdown-core`.
//!
//! This crate covers a lightweight chat-markdown subset (bold, italic,
//! strikethrough, inline code, headings, quotes, links, mentions) where a
//! full markdown parser is unnecessary. It is the default implementation of
//! the engine's classifier boundary, not a complete grammar.

use live_markdown_core::{MarkdownRange, MarkdownType, RangeClassifier};
use regex::Regex;
use thiserror::Error;

/// Classifier construction errors.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// A rule pattern failed to compile.
    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A single inline rule: delimiter, content capture, delimiter.
#[derive(Debug, Clone)]
pub struct InlineRule {
    regex: Regex,
    ty: MarkdownType,
    delimiter_len: usize,
}

impl InlineRule {
    /// `pattern` must expose the styled content as capture group 1, flanked
    /// by `delimiter_len` literal delimiter characters on each side.
    pub fn new(
        pattern: &str,
        ty: MarkdownType,
        delimiter_len: usize,
    ) -> Result<Self, ClassifierError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            ty,
            delimiter_len,
        })
    }

    pub fn markdown_type(&self) -> MarkdownType {
        self.ty
    }
}

/// A regex-based classifier over a chat-markdown subset.
///
/// Emitted ranges are ordered by `start` and use UTF-16 code unit offsets,
/// as the engine's classifier boundary requires. Nested quote markers come
/// out depth-grouped (`>>` is one blockquote range with `depth = 2`).
#[derive(Debug, Clone)]
pub struct SimpleClassifier {
    inline: Vec<InlineRule>,
    link: Regex,
    mention: Regex,
}

impl SimpleClassifier {
    /// The default rule set.
    pub fn new() -> Result<Self, ClassifierError> {
        Ok(Self {
            inline: vec![
                InlineRule::new(r"\*\*([^*\n]+)\*\*", MarkdownType::Bold, 2)?,
                InlineRule::new(r"_([^_\n]+)_", MarkdownType::Italic, 1)?,
                InlineRule::new(r"~([^~\n]+)~", MarkdownType::Strikethrough, 1)?,
                InlineRule::new(r"`([^`\n]+)`", MarkdownType::Code, 1)?,
            ],
            link: Regex::new(r"https?://[^\s]+")?,
            // One pattern for both mention kinds; `@here` is special-cased.
            mention: Regex::new(r"@[A-Za-z0-9.+_-]+(?:@[A-Za-z0-9.-]+)?")?,
        })
    }

    /// Custom inline rules on top of the link/mention defaults.
    pub fn with_inline_rules(rules: Vec<InlineRule>) -> Result<Self, ClassifierError> {
        Ok(Self {
            inline: rules,
            ..Self::new()?
        })
    }

    pub fn inline_rules(&self) -> &[InlineRule] {
        &self.inline
    }

    fn classify_line(&self, line: &str, offset: usize, ranges: &mut Vec<MarkdownRange>) {
        for rule in &self.inline {
            for caps in rule.regex.captures_iter(line) {
                let (Some(whole), Some(content)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let start = offset + utf16_col(line, whole.start());
                let content_start = offset + utf16_col(line, content.start());
                let content_len = utf16_col(line, content.end()) - utf16_col(line, content.start());
                ranges.push(MarkdownRange::new(
                    MarkdownType::Syntax,
                    start,
                    rule.delimiter_len,
                ));
                ranges.push(MarkdownRange::new(rule.ty, content_start, content_len));
                ranges.push(MarkdownRange::new(
                    MarkdownType::Syntax,
                    content_start + content_len,
                    rule.delimiter_len,
                ));
            }
        }

        for m in self.link.find_iter(line) {
            let start = offset + utf16_col(line, m.start());
            let length = utf16_col(line, m.end()) - utf16_col(line, m.start());
            ranges.push(MarkdownRange::new(MarkdownType::Link, start, length));
        }

        for m in self.mention.find_iter(line) {
            let start = offset + utf16_col(line, m.start());
            let length = utf16_col(line, m.end()) - utf16_col(line, m.start());
            let ty = if m.as_str() == "@here" {
                MarkdownType::MentionHere
            } else {
                MarkdownType::MentionUser
            };
            ranges.push(MarkdownRange::new(ty, start, length));
        }
    }
}

impl RangeClassifier for SimpleClassifier {
    fn classify(&mut self, text: &str) -> Vec<MarkdownRange> {
        let mut ranges: Vec<MarkdownRange> = Vec::new();
        // Open quote group: (index of its range, marker depth, current end).
        let mut quote: Option<(usize, usize, usize)> = None;
        let mut offset = 0;

        for line in text.split('\n') {
            let line_len: usize = line.chars().map(char::len_utf16).sum();
            let line_end = offset + line_len;
            let depth = line.bytes().take_while(|&b| b == b'>').count();

            if depth > 0 {
                match quote {
                    // Extend the open group across the separator.
                    Some((index, group_depth, _)) if group_depth == depth => {
                        quote = Some((index, group_depth, line_end));
                    }
                    _ => {
                        if let Some((index, _, end)) = quote.take() {
                            ranges[index].length = end - ranges[index].start;
                        }
                        let index = ranges.len();
                        ranges.push(MarkdownRange::with_depth(
                            MarkdownType::Blockquote,
                            offset,
                            0,
                            depth,
                        ));
                        quote = Some((index, depth, line_end));
                    }
                }
                ranges.push(MarkdownRange::new(MarkdownType::Syntax, offset, depth));
                self.classify_line(line, offset, &mut ranges);
            } else {
                if let Some((index, _, end)) = quote.take() {
                    ranges[index].length = end - ranges[index].start;
                }
                if let Some(rest) = line.strip_prefix("# ") {
                    ranges.push(MarkdownRange::new(MarkdownType::Syntax, offset, 1));
                    let rest_len: usize = rest.chars().map(char::len_utf16).sum();
                    if rest_len > 0 {
                        ranges.push(MarkdownRange::new(MarkdownType::H1, offset + 2, rest_len));
                    }
                }
                self.classify_line(line, offset, &mut ranges);
            }

            offset = line_end + 1;
        }
        if let Some((index, _, end)) = quote {
            ranges[index].length = end - ranges[index].start;
        }

        // Stable: a quote keeps its place ahead of same-start markers.
        ranges.sort_by_key(|range| range.start);
        ranges.retain(|range| range.length > 0);
        ranges
    }
}

fn utf16_col(line: &str, byte: usize) -> usize {
    line[..byte].chars().map(char::len_utf16).sum()
}
