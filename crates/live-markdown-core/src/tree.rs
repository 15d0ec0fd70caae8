//! The rendered tree: arena-backed nodes derived wholesale from (text, ranges).
//!
//! The tree mirrors what the editable surface displays: a root, one child per
//! (possibly merged) paragraph, and inside each line a nested structure of
//! styled spans and plain-text / line-break leaves reflecting range nesting
//! order. It is rebuilt from scratch on every text change; consistency comes
//! from always deriving it fresh, never from patching the previous tree.
//!
//! Nodes live in an arena indexed by [`NodeId`]; parents are plain indices and
//! children owned index lists, so the parent back-references cannot form an
//! ownership cycle.

use crate::paragraphs::{self, Paragraph};
use crate::ranges::{MarkdownRange, MarkdownType, expand_ranges, sanitize_ranges};
use crate::styles::{self, MarkdownStyle, StyleAttributes};
use crate::utf16::{slice_utf16, utf16_len};
use std::fmt;

/// Index of a node in a [`RenderTree`] arena.
///
/// Only valid for the tree that produced it; trees are rebuilt wholesale on
/// every text change and ids are never reused across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// What a tree node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The tree root. Exactly one per tree, covering the whole text.
    Root,
    /// One (possibly merged) paragraph.
    Line,
    /// A styled span for a markdown range.
    Span(MarkdownType),
    /// A literal text run.
    Text,
    /// A line separator with no backing text run; occupies one offset unit.
    Break,
}

/// A dot-separated path of child indices from the root.
///
/// This is the render-scoped identity handed to the surface (and read back
/// from it): unique within a tree snapshot, assigned in append order, and
/// never reused across rebuilds with different content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The root path (empty).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The path of this node's `index`-th child.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// The child-index route from the root.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Parse a dot-separated path as rendered by [`fmt::Display`]. The empty
    /// string is the root. Returns `None` for anything else that is not a
    /// dot-separated list of indices.
    pub fn parse(path: &str) -> Option<Self> {
        if path.is_empty() {
            return Some(Self::root());
        }
        let indices = path
            .split('.')
            .map(|part| part.parse::<usize>().ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Self(indices))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, index) in self.0.iter().enumerate() {
            if position > 0 {
                write!(f, ".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// A node of the rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// What this node represents.
    pub kind: NodeKind,
    /// Parent index; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Children in left-to-right visual order.
    pub children: Vec<NodeId>,
    /// Absolute flat UTF-16 offset covered by this node and its descendants.
    pub start: usize,
    /// Covered length in UTF-16 code units. For interior nodes this equals
    /// the sum of the children's lengths; for leaves the literal length
    /// (breaks are fixed at one unit).
    pub length: usize,
    /// `start - parent.start`.
    pub relative_start: usize,
    /// Render-scoped identity of this node.
    pub path: NodePath,
    /// Literal text for `Text` leaves.
    pub text: Option<String>,
    /// Resolved style attributes for `Span` nodes.
    pub attributes: StyleAttributes,
    /// Whether a line separator follows this node in the flat text. Only
    /// ever true for line nodes; a line whose sole child is a break does not
    /// generate an extra separator (the break is the separator).
    pub generates_newline: bool,
}

impl TreeNode {
    /// Exclusive end offset of the span this node covers.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// The rendered tree for one (text, ranges) snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
    total_length: usize,
}

impl RenderTree {
    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node. Panics on an id from a different tree generation that
    /// is out of bounds; ids are not meant to outlive their tree.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Total text length in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.total_length
    }

    /// Number of nodes in the arena, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over `(id, node)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// The line nodes in visual order.
    pub fn lines(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node(self.root).children.iter().copied()
    }
}

/// Build the rendered tree for `text` and its classified `ranges`.
///
/// The ranges may still carry `depth` grouping; expansion, sanitization,
/// segmentation and the multi-line merge all happen here, so classifier
/// output can be fed in directly.
pub fn build_tree(text: &str, ranges: &[MarkdownRange], style: &MarkdownStyle) -> RenderTree {
    let total_length = utf16_len(text);
    let ranges = sanitize_ranges(expand_ranges(ranges), total_length);
    let merged = paragraphs::segment(text, ranges);

    let mut builder = TreeBuilder::new(total_length);
    let last = merged.len().saturating_sub(1);
    for (index, paragraph) in merged.iter().enumerate() {
        builder.push_line(paragraph, index == last, style);
    }
    builder.finish()
}

struct TreeBuilder {
    nodes: Vec<TreeNode>,
    root: NodeId,
    total_length: usize,
}

impl TreeBuilder {
    fn new(total_length: usize) -> Self {
        let root = TreeNode {
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
            start: 0,
            length: total_length,
            relative_start: 0,
            path: NodePath::root(),
            text: None,
            attributes: StyleAttributes::new(),
            generates_newline: false,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            total_length,
        }
    }

    fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Append a node under `parent`. The start offset derives from the
    /// previous sibling (plus one unit when that sibling generates a
    /// separator), or from the parent's start for a first child.
    fn append(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        length: usize,
        text: Option<String>,
        attributes: StyleAttributes,
        generates_newline: bool,
    ) -> NodeId {
        let parent_node = &self.nodes[parent.0];
        let start = match parent_node.children.last() {
            Some(&sibling) => {
                let sibling = &self.nodes[sibling.0];
                sibling.end() + usize::from(sibling.generates_newline)
            }
            None => parent_node.start,
        };
        let node = TreeNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            start,
            length,
            relative_start: start - parent_node.start,
            path: parent_node.path.child(parent_node.children.len()),
            text,
            attributes,
            generates_newline,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append the literal `text` under `parent`, splitting on `\n` into text
    /// runs and break leaves (merged paragraphs carry restored separators).
    fn push_literal(&mut self, parent: NodeId, text: &str) {
        for (index, segment) in text.split('\n').enumerate() {
            if index > 0 {
                self.append(
                    parent,
                    NodeKind::Break,
                    1,
                    None,
                    StyleAttributes::new(),
                    false,
                );
            }
            if !segment.is_empty() {
                self.append(
                    parent,
                    NodeKind::Text,
                    utf16_len(segment),
                    Some(segment.to_string()),
                    StyleAttributes::new(),
                    false,
                );
            }
        }
    }

    fn push_line(&mut self, paragraph: &Paragraph, is_last: bool, style: &MarkdownStyle) {
        if paragraph.text.is_empty() {
            // An empty paragraph renders as a line holding one break leaf;
            // the break occupies the separator's offset unit itself.
            let line = self.append(
                self.root,
                NodeKind::Line,
                1,
                None,
                StyleAttributes::new(),
                false,
            );
            self.append(line, NodeKind::Break, 1, None, StyleAttributes::new(), false);
            return;
        }

        let line = self.append(
            self.root,
            NodeKind::Line,
            paragraph.length,
            None,
            StyleAttributes::new(),
            !is_last,
        );

        if paragraph.ranges.is_empty() {
            self.push_literal(line, &paragraph.text);
            return;
        }

        let line_end = paragraph.end();
        // Flat cursor over the paragraph: everything before it has been
        // appended already.
        let mut cursor = paragraph.start;
        let mut parent = line;

        let mut queue = paragraph.ranges.iter().peekable();
        while let Some(range) = queue.next() {
            let range_end = range.end().min(line_end);
            if range.start >= line_end {
                break;
            }

            if range.start > cursor {
                let literal = self.paragraph_slice(paragraph, cursor, range.start);
                self.push_literal(parent, &literal);
                cursor = range.start;
            }

            let next_start = queue.peek().map(|next| next.start).unwrap_or(usize::MAX);
            let attributes = styles::attributes_for(style, range.ty);
            let span_length = range_end - range.start;

            if next_start < range_end && range.ty != MarkdownType::Syntax {
                // The following range starts inside this one: the new span
                // becomes the insertion parent instead of being closed.
                parent = self.append(
                    parent,
                    NodeKind::Span(range.ty),
                    span_length,
                    None,
                    attributes,
                    false,
                );
            } else {
                let span = self.append(
                    parent,
                    NodeKind::Span(range.ty),
                    span_length,
                    None,
                    attributes,
                    false,
                );
                let literal = self.paragraph_slice(paragraph, range.start, range_end);
                self.push_literal(span, &literal);
                cursor = range_end;

                // Pop back up the parent chain while the next range starts at
                // or beyond an ancestor's end, flushing its trailing literal.
                while parent != line {
                    let parent_end = self.node(parent).end();
                    if next_start < parent_end {
                        break;
                    }
                    if parent_end > cursor {
                        let literal = self.paragraph_slice(paragraph, cursor, parent_end);
                        self.push_literal(parent, &literal);
                        cursor = parent_end;
                    }
                    parent = self.node(parent).parent.expect("span has a parent");
                }
            }
        }

        if line_end > cursor {
            let literal = self.paragraph_slice(paragraph, cursor, line_end);
            self.push_literal(line, &literal);
        }
    }

    /// Slice the paragraph text by flat offsets.
    fn paragraph_slice(&self, paragraph: &Paragraph, start: usize, end: usize) -> String {
        slice_utf16(
            &paragraph.text,
            start - paragraph.start,
            end - paragraph.start,
        )
        .to_string()
    }

    fn finish(self) -> RenderTree {
        RenderTree {
            nodes: self.nodes,
            root: self.root,
            total_length: self.total_length,
        }
    }
}
