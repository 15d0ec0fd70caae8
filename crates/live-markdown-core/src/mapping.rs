//! Offset/node mapping over a [`RenderTree`].
//!
//! The surface speaks (node identity, intra-node offset); the engine speaks
//! flat UTF-16 offsets. Both directions live here, as methods on the tree:
//! flat offset to deepest leaf, path identity to node, and node position back
//! to flat offset.

use crate::tree::{NodeId, NodePath, RenderTree};

/// A node position: the leaf plus an offset inside it, in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePosition {
    /// The resolved node (a leaf for offsets inside text).
    pub node: NodeId,
    /// Offset within the node, relative to its start.
    pub offset: usize,
}

impl RenderTree {
    /// Resolve a flat offset to the deepest node containing it.
    ///
    /// Offsets on a line boundary resolve into the line before the separator
    /// (the caret visually sits at the end of that line), and the end-of-text
    /// offset resolves to the end of the final leaf. Returns `None` only for
    /// offsets past the end of text.
    pub fn node_at_offset(&self, offset: usize) -> Option<NodePosition> {
        if offset > self.len_utf16() {
            return None;
        }
        let mut current = self.root();
        // Set once the offset is known to sit on a trailing edge (or
        // immediately at the end of text) so end-of-node matches may fire.
        let mut at_end = offset == self.len_utf16();
        loop {
            let node = self.node(current);
            if node.children.is_empty() {
                if current == self.root() {
                    return None;
                }
                return Some(NodePosition {
                    node: current,
                    offset: offset - node.start,
                });
            }

            // Strict containment wins over any end-of-span match; an earlier
            // sibling's trailing edge must never shadow a later sibling that
            // actually holds the offset.
            let contained = node.children.iter().copied().find(|&id| {
                let child = self.node(id);
                offset >= child.start && offset < child.end()
            });
            if let Some(child) = contained {
                current = child;
                continue;
            }

            // The offset sits on a trailing edge: resolve into the subtree
            // ending there, then only its last children can match.
            let edge = node.children.iter().copied().find(|&id| {
                let child = self.node(id);
                offset == child.end() && (child.generates_newline || at_end)
            })?;
            at_end = true;
            current = edge;
            while let Some(&last) = self.node(current).children.last() {
                current = last;
            }
        }
    }

    /// Resolve a path identity back to a node, `None` when the path does not
    /// exist in this tree generation (a stale identity from before a rebuild).
    pub fn node_at_path(&self, path: &NodePath) -> Option<NodeId> {
        let mut current = self.root();
        for &index in path.indices() {
            current = *self.node(current).children.get(index)?;
        }
        Some(current)
    }

    /// Flat offset of a position inside `node`. Intra offsets past the node's
    /// length clamp to its end (a break leaf reports at most its single unit).
    pub fn offset_for_position(&self, node: NodeId, intra: usize) -> usize {
        let node = self.node(node);
        node.start + intra.min(node.length)
    }
}
