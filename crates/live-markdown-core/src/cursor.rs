//! Cursor and selection adapter: the boundary with the rendering surface.
//!
//! The engine never touches the surface directly; everything goes through the
//! [`RenderSurface`] trait, which the (external) UI layer implements. Surface
//! selections are expressed as anchors over the tree's path identities, so
//! the adapter is a translation layer between flat offsets and anchors, plus
//! the caret-visibility scroll correction.

use crate::tree::{NodeKind, NodePath, RenderTree};

/// The surface's underlying layout/selection engine.
///
/// Scroll correction behavior differs per engine; everything else in the
/// adapter is engine-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEngine {
    /// Chromium-family engines. Caret rects exclude padding and border.
    Blink,
    /// Firefox-family engines. Scroll-follows the caret natively; the
    /// adapter's scroll correction is skipped entirely.
    Gecko,
    /// Safari-family engines.
    WebKit,
}

/// A selection endpoint on the surface, addressed by path identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceAnchor {
    /// Inside a node's text content, at an intra-node UTF-16 offset.
    Within {
        /// Path identity of the node.
        path: NodePath,
        /// Offset within the node's text.
        offset: usize,
    },
    /// Immediately before a node. Used for break leaves, which have no text
    /// content to anchor into.
    Before {
        /// Path identity of the node.
        path: NodePath,
    },
}

/// A selection in flat-text coordinates. A caret has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Flat UTF-16 offset of the anchor endpoint.
    pub start: usize,
    /// Flat UTF-16 offset of the focus endpoint.
    pub end: usize,
}

impl Selection {
    /// A collapsed selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Whether the selection is collapsed to a caret.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }
}

/// Vertical box metrics of the editable surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Top of the surface's bounding box.
    pub top: f64,
    /// Bottom of the surface's bounding box.
    pub bottom: f64,
    /// Height of the bounding box.
    pub height: f64,
    /// Computed top padding.
    pub padding_top: f64,
    /// Computed top border width.
    pub border_top: f64,
    /// Current vertical scroll position.
    pub scroll_top: f64,
}

/// Bounding box of the rendered caret, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretRect {
    /// Top edge of the caret.
    pub top: f64,
    /// Bottom edge of the caret.
    pub bottom: f64,
    /// Caret height.
    pub height: f64,
}

/// The rendering surface the adapter drives.
///
/// Implemented by the UI layer that owns the actual editable element. The
/// trait deliberately speaks anchors and pixels only; no flat offsets cross
/// this boundary.
pub trait RenderSurface {
    /// Which layout engine backs this surface.
    fn engine(&self) -> SurfaceEngine;

    /// Whether the surface currently holds input focus.
    fn has_focus(&self) -> bool;

    /// The native selection endpoints, `None` when the surface reports no
    /// active selection range.
    fn selection(&self) -> Option<(SurfaceAnchor, SurfaceAnchor)>;

    /// Replace the native selection.
    fn set_selection(&mut self, start: SurfaceAnchor, end: SurfaceAnchor);

    /// Bounding box of the current caret, `None` without an active selection.
    fn caret_rect(&self) -> Option<CaretRect>;

    /// Current box metrics of the editable region.
    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Scroll the editable region to the given vertical position.
    fn scroll_to(&mut self, top: f64);
}

fn anchor_at(tree: &RenderTree, offset: usize) -> Option<SurfaceAnchor> {
    let position = tree.node_at_offset(offset)?;
    let node = tree.node(position.node);
    if node.kind == NodeKind::Break {
        Some(SurfaceAnchor::Before {
            path: node.path.clone(),
        })
    } else {
        Some(SurfaceAnchor::Within {
            path: node.path.clone(),
            offset: position.offset,
        })
    }
}

/// Place the surface selection at the given flat offsets.
///
/// No-op unless the surface holds focus. Offsets past the end of text clamp
/// silently; a missing `end` collapses to a caret. The caret is scrolled into
/// view afterwards.
pub fn set_cursor_position(
    surface: &mut dyn RenderSurface,
    tree: &RenderTree,
    start: usize,
    end: Option<usize>,
) {
    if !surface.has_focus() {
        return;
    }

    let limit = tree.len_utf16();
    let start = start.min(limit);
    let Some(start_anchor) = anchor_at(tree, start) else {
        return;
    };
    let end_anchor = match end {
        Some(end) => {
            let Some(anchor) = anchor_at(tree, end.min(limit)) else {
                return;
            };
            anchor
        }
        None => start_anchor.clone(),
    };

    surface.set_selection(start_anchor, end_anchor);
    scroll_caret_into_view(surface, tree);
}

fn offset_of_anchor(tree: &RenderTree, anchor: &SurfaceAnchor) -> Option<usize> {
    match anchor {
        SurfaceAnchor::Before { path } => {
            let node = tree.node_at_path(path)?;
            Some(tree.node(node).start)
        }
        SurfaceAnchor::Within { path, offset } => {
            let node = tree.node_at_path(path)?;
            Some(tree.offset_for_position(node, *offset))
        }
    }
}

/// Read the surface's native selection back into flat-text coordinates.
///
/// `None` when the surface has no active selection or when either endpoint
/// carries a path identity this tree generation cannot resolve (a stale
/// anchor from before a rebuild). An unresolvable selection is "unknown",
/// not an error.
pub fn current_selection(surface: &dyn RenderSurface, tree: &RenderTree) -> Option<Selection> {
    let (start, end) = surface.selection()?;
    Some(Selection {
        start: offset_of_anchor(tree, &start)?,
        end: offset_of_anchor(tree, &end)?,
    })
}

/// Scroll the surface so the caret is inside the visible region.
///
/// Skipped on Gecko, which scroll-follows the caret natively, and on an
/// empty surface. Blink reports caret rects without padding and border, so
/// those are added back from the surface metrics; other engines get a fixed
/// multiple of the same correction.
pub fn scroll_caret_into_view(surface: &mut dyn RenderSurface, tree: &RenderTree) {
    if tree.len_utf16() == 0 || surface.engine() == SurfaceEngine::Gecko {
        return;
    }
    let Some(caret) = surface.caret_rect() else {
        return;
    };
    let metrics = surface.scroll_metrics();

    let inset_top = metrics.top + metrics.padding_top + metrics.border_top;
    let inset_bottom = metrics.bottom - 2.0 * (metrics.padding_top - metrics.border_top);
    if caret.top >= inset_top && caret.bottom <= inset_bottom {
        return;
    }

    let top_to_caret = caret.top - metrics.top;
    let engine_correction = if surface.engine() == SurfaceEngine::Blink {
        0.0
    } else {
        4.0 * (metrics.padding_top + metrics.border_top)
    };
    let offset =
        caret.height - metrics.height + metrics.padding_top + metrics.border_top + engine_correction;
    surface.scroll_to(top_to_caret + metrics.scroll_top + offset);
}

/// Restore the caret after a rebuild.
///
/// `previous` is the caret before the edit and `previous_len` the text length
/// it was measured against; a caret that sat at the old end of text follows
/// the new end, everything else stays put (clamped).
pub fn restore_cursor(
    surface: &mut dyn RenderSurface,
    tree: &RenderTree,
    previous: usize,
    previous_len: usize,
) {
    let target = if previous >= previous_len {
        tree.len_utf16()
    } else {
        previous.min(tree.len_utf16())
    };
    set_cursor_position(surface, tree, target, None);
}
