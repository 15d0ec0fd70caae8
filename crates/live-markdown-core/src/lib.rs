#![warn(missing_docs)]
//! Live Markdown Core - Offset/Tree Mapping Engine for Live Markdown Editing
//!
//! # Overview
//!
//! `live-markdown-core` keeps three representations of a markdown document in
//! sync on every keystroke: the flat text buffer the user edits, the typed
//! markdown ranges a classifier derives from it, and the rendered node tree an
//! editable surface actually displays. It is headless: the crate never touches
//! a real surface, it builds trees and translates positions, and the UI layer
//! drives rendering through the [`RenderSurface`] boundary.
//!
//! # Core Features
//!
//! - **Wholesale tree builds**: the rendered tree is derived fresh from
//!   (text, ranges) on every edit, never patched
//! - **Bidirectional position mapping**: flat UTF-16 offsets to tree leaves
//!   and back, including carets on line boundaries
//! - **Cursor/selection adapter**: native selection placement, reverse
//!   mapping, and caret-visibility scrolling over a surface trait
//! - **Debounced undo/redo**: a fixed-capacity history of (text, cursor)
//!   snapshots with clock-driven coalescing
//!
//! # Quick Start
//!
//! ```rust
//! use live_markdown_core::{MarkdownRange, MarkdownSession, MarkdownType};
//! use std::time::Instant;
//!
//! // A classifier is any `FnMut(&str) -> Vec<MarkdownRange>`.
//! let classify = |text: &str| {
//!     if text.starts_with("**") {
//!         vec![
//!             MarkdownRange::new(MarkdownType::Syntax, 0, 2),
//!             MarkdownRange::new(MarkdownType::Bold, 2, 4),
//!             MarkdownRange::new(MarkdownType::Syntax, 6, 2),
//!         ]
//!     } else {
//!         Vec::new()
//!     }
//! };
//!
//! let mut session = MarkdownSession::new("", classify);
//! session.set_text("**bold** text", Instant::now());
//!
//! let tree = session.tree();
//! assert_eq!(tree.lines().count(), 1);
//!
//! // Offset 4 sits inside the bold content.
//! let position = tree.node_at_offset(4).unwrap();
//! assert_eq!(tree.node(position.node).text.as_deref(), Some("bold"));
//! ```
//!
//! # Module Description
//!
//! - [`ranges`] - markdown range model and normalization
//! - [`paragraphs`] - line segmentation and multi-line merging
//! - [`tree`] - the rendered node tree and its builder
//! - [`mapping`] - offset-to-node and node-to-offset translation
//! - [`cursor`] - selection adapter over the rendering-surface boundary
//! - [`history`] - debounced undo/redo snapshots
//! - [`session`] - the owning editing session and its event stream
//! - [`classify`] - the range-classifier boundary
//! - [`styles`] - per-type style attribute resolution
//!
//! # Offset Model
//!
//! Every offset in the public API is a UTF-16 code unit index, matching the
//! native indexing of the editable surfaces this engine targets. Astral-plane
//! characters count as two units.

pub mod classify;
pub mod cursor;
pub mod history;
pub mod mapping;
pub mod paragraphs;
pub mod ranges;
pub mod session;
pub mod styles;
pub mod tree;
mod utf16;

pub use classify::{PlainTextClassifier, RangeClassifier};
pub use cursor::{
    CaretRect, RenderSurface, ScrollMetrics, Selection, SurfaceAnchor, SurfaceEngine,
    current_selection, restore_cursor, scroll_caret_into_view, set_cursor_position,
};
pub use history::{
    DEFAULT_DEBOUNCE_WINDOW, DEFAULT_HISTORY_CAPACITY, DebounceTimer, HistoryBuffer,
    HistorySnapshot,
};
pub use mapping::NodePosition;
pub use paragraphs::Paragraph;
pub use ranges::{MarkdownRange, MarkdownType, expand_ranges, sanitize_ranges};
pub use session::{MarkdownSession, SessionCallback, SessionChange, SessionEvent};
pub use styles::{MarkdownStyle, StyleAttributes, attributes_for};
pub use tree::{NodeId, NodeKind, NodePath, RenderTree, TreeNode, build_tree};
