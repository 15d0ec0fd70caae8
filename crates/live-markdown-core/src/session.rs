//! The editing session: single owner of text, tree, selection, and history.
//!
//! A [`MarkdownSession`] is the unit the host embeds. It owns every mutable
//! piece of the engine exclusively; external callers act only through the
//! session's operations, and each text operation runs the full pipeline
//! synchronously and in order: classify, segment, build, restore the caret,
//! record history. Nothing interleaves; the debounce timer is the only
//! deferred unit and the host drives it by polling.

use crate::classify::RangeClassifier;
use crate::cursor::{self, RenderSurface, Selection};
use crate::history::{HistoryBuffer, HistorySnapshot};
use crate::styles::MarkdownStyle;
use crate::tree::{RenderTree, build_tree};
use ropey::Rope;
use std::time::Instant;

/// What changed in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The text (and therefore the tree) was replaced.
    TextChanged,
    /// The tracked selection moved.
    SelectionChanged,
    /// The markdown style configuration was replaced.
    StyleChanged,
    /// A history snapshot was committed, undone, or redone.
    HistoryChanged,
}

/// A change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionChange {
    /// What changed.
    pub event: SessionEvent,
    /// Version before the change.
    pub old_version: u64,
    /// Version after the change.
    pub new_version: u64,
}

/// Subscriber callback type.
pub type SessionCallback = Box<dyn FnMut(&SessionChange)>;

/// One live-markdown editing session.
///
/// Single-writer by construction: the session is `&mut self` throughout and
/// owns its tree and history outright. The rendered tree is rebuilt wholesale
/// on every text change and the previous generation's node identities become
/// invalid at that moment.
pub struct MarkdownSession {
    text: Rope,
    classifier: Box<dyn RangeClassifier>,
    style: MarkdownStyle,
    tree: RenderTree,
    history: HistoryBuffer,
    selection: Selection,
    /// Text length the current selection was measured against; a caret at
    /// the old end of text follows the new end across edits.
    previous_len: usize,
    version: u64,
    callbacks: Vec<SessionCallback>,
}

impl MarkdownSession {
    /// Start a session over `initial_text` with the given classifier.
    ///
    /// The history is seeded with the initial value so the first undo has
    /// somewhere to land.
    pub fn new(initial_text: &str, classifier: impl RangeClassifier + 'static) -> Self {
        Self::with_history(initial_text, classifier, HistoryBuffer::new())
    }

    /// Start a session with a custom-configured history buffer.
    pub fn with_history(
        initial_text: &str,
        classifier: impl RangeClassifier + 'static,
        mut history: HistoryBuffer,
    ) -> Self {
        let mut classifier = Box::new(classifier);
        let style = MarkdownStyle::default();
        let ranges = classifier.classify(initial_text);
        let tree = build_tree(initial_text, &ranges, &style);
        let len = tree.len_utf16();
        history.add(HistorySnapshot::new(initial_text, len));
        Self {
            text: Rope::from_str(initial_text),
            classifier,
            style,
            tree,
            history,
            selection: Selection::caret(len),
            previous_len: len,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// The current text.
    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// The current rendered tree.
    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    /// The tracked selection, in flat-text coordinates.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The active style configuration.
    pub fn style(&self) -> &MarkdownStyle {
        &self.style
    }

    /// Monotonic change counter; bumps on every emitted event.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Subscribe to change notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&SessionChange) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    fn emit(&mut self, event: SessionEvent) {
        let old_version = self.version;
        self.version += 1;
        let change = SessionChange {
            event,
            old_version,
            new_version: self.version,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }

    fn rebuild(&mut self) {
        let text = self.text.to_string();
        let ranges = self.classifier.classify(&text);
        self.tree = build_tree(&text, &ranges, &self.style);
    }

    /// Replace the text, re-running the full pipeline.
    ///
    /// The tracked caret follows the edit (a caret at the old end of text
    /// stays at the end), and a debounced history snapshot is staged at
    /// `now`; rapid successive calls coalesce into one checkpoint.
    pub fn set_text(&mut self, text: &str, now: Instant) {
        self.replace_text(text);

        let new_len = self.tree.len_utf16();
        let caret = if self.selection.end >= self.previous_len {
            new_len
        } else {
            self.selection.end.min(new_len)
        };
        self.selection = Selection::caret(caret);
        self.previous_len = new_len;

        let snapshot = HistorySnapshot {
            text: self.text.clone(),
            cursor: caret,
        };
        self.history.debounced_add(snapshot, now);
        self.emit(SessionEvent::TextChanged);
    }

    fn replace_text(&mut self, text: &str) {
        self.text = Rope::from_str(text);
        self.rebuild();
    }

    /// Move the tracked selection. Out-of-range offsets clamp silently; a
    /// missing `end` collapses to a caret.
    pub fn set_selection(&mut self, start: usize, end: Option<usize>) {
        let limit = self.tree.len_utf16();
        let start = start.min(limit);
        let end = end.map_or(start, |end| end.min(limit));
        let selection = Selection { start, end };
        if selection != self.selection {
            self.selection = selection;
            self.previous_len = limit;
            self.emit(SessionEvent::SelectionChanged);
        }
    }

    /// Write the tracked selection out to a surface.
    ///
    /// No-op when the surface is unfocused; scrolls the caret into view per
    /// the surface's engine.
    pub fn apply_selection_to(&mut self, surface: &mut dyn RenderSurface) {
        let end = (!self.selection.is_caret()).then_some(self.selection.end);
        cursor::set_cursor_position(surface, &self.tree, self.selection.start, end);
    }

    /// Adopt the surface's native selection as the tracked one.
    ///
    /// A selection the current tree cannot resolve (stale anchors from a
    /// previous generation) leaves the tracked selection untouched and emits
    /// nothing.
    pub fn read_selection_from(&mut self, surface: &dyn RenderSurface) {
        if let Some(selection) = cursor::current_selection(surface, &self.tree) {
            if selection != self.selection {
                self.selection = selection;
                self.previous_len = self.tree.len_utf16();
                self.emit(SessionEvent::SelectionChanged);
            }
        }
    }

    /// Replace the style configuration and restyle the tree.
    pub fn set_markdown_style(&mut self, style: MarkdownStyle) {
        self.style = style;
        self.rebuild();
        self.emit(SessionEvent::StyleChanged);
    }

    /// Commit the staged history snapshot if its idle window has elapsed at
    /// `now`. Returns whether a commit happened.
    pub fn poll_history(&mut self, now: Instant) -> bool {
        let committed = self.history.poll(now);
        if committed {
            self.emit(SessionEvent::HistoryChanged);
        }
        committed
    }

    /// Step back one checkpoint. Returns the restored text, or `None` at the
    /// beginning of history.
    pub fn undo(&mut self) -> Option<String> {
        let snapshot = self.history.undo()?;
        let text = snapshot.text.to_string();
        let caret = snapshot.cursor;
        self.restore_snapshot(text.clone(), caret);
        Some(text)
    }

    /// Step forward one checkpoint. Returns the restored text, or `None` at
    /// the end of history.
    pub fn redo(&mut self) -> Option<String> {
        let snapshot = self.history.redo()?;
        let text = snapshot.text.to_string();
        let caret = snapshot.cursor;
        self.restore_snapshot(text.clone(), caret);
        Some(text)
    }

    fn restore_snapshot(&mut self, text: String, caret: usize) {
        self.replace_text(&text);
        let limit = self.tree.len_utf16();
        self.selection = Selection::caret(caret.min(limit));
        self.previous_len = limit;
        self.emit(SessionEvent::TextChanged);
        self.emit(SessionEvent::HistoryChanged);
    }
}

impl Drop for MarkdownSession {
    fn drop(&mut self) {
        // A staged snapshot must not outlive its session.
        self.history.cancel_pending();
    }
}
