//! End-to-end session flows against a mock rendering surface.

use live_markdown_core::{
    CaretRect, MarkdownRange, MarkdownSession, MarkdownType, RenderSurface, ScrollMetrics,
    Selection, SessionEvent, SurfaceAnchor, SurfaceEngine,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

struct MockSurface {
    engine: SurfaceEngine,
    focused: bool,
    selection: Option<(SurfaceAnchor, SurfaceAnchor)>,
    caret: Option<CaretRect>,
    scrolled_to: Option<f64>,
}

impl MockSurface {
    fn new(engine: SurfaceEngine) -> Self {
        Self {
            engine,
            focused: true,
            selection: None,
            caret: None,
            scrolled_to: None,
        }
    }
}

impl RenderSurface for MockSurface {
    fn engine(&self) -> SurfaceEngine {
        self.engine
    }
    fn has_focus(&self) -> bool {
        self.focused
    }
    fn selection(&self) -> Option<(SurfaceAnchor, SurfaceAnchor)> {
        self.selection.clone()
    }
    fn set_selection(&mut self, start: SurfaceAnchor, end: SurfaceAnchor) {
        self.selection = Some((start, end));
    }
    fn caret_rect(&self) -> Option<CaretRect> {
        self.caret
    }
    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            top: 0.0,
            bottom: 40.0,
            height: 40.0,
            padding_top: 2.0,
            border_top: 1.0,
            scroll_top: 10.0,
        }
    }
    fn scroll_to(&mut self, top: f64) {
        self.scrolled_to = Some(top);
    }
}

fn bold_classifier(text: &str) -> Vec<MarkdownRange> {
    let mut ranges = Vec::new();
    let mut offset = 0;
    for line in text.split('\n') {
        if let Some(open) = line.find("**") {
            if let Some(close) = line[open + 2..].find("**") {
                if close > 0 {
                    let start = offset + open;
                    ranges.push(MarkdownRange::new(MarkdownType::Syntax, start, 2));
                    ranges.push(MarkdownRange::new(MarkdownType::Bold, start + 2, close));
                    ranges.push(MarkdownRange::new(
                        MarkdownType::Syntax,
                        start + 2 + close,
                        2,
                    ));
                }
            }
        }
        offset += line.chars().map(char::len_utf16).sum::<usize>() + 1;
    }
    ranges
}

#[test]
fn edit_place_caret_and_read_back() {
    let mut session = MarkdownSession::new("", bold_classifier);
    let mut surface = MockSurface::new(SurfaceEngine::Blink);

    session.set_text("**hi** there", Instant::now());
    session.set_selection(4, None);
    session.apply_selection_to(&mut surface);

    // A caret collapses both surface anchors onto the same position.
    let (start, end) = surface.selection.clone().unwrap();
    assert_eq!(start, end);

    // Reading back lands on the same flat offset.
    session.read_selection_from(&surface);
    assert_eq!(session.selection(), Selection::caret(4));
}

#[test]
fn caret_round_trips_across_trailing_newlines() {
    // Break-only lines at the end of the text are where the caret and the
    // surface anchors disagree most easily; every offset must survive a
    // write/read cycle unchanged.
    for text in ["a\n", "a\n\n", "\n", "ab\n\ncd\n"] {
        let mut session = MarkdownSession::new(text, bold_classifier);
        let mut surface = MockSurface::new(SurfaceEngine::Blink);
        let len = session.tree().len_utf16();

        for offset in 0..=len {
            session.set_selection(offset, None);
            session.apply_selection_to(&mut surface);
            session.read_selection_from(&surface);
            assert_eq!(
                session.selection(),
                Selection::caret(offset),
                "offset {offset} drifted in {text:?}"
            );
        }
    }
}

#[test]
fn end_of_text_caret_lands_on_the_last_break() {
    let mut session = MarkdownSession::new("a\n\n", bold_classifier);
    let mut surface = MockSurface::new(SurfaceEngine::Blink);

    session.set_selection(3, None);
    session.apply_selection_to(&mut surface);

    // The anchor sits before the final line's break, not the middle one.
    let position = session.tree().node_at_offset(3).unwrap();
    let node = session.tree().node(position.node);
    assert_eq!(node.start, 3);
    let (start, _) = surface.selection.clone().unwrap();
    assert_eq!(
        start,
        SurfaceAnchor::Before {
            path: node.path.clone()
        }
    );
}

#[test]
fn stale_surface_selection_is_ignored() {
    let mut session = MarkdownSession::new("some **bold** text", bold_classifier);
    let mut surface = MockSurface::new(SurfaceEngine::Blink);

    session.set_selection(7, None);
    session.apply_selection_to(&mut surface);

    // The rebuild invalidates the surface's anchors (the new tree has no
    // node at the old path), so the read leaves the session untouched.
    session.set_text("plain", Instant::now());
    let before = session.selection();
    session.read_selection_from(&surface);
    assert_eq!(session.selection(), before);
}

#[test]
fn selection_survives_rebuild_through_reapply() {
    let mut session = MarkdownSession::new("", bold_classifier);
    let mut surface = MockSurface::new(SurfaceEngine::Blink);

    session.set_text("hello", Instant::now());
    session.set_selection(1, Some(4));
    session.apply_selection_to(&mut surface);
    session.read_selection_from(&surface);
    assert_eq!(session.selection(), Selection { start: 1, end: 4 });
}

#[test]
fn unfocused_surface_is_never_written() {
    let mut session = MarkdownSession::new("text", bold_classifier);
    let mut surface = MockSurface::new(SurfaceEngine::Blink);
    surface.focused = false;

    session.set_selection(2, None);
    session.apply_selection_to(&mut surface);
    assert!(surface.selection.is_none());
}

#[test]
fn gecko_never_gets_scroll_commands() {
    let mut session = MarkdownSession::new("a\nb\nc\nd", bold_classifier);
    let mut surface = MockSurface::new(SurfaceEngine::Gecko);
    surface.caret = Some(CaretRect {
        top: 900.0,
        bottom: 920.0,
        height: 20.0,
    });

    session.set_selection(6, None);
    session.apply_selection_to(&mut surface);
    assert!(surface.scrolled_to.is_none());
}

#[test]
fn blink_scrolls_an_offscreen_caret() {
    let mut session = MarkdownSession::new("a\nb\nc\nd", bold_classifier);
    let mut surface = MockSurface::new(SurfaceEngine::Blink);
    surface.caret = Some(CaretRect {
        top: 900.0,
        bottom: 920.0,
        height: 20.0,
    });

    session.set_selection(6, None);
    session.apply_selection_to(&mut surface);
    assert!(surface.scrolled_to.is_some());
}

#[test]
fn undo_redo_replay_the_whole_pipeline() {
    let mut session = MarkdownSession::new("", bold_classifier);
    let start = Instant::now();
    session.set_text("**a**", start);
    session.poll_history(start + Duration::from_secs(1));
    session.set_text("**a** b", start + Duration::from_secs(2));
    session.poll_history(start + Duration::from_secs(3));

    assert_eq!(session.undo().as_deref(), Some("**a**"));
    // The restored text went through the classifier again.
    let tree = session.tree();
    assert_eq!(tree.len_utf16(), 5);
    assert!(tree.node_at_offset(3).is_some());

    assert_eq!(session.redo().as_deref(), Some("**a** b"));
    assert_eq!(session.tree().len_utf16(), 7);
    assert!(session.redo().is_none());
}

#[test]
fn events_fire_in_pipeline_order() {
    let seen: Rc<RefCell<Vec<SessionEvent>>> = Rc::default();
    let mut session = MarkdownSession::new("seed", bold_classifier);
    let sink = Rc::clone(&seen);
    session.subscribe(move |change| sink.borrow_mut().push(change.event));

    let start = Instant::now();
    session.set_text("edit", start);
    session.poll_history(start + Duration::from_secs(1));
    session.undo();

    assert_eq!(
        *seen.borrow(),
        vec![
            SessionEvent::TextChanged,
            SessionEvent::HistoryChanged,
            SessionEvent::TextChanged,
            SessionEvent::HistoryChanged,
        ]
    );
}
