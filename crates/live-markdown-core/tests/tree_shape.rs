//! Tree-shape scenarios pinned down end to end.

use live_markdown_core::{
    MarkdownRange, MarkdownStyle, MarkdownType, NodeKind, RenderTree, build_tree,
};
use pretty_assertions::assert_eq;

fn bold_text_ranges() -> Vec<MarkdownRange> {
    vec![
        MarkdownRange::new(MarkdownType::Syntax, 0, 2),
        MarkdownRange::new(MarkdownType::Bold, 2, 4),
        MarkdownRange::new(MarkdownType::Syntax, 6, 2),
    ]
}

fn shape(tree: &RenderTree) -> Vec<(String, NodeKind, usize, usize)> {
    tree.iter()
        .map(|(_, node)| (node.path.to_string(), node.kind, node.start, node.length))
        .collect()
}

#[test]
fn bold_text_scenario() {
    let tree = build_tree(
        "**bold** text",
        &bold_text_ranges(),
        &MarkdownStyle::default(),
    );

    let lines: Vec<_> = tree.lines().collect();
    assert_eq!(lines.len(), 1);
    let children: Vec<_> = tree
        .node(lines[0])
        .children
        .iter()
        .map(|&id| tree.node(id))
        .collect();
    assert_eq!(children.len(), 4);

    assert_eq!(children[0].kind, NodeKind::Span(MarkdownType::Syntax));
    assert_eq!((children[0].start, children[0].length), (0, 2));

    assert_eq!(children[1].kind, NodeKind::Span(MarkdownType::Bold));
    assert_eq!((children[1].start, children[1].length), (2, 4));
    let bold_leaf = tree.node(children[1].children[0]);
    assert_eq!(bold_leaf.kind, NodeKind::Text);
    assert_eq!(bold_leaf.text.as_deref(), Some("bold"));

    assert_eq!(children[2].kind, NodeKind::Span(MarkdownType::Syntax));
    assert_eq!((children[2].start, children[2].length), (6, 2));

    assert_eq!(children[3].kind, NodeKind::Text);
    assert_eq!(children[3].text.as_deref(), Some(" text"));
    assert_eq!((children[3].start, children[3].length), (8, 5));

    // Offset 4 sits inside the bold content at intra-offset 2.
    let position = tree.node_at_offset(4).unwrap();
    assert_eq!(tree.node(position.node).text.as_deref(), Some("bold"));
    assert_eq!(position.offset, 2);
}

#[test]
fn two_line_boundary_scenario() {
    let tree = build_tree("a\nb", &[], &MarkdownStyle::default());
    assert_eq!(tree.lines().count(), 2);

    let at = |offset: usize| {
        let position = tree.node_at_offset(offset).unwrap();
        (
            tree.node(position.node).text.clone().unwrap(),
            position.offset,
        )
    };
    assert_eq!(at(0), ("a".to_string(), 0));
    // The boundary offset resolves to the end of the first line.
    assert_eq!(at(1), ("a".to_string(), 1));
    assert_eq!(at(2), ("b".to_string(), 0));
}

#[test]
fn rebuild_is_idempotent() {
    let texts = [
        "**bold** text",
        "a\nb",
        "",
        "> quote\n> more\nplain",
        "nested **bold _italic_** tail",
    ];
    let range_sets: Vec<Vec<MarkdownRange>> = vec![
        bold_text_ranges(),
        vec![],
        vec![],
        vec![MarkdownRange::new(MarkdownType::Blockquote, 0, 14)],
        vec![
            MarkdownRange::new(MarkdownType::Bold, 7, 17),
            MarkdownRange::new(MarkdownType::Italic, 13, 10),
        ],
    ];
    let style = MarkdownStyle::default();

    for (text, ranges) in texts.iter().zip(&range_sets) {
        let first = build_tree(text, ranges, &style);
        let second = build_tree(text, ranges, &style);
        assert_eq!(shape(&first), shape(&second), "unstable shape for {text:?}");
        assert_eq!(first, second);
    }
}

#[test]
fn depth_grouped_quote_nests_repeatedly() {
    let tree = build_tree(
        ">> deep",
        &[MarkdownRange::with_depth(MarkdownType::Blockquote, 0, 7, 2)],
        &MarkdownStyle::default(),
    );
    let line = tree.lines().next().unwrap();
    let outer = tree.node(line).children[0];
    assert_eq!(
        tree.node(outer).kind,
        NodeKind::Span(MarkdownType::Blockquote)
    );
    let inner = tree.node(outer).children[0];
    assert_eq!(
        tree.node(inner).kind,
        NodeKind::Span(MarkdownType::Blockquote)
    );
    assert_eq!(
        tree.node(tree.node(inner).children[0]).text.as_deref(),
        Some(">> deep")
    );
}

#[test]
fn bad_classifier_ranges_never_abort_the_build() {
    let ranges = vec![
        MarkdownRange::new(MarkdownType::Bold, 0, 0),
        MarkdownRange::new(MarkdownType::Italic, 2, 100),
        MarkdownRange::new(MarkdownType::Code, 50, 3),
    ];
    let tree = build_tree("short", &ranges, &MarkdownStyle::default());

    // The zero-length and out-of-bounds ranges are gone; the overlong one is
    // clamped to the text.
    let line = tree.lines().next().unwrap();
    let children: Vec<_> = tree
        .node(line)
        .children
        .iter()
        .map(|&id| tree.node(id))
        .collect();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].text.as_deref(), Some("sh"));
    assert_eq!(children[1].kind, NodeKind::Span(MarkdownType::Italic));
    assert_eq!((children[1].start, children[1].length), (2, 3));
}

#[test]
fn span_attributes_reach_the_tree() {
    let mut style = MarkdownStyle::default();
    style
        .link
        .insert("color".to_string(), "rebeccapurple".to_string());
    let tree = build_tree(
        "see https://example.com",
        &[MarkdownRange::new(MarkdownType::Link, 4, 19)],
        &style,
    );
    let line = tree.lines().next().unwrap();
    let link = tree.node(tree.node(line).children[1]);
    assert_eq!(link.kind, NodeKind::Span(MarkdownType::Link));
    assert_eq!(
        link.attributes.get("color").map(String::as_str),
        Some("rebeccapurple")
    );
    assert_eq!(
        link.attributes.get("textDecorationLine").map(String::as_str),
        Some("underline")
    );
}
