// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A flat view of a text block's inline content.
//!
//! Editing marks, splitting text and wrapping links is much easier on a
//! list of runs than on the tree itself. Each run is a piece of text with
//! its marks and, if it sits inside an inline, which inline that is. Runs
//! that share a `group` came from (or will be rebuilt into) the same inline
//! node.

use std::ops::Range;

use crate::dom::nodes::{DomNode, InlineNode, InlineType, NodeData, TextNode};
use crate::dom::MarkSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RunInline {
    pub group: usize,
    pub kind: InlineType,
    pub data: NodeData,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct InlineRun {
    pub text: String,
    pub marks: MarkSet,
    pub inline: Option<RunInline>,
}

impl InlineRun {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }
}

pub(crate) fn flatten(children: &[DomNode]) -> Vec<InlineRun> {
    let mut runs = Vec::new();
    for (group, child) in children.iter().enumerate() {
        match child {
            DomNode::Text(text) => runs.push(InlineRun {
                text: text.text.clone(),
                marks: text.marks.clone(),
                inline: None,
            }),
            DomNode::Inline(inline) => {
                for text in inline.children.iter().filter_map(DomNode::as_text)
                {
                    runs.push(InlineRun {
                        text: text.text.clone(),
                        marks: text.marks.clone(),
                        inline: Some(RunInline {
                            group,
                            kind: inline.kind,
                            data: inline.data.clone(),
                        }),
                    });
                }
            }
            DomNode::Block(_) => {}
        }
    }
    runs
}

/// Turn runs back into inline content. Empty runs disappear, neighbours
/// with equal marks merge, and consecutive runs of one group become one
/// inline node. A block with no text left gets a single empty text.
pub(crate) fn rebuild(runs: Vec<InlineRun>) -> Vec<DomNode> {
    let mut nodes: Vec<DomNode> = Vec::new();
    let mut current_group: Option<usize> = None;

    for run in runs.into_iter().filter(|r| !r.text.is_empty()) {
        let text = TextNode::new(run.text, run.marks);
        match run.inline {
            None => {
                current_group = None;
                push_text(&mut nodes, text);
            }
            Some(inline) => {
                let extends_last = current_group == Some(inline.group)
                    && matches!(nodes.last(), Some(DomNode::Inline(_)));
                if !extends_last {
                    nodes.push(DomNode::Inline(InlineNode {
                        kind: inline.kind,
                        data: inline.data,
                        children: Vec::new(),
                    }));
                    current_group = Some(inline.group);
                }
                if let Some(DomNode::Inline(last)) = nodes.last_mut() {
                    push_text(&mut last.children, text);
                }
            }
        }
    }

    if nodes.is_empty() {
        nodes.push(DomNode::new_text(""));
    }
    nodes
}

fn push_text(nodes: &mut Vec<DomNode>, text: TextNode) {
    if let Some(DomNode::Text(last)) = nodes.last_mut() {
        if last.marks == text.marks {
            last.text.push_str(&text.text);
            return;
        }
    }
    nodes.push(DomNode::Text(text));
}

/// Make sure a run boundary falls at `offset` and return the index of the
/// first run that starts there (or `runs.len()` at the end).
pub(crate) fn split_runs(runs: &mut Vec<InlineRun>, offset: usize) -> usize {
    let mut start = 0;
    for i in 0..runs.len() {
        if start == offset {
            return i;
        }
        let len = runs[i].len();
        if offset < start + len {
            let at = crate::dom::nodes::text_node::byte_offset(
                &runs[i].text,
                offset - start,
            );
            let tail = runs[i].text.split_off(at);
            let mut right = runs[i].clone();
            right.text = tail;
            runs.insert(i + 1, right);
            return i + 1;
        }
        start += len;
    }
    runs.len()
}

/// Split at both ends of the character range and return the run indices
/// covering it.
pub(crate) fn split_range(
    runs: &mut Vec<InlineRun>,
    start: usize,
    end: usize,
) -> Range<usize> {
    let first = split_runs(runs, start);
    let last = split_runs(runs, end);
    first..last
}

/// One past the highest group number used in `runs`.
pub(crate) fn next_group(runs: &[InlineRun]) -> usize {
    runs.iter()
        .filter_map(|r| r.inline.as_ref().map(|i| i.group + 1))
        .max()
        .unwrap_or(0)
}

/// Append `tail` to `head`, keeping the inlines of the two apart.
pub(crate) fn concat(head: &mut Vec<InlineRun>, mut tail: Vec<InlineRun>) {
    let shift = next_group(head);
    for run in &mut tail {
        if let Some(inline) = &mut run.inline {
            inline.group += shift;
        }
    }
    head.append(&mut tail);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::nodes::node_data;
    use crate::dom::Mark;

    fn link(text: &str) -> DomNode {
        DomNode::inline(
            InlineType::Link,
            node_data([("href", "https://x.com")]),
            vec![DomNode::new_text(text)],
        )
        .unwrap()
    }

    #[test]
    fn flatten_then_rebuild_is_identity_on_normal_content() {
        let children = vec![
            DomNode::new_text("a"),
            link("b"),
            DomNode::text("c", MarkSet::from([Mark::Bold])),
        ];
        assert_eq!(rebuild(flatten(&children)), children);
    }

    #[test]
    fn rebuild_merges_equal_neighbours_and_drops_empty_runs() {
        let children = vec![
            DomNode::new_text("a"),
            DomNode::text("", MarkSet::from([Mark::Bold])),
            DomNode::new_text("b"),
        ];
        assert_eq!(rebuild(flatten(&children)), vec![DomNode::new_text("ab")]);
    }

    #[test]
    fn rebuild_keeps_adjacent_links_apart() {
        let children = vec![link("a"), link("b")];
        assert_eq!(rebuild(flatten(&children)), children);
    }

    #[test]
    fn rebuild_of_nothing_is_one_empty_text() {
        assert_eq!(rebuild(Vec::new()), vec![DomNode::new_text("")]);
    }

    #[test]
    fn split_range_cuts_runs_at_character_offsets() {
        let mut runs = flatten(&[DomNode::new_text("h\u{e9}llo")]);
        let range = split_range(&mut runs, 1, 3);
        assert_eq!(range, 1..2);
        let texts: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["h", "\u{e9}l", "lo"]);
    }

    #[test]
    fn split_at_the_ends_adds_nothing() {
        let mut runs = flatten(&[DomNode::new_text("abc")]);
        assert_eq!(split_range(&mut runs, 0, 3), 0..1);
        assert_eq!(runs.len(), 1);
    }

    #[test]
    fn concat_keeps_links_from_both_sides_separate() {
        let mut head = flatten(&[link("a")]);
        let tail = flatten(&[link("b")]);
        concat(&mut head, tail);
        assert_eq!(rebuild(head), vec![link("a"), link("b")]);
    }
}
