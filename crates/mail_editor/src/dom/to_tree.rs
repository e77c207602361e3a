// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::nodes::{BlockNode, DomNode, InlineNode, TextNode};
use crate::dom::Document;

/// Debug rendering of a tree, one node per line:
///
/// ```text
///
/// ├>ul
/// │ └>li
/// │   └>"abc" {bold}
/// └>p
///   └>""
/// ```
pub trait ToTree {
    fn to_tree(&self) -> String {
        self.to_tree_display(0, Vec::new())
    }

    fn to_tree_display(
        &self,
        depth: usize,
        continuous_positions: Vec<usize>,
    ) -> String;

    fn tree_line(
        &self,
        description: String,
        depth: usize,
        continuous_positions: &[usize],
    ) -> String {
        let mut tree_part = String::new();
        for i in 0..depth {
            if i == depth - 1 {
                if continuous_positions.contains(&i) {
                    tree_part.push_str("├>");
                } else {
                    tree_part.push_str("└>");
                }
            } else if continuous_positions.contains(&i) {
                tree_part.push_str("│ ");
            } else {
                tree_part.push_str("  ");
            }
        }
        tree_part.push_str(&description);
        tree_part.push('\n');
        tree_part
    }
}

fn children_to_tree(
    children: &[DomNode],
    depth: usize,
    continuous_positions: &[usize],
) -> String {
    let mut out = String::new();
    for (i, child) in children.iter().enumerate() {
        let mut positions = continuous_positions.to_vec();
        if i + 1 < children.len() {
            positions.push(depth);
        }
        out.push_str(&child.to_tree_display(depth + 1, positions));
    }
    out
}

impl ToTree for Document {
    fn to_tree_display(
        &self,
        depth: usize,
        continuous_positions: Vec<usize>,
    ) -> String {
        let mut out =
            self.tree_line(String::new(), depth, &continuous_positions);
        out.push_str(&children_to_tree(
            self.children(),
            depth,
            &continuous_positions,
        ));
        out
    }
}

impl ToTree for DomNode {
    fn to_tree_display(
        &self,
        depth: usize,
        continuous_positions: Vec<usize>,
    ) -> String {
        match self {
            DomNode::Block(n) => n.to_tree_display(depth, continuous_positions),
            DomNode::Inline(n) => {
                n.to_tree_display(depth, continuous_positions)
            }
            DomNode::Text(n) => n.to_tree_display(depth, continuous_positions),
        }
    }
}

impl ToTree for BlockNode {
    fn to_tree_display(
        &self,
        depth: usize,
        continuous_positions: Vec<usize>,
    ) -> String {
        let mut description = self.kind().tag().to_owned();
        if let Some(src) = self.get_data("src") {
            description.push_str(&format!(" \"{src}\""));
        }
        let mut out = self.tree_line(description, depth, &continuous_positions);
        out.push_str(&children_to_tree(
            self.children(),
            depth,
            &continuous_positions,
        ));
        out
    }
}

impl ToTree for InlineNode {
    fn to_tree_display(
        &self,
        depth: usize,
        continuous_positions: Vec<usize>,
    ) -> String {
        let description = format!(
            "{} \"{}\"",
            self.kind().tag(),
            self.get_data(self.kind().required_data()).unwrap_or_default()
        );
        let mut out = self.tree_line(description, depth, &continuous_positions);
        out.push_str(&children_to_tree(
            self.children(),
            depth,
            &continuous_positions,
        ));
        out
    }
}

impl ToTree for TextNode {
    fn to_tree_display(
        &self,
        depth: usize,
        continuous_positions: Vec<usize>,
    ) -> String {
        let mut description = format!("\"{}\"", self.text());
        if !self.marks().is_empty() {
            let marks: Vec<String> =
                self.marks().iter().map(|m| m.to_string()).collect();
            description.push_str(&format!(" {{{}}}", marks.join(", ")));
        }
        self.tree_line(description, depth, &continuous_positions)
    }
}

#[cfg(test)]
mod test {
    use indoc::indoc;

    use super::*;
    use crate::dom::nodes::{node_data, BlockType, InlineType};
    use crate::dom::{Mark, MarkSet};

    #[test]
    fn tree_shows_nesting_marks_and_links() {
        let item = DomNode::block(
            BlockType::ListItem,
            vec![
                DomNode::text("ab", MarkSet::from([Mark::Bold, Mark::Code])),
                DomNode::inline(
                    InlineType::Link,
                    node_data([("href", "https://x.com")]),
                    vec![DomNode::new_text("c")],
                )
                .unwrap(),
            ],
        )
        .unwrap();
        let doc = Document::from_blocks(vec![
            DomNode::block(BlockType::BulletedList, vec![item]).unwrap(),
            DomNode::new_paragraph(vec![DomNode::new_text("d")]),
        ])
        .unwrap();
        assert_eq!(
            doc.to_tree(),
            indoc! {r#"

            ├>ul
            │ └>li
            │   ├>"ab" {bold, code}
            │   └>a "https://x.com"
            │     └>"c"
            └>p
              └>"d"
            "#}
        );
    }
}
