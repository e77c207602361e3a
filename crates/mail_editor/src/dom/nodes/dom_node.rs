// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{BlockNode, BlockType, InlineNode, InlineType, NodeData, TextNode};
use crate::composer_error::EditorError;
use crate::dom::MarkSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomNode {
    Block(BlockNode),
    Inline(InlineNode),
    Text(TextNode),
}

impl DomNode {
    /// Build a block with no data. Fails if `children` break the nesting
    /// rules for `kind`.
    pub fn block(
        kind: BlockType,
        children: Vec<DomNode>,
    ) -> Result<DomNode, EditorError> {
        Self::block_with_data(kind, NodeData::new(), children)
    }

    pub fn block_with_data(
        kind: BlockType,
        data: NodeData,
        children: Vec<DomNode>,
    ) -> Result<DomNode, EditorError> {
        Ok(DomNode::Block(BlockNode::new(kind, data, children)?))
    }

    /// Build an inline. Fails if `data` lacks the required key or if
    /// `children` contain another inline.
    pub fn inline(
        kind: InlineType,
        data: NodeData,
        children: Vec<DomNode>,
    ) -> Result<DomNode, EditorError> {
        Ok(DomNode::Inline(InlineNode::new(kind, data, children)?))
    }

    pub fn text(content: impl Into<String>, marks: MarkSet) -> DomNode {
        DomNode::Text(TextNode::new(content, marks))
    }

    pub fn new_text(content: impl Into<String>) -> DomNode {
        Self::text(content, MarkSet::new())
    }

    pub(crate) fn new_paragraph(children: Vec<DomNode>) -> DomNode {
        DomNode::Block(BlockNode::new_unchecked(
            BlockType::Paragraph,
            NodeData::new(),
            children,
        ))
    }

    pub fn is_block(&self) -> bool {
        matches!(self, DomNode::Block(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DomNode::Text(_))
    }

    pub fn is_block_of(&self, kind: BlockType) -> bool {
        matches!(self, DomNode::Block(b) if b.kind == kind)
    }

    pub fn is_inline_of(&self, kind: InlineType) -> bool {
        matches!(self, DomNode::Inline(i) if i.kind == kind)
    }

    pub fn is_text_block(&self) -> bool {
        matches!(self, DomNode::Block(b) if b.is_text_block())
    }

    pub fn as_block(&self) -> Option<&BlockNode> {
        match self {
            DomNode::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_inline(&self) -> Option<&InlineNode> {
        match self {
            DomNode::Inline(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            DomNode::Text(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn as_block_mut(&mut self) -> Option<&mut BlockNode> {
        match self {
            DomNode::Block(b) => Some(b),
            _ => None,
        }
    }

    pub(crate) fn as_text_mut(&mut self) -> Option<&mut TextNode> {
        match self {
            DomNode::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Children of a block or inline; text nodes have none.
    pub fn children(&self) -> &[DomNode] {
        match self {
            DomNode::Block(b) => &b.children,
            DomNode::Inline(i) => &i.children,
            DomNode::Text(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<DomNode>> {
        match self {
            DomNode::Block(b) => Some(&mut b.children),
            DomNode::Inline(i) => Some(&mut i.children),
            DomNode::Text(_) => None,
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            DomNode::Block(b) => b.text_content(),
            DomNode::Inline(i) => i.text_content(),
            DomNode::Text(t) => t.text.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::nodes::node_data;
    use crate::dom::Mark;

    fn link(href: &str, text: &str) -> Result<DomNode, EditorError> {
        DomNode::inline(
            InlineType::Link,
            node_data([("href", href)]),
            vec![DomNode::new_text(text)],
        )
    }

    #[test]
    fn builders_accept_valid_nesting() {
        let item = DomNode::block(
            BlockType::ListItem,
            vec![
                DomNode::text("bold", MarkSet::from([Mark::Bold])),
                link("https://example.com", "link").unwrap(),
            ],
        )
        .unwrap();
        let list = DomNode::block(BlockType::NumberedList, vec![item]);
        assert!(list.is_ok());
    }

    #[test]
    fn link_inside_link_is_a_structural_violation() {
        let inner = link("https://inner.example.com", "in").unwrap();
        let outer = DomNode::inline(
            InlineType::Link,
            node_data([("href", "https://outer.example.com")]),
            vec![inner],
        );
        assert!(matches!(outer, Err(EditorError::StructuralViolation(_))));
    }

    #[test]
    fn link_needs_an_href() {
        assert!(link("", "text").is_err());
        assert!(DomNode::inline(
            InlineType::Link,
            NodeData::new(),
            vec![DomNode::new_text("text")]
        )
        .is_err());
    }

    #[test]
    fn paragraph_cannot_hold_blocks() {
        let inner = DomNode::new_paragraph(vec![DomNode::new_text("a")]);
        let outer = DomNode::block(BlockType::Paragraph, vec![inner]);
        assert!(outer.is_err());
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let quote = DomNode::block(
            BlockType::BlockQuote,
            vec![
                DomNode::new_text("see "),
                link("https://example.com", "here").unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(quote.text_content(), "see here");
    }
}
