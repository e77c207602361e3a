// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Structural invariants of the document tree.
//!
//! [`check_block`] and [`check_inline`] look at one node and its direct
//! children, which is what the node builders need. [`Document::validate`]
//! applies them to the whole tree.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::composer_error::EditorError;
use crate::dom::nodes::{BlockNode, BlockType, DomNode, InlineNode, NodeData};
use crate::dom::Document;

static DATA_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").unwrap());

pub(crate) fn check_block(block: &BlockNode) -> Result<(), EditorError> {
    let kind = block.kind();
    check_data(&block.data)?;

    if kind.is_void() {
        if !block.children.is_empty() {
            return Err(EditorError::structural(format!(
                "{kind} cannot have children"
            )));
        }
        if block.get_data("src").map_or(true, str::is_empty) {
            return Err(EditorError::structural(format!(
                "{kind} needs a src"
            )));
        }
        return Ok(());
    }

    if kind.is_list() {
        return match block
            .children
            .iter()
            .find(|c| !c.is_block_of(BlockType::ListItem))
        {
            Some(child) => Err(EditorError::structural(format!(
                "{kind} can only hold list items, found {}",
                describe(child)
            ))),
            None => Ok(()),
        };
    }

    let has_blocks = block.children.iter().any(DomNode::is_block);
    let has_inlines = block.children.iter().any(|c| !c.is_block());
    if has_blocks && has_inlines {
        return Err(EditorError::structural(format!(
            "{kind} mixes blocks and inline content"
        )));
    }
    if has_blocks && kind == BlockType::Paragraph {
        return Err(EditorError::structural(
            "paragraph can only hold inline content",
        ));
    }
    if block.children.iter().any(|c| c.is_block_of(BlockType::ListItem)) {
        return Err(EditorError::structural(format!(
            "{kind} cannot directly hold a list item"
        )));
    }
    Ok(())
}

pub(crate) fn check_inline(inline: &InlineNode) -> Result<(), EditorError> {
    let kind = inline.kind();
    check_data(&inline.data)?;
    let required = kind.required_data();
    if inline.get_data(required).map_or(true, |v| v.trim().is_empty()) {
        return Err(EditorError::structural(format!(
            "{kind} needs a non-empty {required}"
        )));
    }
    match inline.children.iter().find(|c| !c.is_text()) {
        Some(DomNode::Inline(inner)) if inner.kind() == kind => Err(
            EditorError::structural(format!("{kind} inside {kind}")),
        ),
        Some(child) => Err(EditorError::structural(format!(
            "{kind} can only hold text, found {}",
            describe(child)
        ))),
        None => Ok(()),
    }
}

fn check_data(data: &NodeData) -> Result<(), EditorError> {
    match data.keys().find(|k| !DATA_KEY.is_match(k)) {
        Some(key) => Err(EditorError::structural(format!(
            "invalid data key `{key}`"
        ))),
        None => Ok(()),
    }
}

fn describe(node: &DomNode) -> String {
    match node {
        DomNode::Block(b) => b.kind().to_string(),
        DomNode::Inline(i) => i.kind().to_string(),
        DomNode::Text(_) => "text".to_owned(),
    }
}

fn check_node(node: &DomNode) -> Result<(), EditorError> {
    match node {
        DomNode::Block(block) => check_block(block)?,
        DomNode::Inline(inline) => check_inline(inline)?,
        DomNode::Text(_) => {}
    }
    node.children().iter().try_for_each(check_node)
}

impl Document {
    /// Check every structural invariant of the tree.
    pub fn validate(&self) -> Result<(), EditorError> {
        if let Some(child) = self.children().iter().find(|c| !c.is_block()) {
            return Err(EditorError::structural(format!(
                "the document can only hold blocks, found {}",
                describe(child)
            )));
        }
        if self.children().iter().any(|c| c.is_block_of(BlockType::ListItem)) {
            return Err(EditorError::structural(
                "a list item must be inside a list",
            ));
        }
        self.children().iter().try_for_each(check_node)
    }

    /// Panics if the document is invalid or not in normal form. Only does
    /// anything when the `assert-invariants` feature is on.
    pub fn assert_invariants(&self) {
        #[cfg(feature = "assert-invariants")]
        self.explicitly_assert_invariants();
    }

    pub fn explicitly_assert_invariants(&self) {
        if let Err(err) = self.validate() {
            panic!("Document invariant violated: {err}\n{self:?}");
        }
        let mut normalized = self.clone();
        normalized.normalize();
        assert_eq!(&normalized, self, "Document is not normalized");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::nodes::{node_data, InlineType};

    fn item(children: Vec<DomNode>) -> DomNode {
        DomNode::Block(BlockNode::new_unchecked(
            BlockType::ListItem,
            NodeData::new(),
            children,
        ))
    }

    #[test]
    fn list_item_may_hold_a_nested_list() {
        let nested = DomNode::block(
            BlockType::BulletedList,
            vec![item(vec![DomNode::new_text("b")])],
        )
        .unwrap();
        let outer = BlockNode::new_unchecked(
            BlockType::ListItem,
            NodeData::new(),
            vec![DomNode::new_paragraph(vec![DomNode::new_text("a")]), nested],
        );
        assert!(check_block(&outer).is_ok());
    }

    #[test]
    fn list_item_cannot_hold_a_list_item() {
        let outer = BlockNode::new_unchecked(
            BlockType::ListItem,
            NodeData::new(),
            vec![item(vec![DomNode::new_text("a")])],
        );
        assert!(check_block(&outer).is_err());
    }

    #[test]
    fn list_item_outside_a_list_is_rejected() {
        let quote = BlockNode::new_unchecked(
            BlockType::BlockQuote,
            NodeData::new(),
            vec![item(vec![DomNode::new_text("a")])],
        );
        assert!(check_block(&quote).is_err());
        let doc =
            Document::from_blocks_unchecked(vec![item(vec![DomNode::new_text(
                "a",
            )])]);
        assert!(matches!(
            doc.validate(),
            Err(EditorError::StructuralViolation(_))
        ));
    }

    #[test]
    fn blocks_and_inlines_do_not_mix() {
        let quote = BlockNode::new_unchecked(
            BlockType::BlockQuote,
            NodeData::new(),
            vec![
                DomNode::new_text("a"),
                DomNode::new_paragraph(vec![DomNode::new_text("b")]),
            ],
        );
        assert!(check_block(&quote).is_err());
    }

    #[test]
    fn data_keys_are_lower_case_identifiers() {
        let image = BlockNode::new_unchecked(
            BlockType::Image,
            node_data([("src", "a.png"), ("Alt", "x")]),
            vec![],
        );
        assert!(check_block(&image).is_err());
        let image = BlockNode::new_unchecked(
            BlockType::Image,
            node_data([("src", "a.png"), ("data-id", "x")]),
            vec![],
        );
        assert!(check_block(&image).is_ok());
    }

    #[test]
    fn whitespace_href_is_rejected() {
        let link = DomNode::inline(
            InlineType::Link,
            node_data([("href", "  ")]),
            vec![DomNode::new_text("a")],
        );
        assert!(link.is_err());
    }

    #[test]
    fn document_root_holds_blocks_only() {
        let doc = Document::from_blocks_unchecked(vec![DomNode::new_text("a")]);
        assert!(doc.validate().is_err());
    }
}
