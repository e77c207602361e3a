// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::{DomNode, NodeData};
use crate::composer_error::EditorError;
use crate::dom::validate::check_block;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum BlockType {
    Paragraph,
    BlockQuote,
    BulletedList,
    NumberedList,
    ListItem,
    Image,
    File,
}

/// The block type that toggling a block off falls back to.
pub const DEFAULT_BLOCK: BlockType = BlockType::Paragraph;

impl BlockType {
    pub fn is_list(self) -> bool {
        matches!(self, BlockType::BulletedList | BlockType::NumberedList)
    }

    /// Void blocks have no children and hold no caret positions.
    pub fn is_void(self) -> bool {
        matches!(self, BlockType::Image | BlockType::File)
    }

    /// The markup tag this block serializes to.
    pub fn tag(self) -> &'static str {
        match self {
            BlockType::Paragraph => "p",
            BlockType::BlockQuote => "blockquote",
            BlockType::BulletedList => "ul",
            BlockType::NumberedList => "ol",
            BlockType::ListItem => "li",
            BlockType::Image => "img",
            BlockType::File => "file",
        }
    }

    pub fn from_tag(tag: &str) -> Option<BlockType> {
        match tag {
            "p" => Some(BlockType::Paragraph),
            "blockquote" => Some(BlockType::BlockQuote),
            "ul" => Some(BlockType::BulletedList),
            "ol" => Some(BlockType::NumberedList),
            "li" => Some(BlockType::ListItem),
            "img" => Some(BlockType::Image),
            "file" => Some(BlockType::File),
            _ => None,
        }
    }

    /// The other list type, for lists; `None` for everything else.
    pub fn other_list(self) -> Option<BlockType> {
        match self {
            BlockType::BulletedList => Some(BlockType::NumberedList),
            BlockType::NumberedList => Some(BlockType::BulletedList),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockNode {
    pub(crate) kind: BlockType,
    pub(crate) data: NodeData,
    pub(crate) children: Vec<DomNode>,
}

impl BlockNode {
    /// Build a block, checking the nesting rules for its direct children.
    pub fn new(
        kind: BlockType,
        data: NodeData,
        children: Vec<DomNode>,
    ) -> Result<Self, EditorError> {
        let block = Self::new_unchecked(kind, data, children);
        check_block(&block)?;
        Ok(block)
    }

    pub(crate) fn new_unchecked(
        kind: BlockType,
        data: NodeData,
        children: Vec<DomNode>,
    ) -> Self {
        Self {
            kind,
            data,
            children,
        }
    }

    pub fn kind(&self) -> BlockType {
        self.kind
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn get_data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn children(&self) -> &[DomNode] {
        &self.children
    }

    /// A text block holds inline content (text and links) rather than
    /// other blocks. Every caret position lives inside a text block.
    pub fn is_text_block(&self) -> bool {
        !self.kind.is_void()
            && !self.kind.is_list()
            && self.children.iter().all(|c| !c.is_block())
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_list() || self.children.iter().any(DomNode::is_block)
    }

    /// Plain text of this block and everything below it.
    pub fn text_content(&self) -> String {
        self.children.iter().map(DomNode::text_content).collect()
    }
}
