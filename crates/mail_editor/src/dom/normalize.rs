// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::nodes::DomNode;
use crate::dom::runs::{flatten, rebuild};
use crate::dom::Document;

impl Document {
    /// Bring the tree into its normal form:
    ///
    /// - inline content of every text block is merged (neighbouring texts
    ///   with equal marks become one, empty texts and empty inlines go)
    ///   and an empty text block keeps exactly one empty, unmarked text;
    /// - image and file blocks lose any children;
    /// - lists without items are removed, and other containers left
    ///   without children become empty text blocks;
    /// - a document without any text block gets an empty paragraph.
    pub(crate) fn normalize(&mut self) {
        normalize_blocks(self.children_mut());
        if self.text_blocks().is_empty() {
            self.children_mut()
                .push(DomNode::new_paragraph(vec![DomNode::new_text("")]));
        }
    }
}

fn normalize_blocks(nodes: &mut Vec<DomNode>) {
    nodes.iter_mut().for_each(normalize_block);
    nodes.retain(|n| {
        !n.as_block()
            .is_some_and(|b| b.kind.is_list() && b.children.is_empty())
    });
}

fn normalize_block(node: &mut DomNode) {
    let Some(block) = node.as_block_mut() else {
        return;
    };
    if block.kind.is_void() {
        block.children.clear();
    } else if block.is_container() {
        normalize_blocks(&mut block.children);
        if !block.kind.is_list() && block.children.is_empty() {
            block.children.push(DomNode::new_text(""));
        }
    } else {
        block.children = rebuild(flatten(&block.children));
    }
}
