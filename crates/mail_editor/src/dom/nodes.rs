// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub mod block_node;
pub mod dom_node;
pub mod inline_node;
pub mod text_node;

use std::collections::BTreeMap;

pub use block_node::{BlockNode, BlockType, DEFAULT_BLOCK};
pub use dom_node::DomNode;
pub use inline_node::{InlineNode, InlineType};
pub use text_node::{clean_text, TextNode};

/// Attributes of a block or inline node (`href` on links, `src`, `name`
/// and `size` on images and files). Keys are lower case so they survive
/// the trip through markup attributes.
pub type NodeData = BTreeMap<String, String>;

/// Convenience for building [`NodeData`] from string pairs.
pub fn node_data<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> NodeData {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

/// [`NodeData`] with every value passed through [`clean_text`].
pub(crate) fn clean_data(data: &NodeData) -> NodeData {
    data.iter()
        .map(|(k, v)| (k.clone(), clean_text(v).into_owned()))
        .collect()
}
