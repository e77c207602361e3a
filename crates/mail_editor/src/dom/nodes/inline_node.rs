// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::{DomNode, NodeData};
use crate::composer_error::EditorError;
use crate::dom::validate::check_inline;

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
pub enum InlineType {
    Link,
}

impl InlineType {
    pub fn tag(self) -> &'static str {
        match self {
            InlineType::Link => "a",
        }
    }

    /// The data key every inline of this type must carry.
    pub fn required_data(self) -> &'static str {
        match self {
            InlineType::Link => "href",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineNode {
    pub(crate) kind: InlineType,
    pub(crate) data: NodeData,
    pub(crate) children: Vec<DomNode>,
}

impl InlineNode {
    pub fn new(
        kind: InlineType,
        data: NodeData,
        children: Vec<DomNode>,
    ) -> Result<Self, EditorError> {
        let inline = Self {
            kind,
            data,
            children,
        };
        check_inline(&inline)?;
        Ok(inline)
    }

    pub fn kind(&self) -> InlineType {
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

    pub fn text_content(&self) -> String {
        self.children.iter().map(DomNode::text_content).collect()
    }
}
