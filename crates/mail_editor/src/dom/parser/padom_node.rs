// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::QualName;
use once_cell::sync::Lazy;

use super::{paqual_name, PaNodeContainer, PaNodeText};

static NO_NAME: Lazy<QualName> = Lazy::new(|| paqual_name(""));

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Container(PaNodeContainer),
    Document(PaNodeContainer),
    Text(PaNodeText),
    /// Comments and processing instructions. They are kept in the tree so
    /// that handles stay valid, and skipped on conversion.
    Comment,
}

impl PaDomNode {
    /// The element name; nodes that are not elements have an empty one.
    pub(crate) fn name(&self) -> &QualName {
        match self {
            PaDomNode::Container(n) | PaDomNode::Document(n) => &n.name,
            PaDomNode::Text(_) | PaDomNode::Comment => &NO_NAME,
        }
    }

    pub(crate) fn children_mut(
        &mut self,
    ) -> Option<&mut Vec<super::PaDomHandle>> {
        match self {
            PaDomNode::Container(n) | PaDomNode::Document(n) => {
                Some(&mut n.children)
            }
            PaDomNode::Text(_) | PaDomNode::Comment => None,
        }
    }

    pub(crate) fn children(&self) -> &[super::PaDomHandle] {
        match self {
            PaDomNode::Container(n) | PaDomNode::Document(n) => &n.children,
            PaDomNode::Text(_) | PaDomNode::Comment => &[],
        }
    }
}
