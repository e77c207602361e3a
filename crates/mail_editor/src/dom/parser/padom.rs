// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::tree_builder::ElementFlags;
use html5ever::{Attribute, QualName};

use super::{paqual_name, PaDomHandle, PaDomNode, PaNodeContainer};

/// The tree html5ever builds for us.
///
/// Nodes refer to their children by handle and every node is owned by the
/// `nodes` list, which makes the tree easy to edit through the `&self`
/// callbacks of `TreeSink`. Nodes that html5ever detaches stay in the list;
/// they are simply unreachable from the document node.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaDom {
    pub(crate) nodes: Vec<PaDomNode>,
    pub(crate) document_handle: PaDomHandle,
}

impl PaDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![PaDomNode::Document(PaNodeContainer {
                name: paqual_name("document"),
                attrs: Vec::new(),
                children: Vec::new(),
            })],
            document_handle: PaDomHandle(0),
        }
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &PaDomHandle,
    ) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn document_handle(&self) -> &PaDomHandle {
        &self.document_handle
    }

    pub(crate) fn get_document(&self) -> &PaDomNode {
        self.get_node(&self.document_handle)
    }

    /// The node whose children include `child`, if it is attached.
    pub(crate) fn find_parent(
        &self,
        child: &PaDomHandle,
    ) -> Option<PaDomHandle> {
        self.nodes
            .iter()
            .position(|n| n.children().contains(child))
            .map(PaDomHandle)
    }

    pub(crate) fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> PaDomHandle {
        self.add_node(PaDomNode::Container(PaNodeContainer {
            name,
            attrs: attrs
                .into_iter()
                .map(|attr| {
                    (attr.name.local.to_string(), attr.value.to_string())
                })
                .collect(),
            children: Vec::new(),
        }))
    }
}
