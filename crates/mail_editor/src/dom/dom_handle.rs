// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// The address of a node: the child index to follow at each level, starting
/// from the document root. The root itself has the empty path.
///
/// Handles are ordered in document order (pre-order), so an ancestor sorts
/// before its descendants and earlier siblings before later ones.
///
/// A handle is only meaningful for the [`Document`](super::Document) it was
/// taken from. Any structural edit may shift it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomHandle {
    path: Vec<usize>,
}

impl DomHandle {
    pub fn root() -> Self {
        Self { path: Vec::new() }
    }

    pub fn from_raw(path: Vec<usize>) -> Self {
        Self { path }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of steps from the root. The root is at depth 0, top-level
    /// blocks at depth 1.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn raw(&self) -> &Vec<usize> {
        &self.path
    }

    /// Handle of the parent node, or `None` for the root.
    pub fn parent_handle(&self) -> Option<DomHandle> {
        let (_, parent) = self.path.split_last()?;
        Some(DomHandle {
            path: parent.to_vec(),
        })
    }

    /// Index of this node among its parent's children, or `None` for the
    /// root.
    pub fn index_in_parent(&self) -> Option<usize> {
        self.path.last().copied()
    }

    pub fn child_handle(&self, index: usize) -> DomHandle {
        let mut path = self.path.clone();
        path.push(index);
        DomHandle { path }
    }

    pub fn next_sibling(&self) -> Option<DomHandle> {
        let index = self.index_in_parent()?;
        Some(self.parent_handle()?.child_handle(index + 1))
    }

    /// True if `other` lies strictly below this node.
    pub fn is_ancestor_of(&self, other: &DomHandle) -> bool {
        other.path.len() > self.path.len() && other.path.starts_with(&self.path)
    }

    /// The deepest handle that is an ancestor of (or equal to) both.
    pub fn common_ancestor(&self, other: &DomHandle) -> DomHandle {
        let path = self
            .path
            .iter()
            .zip(other.path.iter())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect();
        DomHandle { path }
    }
}
