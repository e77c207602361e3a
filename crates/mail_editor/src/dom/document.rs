// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::composer_error::EditorError;
use crate::dom::nodes::{BlockType, DomNode};
use crate::dom::runs::{flatten, rebuild, InlineRun};
use crate::dom::DomHandle;

/// A whole document: the implicit root block and its top-level blocks.
///
/// Documents are values. Commands never change a document that a caller
/// can see; they clone it, edit the clone, and hand back the result once it
/// has been normalized and validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    children: Vec<DomNode>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding one empty paragraph.
    pub fn new() -> Self {
        Self {
            children: vec![DomNode::new_paragraph(vec![DomNode::new_text(
                "",
            )])],
        }
    }

    /// Build a document from top-level blocks. The blocks are normalized
    /// and the result must satisfy every structural invariant.
    pub fn from_blocks(blocks: Vec<DomNode>) -> Result<Self, EditorError> {
        let mut document = Self { children: blocks };
        document.normalize();
        document.validate()?;
        Ok(document)
    }

    pub(crate) fn from_blocks_unchecked(blocks: Vec<DomNode>) -> Self {
        Self { children: blocks }
    }

    pub fn children(&self) -> &[DomNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<DomNode> {
        &mut self.children
    }

    /// The node at `handle`. The root handle addresses no node.
    pub fn lookup_node(&self, handle: &DomHandle) -> Option<&DomNode> {
        let (first, rest) = handle.raw().split_first()?;
        let mut node = self.children.get(*first)?;
        for i in rest {
            node = node.children().get(*i)?;
        }
        Some(node)
    }

    pub(crate) fn lookup_node_mut(
        &mut self,
        handle: &DomHandle,
    ) -> Option<&mut DomNode> {
        let (first, rest) = handle.raw().split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for i in rest {
            node = node.children_mut()?.get_mut(*i)?;
        }
        Some(node)
    }

    /// Children of the node at `handle`; the root's children are the
    /// top-level blocks.
    pub fn children_of(&self, handle: &DomHandle) -> Option<&[DomNode]> {
        if handle.is_root() {
            Some(&self.children)
        } else {
            self.lookup_node(handle).map(DomNode::children)
        }
    }

    pub(crate) fn children_of_mut(
        &mut self,
        handle: &DomHandle,
    ) -> Option<&mut Vec<DomNode>> {
        if handle.is_root() {
            Some(&mut self.children)
        } else {
            self.lookup_node_mut(handle)?.children_mut()
        }
    }

    /// Handle of the parent of `handle`, or `None` for the root.
    pub fn get_parent(&self, handle: &DomHandle) -> Option<DomHandle> {
        handle.parent_handle()
    }

    /// Walk up from `handle` (not including it) and return the nearest
    /// ancestor node for which `predicate` holds.
    pub fn get_closest(
        &self,
        handle: &DomHandle,
        predicate: impl Fn(&DomNode) -> bool,
    ) -> Option<DomHandle> {
        let mut current = handle.clone();
        while current.depth() > 1 {
            let Some(parent) = current.parent_handle() else {
                break;
            };
            current = parent;
            if self.lookup_node(&current).is_some_and(&predicate) {
                return Some(current);
            }
        }
        None
    }

    /// Handles of every ancestor node of `handle`, outermost first. The
    /// implicit root is not included.
    pub fn get_ancestors(&self, handle: &DomHandle) -> Vec<DomHandle> {
        (1..handle.depth())
            .map(|depth| DomHandle::from_raw(handle.raw()[..depth].to_vec()))
            .collect()
    }

    pub fn closest_block(&self, handle: &DomHandle) -> Option<DomHandle> {
        self.get_closest(handle, DomNode::is_block)
    }

    /// Handles of all nodes, in document order.
    pub fn handles(&self) -> Vec<DomHandle> {
        fn walk(
            nodes: &[DomNode],
            parent: &DomHandle,
            out: &mut Vec<DomHandle>,
        ) {
            for (i, node) in nodes.iter().enumerate() {
                let handle = parent.child_handle(i);
                out.push(handle.clone());
                walk(node.children(), &handle, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &DomHandle::root(), &mut out);
        out
    }

    /// Blocks that hold inline content, in document order. Every caret
    /// position lives in one of these.
    pub fn text_blocks(&self) -> Vec<DomHandle> {
        self.handles_where(DomNode::is_text_block)
    }

    /// Image and file blocks, in document order.
    pub fn void_blocks(&self) -> Vec<DomHandle> {
        self.handles_where(|n| {
            n.as_block().is_some_and(|b| b.kind().is_void())
        })
    }

    pub fn text_handles(&self) -> Vec<DomHandle> {
        self.handles_where(DomNode::is_text)
    }

    /// Text nodes below `block`, in document order.
    pub fn text_handles_in(&self, block: &DomHandle) -> Vec<DomHandle> {
        self.text_handles()
            .into_iter()
            .filter(|h| block.is_ancestor_of(h))
            .collect()
    }

    fn handles_where(
        &self,
        predicate: impl Fn(&DomNode) -> bool,
    ) -> Vec<DomHandle> {
        self.handles()
            .into_iter()
            .filter(|h| self.lookup_node(h).is_some_and(&predicate))
            .collect()
    }

    /// Number of characters held by the text block at `handle`.
    pub fn block_text_len(&self, handle: &DomHandle) -> usize {
        self.lookup_node(handle)
            .map(|n| n.text_content().chars().count())
            .unwrap_or(0)
    }

    /// The text of every text block, one per line.
    pub fn to_plain_text(&self) -> String {
        self.text_blocks()
            .iter()
            .filter_map(|h| self.lookup_node(h))
            .map(DomNode::text_content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Handle of the outermost list that `handle` sits in, if any.
    pub fn outermost_list(&self, handle: &DomHandle) -> Option<DomHandle> {
        self.get_ancestors(handle).into_iter().find(|h| {
            self.lookup_node(h)
                .and_then(DomNode::as_block)
                .is_some_and(|b| b.kind().is_list())
        })
    }

    /// Flatten the inline content of the text block at `handle` into runs.
    pub(crate) fn runs_of(
        &self,
        handle: &DomHandle,
    ) -> Result<Vec<InlineRun>, EditorError> {
        let node = self.text_block(handle)?;
        Ok(flatten(node.children()))
    }

    /// Replace the inline content of the text block at `handle` with the
    /// result of `edit` applied to its runs.
    pub(crate) fn edit_runs(
        &mut self,
        handle: &DomHandle,
        edit: impl FnOnce(&mut Vec<InlineRun>),
    ) -> Result<(), EditorError> {
        let mut runs = self.runs_of(handle)?;
        edit(&mut runs);
        self.set_runs(handle, runs)
    }

    pub(crate) fn set_runs(
        &mut self,
        handle: &DomHandle,
        runs: Vec<InlineRun>,
    ) -> Result<(), EditorError> {
        let children = self.children_of_mut(handle).ok_or_else(|| {
            EditorError::out_of_range(format!("no block at {handle:?}"))
        })?;
        *children = rebuild(runs);
        Ok(())
    }

    fn text_block(
        &self,
        handle: &DomHandle,
    ) -> Result<&DomNode, EditorError> {
        self.lookup_node(handle)
            .filter(|n| n.is_text_block())
            .ok_or_else(|| {
                EditorError::out_of_range(format!(
                    "no text block at {handle:?}"
                ))
            })
    }

    /// Insert `node` so that it ends up at `handle`.
    pub(crate) fn insert_node(
        &mut self,
        handle: &DomHandle,
        node: DomNode,
    ) -> Result<(), EditorError> {
        let (parent, index) = parent_and_index(handle)?;
        let siblings = self.children_of_mut(&parent).ok_or_else(|| {
            EditorError::out_of_range(format!("no parent for {handle:?}"))
        })?;
        if index > siblings.len() {
            return Err(EditorError::out_of_range(format!(
                "cannot insert at {handle:?}"
            )));
        }
        siblings.insert(index, node);
        Ok(())
    }

    /// Remove the node at `handle`, then any ancestor block that is left
    /// without children.
    pub(crate) fn remove_leaf(
        &mut self,
        handle: &DomHandle,
    ) -> Result<DomNode, EditorError> {
        let removed = self.remove_node(handle)?;
        let mut parent = handle.parent_handle();
        while let Some(current) = parent.filter(|p| {
            !p.is_root()
                && self.children_of(p).is_some_and(<[DomNode]>::is_empty)
        }) {
            self.remove_node(&current)?;
            parent = current.parent_handle();
        }
        Ok(removed)
    }

    pub(crate) fn remove_node(
        &mut self,
        handle: &DomHandle,
    ) -> Result<DomNode, EditorError> {
        let (parent, index) = parent_and_index(handle)?;
        let siblings = self
            .children_of_mut(&parent)
            .filter(|s| index < s.len())
            .ok_or_else(|| {
                EditorError::out_of_range(format!("no node at {handle:?}"))
            })?;
        Ok(siblings.remove(index))
    }

    /// Replace the node at `handle` with `nodes`, in order.
    pub(crate) fn replace_node(
        &mut self,
        handle: &DomHandle,
        nodes: Vec<DomNode>,
    ) -> Result<(), EditorError> {
        let (parent, index) = parent_and_index(handle)?;
        let siblings = self
            .children_of_mut(&parent)
            .filter(|s| index < s.len())
            .ok_or_else(|| {
                EditorError::out_of_range(format!("no node at {handle:?}"))
            })?;
        siblings.splice(index..=index, nodes);
        Ok(())
    }

    /// True if any block in the document has type `kind`.
    pub fn contains_block(&self, kind: BlockType) -> bool {
        self.handles()
            .iter()
            .filter_map(|h| self.lookup_node(h))
            .any(|n| n.is_block_of(kind))
    }
}

/// The parent of `handle` and its index there. Fails on the root.
pub(crate) fn parent_and_index(
    handle: &DomHandle,
) -> Result<(DomHandle, usize), EditorError> {
    handle
        .parent_handle()
        .zip(handle.index_in_parent())
        .ok_or_else(|| {
            EditorError::out_of_range(format!("{handle:?} has no parent"))
        })
}

/// The handle right after `handle` among its siblings. Fails on the root.
pub(crate) fn sibling_after(
    handle: &DomHandle,
) -> Result<DomHandle, EditorError> {
    let (parent, index) = parent_and_index(handle)?;
    Ok(parent.child_handle(index + 1))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::nodes::{node_data, InlineType};
    use crate::dom::{Mark, MarkSet};

    fn item(text: &str) -> DomNode {
        DomNode::block(BlockType::ListItem, vec![DomNode::new_text(text)])
            .unwrap()
    }

    fn sample() -> Document {
        Document::from_blocks(vec![
            DomNode::new_paragraph(vec![
                DomNode::new_text("a"),
                DomNode::inline(
                    InlineType::Link,
                    node_data([("href", "https://x.com")]),
                    vec![DomNode::text("b", MarkSet::from([Mark::Bold]))],
                )
                .unwrap(),
            ]),
            DomNode::block(BlockType::BulletedList, vec![item("c"), item("d")])
                .unwrap(),
        ])
        .unwrap()
    }

    fn h(path: &[usize]) -> DomHandle {
        DomHandle::from_raw(path.to_vec())
    }

    #[test]
    fn new_document_is_one_empty_paragraph() {
        let doc = Document::new();
        assert_eq!(doc.text_blocks(), vec![h(&[0])]);
        assert_eq!(doc.text_handles(), vec![h(&[0, 0])]);
        assert_eq!(doc.to_plain_text(), "");
    }

    #[test]
    fn lookup_follows_the_path() {
        let doc = sample();
        let text = doc.lookup_node(&h(&[0, 1, 0])).unwrap();
        assert_eq!(text.as_text().unwrap().text(), "b");
        assert!(doc.lookup_node(&DomHandle::root()).is_none());
        assert!(doc.lookup_node(&h(&[5])).is_none());
    }

    #[test]
    fn closest_walks_strict_ancestors_nearest_first() {
        let doc = sample();
        let text = h(&[1, 0, 0]);
        assert_eq!(doc.closest_block(&text), Some(h(&[1, 0])));
        assert_eq!(
            doc.get_closest(&text, |n| n.is_block_of(BlockType::BulletedList)),
            Some(h(&[1]))
        );
        assert_eq!(doc.get_closest(&h(&[1]), DomNode::is_block), None);
    }

    #[test]
    fn ancestors_are_outermost_first() {
        let doc = sample();
        assert_eq!(
            doc.get_ancestors(&h(&[1, 0, 0])),
            vec![h(&[1]), h(&[1, 0])]
        );
        assert_eq!(doc.get_parent(&h(&[1, 0])), Some(h(&[1])));
        assert_eq!(doc.get_parent(&DomHandle::root()), None);
    }

    #[test]
    fn text_blocks_skip_containers() {
        let doc = sample();
        assert_eq!(doc.text_blocks(), vec![h(&[0]), h(&[1, 0]), h(&[1, 1])]);
        assert_eq!(doc.to_plain_text(), "ab\nc\nd");
    }

    #[test]
    fn removing_the_last_item_removes_the_list() {
        let mut doc = sample();
        doc.remove_leaf(&h(&[1, 1])).unwrap();
        doc.remove_leaf(&h(&[1, 0])).unwrap();
        assert_eq!(doc.children().len(), 1);
    }

    #[test]
    fn edits_at_the_root_handle_are_out_of_range() {
        let mut doc = sample();
        let root = DomHandle::root();
        assert!(matches!(
            doc.insert_node(&root, item("x")),
            Err(EditorError::OutOfRange(_))
        ));
        assert!(doc.remove_leaf(&root).is_err());
        assert!(doc.replace_node(&root, vec![]).is_err());
        assert_eq!(doc, sample());
    }

    #[test]
    fn outermost_list_is_found_from_a_text() {
        let doc = sample();
        assert_eq!(doc.outermost_list(&h(&[1, 1, 0])), Some(h(&[1])));
        assert_eq!(doc.outermost_list(&h(&[0, 0])), None);
    }
}
