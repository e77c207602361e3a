// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::commands::Snapshot;
use crate::composer_error::EditorError;
use crate::dom::document::{parent_and_index, sibling_after};
use crate::dom::nodes::{
    clean_data, BlockNode, BlockType, DomNode, NodeData, DEFAULT_BLOCK,
};
use crate::dom::runs::{rebuild, split_runs};
use crate::dom::{Document, DomHandle};
use crate::location::Location;

/// What happens to the children lifted out of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lift {
    /// They take the place of the block. Lifted list items become
    /// paragraphs, or items of the outer list when the list was nested.
    Promote,
    /// They go into a new block of the given type.
    Rewrap(BlockType),
}

impl Snapshot {
    /// Change the type of every selected text block to `kind`, keeping its
    /// content.
    pub fn set_blocks(&self, kind: BlockType) -> Result<Snapshot, EditorError> {
        self.command("set_blocks", |s| {
            if kind.is_list() || kind.is_void() {
                return Err(EditorError::structural(format!(
                    "a text block cannot become a {kind}"
                )));
            }
            let (anchor, focus) = s.selection.locations(&s.document)?;
            let mut document = s.document.clone();
            set_kinds(&mut document, &s.selection.blocks(&s.document)?, kind);
            Snapshot::commit(document, anchor, focus, None)
        })
    }

    /// Wrap the selected blocks in a new block of type `kind`. A single
    /// block is wrapped where it is. Several blocks are wrapped together
    /// with everything between them, at the level of their closest common
    /// ancestor.
    pub fn wrap_block(&self, kind: BlockType) -> Result<Snapshot, EditorError> {
        self.command("wrap_block", |s| {
            if kind.is_void() {
                return Err(EditorError::structural(format!(
                    "{kind} cannot wrap other blocks"
                )));
            }
            let targets = s.selection.blocks(&s.document)?;
            let (anchor, focus) = s.selection.locations(&s.document)?;
            let mut document = s.document.clone();
            wrap_targets(&mut document, &targets, kind)?;
            Snapshot::commit(document, anchor, focus, None)
        })
    }

    /// Turn the selected text blocks into list items and wrap them in a
    /// new list of type `kind`, as one edit.
    pub fn wrap_list(&self, kind: BlockType) -> Result<Snapshot, EditorError> {
        self.command("wrap_list", |s| {
            if !kind.is_list() {
                return Err(EditorError::structural(format!(
                    "{kind} is not a list"
                )));
            }
            let targets = s.selection.blocks(&s.document)?;
            let (anchor, focus) = s.selection.locations(&s.document)?;
            let mut document = s.document.clone();
            set_kinds(&mut document, &targets, BlockType::ListItem);
            wrap_targets(&mut document, &targets, kind)?;
            Snapshot::commit(document, anchor, focus, None)
        })
    }

    /// Remove the closest enclosing block of type `kind` from each selected
    /// block. Only the children holding the selection are lifted out; the
    /// rest stay wrapped before and after them. Does nothing if no
    /// selected block is inside a block of that type.
    ///
    /// Items lifted out of a top-level list become paragraphs. Items lifted
    /// out of a list nested in a list item move up into the outer list,
    /// right after that item.
    pub fn unwrap_block(
        &self,
        kind: BlockType,
    ) -> Result<Snapshot, EditorError> {
        self.lift_selected("unwrap_block", kind, Lift::Promote)
    }

    /// Move the selected items of the closest list of the other type into a
    /// list of type `kind`, splitting that list around them.
    pub fn switch_list(
        &self,
        kind: BlockType,
    ) -> Result<Snapshot, EditorError> {
        let Some(other) = kind.other_list() else {
            return Err(EditorError::structural(format!(
                "{kind} is not a list"
            )));
        };
        self.lift_selected("switch_list", other, Lift::Rewrap(kind))
    }

    fn lift_selected(
        &self,
        name: &str,
        kind: BlockType,
        lift: Lift,
    ) -> Result<Snapshot, EditorError> {
        self.command(name, |s| {
            let text_blocks = s.document.text_blocks();
            let mut wrappers: BTreeMap<DomHandle, Vec<usize>> =
                BTreeMap::new();
            for target in s.selection.blocks(&s.document)? {
                let wrapper = s
                    .document
                    .get_closest(&target, |n| n.is_block_of(kind));
                let index = text_blocks.iter().position(|h| *h == target);
                if let (Some(wrapper), Some(index)) = (wrapper, index) {
                    wrappers.entry(wrapper).or_default().push(index);
                }
            }
            if wrappers.is_empty() {
                return Ok(s.clone());
            }

            let (anchor, focus) = s.selection.locations(&s.document)?;
            let mut document = s.document.clone();
            for (wrapper, indices) in wrappers.iter().rev() {
                let current = document.text_blocks();
                let depth = wrapper.depth();
                let lifted: Vec<usize> = indices
                    .iter()
                    .filter_map(|i| current.get(*i))
                    .map(|h| h.raw()[depth])
                    .collect();
                let (Some(&from), Some(&to)) =
                    (lifted.iter().min(), lifted.iter().max())
                else {
                    continue;
                };
                lift_children(&mut document, wrapper, from..=to, lift)?;
            }
            Snapshot::commit(document, anchor, focus, None)
        })
    }

    /// Insert a new block of type `kind` at the selection, replacing the
    /// selected content if there is any. Image and file blocks take their
    /// `src` from `data`; other kinds are created empty and get the caret.
    pub fn insert_block(
        &self,
        kind: BlockType,
        data: NodeData,
    ) -> Result<Snapshot, EditorError> {
        let data = clean_data(&data);
        self.command("insert_block", |s| {
            if kind.is_list() {
                return Err(EditorError::structural(format!(
                    "cannot insert an empty {kind}"
                )));
            }
            let children = if kind.is_void() {
                Vec::new()
            } else {
                vec![DomNode::new_text("")]
            };
            let node = DomNode::block_with_data(kind, data.clone(), children)?;

            let base = if s.selection.is_expanded() {
                s.delete_selection()?
            } else {
                s.clone()
            };
            let (caret, _) = base.selection.locations(&base.document)?;
            let mut document = base.document.clone();
            let inserted = insert_block_at(&mut document, caret, node)?;

            let location = if kind.is_void() {
                let after = document
                    .text_blocks()
                    .iter()
                    .position(|h| *h > inserted);
                match after {
                    Some(block) => Location::new(block, 0),
                    None => {
                        document.children_mut().push(DomNode::new_paragraph(
                            vec![DomNode::new_text("")],
                        ));
                        Location::new(document.text_blocks().len() - 1, 0)
                    }
                }
            } else {
                let block = document
                    .text_blocks()
                    .iter()
                    .position(|h| *h == inserted)
                    .unwrap_or(caret.block);
                Location::new(block, 0)
            };
            Snapshot::commit(document, location, location, None)
        })
    }
}

fn set_kinds(
    document: &mut Document,
    handles: &[DomHandle],
    kind: BlockType,
) {
    for handle in handles {
        if let Some(block) = document
            .lookup_node_mut(handle)
            .and_then(DomNode::as_block_mut)
        {
            block.kind = kind;
        }
    }
}

/// Wrap `targets` in a new block of type `kind`: a single target where it
/// is, several together with everything between them at the level of
/// their closest common ancestor.
fn wrap_targets(
    document: &mut Document,
    targets: &[DomHandle],
    kind: BlockType,
) -> Result<(), EditorError> {
    let (Some(first), Some(last)) = (targets.first(), targets.last()) else {
        return Ok(());
    };
    let (parent, from, to) = if first == last {
        let (parent, index) = parent_and_index(first)?;
        (parent, index, index)
    } else {
        let parent = first.common_ancestor(last);
        let depth = parent.depth();
        (parent, first.raw()[depth], last.raw()[depth])
    };

    let siblings = document.children_of_mut(&parent).ok_or_else(|| {
        EditorError::out_of_range(format!("no node at {parent:?}"))
    })?;
    let wrapped: Vec<DomNode> = siblings.drain(from..=to).collect();
    let wrapper = BlockNode::new_unchecked(kind, NodeData::new(), wrapped);
    siblings.insert(from, DomNode::Block(wrapper));
    Ok(())
}

/// Take the children `range` out of `wrapper`, keeping the children
/// before and after them in copies of the wrapper.
fn lift_children(
    document: &mut Document,
    wrapper: &DomHandle,
    range: RangeInclusive<usize>,
    lift: Lift,
) -> Result<(), EditorError> {
    let Some(DomNode::Block(block)) = document.lookup_node(wrapper) else {
        return Err(EditorError::out_of_range(format!(
            "no block at {wrapper:?}"
        )));
    };
    let (kind, data) = (block.kind(), block.data().clone());
    let mut middle = block.children().to_vec();
    let after = middle.split_off(range.end() + 1);
    let before: Vec<DomNode> = middle.drain(..range.start()).collect();
    let copy = |children: Vec<DomNode>| {
        (!children.is_empty()).then(|| {
            DomNode::Block(BlockNode::new_unchecked(
                kind,
                data.clone(),
                children,
            ))
        })
    };
    let (before, after) = (copy(before), copy(after));

    let nested = document
        .get_parent(wrapper)
        .and_then(|p| document.lookup_node(&p))
        .is_some_and(|n| n.is_block_of(BlockType::ListItem));

    let middle = match lift {
        Lift::Rewrap(new_kind) => {
            let data = NodeData::new();
            let list = BlockNode::new_unchecked(new_kind, data, middle);
            vec![DomNode::Block(list)]
        }
        Lift::Promote if kind.is_list() && nested => {
            return outdent(document, wrapper, before, middle, after);
        }
        Lift::Promote if kind.is_list() => {
            middle.into_iter().flat_map(item_to_blocks).collect()
        }
        Lift::Promote => middle,
    };
    let replacement = before.into_iter().chain(middle).chain(after).collect();
    document.replace_node(wrapper, replacement)
}

/// What a list item leaves behind when its list goes away: its blocks if
/// it holds blocks, or else a paragraph with its content.
fn item_to_blocks(item: DomNode) -> Vec<DomNode> {
    match item {
        DomNode::Block(block) if block.is_container() => block.children,
        DomNode::Block(mut block) => {
            block.kind = DEFAULT_BLOCK;
            block.data = NodeData::new();
            vec![DomNode::Block(block)]
        }
        other => vec![other],
    }
}

/// Move `items` out of the nested list at `wrapper` into the outer list,
/// right after the list item holding `wrapper`. The items that followed
/// them stay nested, under the last moved item.
fn outdent(
    document: &mut Document,
    wrapper: &DomHandle,
    before: Option<DomNode>,
    mut items: Vec<DomNode>,
    after: Option<DomNode>,
) -> Result<(), EditorError> {
    if let Some(after) = after {
        match items.last_mut() {
            Some(DomNode::Block(last)) => append_block(last, after),
            _ => {
                return Err(EditorError::structural(
                    "nothing to hold the rest of the list",
                ))
            }
        }
    }
    let (holder, _) = parent_and_index(wrapper)?;
    document.replace_node(wrapper, before.into_iter().collect())?;

    let (outer, mut index) = parent_and_index(&holder)?;
    if document.children_of(&holder).is_some_and(<[DomNode]>::is_empty) {
        document.remove_node(&holder)?;
    } else {
        index += 1;
    }
    for (offset, item) in items.into_iter().enumerate() {
        document.insert_node(&outer.child_handle(index + offset), item)?;
    }
    Ok(())
}

/// Add `block` at the end of `item`. Inline content of `item` goes into a
/// paragraph first, as a block cannot mix the two.
fn append_block(item: &mut BlockNode, block: DomNode) {
    if !item.is_container() {
        let inlines = std::mem::take(&mut item.children);
        item.children.push(DomNode::new_paragraph(inlines));
    }
    item.children.push(block);
}

/// Put `node` next to the text block holding `caret` and return where it
/// went. Inside a list the node goes after the whole list. Otherwise it
/// goes after an empty block, before a block whose start holds the caret,
/// after a block whose end holds it, and between the two halves of a block
/// split at the caret.
fn insert_block_at(
    document: &mut Document,
    caret: Location,
    node: DomNode,
) -> Result<DomHandle, EditorError> {
    let block = document
        .text_blocks()
        .get(caret.block)
        .cloned()
        .ok_or_else(|| {
            EditorError::out_of_range(format!(
                "there is no text block {}",
                caret.block
            ))
        })?;

    if let Some(list) = document.outermost_list(&block) {
        let at = sibling_after(&list)?;
        document.insert_node(&at, node)?;
        return Ok(at);
    }

    let len = document.block_text_len(&block);
    let at = if len == 0 || caret.offset == len {
        sibling_after(&block)?
    } else if caret.offset == 0 {
        block.clone()
    } else {
        let mut head = document.runs_of(&block)?;
        let split = split_runs(&mut head, caret.offset);
        let tail = head.split_off(split);
        document.set_runs(&block, head)?;
        let Some(DomNode::Block(original)) = document.lookup_node(&block)
        else {
            return Err(EditorError::out_of_range(format!(
                "no block at {block:?}"
            )));
        };
        let second = DomNode::Block(BlockNode::new_unchecked(
            original.kind(),
            original.data().clone(),
            rebuild(tail),
        ));
        let next = sibling_after(&block)?;
        document.insert_node(&next, second)?;
        next
    };
    document.insert_node(&at, node)?;
    Ok(at)
}

#[cfg(test)]
mod test {
    use crate::dom::nodes::{node_data, BlockType, NodeData};
    use crate::tests::testutils_snapshot::{cm, tx};
    use crate::EditorError;

    #[test]
    fn set_blocks_changes_every_selected_block() {
        let s = cm("<p>a{b</p><p>c}|d</p><p>e</p>")
            .set_blocks(BlockType::BlockQuote)
            .unwrap();
        assert_eq!(
            tx(&s),
            concat!(
                "<blockquote>a{b</blockquote>",
                "<blockquote>c}|d</blockquote>",
                "<p>e</p>"
            )
        );
    }

    #[test]
    fn set_blocks_cannot_make_a_list() {
        let result = cm("<p>a|</p>").set_blocks(BlockType::BulletedList);
        assert!(matches!(result, Err(EditorError::StructuralViolation(_))));
    }

    #[test]
    fn set_blocks_that_breaks_a_list_is_rejected() {
        let before = cm("<ul><li>a|</li></ul>");
        let result = before.set_blocks(BlockType::Paragraph);
        assert!(matches!(result, Err(EditorError::StructuralViolation(_))));
        assert_eq!(tx(&before), "<ul><li>a|</li></ul>");
    }

    #[test]
    fn wrap_a_single_block() {
        let s = cm("<p>a</p><p>b|</p><p>c</p>")
            .wrap_block(BlockType::BlockQuote)
            .unwrap();
        assert_eq!(
            tx(&s),
            "<p>a</p><blockquote><p>b|</p></blockquote><p>c</p>"
        );
    }

    #[test]
    fn wrap_several_blocks_together() {
        let s = cm("<p>{a</p><p>b</p><p>c}|</p><p>d</p>")
            .wrap_block(BlockType::BlockQuote)
            .unwrap();
        assert_eq!(
            tx(&s),
            "<blockquote><p>{a</p><p>b</p><p>c}|</p></blockquote><p>d</p>"
        );
    }

    #[test]
    fn wrapping_paragraphs_in_a_list_is_rejected() {
        let result =
            cm("<p>a|</p>").wrap_block(BlockType::NumberedList);
        assert!(matches!(result, Err(EditorError::StructuralViolation(_))));
    }

    #[test]
    fn wrap_list_makes_list_items() {
        let s = cm("<p>{a</p><p>b}|</p><p>c</p>")
            .wrap_list(BlockType::NumberedList)
            .unwrap();
        assert_eq!(tx(&s), "<ol><li>{a</li><li>b}|</li></ol><p>c</p>");
    }

    #[test]
    fn wrap_list_inside_a_quote() {
        let s = cm("<blockquote><p>a|</p></blockquote>")
            .wrap_list(BlockType::BulletedList)
            .unwrap();
        assert_eq!(tx(&s), "<blockquote><ul><li>a|</li></ul></blockquote>");
    }

    #[test]
    fn set_blocks_cannot_leave_a_list_item_outside_a_list() {
        let result = cm("<p>a|</p>").set_blocks(BlockType::ListItem);
        assert!(matches!(result, Err(EditorError::StructuralViolation(_))));
    }

    #[test]
    fn unwrap_the_whole_list() {
        let s = cm("<ul><li>{a</li><li>b}|</li></ul>")
            .unwrap_block(BlockType::BulletedList)
            .unwrap();
        assert_eq!(tx(&s), "<p>{a</p><p>b}|</p>");
    }

    #[test]
    fn unwrap_the_middle_of_a_list_splits_it() {
        let s = cm("<ul><li>a</li><li>b|</li><li>c</li></ul>")
            .unwrap_block(BlockType::BulletedList)
            .unwrap();
        assert_eq!(
            tx(&s),
            "<ul><li>a</li></ul><p>b|</p><ul><li>c</li></ul>"
        );
    }

    #[test]
    fn unwrap_keeps_the_blocks_of_an_item() {
        let s = cm("<ol><li><p>a|</p><ul><li>b</li></ul></li></ol>")
            .unwrap_block(BlockType::NumberedList)
            .unwrap();
        assert_eq!(tx(&s), "<p>a|</p><ul><li>b</li></ul>");
    }

    #[test]
    fn unwrap_a_nested_list_moves_its_items_up() {
        let s = cm("<ul><li><p>a</p><ol><li>b|</li></ol></li><li>c</li></ul>")
            .unwrap_block(BlockType::NumberedList)
            .unwrap();
        assert_eq!(
            tx(&s),
            "<ul><li><p>a</p></li><li>b|</li><li>c</li></ul>"
        );
    }

    #[test]
    fn unwrap_a_nested_list_keeps_the_rest_nested() {
        let s = cm(concat!(
            "<ul><li><p>a</p>",
            "<ul><li>b</li><li>c|</li><li>d</li></ul>",
            "</li></ul>"
        ))
        .unwrap_block(BlockType::BulletedList)
        .unwrap();
        assert_eq!(
            tx(&s),
            concat!(
                "<ul><li><p>a</p><ul><li>b</li></ul></li>",
                "<li><p>c|</p><ul><li>d</li></ul></li></ul>"
            )
        );
    }

    #[test]
    fn unwrap_a_nested_list_drops_the_emptied_item() {
        let s = cm("<ol><li><ul><li>a|</li></ul></li></ol>")
            .unwrap_block(BlockType::BulletedList)
            .unwrap();
        assert_eq!(tx(&s), "<ol><li>a|</li></ol>");
    }

    #[test]
    fn switch_list_splits_the_old_list() {
        let s = cm("<ul><li>a</li><li>b|</li><li>c</li></ul>")
            .switch_list(BlockType::NumberedList)
            .unwrap();
        assert_eq!(
            tx(&s),
            "<ul><li>a</li></ul><ol><li>b|</li></ol><ul><li>c</li></ul>"
        );
    }

    #[test]
    fn switch_list_in_a_nested_list() {
        let s = cm("<ol><li><p>a</p><ul><li>b|</li></ul></li></ol>")
            .switch_list(BlockType::NumberedList)
            .unwrap();
        assert_eq!(tx(&s), "<ol><li><p>a</p><ol><li>b|</li></ol></li></ol>");
    }

    #[test]
    fn unwrap_lifts_out_of_the_nearest_quote() {
        let s = cm(concat!(
            "<blockquote><blockquote><p>a|</p></blockquote>",
            "<p>b</p></blockquote>"
        ))
        .unwrap_block(BlockType::BlockQuote)
        .unwrap();
        assert_eq!(tx(&s), "<blockquote><p>a|</p><p>b</p></blockquote>");
    }

    #[test]
    fn unwrap_without_a_match_does_nothing() {
        let before = cm("<p>a|</p>");
        assert_eq!(
            before.unwrap_block(BlockType::NumberedList).unwrap(),
            before
        );
    }

    fn image() -> NodeData {
        node_data([("src", "https://x.com/a.png")])
    }

    #[test]
    fn insert_image_at_the_end_of_a_paragraph() {
        let s = cm("<p>ab|</p>")
            .insert_block(BlockType::Image, image())
            .unwrap();
        assert_eq!(
            tx(&s),
            r#"<p>ab</p><img src="https://x.com/a.png"><p>|</p>"#
        );
    }

    #[test]
    fn insert_image_at_the_start_of_a_paragraph() {
        let s = cm("<p>|ab</p>")
            .insert_block(BlockType::Image, image())
            .unwrap();
        assert_eq!(tx(&s), r#"<img src="https://x.com/a.png"><p>|ab</p>"#);
    }

    #[test]
    fn insert_image_splits_a_paragraph() {
        let s = cm("<p>a<strong>b|c</strong></p>")
            .insert_block(BlockType::Image, image())
            .unwrap();
        assert_eq!(
            tx(&s),
            concat!(
                "<p>a<strong>b</strong></p>",
                r#"<img src="https://x.com/a.png">"#,
                "<p><strong>|c</strong></p>"
            )
        );
    }

    #[test]
    fn insert_image_replaces_the_selection() {
        let s = cm("<p>a{bc}|d</p>")
            .insert_block(BlockType::Image, image())
            .unwrap();
        assert_eq!(
            tx(&s),
            r#"<p>a</p><img src="https://x.com/a.png"><p>|d</p>"#
        );
    }

    #[test]
    fn insert_image_in_a_list_goes_after_it() {
        let s = cm("<ul><li>a|</li><li>b</li></ul><p>c</p>")
            .insert_block(BlockType::Image, image())
            .unwrap();
        assert_eq!(
            tx(&s),
            concat!(
                "<ul><li>a</li><li>b</li></ul>",
                r#"<img src="https://x.com/a.png">"#,
                "<p>|c</p>"
            )
        );
    }

    #[test]
    fn insert_image_without_src_is_rejected() {
        let result =
            cm("<p>a|</p>").insert_block(BlockType::Image, NodeData::new());
        assert!(matches!(result, Err(EditorError::StructuralViolation(_))));
    }

    #[test]
    fn insert_file_keeps_its_details() {
        let s = cm("<p>a|</p>")
            .insert_block(
                BlockType::File,
                node_data([
                    ("src", "https://x.com/f.pdf"),
                    ("name", "f.pdf"),
                    ("size", "12"),
                ]),
            )
            .unwrap();
        assert_eq!(
            tx(&s),
            concat!(
                "<p>a</p>",
                r#"<file src="https://x.com/f.pdf" name="f.pdf" size="12"></file>"#,
                "<p>|</p>"
            )
        );
    }

    #[test]
    fn insert_an_empty_quote_moves_the_caret_into_it() {
        let s = cm("<p>a|b</p>")
            .insert_block(BlockType::BlockQuote, NodeData::new())
            .unwrap();
        assert_eq!(tx(&s), "<p>a</p><blockquote>|</blockquote><p>b</p>");
    }
}
