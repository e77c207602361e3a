// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::tests::testutils_snapshot::{cm, tx};
use crate::{BlockType, PolicyOutcome, Snapshot};

fn click(s: &Snapshot, kind: BlockType) -> Snapshot {
    match s.on_click_block(kind).unwrap() {
        PolicyOutcome::Applied(next) => next,
        other => panic!("Expected a change, got {other:?}"),
    }
}

#[test]
fn bulleted_list_wraps_a_paragraph() {
    let s = click(&cm("<p>ab|c</p>"), BlockType::BulletedList);
    assert_eq!(tx(&s), "<ul><li>ab|c</li></ul>");
}

#[test]
fn numbered_list_wraps_every_selected_paragraph() {
    let s = click(
        &cm("<p>{a</p><p>b}|</p><p>c</p>"),
        BlockType::NumberedList,
    );
    assert_eq!(tx(&s), "<ol><li>{a</li><li>b}|</li></ol><p>c</p>");
}

#[test]
fn clicking_the_active_list_turns_it_back_into_paragraphs() {
    let s = click(&cm("<ul><li>ab|c</li></ul>"), BlockType::BulletedList);
    assert_eq!(tx(&s), "<p>ab|c</p>");
}

#[test]
fn clicking_twice_restores_the_paragraph() {
    let before = cm("<p>a|b</p>");
    let once = click(&before, BlockType::NumberedList);
    let twice = click(&once, BlockType::NumberedList);
    assert_eq!(tx(&twice), tx(&before));
    assert_eq!(twice.document, before.document);
}

#[test]
fn clicking_the_other_list_switches_type() {
    let s = click(&cm("<ul><li>a|</li></ul>"), BlockType::NumberedList);
    assert_eq!(tx(&s), "<ol><li>a|</li></ol>");
}

#[test]
fn leaving_the_middle_of_a_list_splits_it() {
    let s = click(
        &cm("<ul><li>a</li><li>b|</li><li>c</li></ul>"),
        BlockType::BulletedList,
    );
    assert_eq!(
        tx(&s),
        "<ul><li>a</li></ul><p>b|</p><ul><li>c</li></ul>"
    );
}

#[test]
fn quote_inside_a_list_leaves_the_list() {
    let s = click(&cm("<ul><li>a|</li></ul>"), BlockType::BlockQuote);
    assert_eq!(tx(&s), "<blockquote>a|</blockquote>");
}

#[test]
fn quote_toggles_on_and_off() {
    let on = click(&cm("<p>a|</p>"), BlockType::BlockQuote);
    assert_eq!(tx(&on), "<blockquote>a|</blockquote>");
    let off = click(&on, BlockType::BlockQuote);
    assert_eq!(tx(&off), "<p>a|</p>");
}

#[test]
fn list_is_active_only_for_its_own_type() {
    let s = cm("<ol><li>a|</li></ol>");
    assert!(s.is_list_active(BlockType::NumberedList).unwrap());
    assert!(!s.is_list_active(BlockType::BulletedList).unwrap());
    assert!(!cm("<p>a|</p>")
        .is_list_active(BlockType::NumberedList)
        .unwrap());
}

#[test]
fn image_and_file_buttons_open_dialogs() {
    let s = cm("<p>a|</p>");
    assert_eq!(
        s.on_click_block(BlockType::Image).unwrap(),
        PolicyOutcome::OpenImageInput
    );
    assert_eq!(
        s.on_click_block(BlockType::File).unwrap(),
        PolicyOutcome::OpenFilePicker
    );
}

#[test]
fn clicking_the_active_nested_list_moves_the_item_up() {
    let s = click(
        &cm("<ul><li><p>a</p><ul><li>b|</li></ul></li></ul>"),
        BlockType::BulletedList,
    );
    assert_eq!(tx(&s), "<ul><li><p>a</p></li><li>b|</li></ul>");
}

#[test]
fn clicking_the_other_list_in_a_nested_list_switches_it() {
    let s = click(
        &cm("<ol><li><p>a</p><ul><li>b|</li></ul></li></ol>"),
        BlockType::NumberedList,
    );
    assert_eq!(tx(&s), "<ol><li><p>a</p><ol><li>b|</li></ol></li></ol>");
}

#[test]
fn same_list_type_inside_a_nested_list_of_the_other_type() {
    let s = click(
        &cm("<ol><li><p>a</p><ul><li>b|</li></ul></li></ol>"),
        BlockType::BulletedList,
    );
    assert_eq!(tx(&s), "<ol><li><p>a</p></li><li>b|</li></ol>");
}

#[test]
fn list_item_holding_a_paragraph_counts_as_a_list_item() {
    let s = cm("<ul><li><p>a|</p></li></ul>");
    assert!(s.in_list_item().unwrap());
    assert!(s.is_list_active(BlockType::BulletedList).unwrap());
    let s = click(&s, BlockType::BulletedList);
    assert_eq!(tx(&s), "<p>a|</p>");
}

#[test]
fn quote_inside_a_nested_list_leaves_every_list() {
    let s = click(
        &cm("<ul><li><p>a</p><ol><li>b|</li></ol></li></ul>"),
        BlockType::BlockQuote,
    );
    assert_eq!(
        tx(&s),
        "<ul><li><p>a</p></li></ul><blockquote>b|</blockquote>"
    );
}

#[test]
fn leaving_a_list_never_leaves_an_orphan_item() {
    let s = click(
        &cm("<ol><li>{a</li><li>b}|</li></ol>"),
        BlockType::NumberedList,
    );
    assert_eq!(tx(&s), "<p>{a</p><p>b}|</p>");
    s.document.explicitly_assert_invariants();
}
