// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use speculoos::prelude::*;

use crate::tests::testutils_snapshot::cm;
use crate::{
    deserialize, serialize, BlockType, FileDetails, LinkDetails, Mark,
    PolicyOutcome, Snapshot,
};

fn applied(outcome: PolicyOutcome) -> Snapshot {
    match outcome {
        PolicyOutcome::Applied(next) => next,
        other => panic!("Expected a change, got {other:?}"),
    }
}

fn assert_round_trips(s: &Snapshot) {
    let html = serialize(&s.document);
    assert_that!(deserialize(&html))
        .is_ok()
        .is_equal_to(&s.document);
}

#[test]
fn edited_documents_survive_the_serializer() {
    let s = cm("<p>{hello}|</p>");
    let s = applied(s.on_click_mark(Mark::Bold).unwrap());
    let s = applied(s.on_click_mark(Mark::LargeSize).unwrap());
    let s = applied(s.on_click_block(BlockType::NumberedList).unwrap());
    let s = applied(
        s.add_link(&LinkDetails {
            text: String::new(),
            url: "https://x.com/?a=1&b=2".to_owned(),
            is_selected_text: true,
        })
        .unwrap(),
    );
    assert_round_trips(&s);
}

#[test]
fn voids_survive_the_serializer() {
    let s = cm("<p>a|b</p>");
    let s = applied(s.add_image("https://x.com/a.png").unwrap());
    let s = applied(
        s.add_file(&FileDetails {
            src: "https://x.com/f.pdf".to_owned(),
            name: "f \"1\".pdf".to_owned(),
            size: 2048,
        })
        .unwrap(),
    );
    assert_round_trips(&s);
    assert_that!(serialize(&s.document)).contains(r#"size="2048""#);
}

#[test]
fn quotes_and_nested_lists_survive_the_serializer() {
    assert_round_trips(&cm(concat!(
        "<blockquote><p>a</p><p>b|</p></blockquote>",
        "<ul><li><p>c</p><ol><li>d</li></ol></li></ul>"
    )));
}

#[test]
fn typing_into_every_kind_of_block_round_trips() {
    for html in [
        "<p>a|</p>",
        "<blockquote>a|</blockquote>",
        "<ul><li>a|</li></ul>",
        r#"<p><a href="https://x.com">a|</a></p>"#,
    ] {
        let s = cm(html).insert_text("<&>").unwrap();
        assert_round_trips(&s);
    }
}

#[test]
fn carriage_returns_and_nul_round_trip() {
    for text in ["x\ry", "x\r\ny", "x\0y", "\r\n\r\0"] {
        for html in ["<p>a|b</p>", "<ul><li>a|b</li></ul>"] {
            let s = cm(html).insert_text(text).unwrap();
            assert_round_trips(&s);
            let plain = s.document.to_plain_text();
            assert!(!plain.contains(['\r', '\0']), "{plain:?}");
        }
    }
}

#[test]
fn link_dialog_text_with_line_breaks_round_trips() {
    let s = applied(
        cm("<p>a|</p>")
            .add_link(&LinkDetails {
                text: "x\r\ny".to_owned(),
                url: "https://x.com/\0".to_owned(),
                is_selected_text: false,
            })
            .unwrap(),
    );
    assert_round_trips(&s);
    assert_eq!(s.document.to_plain_text(), "ax\ny");
}
