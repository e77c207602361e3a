// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::commands::{edit_range, Snapshot};
use crate::composer_error::EditorError;
use crate::dom::Mark;

impl Snapshot {
    /// Add `mark` to every selected text, or remove it if every selected
    /// text already has it. On a caret this only changes the marks that
    /// the next typed text will get.
    pub fn toggle_mark(&self, mark: Mark) -> Result<Snapshot, EditorError> {
        self.command("toggle_mark", |s| {
            let active = s.selection.active_marks(&s.document)?;
            let remove = active.contains(mark);

            if s.selection.is_collapsed() {
                let mut pending = active;
                if remove {
                    pending.remove(mark);
                } else {
                    pending.insert(mark);
                }
                return Ok(s.with_selection(
                    s.selection.clone().with_marks(Some(pending)),
                ));
            }

            let (anchor, focus) = s.selection.locations(&s.document)?;
            let (start, end) = (anchor.min(focus), anchor.max(focus));
            let mut document = s.document.clone();
            edit_range(&mut document, start, end, |_, runs, range| {
                for run in &mut runs[range] {
                    if remove {
                        run.marks.remove(mark);
                    } else {
                        run.marks.insert(mark);
                    }
                }
            })?;
            Snapshot::commit(document, anchor, focus, None)
        })
    }
}

#[cfg(test)]
mod test {
    use crate::tests::testutils_snapshot::{cm, tx};
    use crate::{DomHandle, Mark, Point};

    #[test]
    fn bold_over_part_of_a_text() {
        let s = cm("<p>a{bc}|d</p>").toggle_mark(Mark::Bold).unwrap();
        assert_eq!(tx(&s), "<p>a<strong>{bc}|</strong>d</p>");
    }

    #[test]
    fn bold_is_removed_when_all_selected_text_has_it() {
        let s = cm("<p><strong>a{bc}|d</strong></p>")
            .toggle_mark(Mark::Bold)
            .unwrap();
        assert_eq!(tx(&s), "<p><strong>a</strong>{bc}|<strong>d</strong></p>");
    }

    #[test]
    fn mixed_selection_gets_the_mark_everywhere() {
        let s = cm("<p>{a<em>b</em>}|</p>").toggle_mark(Mark::Italic).unwrap();
        assert_eq!(tx(&s), "<p><em>{ab}|</em></p>");
    }

    #[test]
    fn toggle_spans_blocks() {
        let s = cm("<p>a{b</p><p>c}|d</p>").toggle_mark(Mark::Code).unwrap();
        assert_eq!(
            tx(&s),
            "<p>a<code>{b</code></p><p><code>c}|</code>d</p>"
        );
    }

    #[test]
    fn caret_toggle_only_sets_pending_marks() {
        let s = cm("<p>ab|</p>").toggle_mark(Mark::Bold).unwrap();
        assert_eq!(tx(&s), "<p>ab|</p>");
        assert!(s.selection.pending_marks().unwrap().contains(Mark::Bold));
    }

    #[test]
    fn empty_range_between_texts_sets_pending_marks() {
        let s = cm("<p>ab<em>cd|</em></p>");
        let s = s
            .select(
                Point::new(DomHandle::from_raw(vec![0, 0]), 2),
                Point::new(DomHandle::from_raw(vec![0, 1]), 0),
            )
            .unwrap()
            .toggle_mark(Mark::Bold)
            .unwrap();
        assert_eq!(tx(&s), "<p>ab|<em>cd</em></p>");
        assert!(s.selection.pending_marks().unwrap().contains(Mark::Bold));
    }

    #[test]
    fn caret_toggle_off_inside_bold_text() {
        let s = cm("<p><strong>ab|</strong></p>")
            .toggle_mark(Mark::Bold)
            .unwrap();
        assert!(s.selection.pending_marks().unwrap().is_empty());
    }

    #[test]
    fn large_size_replaces_small_size() {
        let s = cm(r#"<p><font size="1">{ab}|</font></p>"#)
            .toggle_mark(Mark::LargeSize)
            .unwrap();
        assert_eq!(tx(&s), r#"<p><font size="4">{ab}|</font></p>"#);
    }

    #[test]
    fn backward_selection_keeps_its_direction() {
        let s = cm("<p>a|{bc}d</p>").toggle_mark(Mark::Bold).unwrap();
        assert_eq!(tx(&s), "<p>a<strong>|{bc}</strong>d</p>");
    }
}
