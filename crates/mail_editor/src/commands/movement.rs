// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::commands::Snapshot;
use crate::composer_error::EditorError;
use crate::location::Location;
use crate::selection::{Point, Selection};

impl Snapshot {
    /// Select from `anchor` to `focus`.
    pub fn select(
        &self,
        anchor: Point,
        focus: Point,
    ) -> Result<Snapshot, EditorError> {
        let selection = self.selection.expand(&self.document, anchor, focus)?;
        Ok(self.with_selection(selection))
    }

    /// Select between two locations.
    pub fn select_locations(
        &self,
        anchor: Location,
        focus: Location,
    ) -> Result<Snapshot, EditorError> {
        let selection =
            Selection::from_locations(&self.document, anchor, focus, None)?;
        Ok(self.with_selection(selection))
    }

    pub fn collapse(&self, point: Point) -> Result<Snapshot, EditorError> {
        let selection = self.selection.collapse(&self.document, point)?;
        Ok(self.with_selection(selection))
    }

    pub fn move_focus_backward(
        &self,
        n: usize,
    ) -> Result<Snapshot, EditorError> {
        let selection =
            self.selection.move_focus_backward(&self.document, n)?;
        Ok(self.with_selection(selection))
    }

    pub fn move_to_end(&self) -> Result<Snapshot, EditorError> {
        let selection = self.selection.move_to_end(&self.document)?;
        Ok(self.with_selection(selection))
    }

    pub fn move_to_start(&self) -> Result<Snapshot, EditorError> {
        let selection = self.selection.move_to_start(&self.document)?;
        Ok(self.with_selection(selection))
    }

    pub fn select_all(&self) -> Result<Snapshot, EditorError> {
        let selection = self.selection.select_all(&self.document)?;
        Ok(self.with_selection(selection))
    }

    pub fn move_to_start_of_document(&self) -> Result<Snapshot, EditorError> {
        let selection =
            self.selection.move_to_start_of_document(&self.document)?;
        Ok(self.with_selection(selection))
    }

    pub fn move_to_end_of_document(&self) -> Result<Snapshot, EditorError> {
        let selection =
            self.selection.move_to_end_of_document(&self.document)?;
        Ok(self.with_selection(selection))
    }
}

#[cfg(test)]
mod test {
    use crate::tests::testutils_snapshot::{cm, tx};
    use crate::Location;

    #[test]
    fn move_focus_backward_selects_the_typed_text() {
        let s = cm("<p>ab|</p>")
            .insert_text("cd")
            .unwrap()
            .move_focus_backward(2)
            .unwrap();
        assert_eq!(tx(&s), "<p>ab|{cd}</p>");
    }

    #[test]
    fn move_focus_backward_past_the_start_is_out_of_range() {
        assert!(cm("<p>ab|</p>").move_focus_backward(3).is_err());
    }

    #[test]
    fn move_to_end_collapses_a_backward_selection() {
        let s = cm("<p>a|{bc}d</p>").move_to_end().unwrap();
        assert_eq!(tx(&s), "<p>abc|d</p>");
    }

    #[test]
    fn move_to_start_collapses_to_the_earlier_end() {
        let s = cm("<p>a{bc}|d</p>").move_to_start().unwrap();
        assert_eq!(tx(&s), "<p>a|bcd</p>");
    }

    #[test]
    fn select_all_then_document_ends() {
        let s = cm("<p>a|b</p><ul><li>c</li></ul>");
        assert_eq!(
            tx(&s.select_all().unwrap()),
            "<p>{ab</p><ul><li>c}|</li></ul>"
        );
        assert_eq!(
            tx(&s.move_to_end_of_document().unwrap()),
            "<p>ab</p><ul><li>c|</li></ul>"
        );
        assert_eq!(
            tx(&s.move_to_start_of_document().unwrap()),
            "<p>|ab</p><ul><li>c</li></ul>"
        );
    }

    #[test]
    fn select_locations_spans_blocks() {
        let s = cm("<p>ab|</p><p>cd</p>")
            .select_locations(Location::new(1, 1), Location::new(0, 1))
            .unwrap();
        assert_eq!(tx(&s), "<p>a|{b</p><p>c}d</p>");
    }
}
