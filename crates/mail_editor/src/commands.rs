// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The command engine.
//!
//! Every command is a method on [`Snapshot`] that leaves `self` alone and
//! returns a new snapshot, or an error and nothing else. Internally a
//! command clones the document, translates the selection into
//! [`Location`]s, edits the clone freely, and hands the result to
//! [`Snapshot::commit`], which normalizes and validates it and turns the
//! locations back into a selection.

mod blocks;
mod inlines;
mod marks;
mod movement;
mod text;

use std::ops::Range;

use log::debug;

use crate::composer_error::EditorError;
use crate::dom::runs::{split_range, InlineRun};
use crate::dom::{Document, DomHandle, MarkSet};
use crate::location::Location;
use crate::selection::{Point, Selection};

/// A document together with a selection that is valid for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub document: Document,
    pub selection: Selection,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Snapshot {
    pub fn new(
        document: Document,
        selection: Selection,
    ) -> Result<Self, EditorError> {
        selection.validate(&document)?;
        Ok(Self {
            document,
            selection,
        })
    }

    /// An empty paragraph with the caret in it.
    pub fn empty() -> Self {
        Self {
            document: Document::new(),
            selection: Selection::caret(Point::new(
                DomHandle::from_raw(vec![0, 0]),
                0,
            )),
        }
    }

    /// `document` with the caret at its start.
    pub fn from_document(document: Document) -> Result<Self, EditorError> {
        let selection = Selection::start_of(&document)?;
        Ok(Self {
            document,
            selection,
        })
    }

    pub fn anchor(&self) -> &Point {
        self.selection.anchor()
    }

    pub fn focus(&self) -> &Point {
        self.selection.focus()
    }

    /// Run `command`, logging whether it was applied or rejected.
    pub(crate) fn command(
        &self,
        name: &str,
        command: impl FnOnce(&Self) -> Result<Snapshot, EditorError>,
    ) -> Result<Snapshot, EditorError> {
        let result = command(self);
        match &result {
            Ok(_) => debug!("{name}: applied"),
            Err(e) => debug!("{name}: rejected: {e}"),
        }
        result
    }

    /// Finish an edit of `document`: normalize and validate it, then place
    /// the selection at the given locations.
    pub(crate) fn commit(
        mut document: Document,
        anchor: Location,
        focus: Location,
        marks: Option<MarkSet>,
    ) -> Result<Snapshot, EditorError> {
        document.normalize();
        document.validate()?;
        let anchor = document.clamp_location(anchor);
        let focus = document.clamp_location(focus);
        let selection =
            Selection::from_locations(&document, anchor, focus, marks)?;
        document.assert_invariants();
        Ok(Snapshot {
            document,
            selection,
        })
    }

    /// The same document with a different selection.
    pub(crate) fn with_selection(&self, selection: Selection) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            selection,
        }
    }
}

/// Apply `edit` to the runs of every text block between `start` and `end`,
/// giving it the index of the block and the run indices covering the part
/// of the block inside the range.
pub(crate) fn edit_range(
    document: &mut Document,
    start: Location,
    end: Location,
    mut edit: impl FnMut(usize, &mut Vec<InlineRun>, Range<usize>),
) -> Result<(), EditorError> {
    let blocks = document.text_blocks();
    for (index, handle) in
        blocks.iter().enumerate().take(end.block + 1).skip(start.block)
    {
        let from = if index == start.block { start.offset } else { 0 };
        let to = if index == end.block {
            end.offset
        } else {
            document.block_text_len(handle)
        };
        document.edit_runs(handle, |runs| {
            let range = split_range(runs, from, to);
            edit(index, runs, range);
        })?;
    }
    Ok(())
}

/// Every run touched by the range, as `edit_range` would visit them.
pub(crate) fn runs_in_range(
    document: &Document,
    start: Location,
    end: Location,
) -> Result<Vec<InlineRun>, EditorError> {
    let mut scratch = document.clone();
    let mut found = Vec::new();
    edit_range(&mut scratch, start, end, |_, runs, range| {
        found.extend(runs[range].iter().cloned());
    })?;
    Ok(found)
}
