// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::commands::Snapshot;
use crate::composer_error::EditorError;
use crate::dom::nodes::clean_text;
use crate::dom::runs::{concat, split_range, split_runs, InlineRun};
use crate::dom::DomHandle;
use crate::location::Location;

impl Snapshot {
    /// Type `text` at the selection, replacing the selected content if
    /// there is any. The new text gets the pending marks, or else the marks
    /// of the text at the caret, and joins a link the caret is inside.
    /// Line breaks and NUL are cleaned up first, see [`clean_text`].
    pub fn insert_text(&self, text: &str) -> Result<Snapshot, EditorError> {
        let text = clean_text(text);
        self.command("insert_text", |s| {
            let base = if s.selection.is_expanded() {
                s.delete_selection()?
            } else {
                s.clone()
            };
            if text.is_empty() {
                return Ok(base);
            }

            let marks = base.selection.active_marks(&base.document)?;
            let caret = base.anchor().clone();
            let in_inline = base
                .document
                .get_parent(&caret.path)
                .and_then(|p| base.document.lookup_node(&p))
                .is_some_and(|n| n.as_inline().is_some());
            let (location, _) = base.selection.locations(&base.document)?;
            let block = text_block(&base, location)?;

            let mut document = base.document.clone();
            document.edit_runs(&block, |runs| {
                let at = split_runs(runs, location.offset);
                let inline = if in_inline {
                    [at.checked_sub(1), Some(at)]
                        .into_iter()
                        .flatten()
                        .filter_map(|i| runs.get(i))
                        .find_map(|r| r.inline.clone())
                } else {
                    None
                };
                runs.insert(
                    at,
                    InlineRun {
                        text: text.to_string(),
                        marks,
                        inline,
                    },
                );
            })?;

            let caret = Location::new(
                location.block,
                location.offset + text.chars().count(),
            );
            Snapshot::commit(document, caret, caret, None)
        })
    }

    /// Remove the selected content. A range over several blocks joins the
    /// start of the first block with the end of the last and drops every
    /// block in between, images and files included.
    pub fn delete_selection(&self) -> Result<Snapshot, EditorError> {
        self.command("delete_selection", |s| {
            if s.selection.is_collapsed() {
                return Ok(s.clone());
            }
            let (start, end) = s.selection.range(&s.document)?;
            let first = text_block(s, start)?;
            let mut document = s.document.clone();

            if start.block == end.block {
                document.edit_runs(&first, |runs| {
                    let range = split_range(runs, start.offset, end.offset);
                    runs.drain(range);
                })?;
                return Snapshot::commit(document, start, start, None);
            }

            let last = text_block(s, end)?;
            let mut head = document.runs_of(&first)?;
            let cut = split_runs(&mut head, start.offset);
            head.truncate(cut);
            let mut tail = document.runs_of(&last)?;
            let cut = split_runs(&mut tail, end.offset);
            tail.drain(..cut);
            concat(&mut head, tail);
            document.set_runs(&first, head)?;

            let text_blocks = document.text_blocks();
            let mut doomed: Vec<DomHandle> = text_blocks
                [start.block + 1..=end.block]
                .iter()
                .cloned()
                .chain(
                    document
                        .void_blocks()
                        .into_iter()
                        .filter(|h| *h > first && *h < last),
                )
                .collect();
            doomed.sort();
            for handle in doomed.iter().rev() {
                document.remove_leaf(handle)?;
            }
            Snapshot::commit(document, start, start, None)
        })
    }
}

fn text_block(
    snapshot: &Snapshot,
    location: Location,
) -> Result<DomHandle, EditorError> {
    snapshot
        .document
        .text_blocks()
        .get(location.block)
        .cloned()
        .ok_or_else(|| {
            EditorError::out_of_range(format!(
                "there is no text block {}",
                location.block
            ))
        })
}
