// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::commands::{edit_range, runs_in_range, Snapshot};
use crate::composer_error::EditorError;
use crate::dom::nodes::{clean_data, InlineNode, InlineType, NodeData};
use crate::dom::runs::{next_group, RunInline};
use crate::dom::DomHandle;

impl Snapshot {
    /// Wrap the selected text in a new inline of type `kind`. Text in
    /// several blocks gets one inline per block. Does nothing on a caret.
    pub fn wrap_inline(
        &self,
        kind: InlineType,
        data: NodeData,
    ) -> Result<Snapshot, EditorError> {
        let data = clean_data(&data);
        self.command("wrap_inline", |s| {
            if s.selection.is_collapsed() {
                return Ok(s.clone());
            }
            InlineNode::new(kind, data.clone(), Vec::new())?;

            if !s.inlines_of(kind)?.is_empty() {
                return Err(EditorError::structural(format!(
                    "selection is already inside a {}",
                    kind.tag()
                )));
            }

            let (anchor, focus) = s.selection.locations(&s.document)?;
            let (start, end) = (anchor.min(focus), anchor.max(focus));
            if runs_in_range(&s.document, start, end)?
                .iter()
                .any(|r| r.inline.is_some())
            {
                return Err(EditorError::structural(format!(
                    "a {} cannot hold another inline",
                    kind.tag()
                )));
            }

            let mut document = s.document.clone();
            edit_range(&mut document, start, end, |_, runs, range| {
                let group = next_group(runs);
                for run in &mut runs[range] {
                    run.inline = Some(RunInline {
                        group,
                        kind,
                        data: data.clone(),
                    });
                }
            })?;
            Snapshot::commit(document, anchor, focus, None)
        })
    }

    /// Replace every inline of type `kind` touched by the selection with
    /// its text. Does nothing when the selection touches none.
    pub fn unwrap_inline(
        &self,
        kind: InlineType,
    ) -> Result<Snapshot, EditorError> {
        self.command("unwrap_inline", |s| {
            let targets = s.inlines_of(kind)?;
            if targets.is_empty() {
                return Ok(s.clone());
            }

            let (anchor, focus) = s.selection.locations(&s.document)?;
            let mut document = s.document.clone();
            for handle in targets.iter().rev() {
                let children = document
                    .lookup_node(handle)
                    .map(|n| n.children().to_vec())
                    .unwrap_or_default();
                document.replace_node(handle, children)?;
            }
            Snapshot::commit(document, anchor, focus, None)
        })
    }

    /// Handles of the inlines of type `kind` the selection touches.
    pub fn inlines_of(
        &self,
        kind: InlineType,
    ) -> Result<Vec<DomHandle>, EditorError> {
        Ok(self
            .selection
            .inlines(&self.document)?
            .into_iter()
            .filter(|h| {
                self.document
                    .lookup_node(h)
                    .is_some_and(|n| n.is_inline_of(kind))
            })
            .collect())
    }
}
