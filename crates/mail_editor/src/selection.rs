// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::composer_error::EditorError;
use crate::dom::{Document, DomHandle, MarkSet};
use crate::location::{Affinity, Location};

/// A position inside a text node: its path and a character offset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub path: DomHandle,
    pub offset: usize,
}

impl Point {
    pub fn new(path: DomHandle, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// An anchor/focus range over a [`Document`].
///
/// A selection is only meaningful together with the document it was made
/// for. Every operation takes that document and checks the selection
/// against it, failing with [`EditorError::OutOfRange`] if a point no
/// longer addresses a text node or is past its end.
///
/// `marks` holds the marks that the next typed text will get when they
/// differ from the text at the caret (a collapsed toggle of bold, say).
/// Any movement clears them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    anchor: Point,
    focus: Point,
    marks: Option<MarkSet>,
}

impl Selection {
    /// A caret at the start of `document`.
    pub fn start_of(document: &Document) -> Result<Self, EditorError> {
        let location = document.start_location();
        Self::from_locations(document, location, location, None)
    }

    /// A selection of the given locations. When expanded, the earlier end
    /// is placed at the start of a text node and the later end at the end
    /// of one, so boundaries never pull in a neighbouring text.
    pub fn from_locations(
        document: &Document,
        anchor: Location,
        focus: Location,
        marks: Option<MarkSet>,
    ) -> Result<Self, EditorError> {
        let (anchor_affinity, focus_affinity) = match anchor.cmp(&focus) {
            std::cmp::Ordering::Less => (Affinity::Forward, Affinity::Backward),
            std::cmp::Ordering::Greater => {
                (Affinity::Backward, Affinity::Forward)
            }
            std::cmp::Ordering::Equal => {
                (Affinity::Backward, Affinity::Backward)
            }
        };
        Ok(Self {
            anchor: document.point_for_location(anchor, anchor_affinity)?,
            focus: document.point_for_location(focus, focus_affinity)?,
            marks,
        })
    }

    pub(crate) fn caret(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
            marks: None,
        }
    }

    pub fn anchor(&self) -> &Point {
        &self.anchor
    }

    pub fn focus(&self) -> &Point {
        &self.focus
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_expanded(&self) -> bool {
        !self.is_collapsed()
    }

    /// True if the focus comes before the anchor.
    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    /// Whichever of anchor and focus comes first in the document.
    pub fn start(&self) -> &Point {
        std::cmp::min(&self.anchor, &self.focus)
    }

    pub fn end(&self) -> &Point {
        std::cmp::max(&self.anchor, &self.focus)
    }

    pub fn pending_marks(&self) -> Option<&MarkSet> {
        self.marks.as_ref()
    }

    pub(crate) fn with_marks(mut self, marks: Option<MarkSet>) -> Self {
        self.marks = marks;
        self
    }

    /// Check both points against `document`.
    pub fn validate(&self, document: &Document) -> Result<(), EditorError> {
        document.location_for_point(&self.anchor)?;
        document.location_for_point(&self.focus)?;
        Ok(())
    }

    /// Anchor and focus as locations.
    pub fn locations(
        &self,
        document: &Document,
    ) -> Result<(Location, Location), EditorError> {
        Ok((
            document.location_for_point(&self.anchor)?,
            document.location_for_point(&self.focus)?,
        ))
    }

    /// Start and end as locations.
    pub fn range(
        &self,
        document: &Document,
    ) -> Result<(Location, Location), EditorError> {
        let (anchor, focus) = self.locations(document)?;
        Ok((anchor.min(focus), anchor.max(focus)))
    }

    pub fn collapse(
        &self,
        document: &Document,
        point: Point,
    ) -> Result<Selection, EditorError> {
        self.expand(document, point.clone(), point)
    }

    /// Select from `anchor` to `focus`. Points at the same location, such
    /// as the end of one text and the start of the next, give a caret.
    pub fn expand(
        &self,
        document: &Document,
        anchor: Point,
        focus: Point,
    ) -> Result<Selection, EditorError> {
        let selection = Selection {
            anchor,
            focus,
            marks: None,
        };
        let (anchor, focus) = selection.locations(document)?;
        if anchor == focus && selection.anchor != selection.focus {
            return Self::from_locations(document, anchor, anchor, None);
        }
        Ok(selection)
    }

    /// Move the focus `n` characters back, keeping the anchor.
    pub fn move_focus_backward(
        &self,
        document: &Document,
        n: usize,
    ) -> Result<Selection, EditorError> {
        let (anchor, focus) = self.locations(document)?;
        let focus = document.step_backward(focus, n)?;
        Self::from_locations(document, anchor, focus, None)
    }

    /// Collapse to the end of the selection.
    pub fn move_to_end(
        &self,
        document: &Document,
    ) -> Result<Selection, EditorError> {
        self.collapse(document, self.end().clone())
    }

    /// Collapse to the start of the selection.
    pub fn move_to_start(
        &self,
        document: &Document,
    ) -> Result<Selection, EditorError> {
        self.collapse(document, self.start().clone())
    }

    pub fn move_to_start_of_document(
        &self,
        document: &Document,
    ) -> Result<Selection, EditorError> {
        let start = document.start_location();
        Self::from_locations(document, start, start, None)
    }

    pub fn move_to_end_of_document(
        &self,
        document: &Document,
    ) -> Result<Selection, EditorError> {
        let end = document.end_location();
        Self::from_locations(document, end, end, None)
    }

    pub fn select_all(
        &self,
        document: &Document,
    ) -> Result<Selection, EditorError> {
        Self::from_locations(
            document,
            document.start_location(),
            document.end_location(),
            None,
        )
    }

    /// Text nodes from the start point to the end point, inclusive.
    fn spanned_texts(
        &self,
        document: &Document,
    ) -> Result<Vec<DomHandle>, EditorError> {
        self.validate(document)?;
        let (start, end) = (self.start(), self.end());
        Ok(document
            .text_handles()
            .into_iter()
            .filter(|h| *h >= start.path && *h <= end.path)
            .collect())
    }

    /// Text blocks touched by the selection, in document order.
    pub fn blocks(
        &self,
        document: &Document,
    ) -> Result<Vec<DomHandle>, EditorError> {
        let mut blocks: Vec<DomHandle> = Vec::new();
        for text in self.spanned_texts(document)? {
            if let Some(block) = document.closest_block(&text) {
                if !blocks.contains(&block) {
                    blocks.push(block);
                }
            }
        }
        Ok(blocks)
    }

    /// Text nodes whose content the selection covers. A caret touches the
    /// text it sits in; a range that covers no characters touches the text
    /// it starts in.
    pub fn touched_texts(
        &self,
        document: &Document,
    ) -> Result<Vec<DomHandle>, EditorError> {
        let spanned = self.spanned_texts(document)?;
        if self.is_collapsed() {
            return Ok(vec![self.anchor.path.clone()]);
        }
        let (start, end) = (self.start(), self.end());
        let touched: Vec<DomHandle> = spanned
            .into_iter()
            .filter(|h| {
                let len = document
                    .lookup_node(h)
                    .and_then(|n| n.as_text())
                    .map_or(0, |t| t.len());
                let from = if *h == start.path { start.offset } else { 0 };
                let to = if *h == end.path { end.offset } else { len };
                from < to
            })
            .collect();
        if touched.is_empty() {
            Ok(vec![start.path.clone()])
        } else {
            Ok(touched)
        }
    }

    /// Inline nodes around the touched texts, in document order.
    pub fn inlines(
        &self,
        document: &Document,
    ) -> Result<Vec<DomHandle>, EditorError> {
        let mut inlines: Vec<DomHandle> = Vec::new();
        for text in self.touched_texts(document)? {
            let inline =
                document.get_closest(&text, |n| n.as_inline().is_some());
            if let Some(inline) = inline {
                if !inlines.contains(&inline) {
                    inlines.push(inline);
                }
            }
        }
        Ok(inlines)
    }

    /// Marks shared by every touched text. A caret reports its pending
    /// marks, or those of the text it sits in.
    pub fn active_marks(
        &self,
        document: &Document,
    ) -> Result<MarkSet, EditorError> {
        if self.is_collapsed() {
            if let Some(marks) = &self.marks {
                self.validate(document)?;
                return Ok(marks.clone());
            }
        }
        let mut result: Option<MarkSet> = None;
        for text in self.touched_texts(document)? {
            let marks = document
                .lookup_node(&text)
                .and_then(|n| n.as_text())
                .map(|t| t.marks().clone())
                .unwrap_or_default();
            result = Some(match result {
                Some(acc) => acc.intersection(&marks),
                None => marks,
            });
        }
        Ok(result.unwrap_or_default())
    }
}
