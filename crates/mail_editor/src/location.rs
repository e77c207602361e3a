// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Positions that survive structural edits.
//!
//! A [`Point`] names a text node by path, which any split or merge of text
//! runs invalidates. A [`Location`] names a text block by its index among
//! all text blocks and counts characters within it, so commands translate
//! the selection into locations before editing and back afterwards.

use crate::composer_error::EditorError;
use crate::dom::Document;
use crate::selection::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// Index into [`Document::text_blocks`].
    pub block: usize,
    /// Characters from the start of the block.
    pub offset: usize,
}

impl Location {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Which text node a location at the boundary between two text nodes
/// resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affinity {
    /// The end of the earlier node.
    Backward,
    /// The start of the later node.
    Forward,
}

impl Document {
    pub fn location_for_point(
        &self,
        point: &Point,
    ) -> Result<Location, EditorError> {
        let text_len = self
            .lookup_node(&point.path)
            .and_then(|n| n.as_text())
            .map(|t| t.len())
            .ok_or_else(|| {
                EditorError::out_of_range(format!(
                    "{:?} is not a text node",
                    point.path
                ))
            })?;
        if point.offset > text_len {
            return Err(EditorError::out_of_range(format!(
                "offset {} is past the end of a text of length {text_len}",
                point.offset
            )));
        }
        let block_handle = self.closest_block(&point.path).ok_or_else(|| {
            EditorError::out_of_range(format!(
                "{:?} is not inside a block",
                point.path
            ))
        })?;
        let block = self
            .text_blocks()
            .iter()
            .position(|h| *h == block_handle)
            .ok_or_else(|| {
                EditorError::out_of_range(format!(
                    "{block_handle:?} is not a text block"
                ))
            })?;
        let before: usize = self
            .text_handles_in(&block_handle)
            .iter()
            .take_while(|h| **h != point.path)
            .filter_map(|h| self.lookup_node(h).and_then(|n| n.as_text()))
            .map(|t| t.len())
            .sum();
        Ok(Location::new(block, before + point.offset))
    }

    pub fn point_for_location(
        &self,
        location: Location,
        affinity: Affinity,
    ) -> Result<Point, EditorError> {
        let blocks = self.text_blocks();
        let block = blocks.get(location.block).ok_or_else(|| {
            EditorError::out_of_range(format!(
                "there is no text block {}",
                location.block
            ))
        })?;
        let texts = self.text_handles_in(block);
        let mut start = 0;
        for (i, handle) in texts.iter().enumerate() {
            let len = self
                .lookup_node(handle)
                .and_then(|n| n.as_text())
                .map_or(0, |t| t.len());
            let end = start + len;
            let is_last = i + 1 == texts.len();
            let fits = match affinity {
                Affinity::Backward => location.offset <= end,
                Affinity::Forward => location.offset < end || is_last,
            };
            if fits && location.offset <= end {
                return Ok(Point::new(handle.clone(), location.offset - start));
            }
            start = end;
        }
        Err(EditorError::out_of_range(format!(
            "offset {} is past the end of text block {}",
            location.offset, location.block
        )))
    }

    /// The nearest valid location to `location`.
    pub fn clamp_location(&self, location: Location) -> Location {
        let blocks = self.text_blocks();
        match blocks.len().checked_sub(1) {
            None => Location::default(),
            Some(last) if location.block > last => {
                Location::new(last, self.block_text_len(&blocks[last]))
            }
            Some(_) => Location::new(
                location.block,
                location
                    .offset
                    .min(self.block_text_len(&blocks[location.block])),
            ),
        }
    }

    pub fn start_location(&self) -> Location {
        Location::default()
    }

    pub fn end_location(&self) -> Location {
        let blocks = self.text_blocks();
        match blocks.last() {
            Some(last) => {
                Location::new(blocks.len() - 1, self.block_text_len(last))
            }
            None => Location::default(),
        }
    }

    /// Move `steps` characters back from `location`. Stepping from the
    /// start of a text block to the end of the previous one costs one step.
    pub fn step_backward(
        &self,
        location: Location,
        steps: usize,
    ) -> Result<Location, EditorError> {
        let blocks = self.text_blocks();
        let mut current = location;
        let mut remaining = steps;
        while remaining > current.offset {
            remaining -= current.offset + 1;
            let Some(previous) = current.block.checked_sub(1) else {
                return Err(EditorError::out_of_range(format!(
                    "cannot move {steps} back from {location:?}"
                )));
            };
            current = Location::new(
                previous,
                self.block_text_len(&blocks[previous]),
            );
        }
        Ok(Location::new(current.block, current.offset - remaining))
    }
}
