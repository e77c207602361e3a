// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::borrow::Cow;

use crate::dom::MarkSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextNode {
    pub(crate) text: String,
    pub(crate) marks: MarkSet,
}

impl TextNode {
    pub fn new(text: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    /// Length in characters, the unit all offsets are counted in.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert `text` at the character offset `offset`. Panics if the offset
    /// is past the end.
    pub(crate) fn insert_str(&mut self, offset: usize, text: &str) {
        let at = byte_offset(&self.text, offset);
        self.text.insert_str(at, text);
    }

    /// Split into the text before and after `offset`; both halves keep the
    /// marks.
    pub(crate) fn split_at(&self, offset: usize) -> (TextNode, TextNode) {
        let at = byte_offset(&self.text, offset);
        (
            TextNode::new(&self.text[..at], self.marks.clone()),
            TextNode::new(&self.text[at..], self.marks.clone()),
        )
    }
}

/// `text` as markup reads it back: `\r\n` and a lone `\r` become `\n`,
/// and NUL becomes U+FFFD.
pub fn clean_text(text: &str) -> Cow<'_, str> {
    if !text.contains(|c| c == '\r' || c == '\0') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\0', "\u{fffd}"),
    )
}

/// Byte index of the character at `offset`, or the string length when the
/// offset is at (or past) the end.
pub(crate) fn byte_offset(s: &str, offset: usize) -> usize {
    s.char_indices()
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
