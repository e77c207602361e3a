// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! What a toolbar click, a dialog submission or a paste turns into.
//!
//! Nothing here is stored: every decision is made from the current
//! [`Snapshot`] alone, by asking it which marks, blocks and links the
//! selection touches, and then running one or more commands.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::commands::Snapshot;
use crate::composer_error::EditorError;
use crate::dom::nodes::{
    clean_text, node_data, BlockType, DomNode, InlineType, DEFAULT_BLOCK,
};
use crate::dom::{DomHandle, Mark};

/// Result of a toolbar click or a dialog submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyOutcome {
    /// The document or selection changed.
    Applied(Snapshot),
    /// Nothing happened, e.g. a dialog was submitted empty.
    Unchanged,
    /// The host should ask for a link. With `is_selected_text` only a URL
    /// is needed; otherwise both the text and the URL.
    OpenLinkInput { is_selected_text: bool },
    /// The host should ask for an image URL.
    OpenImageInput,
    /// The host should let the user pick a file.
    OpenFilePicker,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PasteOutcome {
    /// The paste was turned into a command.
    Handled(Snapshot),
    /// The host should paste the content the usual way.
    PassThrough,
}

/// What the link dialog collected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkDetails {
    pub text: String,
    pub url: String,
    pub is_selected_text: bool,
}

/// An attachment picked by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileDetails {
    pub src: String,
    pub name: String,
    pub size: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferKind {
    Text,
    Html,
    Files,
    Fragment,
}

/// Clipboard content handed over by the host on paste.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub kind: TransferKind,
    pub text: String,
}

impl Transfer {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: TransferKind::Text,
            text: text.into(),
        }
    }
}

static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\w+:)?//([^\s.]+\.\S{2}|localhost[:?\d]*)\S*$").unwrap()
});

/// True for an absolute URL such as `http://x.com/a`.
pub fn is_url(text: &str) -> bool {
    !text.chars().any(char::is_whitespace)
        && URL_SHAPE.is_match(text)
        && Url::parse(text).is_ok()
}

impl Snapshot {
    pub fn has_mark(&self, mark: Mark) -> Result<bool, EditorError> {
        Ok(self.selection.active_marks(&self.document)?.contains(mark))
    }

    /// True if any selected text block has type `kind`.
    pub fn has_block(&self, kind: BlockType) -> Result<bool, EditorError> {
        Ok(self.selection.blocks(&self.document)?.iter().any(|h| {
            self.document.lookup_node(h).is_some_and(|n| n.is_block_of(kind))
        }))
    }

    pub fn has_links(&self) -> Result<bool, EditorError> {
        Ok(!self.inlines_of(InlineType::Link)?.is_empty())
    }

    /// True if any selected text block is a list item or sits inside one.
    pub fn in_list_item(&self) -> Result<bool, EditorError> {
        let is_item = |n: &DomNode| n.is_block_of(BlockType::ListItem);
        Ok(self.selection.blocks(&self.document)?.iter().any(|h| {
            self.document.lookup_node(h).is_some_and(is_item)
                || self.document.get_closest(h, is_item).is_some()
        }))
    }

    /// True if the closest list around any selected block is a `kind`.
    pub fn is_in_list_of(&self, kind: BlockType) -> Result<bool, EditorError> {
        Ok(self
            .selection
            .blocks(&self.document)?
            .iter()
            .any(|h| self.closest_list_is(h, kind)))
    }

    /// True if the selection is in list items whose list, judged by the
    /// first selected block, is a `kind`.
    pub fn is_list_active(&self, kind: BlockType) -> Result<bool, EditorError> {
        if !self.in_list_item()? {
            return Ok(false);
        }
        let blocks = self.selection.blocks(&self.document)?;
        Ok(blocks
            .first()
            .is_some_and(|first| self.closest_list_is(first, kind)))
    }

    fn closest_list_is(&self, handle: &DomHandle, kind: BlockType) -> bool {
        self.document
            .get_closest(handle, |n| {
                n.as_block().is_some_and(|b| b.kind().is_list())
            })
            .and_then(|list| self.document.lookup_node(&list))
            .is_some_and(|n| n.is_block_of(kind))
    }

    /// Toggle `mark`. A size mark first clears the other size.
    pub fn on_click_mark(
        &self,
        mark: Mark,
    ) -> Result<PolicyOutcome, EditorError> {
        let mut snapshot = self.clone();
        if let Some(opposing) = mark.opposing() {
            if snapshot.has_mark(opposing)? {
                snapshot = snapshot.toggle_mark(opposing)?;
            }
        }
        Ok(PolicyOutcome::Applied(snapshot.toggle_mark(mark)?))
    }

    /// Back to the normal font size: clear whichever size mark is active.
    pub fn on_click_normal_size(&self) -> Result<PolicyOutcome, EditorError> {
        for mark in [Mark::SmallSize, Mark::LargeSize] {
            if self.has_mark(mark)? {
                return Ok(PolicyOutcome::Applied(self.toggle_mark(mark)?));
            }
        }
        Ok(PolicyOutcome::Unchanged)
    }

    /// Toggle a block type from the toolbar.
    pub fn on_click_block(
        &self,
        kind: BlockType,
    ) -> Result<PolicyOutcome, EditorError> {
        match kind {
            BlockType::File => return Ok(PolicyOutcome::OpenFilePicker),
            BlockType::Image => return Ok(PolicyOutcome::OpenImageInput),
            _ => {}
        }

        let in_list_item = self.in_list_item()?;
        let snapshot = if !kind.is_list() {
            let target = if self.has_block(kind)? {
                DEFAULT_BLOCK
            } else {
                kind
            };
            if in_list_item {
                debug!("on_click_block({kind}): leaving the list");
                self.leave_lists()?.set_blocks(target)?
            } else {
                self.set_blocks(target)?
            }
        } else if in_list_item && self.is_in_list_of(kind)? {
            debug!("on_click_block({kind}): leaving the list");
            self.unwrap_block(kind)?
        } else if in_list_item {
            debug!("on_click_block({kind}): switching list type");
            self.switch_list(kind)?
        } else {
            self.wrap_list(kind)?
        };
        Ok(PolicyOutcome::Applied(snapshot))
    }

    /// Unwrap the closest list around the selection until no selected
    /// block is in a list item any more.
    fn leave_lists(&self) -> Result<Snapshot, EditorError> {
        let mut snapshot = self.clone();
        while snapshot.in_list_item()? {
            let kind = if snapshot.is_in_list_of(BlockType::BulletedList)? {
                BlockType::BulletedList
            } else {
                BlockType::NumberedList
            };
            let next = snapshot.unwrap_block(kind)?;
            if next == snapshot {
                break;
            }
            snapshot = next;
        }
        Ok(snapshot)
    }

    /// Toggle a link: remove the links under the selection, or ask the
    /// host for a new one.
    pub fn on_click_link(&self) -> Result<PolicyOutcome, EditorError> {
        if self.has_links()? {
            Ok(PolicyOutcome::Applied(
                self.unwrap_inline(InlineType::Link)?,
            ))
        } else {
            Ok(PolicyOutcome::OpenLinkInput {
                is_selected_text: self.selection.is_expanded(),
            })
        }
    }

    /// Apply what the link dialog collected. An empty URL, or an empty text
    /// when there was no selected text, cancels.
    pub fn add_link(
        &self,
        details: &LinkDetails,
    ) -> Result<PolicyOutcome, EditorError> {
        let href = details.url.trim();
        if href.is_empty() {
            debug!("add_link: no url given");
            return Ok(PolicyOutcome::Unchanged);
        }
        if details.is_selected_text {
            return Ok(PolicyOutcome::Applied(self.wrap_link(href)?));
        }
        let text = clean_text(details.text.trim());
        if text.is_empty() {
            debug!("add_link: no text given");
            return Ok(PolicyOutcome::Unchanged);
        }
        let snapshot = self
            .insert_text(&text)?
            .move_focus_backward(text.chars().count())?
            .wrap_link(href)?;
        Ok(PolicyOutcome::Applied(snapshot))
    }

    fn wrap_link(&self, href: &str) -> Result<Snapshot, EditorError> {
        self.wrap_inline(InlineType::Link, node_data([("href", href)]))?
            .move_to_end()
    }

    /// Insert an image. An empty `src` cancels.
    pub fn add_image(&self, src: &str) -> Result<PolicyOutcome, EditorError> {
        let src = src.trim();
        if src.is_empty() {
            return Ok(PolicyOutcome::Unchanged);
        }
        Ok(PolicyOutcome::Applied(
            self.insert_block(BlockType::Image, node_data([("src", src)]))?,
        ))
    }

    /// Insert a file attachment. An empty `src` cancels.
    pub fn add_file(
        &self,
        file: &FileDetails,
    ) -> Result<PolicyOutcome, EditorError> {
        let src = file.src.trim();
        if src.is_empty() {
            return Ok(PolicyOutcome::Unchanged);
        }
        let size = file.size.to_string();
        let mut data = node_data([("src", src), ("size", size.as_str())]);
        if !file.name.is_empty() {
            data.insert("name".to_owned(), file.name.clone());
        }
        Ok(PolicyOutcome::Applied(
            self.insert_block(BlockType::File, data)?,
        ))
    }

    /// Turn a URL pasted over selected text into a link to itself. Anything
    /// else is left to the host.
    pub fn on_paste(
        &self,
        transfer: &Transfer,
    ) -> Result<PasteOutcome, EditorError> {
        let url = clean_text(&transfer.text);
        if self.selection.is_collapsed()
            || !matches!(transfer.kind, TransferKind::Text | TransferKind::Html)
            || !is_url(&url)
        {
            return Ok(PasteOutcome::PassThrough);
        }
        debug!("on_paste: linking selection to {url}");
        let snapshot = if self.has_links()? {
            self.unwrap_inline(InlineType::Link)?
        } else {
            self.clone()
        };
        Ok(PasteOutcome::Handled(snapshot.wrap_link(&url)?))
    }
}
