// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Editing core of a rich text mail composer.
//!
//! The crate is organised leaves first:
//!
//! - [`dom`]: the document tree, its invariants, and the markup
//!   serializer ([`serialize`]) and deserializer ([`deserialize`]).
//! - [`selection`]: anchor/focus ranges over a [`Document`].
//! - [`commands`]: [`Snapshot`], the immutable (document, selection) pair,
//!   and every editing command.
//! - [`toggle_policy`]: decides which commands a toolbar click, dialog
//!   submission or paste turns into.
//! - [`composer_model`]: a stateful wrapper for hosts.

pub mod commands;
pub mod composer_error;
pub mod composer_model;
pub mod dom;
pub mod location;
pub mod menu_state;
pub mod selection;
pub mod toggle_policy;


pub use crate::commands::Snapshot;
pub use crate::composer_error::{EditorError, HtmlParseError};
pub use crate::composer_model::{
    ComposerModel, ComposerUpdate, ContentObserver, MenuAction, MenuState,
    TextUpdate,
};
pub use crate::dom::nodes::{
    BlockNode, BlockType, DomNode, InlineNode, InlineType, NodeData,
    TextNode, DEFAULT_BLOCK,
};
pub use crate::dom::parser::deserialize;
pub use crate::dom::to_html::{serialize, ToHtml};
pub use crate::dom::to_tree::ToTree;
pub use crate::dom::{Document, DomHandle, Mark, MarkSet};
pub use crate::location::{Affinity, Location};
pub use crate::menu_state::{ActionState, ComposerAction};
pub use crate::selection::{Point, Selection};
pub use crate::toggle_policy::{
    FileDetails, LinkDetails, PasteOutcome, PolicyOutcome, Transfer,
    TransferKind,
};
