// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A stateful wrapper around [`Snapshot`] for hosts that keep one composer
//! open and redraw it after every interaction.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::commands::Snapshot;
use crate::composer_error::EditorError;
use crate::dom::nodes::BlockType;
use crate::dom::parser::deserialize;
use crate::dom::to_html::ToHtml;
use crate::dom::Mark;
use crate::location::Location;
use crate::menu_state::{ActionState, ComposerAction};
use crate::selection::Selection;
use crate::toggle_policy::{
    FileDetails, LinkDetails, PasteOutcome, PolicyOutcome, Transfer,
};

/// Told about every change to the document, with the new markup. Pure
/// selection changes are not reported.
pub trait ContentObserver {
    fn content_changed(&mut self, html: &str);
}

impl<F> ContentObserver for F
where
    F: FnMut(&str),
{
    fn content_changed(&mut self, html: &str) {
        self(html)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextUpdate {
    Keep,
    Select(Selection),
    ReplaceAll {
        replacement_html: String,
        selection: Selection,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuState {
    Keep,
    Update(HashMap<ComposerAction, ActionState>),
}

/// Something the host must do on the composer's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    None,
    OpenLinkInput { is_selected_text: bool },
    OpenImageInput,
    OpenFilePicker,
}

/// What the host has to redraw after an interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposerUpdate {
    pub text_update: TextUpdate,
    pub menu_state: MenuState,
    pub menu_action: MenuAction,
}

impl ComposerUpdate {
    pub fn keep() -> Self {
        Self {
            text_update: TextUpdate::Keep,
            menu_state: MenuState::Keep,
            menu_action: MenuAction::None,
        }
    }

    pub fn replace_all(
        replacement_html: String,
        selection: Selection,
        menu_state: MenuState,
    ) -> Self {
        Self {
            text_update: TextUpdate::ReplaceAll {
                replacement_html,
                selection,
            },
            menu_state,
            menu_action: MenuAction::None,
        }
    }

    pub fn update_selection(
        selection: Selection,
        menu_state: MenuState,
    ) -> Self {
        Self {
            text_update: TextUpdate::Select(selection),
            menu_state,
            menu_action: MenuAction::None,
        }
    }

    pub fn menu_action(menu_action: MenuAction) -> Self {
        Self {
            menu_action,
            ..Self::keep()
        }
    }
}

#[derive(Default)]
pub struct ComposerModel {
    snapshot: Snapshot,
    observers: Vec<Box<dyn ContentObserver>>,
}

impl fmt::Debug for ComposerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerModel")
            .field("snapshot", &self.snapshot)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ComposerModel {
    /// An empty paragraph with the caret in it.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_html(html: &str) -> Result<Self, EditorError> {
        Ok(Self {
            snapshot: Snapshot::from_document(deserialize(html)?)?,
            observers: Vec::new(),
        })
    }

    /// Like [`ComposerModel::from_html`], but markup that cannot be parsed
    /// gives an empty document instead of an error.
    pub fn from_html_or_empty(html: &str) -> Self {
        Self::from_html(html).unwrap_or_else(|e| {
            warn!("from_html_or_empty: starting empty: {e}");
            Self::new()
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn add_observer(&mut self, observer: impl ContentObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn get_content_as_html(&self) -> String {
        self.snapshot.document.to_html()
    }

    pub fn get_content_as_plain_text(&self) -> String {
        self.snapshot.document.to_plain_text()
    }

    pub fn action_states(&self) -> HashMap<ComposerAction, ActionState> {
        self.snapshot.compute_action_states()
    }

    /// Replace the whole document, putting the caret at its start.
    pub fn set_content_from_html(
        &mut self,
        html: &str,
    ) -> Result<ComposerUpdate, EditorError> {
        let snapshot = Snapshot::from_document(deserialize(html)?)?;
        Ok(self.apply(snapshot))
    }

    pub fn clear(&mut self) -> ComposerUpdate {
        self.apply(Snapshot::empty())
    }

    pub fn select(
        &mut self,
        anchor: Location,
        focus: Location,
    ) -> Result<ComposerUpdate, EditorError> {
        let snapshot = self.snapshot.select_locations(anchor, focus)?;
        Ok(self.apply(snapshot))
    }

    pub fn select_all(&mut self) -> Result<ComposerUpdate, EditorError> {
        let snapshot = self.snapshot.select_all()?;
        Ok(self.apply(snapshot))
    }

    pub fn move_to_start_of_document(
        &mut self,
    ) -> Result<ComposerUpdate, EditorError> {
        let snapshot = self.snapshot.move_to_start_of_document()?;
        Ok(self.apply(snapshot))
    }

    pub fn move_to_end_of_document(
        &mut self,
    ) -> Result<ComposerUpdate, EditorError> {
        let snapshot = self.snapshot.move_to_end_of_document()?;
        Ok(self.apply(snapshot))
    }

    pub fn insert_text(
        &mut self,
        text: &str,
    ) -> Result<ComposerUpdate, EditorError> {
        let snapshot = self.snapshot.insert_text(text)?;
        Ok(self.apply(snapshot))
    }

    pub fn delete_selection(&mut self) -> Result<ComposerUpdate, EditorError> {
        let snapshot = self.snapshot.delete_selection()?;
        Ok(self.apply(snapshot))
    }

    pub fn on_click_mark(
        &mut self,
        mark: Mark,
    ) -> Result<ComposerUpdate, EditorError> {
        let outcome = self.snapshot.on_click_mark(mark)?;
        Ok(self.apply_outcome(outcome))
    }

    pub fn on_click_normal_size(
        &mut self,
    ) -> Result<ComposerUpdate, EditorError> {
        let outcome = self.snapshot.on_click_normal_size()?;
        Ok(self.apply_outcome(outcome))
    }

    pub fn on_click_block(
        &mut self,
        kind: BlockType,
    ) -> Result<ComposerUpdate, EditorError> {
        let outcome = self.snapshot.on_click_block(kind)?;
        Ok(self.apply_outcome(outcome))
    }

    pub fn on_click_link(&mut self) -> Result<ComposerUpdate, EditorError> {
        let outcome = self.snapshot.on_click_link()?;
        Ok(self.apply_outcome(outcome))
    }

    pub fn add_link(
        &mut self,
        details: &LinkDetails,
    ) -> Result<ComposerUpdate, EditorError> {
        let outcome = self.snapshot.add_link(details)?;
        Ok(self.apply_outcome(outcome))
    }

    pub fn add_image(
        &mut self,
        src: &str,
    ) -> Result<ComposerUpdate, EditorError> {
        let outcome = self.snapshot.add_image(src)?;
        Ok(self.apply_outcome(outcome))
    }

    pub fn add_file(
        &mut self,
        file: &FileDetails,
    ) -> Result<ComposerUpdate, EditorError> {
        let outcome = self.snapshot.add_file(file)?;
        Ok(self.apply_outcome(outcome))
    }

    /// `None` when the host should paste the usual way.
    pub fn on_paste(
        &mut self,
        transfer: &Transfer,
    ) -> Result<Option<ComposerUpdate>, EditorError> {
        match self.snapshot.on_paste(transfer)? {
            PasteOutcome::Handled(snapshot) => Ok(Some(self.apply(snapshot))),
            PasteOutcome::PassThrough => Ok(None),
        }
    }

    fn apply_outcome(&mut self, outcome: PolicyOutcome) -> ComposerUpdate {
        match outcome {
            PolicyOutcome::Applied(snapshot) => self.apply(snapshot),
            PolicyOutcome::Unchanged => ComposerUpdate::keep(),
            PolicyOutcome::OpenLinkInput { is_selected_text } => {
                ComposerUpdate::menu_action(MenuAction::OpenLinkInput {
                    is_selected_text,
                })
            }
            PolicyOutcome::OpenImageInput => {
                ComposerUpdate::menu_action(MenuAction::OpenImageInput)
            }
            PolicyOutcome::OpenFilePicker => {
                ComposerUpdate::menu_action(MenuAction::OpenFilePicker)
            }
        }
    }

    fn apply(&mut self, snapshot: Snapshot) -> ComposerUpdate {
        let content_changed = snapshot.document != self.snapshot.document;
        self.snapshot = snapshot;
        let menu_state =
            MenuState::Update(self.snapshot.compute_action_states());
        if !content_changed {
            return ComposerUpdate::update_selection(
                self.snapshot.selection.clone(),
                menu_state,
            );
        }

        let html = self.get_content_as_html();
        debug!("content changed: {} observers", self.observers.len());
        for observer in &mut self.observers {
            observer.content_changed(&html);
        }
        ComposerUpdate::replace_all(
            html,
            self.snapshot.selection.clone(),
            menu_state,
        )
    }
}
