// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::commands::Snapshot;
use crate::composer_error::EditorError;
use crate::dom::nodes::BlockType;
use crate::dom::Mark;

/// A toolbar button.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ComposerAction {
    Bold,
    Italic,
    Underlined,
    Code,
    SmallSize,
    LargeSize,
    BlockQuote,
    NumberedList,
    BulletedList,
    Link,
    Image,
    File,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionState {
    Enabled,
    /// The button is "on": clicking it again undoes what it stands for.
    Reversed,
    Disabled,
}

impl ComposerAction {
    pub fn mark(self) -> Option<Mark> {
        match self {
            ComposerAction::Bold => Some(Mark::Bold),
            ComposerAction::Italic => Some(Mark::Italic),
            ComposerAction::Underlined => Some(Mark::Underlined),
            ComposerAction::Code => Some(Mark::Code),
            ComposerAction::SmallSize => Some(Mark::SmallSize),
            ComposerAction::LargeSize => Some(Mark::LargeSize),
            _ => None,
        }
    }

    pub fn block(self) -> Option<BlockType> {
        match self {
            ComposerAction::BlockQuote => Some(BlockType::BlockQuote),
            ComposerAction::NumberedList => Some(BlockType::NumberedList),
            ComposerAction::BulletedList => Some(BlockType::BulletedList),
            ComposerAction::Image => Some(BlockType::Image),
            ComposerAction::File => Some(BlockType::File),
            _ => None,
        }
    }
}

impl Snapshot {
    /// State of every toolbar button. If the selection no longer fits the
    /// document every button is disabled.
    pub fn compute_action_states(
        &self,
    ) -> HashMap<ComposerAction, ActionState> {
        ComposerAction::iter()
            .map(|action| {
                let state = match self.is_action_reversed(action) {
                    Ok(true) => ActionState::Reversed,
                    Ok(false) => ActionState::Enabled,
                    Err(_) => ActionState::Disabled,
                };
                (action, state)
            })
            .collect()
    }

    fn is_action_reversed(
        &self,
        action: ComposerAction,
    ) -> Result<bool, EditorError> {
        if let Some(mark) = action.mark() {
            return self.has_mark(mark);
        }
        match action.block() {
            Some(kind) if kind.is_list() => self.is_list_active(kind),
            Some(kind) if kind.is_void() => {
                self.selection.validate(&self.document)?;
                Ok(false)
            }
            Some(kind) => self.has_block(kind),
            None => self.has_links(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::testutils_snapshot::cm;

    fn state(html: &str, action: ComposerAction) -> ActionState {
        cm(html).compute_action_states()[&action]
    }

    #[test]
    fn every_action_has_a_state() {
        let states = cm("<p>a|</p>").compute_action_states();
        assert_eq!(states.len(), ComposerAction::iter().count());
        assert!(states.values().all(|s| *s == ActionState::Enabled));
    }

    #[test]
    fn active_marks_are_reversed() {
        let html = "<p><strong><em>a|</em></strong></p>";
        assert_eq!(state(html, ComposerAction::Bold), ActionState::Reversed);
        assert_eq!(state(html, ComposerAction::Italic), ActionState::Reversed);
        assert_eq!(state(html, ComposerAction::Code), ActionState::Enabled);
    }

    #[test]
    fn list_button_follows_the_parent_list() {
        let html = "<ol><li>a|</li></ol>";
        assert_eq!(
            state(html, ComposerAction::NumberedList),
            ActionState::Reversed
        );
        assert_eq!(
            state(html, ComposerAction::BulletedList),
            ActionState::Enabled
        );
    }

    #[test]
    fn quote_and_link_are_reversed_inside_them() {
        let html =
            r#"<blockquote><a href="https://x.com">a|</a></blockquote>"#;
        assert_eq!(
            state(html, ComposerAction::BlockQuote),
            ActionState::Reversed
        );
        assert_eq!(state(html, ComposerAction::Link), ActionState::Reversed);
    }

    #[test]
    fn stale_selection_disables_everything() {
        let long = cm("<p>abcdef|</p>");
        let stale = Snapshot {
            document: cm("<p>|</p>").document,
            selection: long.selection,
        };
        assert!(stale
            .compute_action_states()
            .values()
            .all(|s| *s == ActionState::Disabled));
    }
}
