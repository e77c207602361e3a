// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use thiserror::Error;

/// Everything that can go wrong inside the editing core.
///
/// None of these are fatal: a command that fails leaves the previous
/// [`Snapshot`](crate::Snapshot) untouched, so the caller can pick another
/// action, re-derive its selection, or reset to an empty document.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The operation would break a tree invariant, e.g. nesting a link in
    /// a link or putting a paragraph directly inside a list.
    #[error("structural violation: {0}")]
    StructuralViolation(String),

    /// A selection point does not address a text node of the current
    /// document, or its offset is past the end of that text.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// The markup given to the deserializer could not be turned into a
    /// document.
    #[error(transparent)]
    Parse(#[from] HtmlParseError),
}

impl EditorError {
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        Self::StructuralViolation(msg.into())
    }

    pub(crate) fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("failed to parse markup: {}", parse_errors.join("; "))]
pub struct HtmlParseError {
    pub parse_errors: Vec<String>,
}

impl HtmlParseError {
    pub fn new(parse_errors: Vec<String>) -> Self {
        Self { parse_errors }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_errors_are_joined_in_the_message() {
        let err = EditorError::from(HtmlParseError::new(vec![
            "Unexpected token".into(),
            "Node `span` is not supported".into(),
        ]));
        assert_eq!(
            err.to_string(),
            "failed to parse markup: Unexpected token; Node `span` is not supported"
        );
    }

    #[test]
    fn structural_violation_carries_its_reason() {
        let err = EditorError::structural("link inside link");
        assert_eq!(err.to_string(), "structural violation: link inside link");
    }
}
