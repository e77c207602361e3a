// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub mod document;
pub mod dom_handle;
pub mod marks;
pub mod nodes;
mod normalize;
pub mod parser;
pub(crate) mod runs;
pub mod to_html;
pub mod to_tree;
mod validate;

pub use document::Document;
pub use dom_handle::DomHandle;
pub use marks::{Mark, MarkSet};
