// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::BTreeSet;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A style applied to a run of text.
///
/// The declaration order is also the nesting order used when serializing:
/// `Bold` is the outermost tag, `LargeSize` the innermost.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Mark {
    Bold,
    Italic,
    Underlined,
    Code,
    SmallSize,
    LargeSize,
}

impl Mark {
    pub fn is_size(self) -> bool {
        matches!(self, Mark::SmallSize | Mark::LargeSize)
    }

    /// The mark that cannot coexist with this one on a text run.
    pub fn opposing(self) -> Option<Mark> {
        match self {
            Mark::SmallSize => Some(Mark::LargeSize),
            Mark::LargeSize => Some(Mark::SmallSize),
            _ => None,
        }
    }
}

/// The marks carried by a text run.
///
/// `SmallSize` and `LargeSize` are mutually exclusive: inserting one drops
/// the other, so no sequence of operations can produce a run with both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MarkSet {
    marks: BTreeSet<Mark>,
}

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, mark: Mark) -> bool {
        self.marks.contains(&mark)
    }

    pub fn insert(&mut self, mark: Mark) {
        if let Some(opposing) = mark.opposing() {
            self.marks.remove(&opposing);
        }
        self.marks.insert(mark);
    }

    pub fn remove(&mut self, mark: Mark) {
        self.marks.remove(&mark);
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.insert(mark);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Marks in nesting order, outermost first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Mark> + '_ {
        self.marks.iter().copied()
    }

    pub fn intersection(&self, other: &MarkSet) -> MarkSet {
        MarkSet {
            marks: self.marks.intersection(&other.marks).copied().collect(),
        }
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<T: IntoIterator<Item = Mark>>(iter: T) -> Self {
        let mut set = MarkSet::new();
        for mark in iter {
            set.insert(mark);
        }
        set
    }
}

impl<const N: usize> From<[Mark; N]> for MarkSet {
    fn from(marks: [Mark; N]) -> Self {
        marks.into_iter().collect()
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn mark_names_are_kebab_case() {
        assert_eq!(Mark::SmallSize.to_string(), "small-size");
        assert_eq!(Mark::from_str("underlined"), Ok(Mark::Underlined));
    }

    #[test]
    fn size_marks_replace_each_other() {
        let mut marks = MarkSet::from([Mark::Bold, Mark::SmallSize]);
        marks.insert(Mark::LargeSize);
        assert!(marks.contains(Mark::LargeSize));
        assert!(!marks.contains(Mark::SmallSize));
        assert!(marks.contains(Mark::Bold));
    }

    #[test]
    fn collecting_keeps_the_last_size() {
        let marks: MarkSet =
            [Mark::LargeSize, Mark::SmallSize].into_iter().collect();
        assert_eq!(marks, MarkSet::from([Mark::SmallSize]));
    }

    #[test]
    fn iteration_is_in_nesting_order() {
        let marks = MarkSet::from([Mark::Code, Mark::Bold, Mark::Italic]);
        let order: Vec<Mark> = marks.iter().collect();
        assert_eq!(order, vec![Mark::Bold, Mark::Italic, Mark::Code]);
    }

    #[test]
    fn intersection_keeps_shared_marks() {
        let a = MarkSet::from([Mark::Bold, Mark::Italic]);
        let b = MarkSet::from([Mark::Italic, Mark::Code]);
        assert_eq!(a.intersection(&b), MarkSet::from([Mark::Italic]));
    }
}
