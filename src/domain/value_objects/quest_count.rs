//! Number of quests a caller may request per class

use std::ops::RangeInclusive;

/// Default when the caller does not say
pub const DEFAULT_QUEST_COUNT: u8 = 5;

pub const QUEST_COUNT_RANGE: RangeInclusive<i64> = 1..=10;

/// A quest count known to be within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuestCount(u8);

impl QuestCount {
    /// Returns `None` when `value` is outside 1..=10
    pub fn new(value: i64) -> Option<Self> {
        if QUEST_COUNT_RANGE.contains(&value) {
            u8::try_from(value).ok().map(Self)
        } else {
            None
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        usize::from(self.0)
    }
}

impl Default for QuestCount {
    fn default() -> Self {
        Self(DEFAULT_QUEST_COUNT)
    }
}

impl std::fmt::Display for QuestCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
