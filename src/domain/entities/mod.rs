//! Domain entities

mod quest;

pub use quest::{
    Quest, QuestObjective, QuestReward, AMOUNT_RANGE, EXPERIENCE_RANGE, LEVEL_RANGE,
    SKILL_POINT_REWARD, TIER_RANGE, TIME_LIMIT_RANGE,
};
