//! Quest entity - a validated quest ready to hand to the mod

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::PlayerClass;

pub const LEVEL_RANGE: RangeInclusive<i64> = 1..=3;
pub const AMOUNT_RANGE: RangeInclusive<i64> = 1..=20;
pub const TIME_LIMIT_RANGE: RangeInclusive<i64> = 20..=50;
pub const TIER_RANGE: RangeInclusive<i64> = 1..=3;
pub const EXPERIENCE_RANGE: RangeInclusive<i64> = 500..=1500;

/// The only reward kind the mod understands
pub const SKILL_POINT_REWARD: &str = "skill_point_token";

/// A quest that passed validation
///
/// Field names follow the mod's JSON format, hence the camelCase renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    /// Namespaced class, e.g. `origins:cook`
    pub player_class: String,
    pub level: i64,
    pub title: String,
    /// Always present in the output, empty when the model gave none
    #[serde(default)]
    pub description: String,
    pub objective: QuestObjective,
    /// Minutes the player has to finish the quest
    pub time_limit: i64,
    pub reward: QuestReward,
}

/// What the player has to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestObjective {
    #[serde(rename = "type")]
    pub objective_type: String,
    /// Always `minecraft:<target>` in lowercase, e.g. `minecraft:wheat`
    pub target: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    #[serde(rename = "type")]
    pub reward_type: String,
    pub tier: i64,
    pub experience: i64,
}

impl Quest {
    /// Generate a new id scoped to the class, e.g. `cook_1a2b3c4d`
    pub fn fresh_id(class: PlayerClass) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}_{}", class, &suffix[..8])
    }
}
