use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::services::QuestBatch;
use crate::domain::entities::Quest;

/// Query for `GET /quests/{class}`
#[derive(Debug, Default, Deserialize)]
pub struct QuestCountQuery {
    #[serde(default)]
    pub quest_count: Option<i64>,
}

/// Query for `GET /quests/all`
#[derive(Debug, Default, Deserialize)]
pub struct AllQuestsQuery {
    #[serde(default)]
    pub quest_count_per_class: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestsResponseDto {
    pub quests: Vec<Quest>,
}

impl From<Vec<Quest>> for QuestsResponseDto {
    fn from(quests: Vec<Quest>) -> Self {
        Self { quests }
    }
}

/// One key per class, every class present even when empty
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllQuestsResponseDto(pub BTreeMap<String, Vec<Quest>>);

impl From<QuestBatch> for AllQuestsResponseDto {
    fn from(batch: QuestBatch) -> Self {
        Self(
            batch
                .into_iter()
                .map(|(class, quests)| (class.as_str().to_string(), quests))
                .collect(),
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponseDto {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponseDto {
    pub status: String,
}

impl HealthResponseDto {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
