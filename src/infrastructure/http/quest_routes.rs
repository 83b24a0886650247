//! Quest generation API routes

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::application::dto::{
    AllQuestsQuery, AllQuestsResponseDto, QuestCountQuery, QuestsResponseDto,
};
use crate::application::services::quest_service::{parse_class, parse_count};
use crate::infrastructure::http::ApiError;
use crate::infrastructure::state::AppState;

/// Generate quests for one class
pub async fn generate_class_quests(
    State(state): State<Arc<AppState>>,
    Path(class): Path<String>,
    query: Result<Query<QuestCountQuery>, QueryRejection>,
) -> Result<Json<QuestsResponseDto>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // Both checks happen before any model call
    let class = parse_class(&class)?;
    let count = parse_count(query.quest_count)?;

    let catalog = state.catalog.current().await;
    let quests = state
        .quest_service
        .generate_for_class(class, count, &catalog)
        .await?;

    Ok(Json(quests.into()))
}

/// Generate quests for every class with one model call
pub async fn generate_all_quests(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AllQuestsQuery>, QueryRejection>,
) -> Result<Json<AllQuestsResponseDto>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let count = parse_count(query.quest_count_per_class)?;

    let catalog = state.catalog.current().await;
    let batch = state.quest_service.generate_for_all(count, &catalog).await?;

    Ok(Json(batch.into()))
}
