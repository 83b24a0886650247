use std::sync::Arc;

use axum::{extract::State, Json};

use crate::application::dto::ReloadResponseDto;
use crate::infrastructure::state::AppState;

/// Re-read the catalog file; always succeeds
pub async fn reload_catalog(State(state): State<Arc<AppState>>) -> Json<ReloadResponseDto> {
    let outcome = state.catalog.reload().await;

    Json(ReloadResponseDto {
        status: "reloaded".to_string(),
        message: outcome.message(),
    })
}
