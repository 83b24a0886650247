use std::sync::Arc;

use axum::{extract::State, Json};

use crate::application::dto::{ChatRequestDto, ChatResponseDto};
use crate::infrastructure::http::ApiError;
use crate::infrastructure::state::AppState;

/// Answer a free-form question
///
/// Bad input is a 400. Anything that goes wrong after that is reported in
/// the body with `success: false` so the in-game chat can show it.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequestDto>,
) -> Result<Json<ChatResponseDto>, ApiError> {
    let result = state
        .chat_service
        .ask(
            &request.question,
            request.minecraft_version.as_deref(),
            request.context.as_deref(),
        )
        .await;

    match result {
        Ok(answer) => Ok(Json(answer.into())),
        Err(e) if e.is_input_error() => Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, "Chat question could not be answered");
            Ok(Json(ChatResponseDto::failure(e.to_string())))
        }
    }
}
