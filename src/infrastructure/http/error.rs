use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::application::services::{ChatError, QuestGenerationError};

/// Error returned by HTTP handlers
///
/// Rendered as `{"detail": "<stage>: <message>"}`, the shape the mod client
/// already understands.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Quest(#[from] QuestGenerationError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("input: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Quest(QuestGenerationError::UnknownClass(_)) => StatusCode::NOT_FOUND,
            ApiError::Quest(QuestGenerationError::InvalidCount(_)) => StatusCode::BAD_REQUEST,
            ApiError::Quest(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Chat(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            ApiError::Chat(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, detail = %detail, "Request failed");
        } else {
            tracing::debug!(status = %status, detail = %detail, "Request rejected");
        }

        (status, axum::Json(json!({ "detail": detail }))).into_response()
    }
}
