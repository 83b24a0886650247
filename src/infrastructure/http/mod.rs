//! HTTP REST API routes

mod catalog_routes;
mod chat_routes;
mod error;
mod quest_routes;

use axum::{
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::application::dto::HealthResponseDto;
use crate::infrastructure::state::AppState;

pub use error::ApiError;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        // Quest routes; the static path wins over the class parameter
        .route("/quests/all", get(quest_routes::generate_all_quests))
        .route("/quests/{class}", get(quest_routes::generate_class_quests))
        // Chat routes
        .route("/chat/ask", post(chat_routes::ask))
        // Catalog routes
        .route(
            "/quest_api/reload",
            get(catalog_routes::reload_catalog).post(catalog_routes::reload_catalog),
        )
}

async fn health_check() -> Json<HealthResponseDto> {
    Json(HealthResponseDto::ok())
}
