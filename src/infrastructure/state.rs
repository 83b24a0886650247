//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::LlmPort;
use crate::application::services::{ChatService, QuestService};
use crate::infrastructure::bounded_llm::BoundedLlmClient;
use crate::infrastructure::catalog_store::CatalogStore;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::openrouter::OpenRouterClient;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Live class catalog, swapped on reload
    pub catalog: CatalogStore,
    // Application services
    pub quest_service: QuestService,
    pub chat_service: ChatService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        // Every model call goes through the bounded worker pool
        let openrouter: Arc<dyn LlmPort> = Arc::new(OpenRouterClient::new(&config));
        let bounded = BoundedLlmClient::new(openrouter, config.llm_workers);
        tracing::info!(workers = bounded.available_workers(), "LLM worker pool ready");
        let llm: Arc<dyn LlmPort> = Arc::new(bounded);

        let catalog = CatalogStore::load(config.catalog_path.clone()).await;

        Ok(Self::with_parts(config, llm, catalog))
    }

    /// Assemble state around an existing model client and catalog
    pub fn with_parts(config: AppConfig, llm: Arc<dyn LlmPort>, catalog: CatalogStore) -> Self {
        let quest_service = QuestService::new(llm.clone(), config.forbidden_targets.clone());
        let chat_service = ChatService::new(llm);

        Self {
            config,
            catalog,
            quest_service,
            chat_service,
        }
    }
}
