//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::value_objects::{ValidationRules, DEFAULT_FORBIDDEN_TARGET};

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_QUEST_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenRouter API key
    pub openrouter_api_key: String,
    /// OpenAI-compatible API base URL
    pub openrouter_base_url: String,
    /// Model used for every request
    pub quest_model: String,

    /// Number of model calls allowed in flight at once
    pub llm_workers: usize,
    /// HTTP client timeout for model calls
    pub llm_timeout_secs: u64,

    /// Optional catalog file, built-in table when unset
    pub catalog_path: Option<PathBuf>,
    /// Targets no quest may use
    pub forbidden_targets: ValidationRules,

    /// Sent as `HTTP-Referer` for OpenRouter attribution
    pub app_referer: String,
    /// Sent as `X-Title` for OpenRouter attribution
    pub app_title: String,

    /// HTTP server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            openrouter_api_key: lookup("OPENROUTER_API_KEY")
                .filter(|key| !key.trim().is_empty())
                .context("OPENROUTER_API_KEY environment variable is required")?,
            openrouter_base_url: var_or("OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL),
            quest_model: var_or("QUEST_MODEL", DEFAULT_QUEST_MODEL),

            llm_workers: var_or("LLM_WORKERS", "2")
                .parse::<usize>()
                .context("LLM_WORKERS must be a positive integer")?
                .max(1),
            llm_timeout_secs: var_or("LLM_TIMEOUT_SECS", "120")
                .parse()
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?,

            catalog_path: lookup("QUEST_CATALOG_PATH")
                .map(|path| path.trim().to_string())
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            forbidden_targets: ValidationRules::from_list(&var_or(
                "QUEST_FORBIDDEN_TARGETS",
                DEFAULT_FORBIDDEN_TARGET,
            )),

            app_referer: var_or("APP_REFERER", "http://localhost:8000"),
            app_title: var_or("APP_TITLE", "Minecraft Quest Generator"),

            server_port: var_or("SERVER_PORT", "8000")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| (key == "OPENROUTER_API_KEY").then(|| "test-key".to_string()))
            .expect("defaults are valid")
    }
}
