//! Quest Service - one model call in, validated quests out
//!
//! Request flow: validate input, build the prompt from the catalog, ask the
//! model once, extract and validate. Every failure is tagged with the stage
//! it happened in so the HTTP layer can pick the right status code.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::application::ports::outbound::{FinishReason, LlmError, LlmPort, LlmRequest};
use crate::application::services::llm::prompt_builder::{
    build_all_classes_prompt, build_class_prompt,
};
use crate::application::services::quest_extraction::{
    extract_class_drafts, extract_json_object, extract_keyed_array, ExtractionError,
    QuestValidator,
};
use crate::domain::entities::Quest;
use crate::domain::value_objects::{ClassCatalog, PlayerClass, QuestCount, ValidationRules};

/// Quests grouped per class, in class order
pub type QuestBatch = BTreeMap<PlayerClass, Vec<Quest>>;

/// Errors that can occur while generating quests
#[derive(Debug, thiserror::Error)]
pub enum QuestGenerationError {
    #[error("input: unknown player class '{0}'")]
    UnknownClass(String),
    #[error("input: quest count must be between 1 and 10, got {0}")]
    InvalidCount(i64),
    #[error("upstream: {0}")]
    Upstream(#[from] LlmError),
    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("validation: quest generation failed, no valid quests for {0}")]
    NoValidQuests(String),
}

/// Parse a class name from a request path
pub fn parse_class(raw: &str) -> Result<PlayerClass, QuestGenerationError> {
    raw.parse()
        .map_err(|_| QuestGenerationError::UnknownClass(raw.to_string()))
}

/// Check a requested count; `None` means the default
pub fn parse_count(raw: Option<i64>) -> Result<QuestCount, QuestGenerationError> {
    match raw {
        None => Ok(QuestCount::default()),
        Some(value) => QuestCount::new(value).ok_or(QuestGenerationError::InvalidCount(value)),
    }
}

/// Service for generating quests through the LLM
pub struct QuestService {
    llm: Arc<dyn LlmPort>,
    rules: ValidationRules,
}

impl QuestService {
    pub fn new(llm: Arc<dyn LlmPort>, rules: ValidationRules) -> Self {
        Self { llm, rules }
    }

    /// Generate up to `count` quests for a single class
    ///
    /// Fails with [`QuestGenerationError::NoValidQuests`] rather than
    /// returning an empty list.
    pub async fn generate_for_class(
        &self,
        class: PlayerClass,
        count: QuestCount,
        catalog: &ClassCatalog,
    ) -> Result<Vec<Quest>, QuestGenerationError> {
        let prompt = {
            let mut rng = rand::thread_rng();
            build_class_prompt(class, count.get(), catalog, &self.rules, &mut rng)
        };

        tracing::info!(class = %class, count = %count, "Requesting quests from LLM");
        let content = self.ask(prompt).await?;

        let quests = self.parse_class_response(&content, class, count, catalog)?;
        tracing::info!(class = %class, generated = quests.len(), "Quests generated");
        Ok(quests)
    }

    /// Generate quests for every class with a single model call
    ///
    /// Each class is extracted on its own: a broken section yields an empty
    /// list for that class. Fails only when every class comes back empty.
    pub async fn generate_for_all(
        &self,
        count: QuestCount,
        catalog: &ClassCatalog,
    ) -> Result<QuestBatch, QuestGenerationError> {
        let prompt = {
            let mut rng = rand::thread_rng();
            build_all_classes_prompt(count.get(), catalog, &self.rules, &mut rng)
        };

        tracing::info!(count_per_class = %count, "Requesting quests for all classes from LLM");
        let content = self.ask(prompt).await?;

        let batch = self.parse_all_classes_response(&content, count, catalog);
        if batch.values().all(Vec::is_empty) {
            return Err(QuestGenerationError::NoValidQuests("any class".to_string()));
        }

        tracing::info!(
            generated = batch.values().map(Vec::len).sum::<usize>(),
            "Quests generated for all classes"
        );
        Ok(batch)
    }

    /// Turn a single-class response into quests
    pub fn parse_class_response(
        &self,
        content: &str,
        class: PlayerClass,
        count: QuestCount,
        catalog: &ClassCatalog,
    ) -> Result<Vec<Quest>, QuestGenerationError> {
        let drafts = extract_class_drafts(content, class).map_err(|e| {
            tracing::warn!(class = %class, error = %e, "Could not extract quests from LLM response");
            e
        })?;

        let quests = QuestValidator::new(catalog, &self.rules).validate_all(
            &drafts,
            class,
            count.as_usize(),
        );
        if quests.is_empty() {
            return Err(QuestGenerationError::NoValidQuests(class.to_string()));
        }
        Ok(quests)
    }

    /// Turn an all-classes response into a batch, isolating failures per class
    pub fn parse_all_classes_response(
        &self,
        content: &str,
        count: QuestCount,
        catalog: &ClassCatalog,
    ) -> QuestBatch {
        let class_keys: Vec<&str> = PlayerClass::ALL.iter().map(PlayerClass::as_str).collect();
        let top_level = match extract_json_object(content, &class_keys) {
            Ok(object) => Some(object),
            Err(e) => {
                tracing::warn!(error = %e, "Response is not one JSON object, extracting classes separately");
                None
            }
        };

        let validator = QuestValidator::new(catalog, &self.rules);
        let mut batch = QuestBatch::new();

        for class in PlayerClass::ALL {
            let drafts = top_level
                .as_ref()
                .and_then(|object| object.get(class.as_str()))
                .and_then(Value::as_array)
                .cloned()
                .or_else(|| extract_keyed_array(content, class.as_str()));

            let quests = match drafts {
                Some(drafts) => validator.validate_all(&drafts, class, count.as_usize()),
                None => {
                    tracing::warn!(class = %class, "No usable quest section for class");
                    Vec::new()
                }
            };
            batch.insert(class, quests);
        }

        batch
    }

    async fn ask(&self, prompt: String) -> Result<String, QuestGenerationError> {
        let response = self
            .llm
            .generate(LlmRequest::prompt(prompt))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "LLM request failed");
                e
            })?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "LLM token usage"
            );
        }
        if response.finish_reason == FinishReason::Length {
            tracing::warn!("LLM response hit the token limit, JSON may be truncated");
        }

        tracing::debug!(content = %response.content, "Raw LLM response");
        Ok(response.content)
    }
}
