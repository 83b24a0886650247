//! Chat Service - free-form Minecraft questions answered by the LLM

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{LlmError, LlmPort, LlmRequest};
use crate::application::services::llm::prompt_builder::build_chat_system_prompt;

/// Longest accepted question, in characters, after trimming
pub const MAX_QUESTION_LENGTH: usize = 1000;

/// Version assumed when the client does not send one
pub const DEFAULT_MINECRAFT_VERSION: &str = "1.20.1";

const CHAT_TEMPERATURE: f32 = 0.7;

/// Topic tag attached to every chat answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Crafting,
    Combat,
    Mining,
    Building,
    Redstone,
    General,
    Error,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crafting => "crafting",
            Self::Combat => "combat",
            Self::Mining => "mining",
            Self::Building => "building",
            Self::Redstone => "redstone",
            Self::General => "general",
            Self::Error => "error",
        }
    }
}

/// Word prefixes per topic, checked in this order
const TOPIC_KEYWORDS: &[(ResponseType, &[&str])] = &[
    (
        ResponseType::Crafting,
        &["craft", "recipe", "make", "крафт", "рецепт", "скрафт", "сделать", "создать"],
    ),
    (
        ResponseType::Combat,
        &["fight", "kill", "mob", "weapon", "sword", "armor", "бой", "убить", "моб", "меч", "оруж", "брон"],
    ),
    (
        ResponseType::Mining,
        &["mining", "ore", "pickaxe", "diamond", "dig", "шахт", "руд", "кирк", "алмаз", "добы"],
    ),
    (
        ResponseType::Building,
        &["build", "house", "construct", "строит", "постро", "дом"],
    ),
    (
        ResponseType::Redstone,
        &["redstone", "piston", "circuit", "редстоун", "поршен", "механизм"],
    ),
];

/// Tag a question with the first topic whose keywords it mentions
pub fn classify_question(question: &str) -> ResponseType {
    let lowered = question.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    TOPIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| words.iter().any(|word| word.starts_with(keyword)))
        })
        .map(|(response_type, _)| *response_type)
        .unwrap_or(ResponseType::General)
}

/// Errors that can occur while answering a question
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("input: question must not be empty")]
    EmptyQuestion,
    #[error("input: question is {0} characters long, the limit is {max}", max = MAX_QUESTION_LENGTH)]
    QuestionTooLong(usize),
    #[error("upstream: {0}")]
    Upstream(#[from] LlmError),
}

impl ChatError {
    /// Whether the caller sent something we refuse before calling the model
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyQuestion | Self::QuestionTooLong(_))
    }
}

/// A trimmed answer with its topic tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAnswer {
    pub answer: String,
    pub response_type: ResponseType,
}

/// Trim the question and check its length
pub fn validate_question(question: &str) -> Result<&str, ChatError> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(ChatError::EmptyQuestion);
    }
    let length = trimmed.chars().count();
    if length > MAX_QUESTION_LENGTH {
        return Err(ChatError::QuestionTooLong(length));
    }
    Ok(trimmed)
}

pub struct ChatService {
    llm: Arc<dyn LlmPort>,
}

impl ChatService {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    pub async fn ask(
        &self,
        question: &str,
        minecraft_version: Option<&str>,
        context: Option<&str>,
    ) -> Result<ChatAnswer, ChatError> {
        let question = validate_question(question)?;
        let response_type = classify_question(question);
        let version = minecraft_version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_MINECRAFT_VERSION);

        tracing::info!(response_type = response_type.as_str(), version, "Answering chat question");

        let request = LlmRequest::prompt(question)
            .with_system_prompt(build_chat_system_prompt(version, context))
            .with_temperature(CHAT_TEMPERATURE);

        let response = self.llm.generate(request).await.map_err(|e| {
            tracing::error!(error = %e, "Chat request to LLM failed");
            e
        })?;

        let answer = response.content.trim();
        if answer.is_empty() {
            return Err(ChatError::Upstream(LlmError::EmptyContent));
        }

        Ok(ChatAnswer {
            answer: answer.to_string(),
            response_type,
        })
    }
}
