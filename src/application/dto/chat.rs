use serde::{Deserialize, Serialize};

use crate::application::services::{ChatAnswer, ResponseType};

/// Shown to the player when the assistant could not answer
pub const CHAT_APOLOGY: &str =
    "Извините, сейчас не получается ответить на вопрос. Попробуйте ещё раз позже.";

#[derive(Debug, Deserialize)]
pub struct ChatRequestDto {
    pub question: String,
    #[serde(default)]
    pub minecraft_version: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponseDto {
    pub answer: String,
    pub success: bool,
    pub response_type: ResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ChatResponseDto {
    /// Response for a failure the player should not see as an HTTP error
    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            answer: CHAT_APOLOGY.to_string(),
            success: false,
            response_type: ResponseType::Error,
            error_message: Some(error_message.into()),
        }
    }
}

impl From<ChatAnswer> for ChatResponseDto {
    fn from(answer: ChatAnswer) -> Self {
        Self {
            answer: answer.answer,
            success: true,
            response_type: answer.response_type,
            error_message: None,
        }
    }
}
