//! Outbound ports - Interfaces that the application requires from external systems

mod llm_port;
#[cfg(test)]
pub mod testing;

pub use llm_port::{
    ChatMessage, FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole,
    TokenUsage,
};
