//! Application services - Use case implementations
//!
//! Each service holds its outbound port behind an `Arc<dyn ...>` and returns
//! domain entities or service-level errors; mapping to HTTP happens in the
//! infrastructure layer.

pub mod chat_service;
pub mod llm;
pub mod quest_extraction;
pub mod quest_service;

pub use chat_service::{ChatAnswer, ChatError, ChatService, ResponseType};
pub use quest_service::{QuestBatch, QuestGenerationError, QuestService};
