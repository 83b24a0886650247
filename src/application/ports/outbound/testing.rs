//! In-process LLM fake for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse};

/// Replies with canned content and records every request it sees
pub struct ScriptedLlm {
    reply: Result<String, String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn replying(content: impl Into<String>) -> Self {
        Self {
            reply: Ok(content.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        match &self.reply {
            Ok(content) if content.trim().is_empty() => Err(LlmError::EmptyContent),
            Ok(content) => Ok(LlmResponse {
                content: content.clone(),
                finish_reason: FinishReason::Stop,
                usage: None,
            }),
            Err(message) => Err(LlmError::RequestFailed(message.clone())),
        }
    }
}
