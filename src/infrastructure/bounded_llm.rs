//! Bounded LLM client wrapper
//!
//! Wraps any LlmPort so that at most N model calls are in flight. Each call
//! runs on its own spawned task holding a semaphore permit; callers wait only
//! for a permit, never for each other's request handling.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::application::ports::outbound::{LlmError, LlmPort, LlmRequest, LlmResponse};

pub struct BoundedLlmClient {
    inner: Arc<dyn LlmPort>,
    semaphore: Arc<Semaphore>,
}

impl BoundedLlmClient {
    pub fn new(inner: Arc<dyn LlmPort>, workers: usize) -> Self {
        Self {
            inner,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Permits not currently held by a call
    pub fn available_workers(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[async_trait]
impl LlmPort for BoundedLlmClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| LlmError::RequestFailed(format!("worker pool closed: {}", e)))?;

        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let _permit = permit; // Held until the call finishes
            inner.generate(request).await
        });

        task.await.map_err(|e| {
            tracing::error!(error = %e, "LLM worker task failed");
            LlmError::RequestFailed(format!("worker task failed: {}", e))
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::application::ports::outbound::{FinishReason, testing::ScriptedLlm};

    /// Sleeps during each call and records the peak number of concurrent calls
    #[derive(Default)]
    struct SlowLlm {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl LlmPort for SlowLlm {
        async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse, LlmError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            Ok(LlmResponse {
                content: "ok".to_string(),
                finish_reason: FinishReason::Stop,
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn test_limits_concurrent_calls() {
        let slow = Arc::new(SlowLlm::default());
        let client = Arc::new(BoundedLlmClient::new(slow.clone(), 2));

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move { client.generate(LlmRequest::prompt(format!("call {}", i))).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().content, "ok");
        }

        assert!(slow.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(client.available_workers(), 2);
    }

    #[tokio::test]
    async fn test_passes_errors_through() {
        let client = BoundedLlmClient::new(Arc::new(ScriptedLlm::failing("503 Service Unavailable")), 1);

        let err = client.generate(LlmRequest::prompt("hi")).await.unwrap_err();

        assert!(matches!(err, LlmError::RequestFailed(msg) if msg.contains("503")));
        assert_eq!(client.available_workers(), 1);
    }

    #[test]
    fn test_zero_workers_means_one() {
        let client = BoundedLlmClient::new(Arc::new(ScriptedLlm::replying("x")), 0);
        assert_eq!(client.available_workers(), 1);
    }
}
