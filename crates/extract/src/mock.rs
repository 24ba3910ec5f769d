use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::backend::OcrBackend;
use crate::error::GatewayError;

/// A scripted backend. Pops one queued outcome per call and falls back
/// to a fixed reply once the queue is drained.
pub struct MockBackend {
    outcomes: Mutex<VecDeque<Result<String, GatewayError>>>,
    fallback: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_image: Mutex<Option<Vec<u8>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            fallback: "Mock response".to_string(),
            delay: None,
            calls: AtomicUsize::new(0),
            last_image: Mutex::new(None),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fallback = response.into();
        self
    }

    pub fn with_outcomes(self, outcomes: Vec<Result<String, GatewayError>>) -> Self {
        if let Ok(mut queue) = self.outcomes.lock() {
            queue.extend(outcomes);
        }
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Image payload of the most recent call
    pub fn last_image(&self) -> Option<Vec<u8>> {
        self.last_image.lock().ok().and_then(|img| img.clone())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrBackend for MockBackend {
    fn model(&self) -> &str {
        "mock"
    }

    async fn chat(&self, _instruction: &str, image: &[u8]) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_image.lock() {
            *last = Some(image.to_vec());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.outcomes.lock().ok().and_then(|mut q| q.pop_front());
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    async fn health(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}
