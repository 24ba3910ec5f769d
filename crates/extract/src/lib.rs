pub mod backend;
pub mod error;
pub mod llm;
pub mod mock;
pub mod prompt;
pub mod schema;

pub use backend::OcrBackend;
pub use error::GatewayError;
pub use llm::OllamaClient;
pub use mock::MockBackend;
pub use prompt::OCR_INSTRUCTION;

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma3:12b";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Boundary between the page and the model server. Every failure is
/// returned as a `GatewayError`; nothing is retried.
#[derive(Clone)]
pub struct InferenceGateway {
    backend: Arc<dyn OcrBackend>,
    timeout: Duration,
}

impl InferenceGateway {
    pub fn new(backend: Arc<dyn OcrBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Extract text from an image. Blocks the caller until the backend
    /// answers or the timeout elapses.
    pub async fn extract(&self, image_bytes: &[u8], instruction: &str) -> Result<String, GatewayError> {
        if image_bytes.is_empty() {
            return Err(GatewayError::EmptyImage);
        }

        let started = Instant::now();
        info!(model = %self.model(), image_bytes = image_bytes.len(), "Starting extraction");

        let outcome = match tokio::time::timeout(self.timeout, self.backend.chat(instruction, image_bytes)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(self.timeout)),
        };

        match &outcome {
            Ok(text) => info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                chars = text.len(),
                "Extraction finished"
            ),
            Err(e) => warn!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "Extraction failed"
            ),
        }

        outcome
    }

    pub async fn health(&self) -> Result<(), GatewayError> {
        self.backend.health().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(backend: MockBackend, timeout: Duration) -> (InferenceGateway, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        (InferenceGateway::new(backend.clone(), timeout), backend)
    }

    #[tokio::test]
    async fn test_returns_text_verbatim() {
        let (gw, _) = gateway(MockBackend::new().with_response("# HELLO\n\n- a\n"), DEFAULT_TIMEOUT);

        let text = gw.extract(b"png-bytes", OCR_INSTRUCTION).await.unwrap();
        assert_eq!(text, "# HELLO\n\n- a\n");
    }

    #[tokio::test]
    async fn test_forwards_bytes_unmodified() {
        let (gw, backend) = gateway(MockBackend::new(), DEFAULT_TIMEOUT);
        let payload = vec![0u8, 1, 2, 255, 254];

        gw.extract(&payload, OCR_INSTRUCTION).await.unwrap();
        assert_eq!(backend.last_image(), Some(payload));
    }

    #[tokio::test]
    async fn test_empty_image_never_reaches_backend() {
        let (gw, backend) = gateway(MockBackend::new(), DEFAULT_TIMEOUT);

        let err = gw.extract(b"", OCR_INSTRUCTION).await.unwrap_err();
        assert_eq!(err, GatewayError::EmptyImage);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let timeout = Duration::from_millis(20);
        let (gw, _) = gateway(MockBackend::new().with_delay(Duration::from_secs(5)), timeout);

        let err = gw.extract(b"img", OCR_INSTRUCTION).await.unwrap_err();
        assert_eq!(err, GatewayError::Timeout(timeout));
    }

    #[tokio::test]
    async fn test_backend_error_is_not_retried() {
        let backend = MockBackend::new().with_outcomes(vec![Err(GatewayError::Backend {
            status: 500,
            message: "model not loaded".to_string(),
        })]);
        let (gw, backend) = gateway(backend, DEFAULT_TIMEOUT);

        let err = gw.extract(b"img", OCR_INSTRUCTION).await.unwrap_err();
        assert_eq!(err.to_string(), "model backend returned 500: model not loaded");
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_timeout_message() {
        let err = GatewayError::Timeout(DEFAULT_TIMEOUT);
        assert_eq!(err.to_string(), "model did not respond within 120s");
    }
}
