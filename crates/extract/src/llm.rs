use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::time::Duration;
use tracing::debug;

use crate::backend::OcrBackend;
use crate::error::GatewayError;
use crate::schema::{ChatMessage, ChatRequest, ChatResponse, ErrorBody};
use crate::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};

#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn default() -> Self {
        Self::new(
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
            DEFAULT_TIMEOUT,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, instruction: &str, image: &[u8]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: instruction.to_string(),
                images: vec![STANDARD.encode(image)],
            }],
            stream: false,
        }
    }
}

#[async_trait]
impl OcrBackend for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, instruction: &str, image: &[u8]) -> Result<String, GatewayError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = self.build_request(instruction, image);

        debug!(model = %self.model, image_bytes = image.len(), "Sending request to Ollama");

        let response = self.client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Ollama reports failures as {"error": "..."}
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(GatewayError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, self.timeout))?;

        debug!(
            eval_count = ?chat_response.eval_count,
            total_duration_ns = ?chat_response.total_duration,
            "Ollama response received"
        );

        Ok(chat_response.message.content)
    }

    async fn health(&self) -> Result<(), GatewayError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(e, Duration::from_secs(5)))?;

        if !response.status().is_success() {
            return Err(GatewayError::Backend {
                status: response.status().as_u16(),
                message: "health probe failed".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_base64_image() {
        let client = OllamaClient::default();
        let request = client.build_request("read", &[0x89, b'P', b'N', b'G']);

        assert_eq!(request.model, "gemma3:12b");
        assert!(!request.stream);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "read");
        assert_eq!(request.messages[0].images, vec!["iVBORw==".to_string()]);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OllamaClient::new(
            "http://gpu-box:11434/".to_string(),
            "gemma3:12b".to_string(),
            Duration::from_secs(1),
        );
        assert_eq!(client.base_url(), "http://gpu-box:11434");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) is closed on test machines
        let client = OllamaClient::new(
            "http://127.0.0.1:9".to_string(),
            "gemma3:12b".to_string(),
            Duration::from_secs(5),
        );

        let err = client.chat("read", b"img").await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_) | GatewayError::Timeout(_)));
    }
}
