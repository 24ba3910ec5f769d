use async_trait::async_trait;

use crate::error::GatewayError;

/// A model server able to read text out of an image.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send one instruction plus one image, return the generated text.
    async fn chat(&self, instruction: &str, image: &[u8]) -> Result<String, GatewayError>;

    /// Cheap reachability probe.
    async fn health(&self) -> Result<(), GatewayError>;
}
