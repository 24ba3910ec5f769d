use std::time::Duration;
use thiserror::Error;

/// Every way an extraction call can fail. Surfaced to the user as a notice.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("no image data to send")]
    EmptyImage,
    #[error("model did not respond within {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("could not reach model backend: {0}")]
    Transport(String),
    #[error("model backend returned {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("unexpected response from model backend: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(timeout)
        } else if err.is_decode() {
            GatewayError::InvalidResponse(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}
