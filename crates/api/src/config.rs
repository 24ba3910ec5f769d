use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    /// PNG or JPEG shown beside the page heading
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub max_sessions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "0.0.0.0:8501".to_string(),
                max_upload_bytes: 200 * 1024 * 1024,
                logo_path: None,
            },
            backend: BackendConfig {
                base_url: extract::DEFAULT_BASE_URL.to_string(),
                model: extract::DEFAULT_MODEL.to_string(),
                timeout_secs: extract::DEFAULT_TIMEOUT.as_secs(),
            },
            session: SessionConfig {
                max_sessions: 1000,
            },
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Defaults overridden by `OCR_*` / `OLLAMA_HOST` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("OCR_BIND_ADDR") {
            config.server.bind_addr = addr;
        }
        if let Some(bytes) = lookup("OCR_MAX_UPLOAD_BYTES") {
            config.server.max_upload_bytes = bytes
                .parse()
                .with_context(|| format!("OCR_MAX_UPLOAD_BYTES is not a number: {}", bytes))?;
        }
        if let Some(path) = lookup("OCR_LOGO_PATH") {
            config.server.logo_path = Some(path);
        }
        if let Some(host) = lookup("OLLAMA_HOST") {
            config.backend.base_url = normalize_host(&host);
        }
        if let Some(model) = lookup("OCR_MODEL") {
            config.backend.model = model;
        }
        if let Some(secs) = lookup("OCR_TIMEOUT_SECS") {
            config.backend.timeout_secs = secs
                .parse()
                .with_context(|| format!("OCR_TIMEOUT_SECS is not a number: {}", secs))?;
        }
        if let Some(max) = lookup("OCR_MAX_SESSIONS") {
            config.session.max_sessions = max
                .parse()
                .with_context(|| format!("OCR_MAX_SESSIONS is not a number: {}", max))?;
        }

        if config.backend.timeout_secs == 0 {
            anyhow::bail!("OCR_TIMEOUT_SECS must be greater than zero");
        }

        Ok(config)
    }
}

/// `OLLAMA_HOST` is commonly set without a scheme, e.g. `gpu-box:11434`.
fn normalize_host(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}
