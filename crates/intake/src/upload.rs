use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::kind::ImageKind;

#[derive(Debug, Error, PartialEq)]
pub enum IntakeError {
    #[error("no file content was uploaded")]
    Empty,
    #[error("file has no extension")]
    MissingExtension,
    #[error("unsupported file type: .{0}")]
    UnsupportedExtension(String),
    #[error("file could not be decoded as an image: {0}")]
    Undecodable(String),
}

/// An accepted upload. The payload is kept exactly as received.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    file_name: String,
    kind: ImageKind,
    bytes: Bytes,
    width: u32,
    height: u32,
}

impl UploadedImage {
    /// Validate an upload by extension and decodability.
    pub fn accept(file_name: impl Into<String>, bytes: Bytes) -> Result<Self, IntakeError> {
        let file_name = file_name.into();

        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or(IntakeError::MissingExtension)?;

        let kind = ImageKind::from_extension(extension)
            .ok_or_else(|| IntakeError::UnsupportedExtension(extension.to_lowercase()))?;

        if bytes.is_empty() {
            return Err(IntakeError::Empty);
        }

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| IntakeError::Undecodable(e.to_string()))?;

        debug!(
            file = %file_name,
            width = decoded.width(),
            height = decoded.height(),
            "Decoded uploaded image"
        );

        Ok(Self {
            file_name,
            kind,
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// Raw payload, byte-identical to the upload
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn preview_data_url(&self) -> String {
        self.kind.data_url(&self.bytes)
    }

    /// Short stable digest of the payload, for log correlation
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}
