use base64::{Engine, engine::general_purpose::STANDARD};

/// Image formats the upload control accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

/// Extensions offered to the browser's file picker.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

impl ImageKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }

    pub fn data_url(&self, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(bytes))
    }

    /// Value for an `<input type="file" accept=...>` attribute
    pub fn accept_attribute() -> String {
        ACCEPTED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(",")
    }
}
