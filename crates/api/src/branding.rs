use anyhow::{Context, Result};
use axum::body::Bytes;
use intake::UploadedImage;

/// Read the configured header logo and turn it into an inline data URL.
pub async fn load_logo(path: &str) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read logo: {}", path))?;
    logo_data_url(path, Bytes::from(bytes))
}

/// The logo goes through the same checks as an upload.
pub fn logo_data_url(path: &str, bytes: Bytes) -> Result<String> {
    let logo = UploadedImage::accept(path, bytes)
        .with_context(|| format!("Logo is not a usable PNG or JPEG: {}", path))?;
    Ok(logo.preview_data_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake::testing::{sample_jpeg, sample_png};

    #[test]
    fn test_logo_becomes_data_url() {
        let url = logo_data_url("./gemma3.jpg", sample_jpeg(8, 8)).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,/9j/"));

        let url = logo_data_url("assets/logo.png", sample_png(2, 2)).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_unsupported_logo_rejected() {
        let err = logo_data_url("logo.gif", Bytes::from_static(b"GIF89a")).unwrap_err();
        assert!(err.to_string().contains("logo.gif"));
    }

    #[tokio::test]
    async fn test_missing_logo_file() {
        let err = load_logo("/nonexistent/gemma3.jpg").await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to read logo"));
    }
}
