// src/integrations/upload.rs
//
// Replacement upload service.
//
// Uploads a produced asset under the routed channel identity and returns the
// public URL that the queue row will carry. Credential material resolution
// is the endpoint's concern; this client only forwards the handle.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{CredentialHandle, Visibility};
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadService: Send + Sync {
    /// Upload an asset and return its public URL.
    async fn upload(
        &self,
        asset: PathBuf,
        title: String,
        credential: CredentialHandle,
        visibility: Visibility,
    ) -> AppResult<String>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// HTTP multipart upload client.
pub struct HttpUploadService {
    endpoint: String,
    http_client: Client,
}

impl HttpUploadService {
    pub fn new(endpoint: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            http_client,
        }
    }
}

#[async_trait]
impl UploadService for HttpUploadService {
    async fn upload(
        &self,
        asset: PathBuf,
        title: String,
        credential: CredentialHandle,
        visibility: Visibility,
    ) -> AppResult<String> {
        let bytes = tokio::fs::read(&asset)
            .await
            .map_err(|e| AppError::external("upload", e))?;

        let file_name = asset
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "replacement.mp4".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("video/mp4")
            .map_err(|e| AppError::external("upload", e))?;

        let form = reqwest::multipart::Form::new()
            .text("title", title)
            .text("visibility", visibility.to_string())
            .part("media", part);

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(credential.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::external("upload", e))?;

        if !response.status().is_success() {
            return Err(AppError::external(
                "upload",
                format!("endpoint returned status {}", response.status()),
            ));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::external("upload", e))?;

        Ok(parsed.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let service = HttpUploadService::new("https://upload.example/videos".to_string());
        assert_eq!(service.endpoint, "https://upload.example/videos");
    }

    #[tokio::test]
    async fn test_missing_asset_is_upload_error() {
        let service = HttpUploadService::new("https://upload.example/videos".to_string());
        let err = service
            .upload(
                PathBuf::from("/nonexistent/replacement.mp4"),
                "title".to_string(),
                CredentialHandle("token_NB".to_string()),
                Visibility::Unlisted,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalService { .. }));
    }
}
