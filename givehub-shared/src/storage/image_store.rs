/// Image store contract and HTTP implementation
///
/// The Campaign Service uploads image files one at a time and waits for
/// every upload before persisting the campaign. Uploads are all-or-nothing:
/// the first failure aborts the whole campaign creation, and no partially
/// uploaded URL list is ever stored.
///
/// # Example
///
/// ```no_run
/// use givehub_shared::storage::{HttpImageStore, ImageStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = HttpImageStore::new("https://images.example.com/upload");
/// let url = store.upload("banner.png", vec![0u8; 16]).await?;
/// assert!(url.starts_with("https://"));
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Error type for image store operations
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    /// Upload request failed (network, timeout, non-success status)
    #[error("Image upload failed: {0}")]
    UploadFailed(String),

    /// The store accepted the upload but returned an unusable response
    #[error("Invalid image store response: {0}")]
    InvalidResponse(String),
}

/// Contract for the external image object store
///
/// Implementations persist raw image bytes and return the public URL the
/// hosted image is served from. Returned URLs are always non-empty.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Uploads one image and returns its hosted URL
    ///
    /// # Errors
    ///
    /// Returns an error if the upload does not complete or the store's
    /// response carries no URL
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ImageStoreError>;
}

/// Response body returned by the upload endpoint
#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// Public URL of the hosted image
    url: String,
}

/// HTTP-backed image store client
///
/// Posts each image as a multipart form to the configured upload endpoint
/// and reads the hosted URL from the JSON response (`{"url": "..."}`).
#[derive(Debug, Clone)]
pub struct HttpImageStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpImageStore {
    /// Creates a client for the given upload endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ImageStoreError> {
        debug!(filename, size = bytes.len(), "Uploading image");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageStoreError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageStoreError::UploadFailed(format!(
                "Upload endpoint returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageStoreError::InvalidResponse(e.to_string()))?;

        if body.url.is_empty() {
            return Err(ImageStoreError::InvalidResponse(
                "Upload endpoint returned an empty URL".to_string(),
            ));
        }

        debug!(filename, url = %body.url, "Image uploaded");
        Ok(body.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ImageStoreError::UploadFailed("connection refused".to_string());
        assert_eq!(err.to_string(), "Image upload failed: connection refused");

        let err = ImageStoreError::InvalidResponse("no url field".to_string());
        assert_eq!(err.to_string(), "Invalid image store response: no url field");
    }
}
