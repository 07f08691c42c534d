/// In-memory image stores for testing and demos
///
/// Two implementations of [`ImageStore`](super::ImageStore):
///
/// - [`MemoryImageStore`]: accepts every upload and hands out deterministic
///   fake URLs; remembers what was uploaded so tests can assert on it
/// - [`FailingImageStore`]: rejects every upload; used to verify the
///   all-or-nothing campaign creation policy
///
/// # Example
///
/// ```
/// use givehub_shared::storage::{ImageStore, MemoryImageStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryImageStore::new();
/// let url = store.upload("banner.png", vec![1, 2, 3]).await?;
/// assert_eq!(url, "https://images.test/banner.png");
/// assert_eq!(store.uploaded_filenames(), vec!["banner.png"]);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use std::sync::Mutex;

use super::image_store::{ImageStore, ImageStoreError};

/// Image store that keeps uploads in memory
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    uploads: Mutex<Vec<(String, usize)>>,
}

impl MemoryImageStore {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Filenames uploaded so far, in order
    pub fn uploaded_filenames(&self) -> Vec<String> {
        self.uploads
            .lock()
            .expect("uploads mutex poisoned")
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Number of uploads accepted so far
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().expect("uploads mutex poisoned").len()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ImageStoreError> {
        self.uploads
            .lock()
            .expect("uploads mutex poisoned")
            .push((filename.to_string(), bytes.len()));

        Ok(format!("https://images.test/{}", filename))
    }
}

/// Image store that fails every upload
#[derive(Debug, Default)]
pub struct FailingImageStore;

impl FailingImageStore {
    /// Creates a store that rejects everything
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageStore for FailingImageStore {
    async fn upload(&self, filename: &str, _bytes: Vec<u8>) -> Result<String, ImageStoreError> {
        Err(ImageStoreError::UploadFailed(format!(
            "Simulated upload failure for {}",
            filename
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_hands_out_urls() {
        let store = MemoryImageStore::new();

        let url = store.upload("a.png", vec![0u8; 4]).await.unwrap();
        assert_eq!(url, "https://images.test/a.png");

        let url = store.upload("b.jpg", vec![0u8; 8]).await.unwrap();
        assert_eq!(url, "https://images.test/b.jpg");

        assert_eq!(store.upload_count(), 2);
        assert_eq!(store.uploaded_filenames(), vec!["a.png", "b.jpg"]);
    }

    #[tokio::test]
    async fn test_failing_store_rejects_uploads() {
        let store = FailingImageStore::new();

        let result = store.upload("a.png", vec![0u8; 4]).await;
        assert!(matches!(result, Err(ImageStoreError::UploadFailed(_))));
    }
}
