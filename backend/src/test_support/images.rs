//! Image store double that records uploads instead of writing files.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ListingImage;
use crate::domain::ports::{ImageStore, ImageStoreError, ImageUpload};

use super::lock;

/// Accepts every non-empty upload and remembers it.
#[derive(Default)]
pub struct RecordingImageStore {
    uploads: Mutex<Vec<ImageUpload>>,
}

impl RecordingImageStore {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads received so far.
    #[must_use]
    pub fn uploads(&self) -> Vec<ImageUpload> {
        lock(&self.uploads).clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<ListingImage, ImageStoreError> {
        if upload.bytes.is_empty() {
            return Err(ImageStoreError::empty());
        }
        let key = format!("WanderLust_DEV/{}.png", Uuid::new_v4());
        lock(&self.uploads).push(upload);
        Ok(ListingImage {
            url: format!("https://images.test/{key}"),
            filename: key,
        })
    }
}
