//! Port for durable image storage.
//!
//! Adapters receive the uploaded bytes and answer with the public URL and the
//! storage key that get stored verbatim on the listing.
use async_trait::async_trait;

use crate::domain::ListingImage;

use super::define_port_error;

define_port_error! {
    /// Errors raised while storing an uploaded image.
    pub enum ImageStoreError {
        /// The file type is not an accepted image format.
        UnsupportedFormat { extension: String } =>
            "Only png, jpg and jpeg files are allowed (got {extension})",
        /// The upload exceeds the configured size limit.
        TooLarge { limit: usize } => "File too large (limit {limit} bytes)",
        /// The upload carried no bytes.
        Empty => "Uploaded file is empty",
        /// Writing to the backing store failed.
        Storage { message: String } => "image storage failed: {message}",
    }
}

impl ImageStoreError {
    /// Whether the failure is caused by the upload itself rather than the store.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage { .. })
    }
}

/// An image file received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent by the client, if any.
    pub original_name: Option<String>,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

/// Durable storage for listing images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the upload and return its public reference.
    async fn store(&self, upload: ImageUpload) -> Result<ListingImage, ImageStoreError>;
}
