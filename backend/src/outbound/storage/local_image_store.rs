//! Filesystem-backed `ImageStore` adapter.
//!
//! Files land under `<root>/<folder>/<uuid>.<ext>` and are served by the
//! static file service mounted at `/uploads`. The storage key recorded on the
//! listing is `<folder>/<uuid>`.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ListingImage;
use crate::domain::ports::{ImageStore, ImageStoreError, ImageUpload};

const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Where and how uploaded images are kept.
#[derive(Debug, Clone)]
pub struct LocalImageStoreConfig {
    /// Directory served under `/uploads`.
    pub root: PathBuf,
    /// Sub-folder grouping this deployment's images.
    pub folder: String,
    /// Externally reachable origin, e.g. `http://localhost:8080`.
    pub public_base_url: String,
    /// Largest accepted upload in bytes.
    pub max_bytes: usize,
}

/// Stores uploads on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    directory: PathBuf,
    folder: String,
    public_prefix: String,
    max_bytes: usize,
}

impl LocalImageStore {
    /// Create the upload directory if needed and return the store.
    ///
    /// # Errors
    ///
    /// Returns [`ImageStoreError::Storage`] when the directory cannot be
    /// created.
    pub async fn new(config: LocalImageStoreConfig) -> Result<Self, ImageStoreError> {
        let directory = config.root.join(&config.folder);
        fs::create_dir_all(&directory).await.map_err(|err| {
            ImageStoreError::storage(format!(
                "failed to create upload directory '{}': {err}",
                directory.display()
            ))
        })?;
        info!(path = %directory.display(), "image store initialised");

        let base = config.public_base_url.trim_end_matches('/');
        Ok(Self {
            public_prefix: format!("{base}/uploads/{}", config.folder),
            directory,
            folder: config.folder,
            max_bytes: config.max_bytes,
        })
    }
}

/// Pick the file extension from the client file name, then the MIME type.
fn extension_of(upload: &ImageUpload) -> Option<String> {
    let from_name = upload
        .original_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    from_name.or_else(|| {
        upload
            .content_type
            .as_deref()
            .and_then(|mime| mime.strip_prefix("image/"))
            .map(str::to_ascii_lowercase)
    })
}

fn validate(upload: &ImageUpload, max_bytes: usize) -> Result<String, ImageStoreError> {
    if upload.bytes.is_empty() {
        return Err(ImageStoreError::empty());
    }
    if upload.bytes.len() > max_bytes {
        return Err(ImageStoreError::too_large(max_bytes));
    }
    let extension = extension_of(upload).unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ImageStoreError::unsupported_format(if extension.is_empty() {
            "none".to_owned()
        } else {
            extension
        }));
    }
    Ok(extension)
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<ListingImage, ImageStoreError> {
        let extension = validate(&upload, self.max_bytes)?;
        let id = Uuid::new_v4();
        let file_name = format!("{id}.{extension}");
        let path = self.directory.join(&file_name);

        fs::write(&path, &upload.bytes).await.map_err(|err| {
            ImageStoreError::storage(format!("failed to write {}: {err}", path.display()))
        })?;
        debug!(%id, size = upload.bytes.len(), "stored listing image");

        Ok(ListingImage {
            url: format!("{}/{file_name}", self.public_prefix),
            filename: format!("{}/{id}", self.folder),
        })
    }
}
