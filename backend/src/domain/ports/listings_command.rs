//! Driving port for listing mutations.
use async_trait::async_trait;

use crate::domain::{Error, ListingDetail, ListingDraft, ListingId, ListingPatch, UserId};

use super::ImageUpload;

/// Request to create a listing.
#[derive(Debug, Clone)]
pub struct CreateListingRequest {
    /// The authenticated principal; becomes the owner.
    pub principal: UserId,
    /// Validated listing fields.
    pub draft: ListingDraft,
    /// Uploaded image file, preferred over any body image.
    pub upload: Option<ImageUpload>,
}

/// Request to update a listing.
#[derive(Debug, Clone)]
pub struct UpdateListingRequest {
    /// The authenticated principal; must own the listing.
    pub principal: UserId,
    /// Listing to update.
    pub listing_id: ListingId,
    /// Fields to overwrite.
    pub patch: ListingPatch,
    /// Replacement image file.
    pub upload: Option<ImageUpload>,
}

/// Write-side listing operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsCommand: Send + Sync {
    /// Create a listing owned by the principal.
    async fn create(&self, request: CreateListingRequest) -> Result<ListingDetail, Error>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for unknown listings and `forbidden` when the
    /// principal is not the owner; the listing is left untouched.
    async fn update(&self, request: UpdateListingRequest) -> Result<ListingDetail, Error>;

    /// Delete a listing and all of its reviews.
    async fn delete(&self, principal: &UserId, listing_id: &ListingId) -> Result<(), Error>;
}
