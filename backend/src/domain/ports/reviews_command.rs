//! Driving port for review mutations.
use async_trait::async_trait;

use crate::domain::{Error, ListingId, ReviewDraft, ReviewId, ReviewPatch, ReviewView, UserId};

/// Write-side review operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Review a listing.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for unknown listings and `conflict` when the
    /// principal already reviewed it.
    async fn create(
        &self,
        principal: &UserId,
        listing_id: &ListingId,
        draft: ReviewDraft,
    ) -> Result<ReviewView, Error>;

    /// Apply a partial update to the principal's own review.
    async fn update(
        &self,
        principal: &UserId,
        review_id: &ReviewId,
        patch: ReviewPatch,
    ) -> Result<ReviewView, Error>;

    /// Delete the principal's own review.
    async fn delete(&self, principal: &UserId, review_id: &ReviewId) -> Result<(), Error>;
}
