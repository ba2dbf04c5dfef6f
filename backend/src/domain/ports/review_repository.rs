//! Port abstraction for review persistence.
use async_trait::async_trait;

use crate::domain::{ListingId, Review, ReviewId, ReviewView, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The author already reviewed this listing.
        Duplicate { author: UserId, listing_id: ListingId } =>
            "user {author} already reviewed listing {listing_id}",
        /// The referenced listing does not exist (or was deleted concurrently).
        ListingMissing { listing_id: ListingId } => "listing {listing_id} does not exist",
        /// The review was removed before the write landed.
        NotFound { review_id: ReviewId } => "review {review_id} not found",
    }
}

/// Storage for reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Reviews of one listing, newest first, with author usernames.
    async fn list_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<ReviewView>, ReviewPersistenceError>;

    /// Load a bare review for authorization and mutation.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError>;

    /// Load a review joined with its author.
    async fn find_view(&self, id: &ReviewId) -> Result<Option<ReviewView>, ReviewPersistenceError>;

    /// Whether `author` already reviewed `listing_id`.
    async fn exists_for_author(
        &self,
        author: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, ReviewPersistenceError>;

    /// Insert a new review.
    ///
    /// The (author, listing) pair is unique at the storage level; a second
    /// insert fails with [`ReviewPersistenceError::Duplicate`].
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// Persist the rating, comment and `updated_at` of an existing review.
    async fn update(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// Delete a review; returns whether a row was removed.
    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError>;
}
