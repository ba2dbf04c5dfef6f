//! Review lifecycle scoped to a parent listing.
//!
//! One review per (author, listing). The pre-insert check gives the friendly
//! message; the storage constraint closes the race between two requests.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::authorization::{Action, authorize};
use crate::domain::ports::{
    ListingPersistenceError, ListingRepository, ReviewPersistenceError, ReviewRepository,
    ReviewsCommand, ReviewsQuery,
};
use crate::domain::{
    Error, ListingId, Review, ReviewDraft, ReviewId, ReviewPatch, ReviewView, UserId,
};

const LISTING_NOT_FOUND: &str = "Listing not found";
const REVIEW_NOT_FOUND: &str = "Review not found";
const ALREADY_REVIEWED: &str = "You have already reviewed this listing";

/// Domain service implementing the review driving ports.
#[derive(Clone)]
pub struct ReviewService<R, L> {
    reviews: Arc<R>,
    listings: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<R, L> ReviewService<R, L> {
    /// Create a new review service.
    pub fn new(reviews: Arc<R>, listings: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reviews,
            listings,
            clock,
        }
    }
}

impl<R, L> ReviewService<R, L>
where
    R: ReviewRepository,
    L: ListingRepository,
{
    async fn ensure_listing(&self, listing_id: &ListingId) -> Result<(), Error> {
        let listing = self
            .listings
            .find_by_id(listing_id)
            .await
            .map_err(map_listing_error)?;
        match listing {
            Some(_) => Ok(()),
            None => Err(listing_not_found(listing_id)),
        }
    }

    async fn load(&self, id: &ReviewId) -> Result<Review, Error> {
        self.reviews
            .find_by_id(id)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| review_not_found(id))
    }

    async fn load_view(&self, id: &ReviewId) -> Result<ReviewView, Error> {
        self.reviews
            .find_view(id)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| review_not_found(id))
    }
}

#[async_trait]
impl<R, L> ReviewsQuery for ReviewService<R, L>
where
    R: ReviewRepository,
    L: ListingRepository,
{
    async fn list_for_listing(&self, listing_id: &ListingId) -> Result<Vec<ReviewView>, Error> {
        self.reviews
            .list_for_listing(listing_id)
            .await
            .map_err(map_review_error)
    }
}

#[async_trait]
impl<R, L> ReviewsCommand for ReviewService<R, L>
where
    R: ReviewRepository,
    L: ListingRepository,
{
    async fn create(
        &self,
        principal: &UserId,
        listing_id: &ListingId,
        draft: ReviewDraft,
    ) -> Result<ReviewView, Error> {
        self.ensure_listing(listing_id).await?;

        let already_reviewed = self
            .reviews
            .exists_for_author(principal, listing_id)
            .await
            .map_err(map_review_error)?;
        if already_reviewed {
            return Err(Error::conflict(ALREADY_REVIEWED));
        }

        let review = Review::create(draft, *principal, *listing_id, self.clock.utc());
        self.reviews
            .insert(&review)
            .await
            .map_err(map_review_error)?;
        info!(review_id = %review.id(), listing_id = %listing_id, author = %principal, "review created");

        self.load_view(review.id()).await
    }

    async fn update(
        &self,
        principal: &UserId,
        review_id: &ReviewId,
        patch: ReviewPatch,
    ) -> Result<ReviewView, Error> {
        let mut review = self.load(review_id).await?;
        authorize(principal, &review, Action::Update)?;

        review.apply(patch, self.clock.utc());
        self.reviews
            .update(&review)
            .await
            .map_err(map_review_error)?;
        info!(review_id = %review_id, "review updated");

        self.load_view(review_id).await
    }

    async fn delete(&self, principal: &UserId, review_id: &ReviewId) -> Result<(), Error> {
        let review = self.load(review_id).await?;
        authorize(principal, &review, Action::Delete)?;

        if !self
            .reviews
            .delete(review_id)
            .await
            .map_err(map_review_error)?
        {
            return Err(review_not_found(review_id));
        }
        info!(review_id = %review_id, "review deleted");
        Ok(())
    }
}

fn listing_not_found(id: &ListingId) -> Error {
    Error::not_found(LISTING_NOT_FOUND).with_details(json!({ "listingId": id.to_string() }))
}

fn review_not_found(id: &ReviewId) -> Error {
    Error::not_found(REVIEW_NOT_FOUND).with_details(json!({ "reviewId": id.to_string() }))
}

fn map_review_error(error: ReviewPersistenceError) -> Error {
    match error {
        ReviewPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewPersistenceError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewPersistenceError::Duplicate { .. } => Error::conflict(ALREADY_REVIEWED),
        ReviewPersistenceError::ListingMissing { listing_id } => listing_not_found(&listing_id),
        ReviewPersistenceError::NotFound { review_id } => review_not_found(&review_id),
    }
}

fn map_listing_error(error: ListingPersistenceError) -> Error {
    match error {
        ListingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("listing repository unavailable: {message}"))
        }
        ListingPersistenceError::Query { message } => {
            Error::internal(format!("listing repository error: {message}"))
        }
        ListingPersistenceError::NotFound { listing_id } => listing_not_found(&listing_id),
    }
}
