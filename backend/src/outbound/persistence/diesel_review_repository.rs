//! PostgreSQL-backed `ReviewRepository` adapter.
//!
//! The `(author_id, listing_id)` unique constraint is the final arbiter of
//! the one-review-per-listing rule; violations surface as
//! [`ReviewPersistenceError::Duplicate`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{ListingId, Review, ReviewId, ReviewView, UserId};

use super::diesel_helpers::{
    DieselFailure, REVIEWS_AUTHOR_LISTING_KEY, REVIEWS_LISTING_FKEY, classify_diesel_error,
    pool_error_message, warn_unmapped,
};
use super::diesel_listing_repository::{load_review_views, review_view};
use super::models::{NewReviewRow, ReviewChangeset, ReviewRow, SummaryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{reviews, users};

/// Diesel-backed implementation of the review repository port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewPersistenceError {
    ReviewPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> ReviewPersistenceError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => ReviewPersistenceError::connection(message),
        other => {
            if !matches!(other, DieselFailure::Query(_)) {
                warn_unmapped(&other, operation);
            }
            ReviewPersistenceError::query(other.into_message())
        }
    }
}

fn map_insert_error(error: diesel::result::Error, review: &Review) -> ReviewPersistenceError {
    let failure = classify_diesel_error(error, "insert review");
    if failure.is_unique(REVIEWS_AUTHOR_LISTING_KEY) {
        return ReviewPersistenceError::duplicate(*review.author(), *review.listing());
    }
    if failure.is_foreign_key(REVIEWS_LISTING_FKEY) {
        return ReviewPersistenceError::listing_missing(*review.listing());
    }
    match failure {
        DieselFailure::Connection(message) => ReviewPersistenceError::connection(message),
        other => {
            warn_unmapped(&other, "insert review");
            ReviewPersistenceError::query(other.into_message())
        }
    }
}

fn decode<T>(result: Result<T, String>) -> Result<T, ReviewPersistenceError> {
    result.map_err(ReviewPersistenceError::query)
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn list_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<ReviewView>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        load_review_views(&mut conn, &[*listing_id.as_uuid()])
            .await
            .map_err(|err| map_diesel_error(err, "list reviews"))?
            .into_iter()
            .map(|(review, author)| decode(review_view(review, author)))
            .collect()
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ReviewRow> = reviews::table
            .filter(reviews::id.eq(*id.as_uuid()))
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find review"))?;

        row.map(|row| decode(row.into_review())).transpose()
    }

    async fn find_view(&self, id: &ReviewId) -> Result<Option<ReviewView>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(ReviewRow, SummaryRow)> = reviews::table
            .inner_join(users::table)
            .filter(reviews::id.eq(*id.as_uuid()))
            .select((ReviewRow::as_select(), SummaryRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find review view"))?;

        row.map(|(review, author)| decode(review_view(review, author)))
            .transpose()
    }

    async fn exists_for_author(
        &self,
        author: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            reviews::table
                .filter(reviews::author_id.eq(*author.as_uuid()))
                .filter(reviews::listing_id.eq(*listing_id.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "check review exists"))
    }

    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(reviews::table)
            .values(&NewReviewRow::from(review))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, review))
    }

    async fn update(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(reviews::table.filter(reviews::id.eq(*review.id().as_uuid())))
            .set(&ReviewChangeset::from(review))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update review"))?;

        if updated == 0 {
            return Err(ReviewPersistenceError::not_found(*review.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(reviews::table.filter(reviews::id.eq(*id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete review"))?;
        Ok(removed > 0)
    }
}
