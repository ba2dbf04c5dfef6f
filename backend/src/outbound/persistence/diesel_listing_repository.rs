//! PostgreSQL-backed `ListingRepository` adapter.
//!
//! Review identifiers are aggregated from the `reviews` table on every read;
//! listings carry no cached review column.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ListingPersistenceError, ListingRepository};
use crate::domain::{
    Listing, ListingDetail, ListingId, ListingSummary, ReviewId, ReviewView,
};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{
    ListingChangeset, ListingRow, NewListingRow, ProfileRow, ReviewRow, SummaryRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{listings, reviews, users};

/// Diesel-backed implementation of the listing repository port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ListingPersistenceError {
    ListingPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> ListingPersistenceError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => ListingPersistenceError::connection(message),
        other => ListingPersistenceError::query(other.into_message()),
    }
}

fn decode<T>(result: Result<T, String>) -> Result<T, ListingPersistenceError> {
    result.map_err(ListingPersistenceError::query)
}

/// Load reviews for the given listings joined with their authors, newest first.
pub(crate) async fn load_review_views(
    conn: &mut AsyncPgConnection,
    listing_ids: &[Uuid],
) -> Result<Vec<(ReviewRow, SummaryRow)>, diesel::result::Error> {
    reviews::table
        .inner_join(users::table)
        .filter(reviews::listing_id.eq_any(listing_ids))
        .order_by((reviews::created_at.desc(), reviews::id.desc()))
        .select((ReviewRow::as_select(), SummaryRow::as_select()))
        .load(conn)
        .await
}

/// Assemble a review view from joined rows.
pub(crate) fn review_view(review: ReviewRow, author: SummaryRow) -> Result<ReviewView, String> {
    Ok(ReviewView {
        review: review.into_review()?,
        author: author.into_summary()?,
    })
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn list_summaries(&self) -> Result<Vec<ListingSummary>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(ListingRow, SummaryRow)> = listings::table
            .inner_join(users::table)
            .order_by((listings::created_at.desc(), listings::id.desc()))
            .select((ListingRow::as_select(), SummaryRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list listings"))?;

        let listing_ids: Vec<Uuid> = rows.iter().map(|(listing, _)| listing.id).collect();
        let review_refs: Vec<(Uuid, Uuid)> = reviews::table
            .filter(reviews::listing_id.eq_any(&listing_ids))
            .order_by((reviews::created_at.desc(), reviews::id.desc()))
            .select((reviews::listing_id, reviews::id))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list review ids"))?;

        let mut review_ids: HashMap<Uuid, Vec<ReviewId>> = HashMap::new();
        for (listing_id, review_id) in review_refs {
            review_ids
                .entry(listing_id)
                .or_default()
                .push(ReviewId::from_uuid(review_id));
        }

        rows.into_iter()
            .map(|(listing, owner)| {
                let ids = review_ids.remove(&listing.id).unwrap_or_default();
                Ok(ListingSummary {
                    listing: decode(listing.into_listing())?,
                    owner: decode(owner.into_summary())?,
                    review_ids: ids,
                })
            })
            .collect()
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ListingRow> = listings::table
            .filter(listings::id.eq(*id.as_uuid()))
            .select(ListingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find listing"))?;

        row.map(|row| decode(row.into_listing())).transpose()
    }

    async fn find_detail(
        &self,
        id: &ListingId,
    ) -> Result<Option<ListingDetail>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(ListingRow, ProfileRow)> = listings::table
            .inner_join(users::table)
            .filter(listings::id.eq(*id.as_uuid()))
            .select((ListingRow::as_select(), ProfileRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find listing detail"))?;
        let Some((listing, owner)) = row else {
            return Ok(None);
        };

        let review_rows = load_review_views(&mut conn, &[listing.id])
            .await
            .map_err(|err| map_diesel_error(err, "load listing reviews"))?;
        let reviews = review_rows
            .into_iter()
            .map(|(review, author)| decode(review_view(review, author)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(ListingDetail {
            listing: decode(listing.into_listing())?,
            owner: decode(owner.into_profile())?,
            reviews,
        }))
    }

    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(listings::table)
            .values(&NewListingRow::from(listing))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, "insert listing"))
    }

    async fn update(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(listings::table.filter(listings::id.eq(*listing.id().as_uuid())))
            .set(&ListingChangeset::from(listing))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update listing"))?;

        if updated == 0 {
            return Err(ListingPersistenceError::not_found(*listing.id()));
        }
        Ok(())
    }

    async fn delete_with_reviews(&self, id: &ListingId) -> Result<usize, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let listing_id = *id.as_uuid();

        // Reviews go first so the cascade holds even without the FK clause.
        let (removed_reviews, removed_listings) = conn
            .transaction(|conn| {
                async move {
                    let removed_reviews = diesel::delete(
                        reviews::table.filter(reviews::listing_id.eq(listing_id)),
                    )
                    .execute(conn)
                    .await?;
                    let removed_listings =
                        diesel::delete(listings::table.filter(listings::id.eq(listing_id)))
                            .execute(conn)
                            .await?;
                    Ok::<_, diesel::result::Error>((removed_reviews, removed_listings))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, "delete listing"))?;

        if removed_listings == 0 {
            return Err(ListingPersistenceError::not_found(*id));
        }
        Ok(removed_reviews)
    }
}
