//! Port abstraction for listing persistence.
//!
//! Review identifiers attached to a listing are always derived from the
//! reviews table, never cached on the listing row.
use async_trait::async_trait;

use crate::domain::{Listing, ListingDetail, ListingId, ListingSummary};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by listing repository adapters.
    pub enum ListingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "listing repository query failed: {message}",
        /// The listing row disappeared between load and write.
        NotFound { listing_id: ListingId } => "listing {listing_id} not found",
    }
}

/// Storage for listings and the read models derived from them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Every listing, newest first, with owner username and review ids.
    async fn list_summaries(&self) -> Result<Vec<ListingSummary>, ListingPersistenceError>;

    /// Load a bare listing for authorization and mutation.
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError>;

    /// Load a listing with owner profile and reviews (newest first).
    async fn find_detail(
        &self,
        id: &ListingId,
    ) -> Result<Option<ListingDetail>, ListingPersistenceError>;

    /// Persist a freshly created listing.
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError>;

    /// Persist the mutable columns of an existing listing.
    ///
    /// The owner column is never written.
    async fn update(&self, listing: &Listing) -> Result<(), ListingPersistenceError>;

    /// Delete a listing together with every review referencing it, atomically.
    ///
    /// Returns the number of reviews removed.
    async fn delete_with_reviews(&self, id: &ListingId) -> Result<usize, ListingPersistenceError>;
}
