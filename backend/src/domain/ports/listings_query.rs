//! Driving port for listing reads.
use async_trait::async_trait;

use crate::domain::{Error, ListingDetail, ListingId, ListingSummary};

/// Read-side listing operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsQuery: Send + Sync {
    /// All listings, newest first.
    async fn list(&self) -> Result<Vec<ListingSummary>, Error>;

    /// One listing with owner profile and reviews.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no listing has this identifier.
    async fn get(&self, id: &ListingId) -> Result<ListingDetail, Error>;
}
