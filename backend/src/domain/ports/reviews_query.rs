//! Driving port for review reads.
use async_trait::async_trait;

use crate::domain::{Error, ListingId, ReviewView};

/// Read-side review operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewsQuery: Send + Sync {
    /// Reviews of a listing, newest first. Unknown listings yield an empty list.
    async fn list_for_listing(&self, listing_id: &ListingId) -> Result<Vec<ReviewView>, Error>;
}
