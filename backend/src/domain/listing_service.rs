//! Listing lifecycle: create, read, update and cascade delete.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::authorization::{Action, authorize};
use crate::domain::ports::{
    CreateListingRequest, ImageStore, ImageStoreError, ImageUpload, ListingPersistenceError,
    ListingRepository, ListingsCommand, ListingsQuery, UpdateListingRequest,
};
use crate::domain::{Error, Listing, ListingDetail, ListingId, ListingImage, ListingSummary, UserId};

const LISTING_NOT_FOUND: &str = "Listing not found";

/// Domain service implementing the listing driving ports.
#[derive(Clone)]
pub struct ListingService<L, I> {
    listings: Arc<L>,
    images: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<L, I> ListingService<L, I> {
    /// Create a new listing service.
    pub fn new(listings: Arc<L>, images: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            listings,
            images,
            clock,
        }
    }
}

impl<L, I> ListingService<L, I>
where
    L: ListingRepository,
    I: ImageStore,
{
    async fn store_upload(&self, upload: Option<ImageUpload>) -> Result<Option<ListingImage>, Error> {
        match upload {
            Some(upload) => self
                .images
                .store(upload)
                .await
                .map(Some)
                .map_err(map_image_error),
            None => Ok(None),
        }
    }

    async fn load(&self, id: &ListingId) -> Result<Listing, Error> {
        self.listings
            .find_by_id(id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn load_detail(&self, id: &ListingId) -> Result<ListingDetail, Error> {
        self.listings
            .find_detail(id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl<L, I> ListingsQuery for ListingService<L, I>
where
    L: ListingRepository,
    I: ImageStore,
{
    async fn list(&self) -> Result<Vec<ListingSummary>, Error> {
        self.listings
            .list_summaries()
            .await
            .map_err(map_listing_error)
    }

    async fn get(&self, id: &ListingId) -> Result<ListingDetail, Error> {
        self.load_detail(id).await
    }
}

#[async_trait]
impl<L, I> ListingsCommand for ListingService<L, I>
where
    L: ListingRepository,
    I: ImageStore,
{
    async fn create(&self, request: CreateListingRequest) -> Result<ListingDetail, Error> {
        let CreateListingRequest {
            principal,
            mut draft,
            upload,
        } = request;

        let image = match self.store_upload(upload).await? {
            Some(stored) => stored,
            None => draft.image.take().unwrap_or_default(),
        };
        let listing = Listing::create(draft, principal, image, self.clock.utc());
        self.listings
            .insert(&listing)
            .await
            .map_err(map_listing_error)?;
        info!(listing_id = %listing.id(), owner = %principal, "listing created");

        self.load_detail(listing.id()).await
    }

    async fn update(&self, request: UpdateListingRequest) -> Result<ListingDetail, Error> {
        let UpdateListingRequest {
            principal,
            listing_id,
            mut patch,
            upload,
        } = request;

        let mut listing = self.load(&listing_id).await?;
        authorize(&principal, &listing, Action::Update)?;

        // The previous asset stays in the store; only the reference changes.
        if let Some(stored) = self.store_upload(upload).await? {
            patch.image = Some(stored);
        }
        listing.apply(patch, self.clock.utc());
        self.listings
            .update(&listing)
            .await
            .map_err(map_listing_error)?;
        info!(listing_id = %listing_id, "listing updated");

        self.load_detail(&listing_id).await
    }

    async fn delete(&self, principal: &UserId, listing_id: &ListingId) -> Result<(), Error> {
        let listing = self.load(listing_id).await?;
        authorize(principal, &listing, Action::Delete)?;

        let removed_reviews = self
            .listings
            .delete_with_reviews(listing_id)
            .await
            .map_err(map_listing_error)?;
        info!(listing_id = %listing_id, removed_reviews, "listing deleted");
        Ok(())
    }
}

fn not_found(id: &ListingId) -> Error {
    Error::not_found(LISTING_NOT_FOUND).with_details(json!({ "listingId": id.to_string() }))
}

fn map_listing_error(error: ListingPersistenceError) -> Error {
    match error {
        ListingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("listing repository unavailable: {message}"))
        }
        ListingPersistenceError::Query { message } => {
            Error::internal(format!("listing repository error: {message}"))
        }
        ListingPersistenceError::NotFound { listing_id } => not_found(&listing_id),
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    if error.is_client_error() {
        Error::invalid_request(format!("File upload error: {error}"))
    } else {
        Error::internal(error.to_string())
    }
}
