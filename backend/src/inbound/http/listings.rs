//! Listing HTTP handlers.
//!
//! ```text
//! GET /api/listings
//! GET /api/listings/{id}
//! POST /api/listings            (multipart/form-data or JSON)
//! PUT /api/listings/{id}        (multipart/form-data or JSON)
//! DELETE /api/listings/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateListingRequest, UpdateListingRequest};
use crate::domain::{
    Listing, ListingDetail, ListingDraft, ListingId, ListingImage, ListingPatch, ListingSummary,
    ReviewId, UserProfile, UserSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Principal;
use crate::inbound::http::envelope::{Envelope, ErrorBody};
use crate::inbound::http::routes::api_not_found;
use crate::inbound::http::listing_form::{ListingForm, ListingPayload};
use crate::inbound::http::reviews::ReviewBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, validation_error};

const LISTING_ID: FieldName = FieldName::new("id");

/// Scalar listing fields shared by the summary and detail shapes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingFields {
    #[schema(value_type = String)]
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub country: String,
    #[schema(minimum = 0)]
    pub price: f64,
    pub image: ListingImage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Listing> for ListingFields {
    fn from(listing: &Listing) -> Self {
        Self {
            id: *listing.id(),
            title: listing.title().to_owned(),
            description: listing.description().to_owned(),
            location: listing.location().to_owned(),
            country: listing.country().to_owned(),
            price: listing.price().value(),
            image: listing.image().clone(),
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        }
    }
}

/// Listing as it appears in the index: owner handle and review ids only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingSummaryBody {
    #[serde(flatten)]
    pub fields: ListingFields,
    pub owner: UserSummary,
    #[schema(value_type = Vec<String>)]
    pub reviews: Vec<ReviewId>,
}

impl From<ListingSummary> for ListingSummaryBody {
    fn from(summary: ListingSummary) -> Self {
        Self {
            fields: ListingFields::from(&summary.listing),
            owner: summary.owner,
            reviews: summary.review_ids,
        }
    }
}

/// Fully populated listing: owner profile and every review.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingDetailBody {
    #[serde(flatten)]
    pub fields: ListingFields,
    pub owner: UserProfile,
    pub reviews: Vec<ReviewBody>,
}

impl From<ListingDetail> for ListingDetailBody {
    fn from(detail: ListingDetail) -> Self {
        Self {
            fields: ListingFields::from(&detail.listing),
            owner: detail.owner,
            reviews: detail.reviews.into_iter().map(ReviewBody::from).collect(),
        }
    }
}

/// `data` of the listing index.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingsData {
    pub listings: Vec<ListingSummaryBody>,
}

/// `data` of a single-listing response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingData {
    pub listing: ListingDetailBody,
}

fn listing_data(detail: ListingDetail) -> ListingData {
    ListingData {
        listing: detail.into(),
    }
}

/// List every listing, newest first.
#[utoipa::path(
    get,
    path = "/api/listings",
    responses(
        (status = 200, description = "All listings", body = Envelope<ListingsData>),
        (status = 503, description = "Database unavailable", body = ErrorBody)
    ),
    tags = ["listings"],
    operation_id = "listListings",
    security([])
)]
#[get("")]
pub async fn list_listings(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let listings: Vec<ListingSummaryBody> = state
        .listings_query
        .list()
        .await?
        .into_iter()
        .map(ListingSummaryBody::from)
        .collect();
    let count = listings.len();
    Ok(Envelope::data(ListingsData { listings }).with_count(count).ok())
}

/// Fetch one listing with its owner and reviews.
#[utoipa::path(
    get,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing", body = Envelope<ListingData>),
        (status = 400, description = "Invalid ID format", body = ErrorBody),
        (status = 404, description = "Listing not found", body = ErrorBody)
    ),
    tags = ["listings"],
    operation_id = "getListing",
    security([])
)]
#[get("/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: ListingId = parse_id(&path.into_inner(), LISTING_ID)?;
    let detail = state.listings_query.get(&id).await?;
    Ok(Envelope::data(listing_data(detail)).ok())
}

/// Publish a listing owned by the authenticated user.
///
/// Accepts `multipart/form-data` (with an optional `image` file part) or
/// JSON. Any `owner` field in the body is ignored.
#[utoipa::path(
    post,
    path = "/api/listings",
    request_body(content = ListingPayload, description = "Listing fields; multipart/form-data is also accepted"),
    responses(
        (status = 201, description = "Listing created", body = Envelope<ListingData>),
        (status = 400, description = "Validation or upload error", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody)
    ),
    tags = ["listings"],
    operation_id = "createListing",
    security(("bearer" = []))
)]
#[post("")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    principal: Principal,
    form: ListingForm,
) -> ApiResult<HttpResponse> {
    let ListingForm { fields, upload } = form;
    let draft = ListingDraft::try_from_input(fields).map_err(validation_error)?;
    let detail = state
        .listings
        .create(CreateListingRequest {
            principal: *principal.id(),
            draft,
            upload,
        })
        .await?;
    Ok(Envelope::with_message("Listing created successfully", listing_data(detail)).created())
}

/// Update a listing owned by the authenticated user.
///
/// Only the fields present in the body change.
#[utoipa::path(
    put,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    request_body(content = ListingPayload, description = "Fields to change; multipart/form-data is also accepted"),
    responses(
        (status = 200, description = "Listing updated", body = Envelope<ListingData>),
        (status = 400, description = "Validation error or invalid id", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Listing not found", body = ErrorBody)
    ),
    tags = ["listings"],
    operation_id = "updateListing",
    security(("bearer" = []))
)]
#[put("/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
    form: ListingForm,
) -> ApiResult<HttpResponse> {
    let listing_id: ListingId = parse_id(&path.into_inner(), LISTING_ID)?;
    let ListingForm { fields, upload } = form;
    let patch = ListingPatch::try_from_input(fields).map_err(validation_error)?;
    let detail = state
        .listings
        .update(UpdateListingRequest {
            principal: *principal.id(),
            listing_id,
            patch,
            upload,
        })
        .await?;
    Ok(Envelope::with_message("Listing updated successfully", listing_data(detail)).ok())
}

/// Delete a listing and every review of it.
#[utoipa::path(
    delete,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing deleted"),
        (status = 400, description = "Invalid ID format", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Listing not found", body = ErrorBody)
    ),
    tags = ["listings"],
    operation_id = "deleteListing",
    security(("bearer" = []))
)]
#[delete("/{id}")]
pub async fn delete_listing(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let listing_id: ListingId = parse_id(&path.into_inner(), LISTING_ID)?;
    state.listings.delete(principal.id(), &listing_id).await?;
    Ok(Envelope::<serde_json::Value>::message("Listing deleted successfully").ok())
}

/// Mount the listing routes under `/api/listings`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/listings")
            .service(list_listings)
            .service(get_listing)
            .service(create_listing)
            .service(update_listing)
            .service(delete_listing)
            .default_service(web::to(api_not_found)),
    );
}

#[cfg(test)]
mod tests;
