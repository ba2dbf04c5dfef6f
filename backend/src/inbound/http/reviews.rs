//! Review HTTP handlers.
//!
//! ```text
//! GET /api/reviews/listing/{listingId}
//! POST /api/reviews/listing/{listingId} {"rating":5,"comment":"Great stay"}
//! PUT /api/reviews/{reviewId} {"comment":"Even better"}
//! DELETE /api/reviews/{reviewId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ListingId, RatingInput, ReviewDraft, ReviewFieldsInput, ReviewId, ReviewPatch, ReviewView,
    UserSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Principal;
use crate::inbound::http::envelope::{Envelope, ErrorBody};
use crate::inbound::http::routes::api_not_found;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, validation_error};

const LISTING_ID: FieldName = FieldName::new("listingId");
const REVIEW_ID: FieldName = FieldName::new("reviewId");

/// Rating as sent by clients: a number or numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Number(f64),
    Text(String),
}

impl From<RatingValue> for RatingInput {
    fn from(value: RatingValue) -> Self {
        match value {
            RatingValue::Number(number) => Self::Number(number),
            RatingValue::Text(text) => Self::Text(text),
        }
    }
}

/// Body for review create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ReviewRequest {
    #[schema(value_type = Option<u8>, example = 5)]
    pub rating: Option<RatingValue>,
    #[schema(example = "Great stay")]
    pub comment: Option<String>,
}

impl From<ReviewRequest> for ReviewFieldsInput {
    fn from(value: ReviewRequest) -> Self {
        Self {
            rating: value.rating.map(RatingInput::from),
            comment: value.comment,
        }
    }
}

/// A review with its author's public profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody {
    #[schema(value_type = String)]
    pub id: ReviewId,
    pub comment: String,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: u8,
    pub author: UserSummary,
    #[schema(value_type = String)]
    pub listing: ListingId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewView> for ReviewBody {
    fn from(view: ReviewView) -> Self {
        let ReviewView { review, author } = view;
        Self {
            id: *review.id(),
            comment: review.comment().to_owned(),
            rating: review.rating().value(),
            author,
            listing: *review.listing(),
            created_at: review.created_at(),
            updated_at: review.updated_at(),
        }
    }
}

/// `data` of a review collection response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewsData {
    pub reviews: Vec<ReviewBody>,
}

/// `data` of a single-review response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewData {
    pub review: ReviewBody,
}

/// List a listing's reviews, newest first.
#[utoipa::path(
    get,
    path = "/api/reviews/listing/{listingId}",
    params(("listingId" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Reviews", body = Envelope<ReviewsData>),
        (status = 400, description = "Invalid ID format", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/listing/{listing_id}")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let listing_id: ListingId = parse_id(&path.into_inner(), LISTING_ID)?;
    let reviews: Vec<ReviewBody> = state
        .reviews_query
        .list_for_listing(&listing_id)
        .await?
        .into_iter()
        .map(ReviewBody::from)
        .collect();
    let count = reviews.len();
    Ok(Envelope::data(ReviewsData { reviews }).with_count(count).ok())
}

/// Review a listing as the authenticated user.
#[utoipa::path(
    post,
    path = "/api/reviews/listing/{listingId}",
    params(("listingId" = String, Path, description = "Listing identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Envelope<ReviewData>),
        (status = 400, description = "Validation error, invalid id or repeat review", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
        (status = 404, description = "Listing not found", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "createReview",
    security(("bearer" = []))
)]
#[post("/listing/{listing_id}")]
pub async fn create_review(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let listing_id: ListingId = parse_id(&path.into_inner(), LISTING_ID)?;
    let draft = ReviewDraft::try_from_input(payload.into_inner().into())
        .map_err(validation_error)?;
    let view = state
        .reviews
        .create(principal.id(), &listing_id, draft)
        .await?;
    Ok(Envelope::with_message(
        "Review created successfully",
        ReviewData {
            review: view.into(),
        },
    )
    .created())
}

/// Update the authenticated user's own review.
#[utoipa::path(
    put,
    path = "/api/reviews/{reviewId}",
    params(("reviewId" = String, Path, description = "Review identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = Envelope<ReviewData>),
        (status = 400, description = "Validation error or invalid id", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Review not found", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "updateReview",
    security(("bearer" = []))
)]
#[put("/{review_id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let review_id: ReviewId = parse_id(&path.into_inner(), REVIEW_ID)?;
    let patch =
        ReviewPatch::try_from_input(payload.into_inner().into()).map_err(validation_error)?;
    let view = state
        .reviews
        .update(principal.id(), &review_id, patch)
        .await?;
    Ok(Envelope::with_message(
        "Review updated successfully",
        ReviewData {
            review: view.into(),
        },
    )
    .ok())
}

/// Delete the authenticated user's own review.
#[utoipa::path(
    delete,
    path = "/api/reviews/{reviewId}",
    params(("reviewId" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 400, description = "Invalid ID format", body = ErrorBody),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Review not found", body = ErrorBody)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("bearer" = []))
)]
#[delete("/{review_id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    principal: Principal,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let review_id: ReviewId = parse_id(&path.into_inner(), REVIEW_ID)?;
    state.reviews.delete(principal.id(), &review_id).await?;
    Ok(Envelope::<serde_json::Value>::message("Review deleted successfully").ok())
}

/// Mount the review routes under `/api/reviews`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reviews")
            .service(list_reviews)
            .service(create_review)
            .service(update_review)
            .service(delete_review)
            .default_service(web::to(api_not_found)),
    );
}
