//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities for accounts, listings and
//! reviews, the ports through which adapters reach them, and the services
//! that enforce validation, ownership and uniqueness rules. Nothing in this
//! module knows about HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Listing, Review: aggregates with validated constructors.
//! - AccountService, ListingService, ReviewService: driving port
//!   implementations wired by the server.

pub mod accounts_service;
pub mod auth;
pub mod authorization;
pub mod error;
pub mod ids;
pub mod listing;
pub mod listing_service;
pub mod ports;
pub mod review;
pub mod review_service;
pub mod trace_id;
pub mod user;

pub use self::accounts_service::AccountService;
pub use self::auth::{
    AccessToken, AuthSession, CredentialValidationError, LoginCredentials, PASSWORD_MIN,
    PasswordHash, Registration, StoredCredentials,
};
pub use self::authorization::{Action, Controlled, Named, authorize, is_controller};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{IdParseError, ListingId, ReviewId, UserId};
pub use self::listing::{
    DEFAULT_IMAGE_FILENAME, DEFAULT_IMAGE_URL, ImageInput, Listing, ListingDetail,
    ListingDraft, ListingField, ListingFieldsInput, ListingImage, ListingPatch, ListingRecord,
    ListingSummary, ListingValidationError, Price, PriceInput,
};
pub use self::listing_service::ListingService;
pub use self::review::{
    RATING_MAX, RATING_MIN, Rating, RatingInput, Review, ReviewDraft, ReviewFieldsInput,
    ReviewPatch, ReviewRecord, ReviewValidationError, ReviewView,
};
pub use self::review_service::ReviewService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, USERNAME_MAX, USERNAME_MIN, User, UserProfile, UserSummary,
    UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use wanderlust::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
