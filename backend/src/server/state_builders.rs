//! Builders that wire outbound adapters into the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock, DefaultEnv};
use tracing::info;

use wanderlust::domain::ports::{ImageStore, ListingRepository, ReviewRepository, UserRepository};
use wanderlust::domain::{AccountService, ListingService, ReviewService};
use wanderlust::inbound::http::state::{HttpState, HttpStatePorts};
use wanderlust::outbound::persistence::{
    DbPool, DieselListingRepository, DieselReviewRepository, DieselUserRepository,
};
use wanderlust::outbound::security::{
    Argon2PasswordHasher, BuildMode, JwtTokenCodec, TokenConfigError, token_settings_from_env,
};
use wanderlust::outbound::storage::{LocalImageStore, LocalImageStoreConfig};

use super::AppConfig;

/// Adapters shared by every driving port.
struct Adapters<U, L, R, I> {
    users: Arc<U>,
    listings: Arc<L>,
    reviews: Arc<R>,
    images: Arc<I>,
    clock: Arc<dyn Clock>,
}

/// Compose the domain services over the given adapters.
fn wire_ports<U, L, R, I>(
    adapters: Adapters<U, L, R, I>,
    tokens: JwtTokenCodec,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    L: ListingRepository + 'static,
    R: ReviewRepository + 'static,
    I: ImageStore + 'static,
{
    let Adapters {
        users,
        listings,
        reviews,
        images,
        clock,
    } = adapters;
    let accounts = AccountService::new(
        users,
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(tokens),
        Arc::clone(&clock),
    );
    let listing_service = Arc::new(ListingService::new(
        Arc::clone(&listings),
        images,
        Arc::clone(&clock),
    ));
    let review_service = Arc::new(ReviewService::new(reviews, listings, clock));
    HttpStatePorts {
        accounts: Arc::new(accounts),
        listings: listing_service.clone(),
        listings_query: listing_service,
        reviews: review_service.clone(),
        reviews_query: review_service,
    }
}

/// Load the signing settings and build the token codec.
///
/// # Errors
///
/// Returns [`TokenConfigError`] when the secret or TTL is unusable in the
/// current build mode.
pub fn build_token_codec() -> Result<JwtTokenCodec, TokenConfigError> {
    let settings = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())?;
    info!(
        fingerprint = %settings.fingerprint(),
        issuer = %settings.issuer(),
        ttl_days = settings.ttl().num_days(),
        "token signing configured"
    );
    Ok(JwtTokenCodec::new(settings))
}

/// Build the image store described by the configuration.
pub async fn build_image_store(
    config: &AppConfig,
) -> Result<LocalImageStore, wanderlust::domain::ports::ImageStoreError> {
    LocalImageStore::new(LocalImageStoreConfig {
        root: config.upload_dir(),
        folder: config.upload_folder().to_owned(),
        public_base_url: config.public_base_url(),
        max_bytes: config.max_upload_bytes(),
    })
    .await
}

/// Wire the PostgreSQL-backed services into handler state.
pub fn build_http_state(
    config: &AppConfig,
    pool: &DbPool,
    images: LocalImageStore,
    tokens: JwtTokenCodec,
) -> HttpState {
    let adapters = Adapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        listings: Arc::new(DieselListingRepository::new(pool.clone())),
        reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
        images: Arc::new(images),
        clock: Arc::new(DefaultClock),
    };
    HttpState::new(wire_ports(adapters, tokens)).with_max_upload_bytes(config.max_upload_bytes())
}
