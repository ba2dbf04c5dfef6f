//! Route table for the REST API.

use actix_web::{HttpResponse, web};

use crate::domain::Error;
use crate::inbound::http::{ApiResult, health, listings, reviews, users};

/// Fallback for any `/api` path no handler claims.
pub async fn api_not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("API endpoint not found"))
}

/// Mount every API scope plus the JSON 404 fallback for `/api`.
///
/// Handlers expect `web::Data<HttpState>` and, for the probes,
/// `web::Data<HealthState>` to be registered on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure)
        .configure(users::configure)
        .configure(listings::configure)
        .configure(reviews::configure)
        .service(web::scope("/api").default_service(web::to(api_not_found)));
}
