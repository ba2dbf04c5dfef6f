//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary for external tooling.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ListingImage, UserProfile, UserSummary};
use crate::inbound::http::envelope::ErrorBody;
use crate::inbound::http::health::ServerStatus;
use crate::inbound::http::listing_form::{ImagePayload, ListingPayload};
use crate::inbound::http::listings::{
    ListingData, ListingDetailBody, ListingFields, ListingSummaryBody, ListingsData,
};
use crate::inbound::http::reviews::{ReviewBody, ReviewData, ReviewRequest, ReviewsData};
use crate::inbound::http::users::{AuthPayload, CurrentUser, LoginRequest, RegisterRequest};

/// Register the bearer JWT security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_owned());
        bearer.description = Some("Token issued by POST /api/auth/register or /api/auth/login.".to_owned());
        components.add_security_scheme("bearer", SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "WanderLust API",
        description = "Accommodation listings and guest reviews with bearer-token authentication."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::me,
        crate::inbound::http::users::logout,
        crate::inbound::http::listings::list_listings,
        crate::inbound::http::listings::get_listing,
        crate::inbound::http::listings::create_listing,
        crate::inbound::http::listings::update_listing,
        crate::inbound::http::listings::delete_listing,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        RegisterRequest,
        LoginRequest,
        AuthPayload,
        CurrentUser,
        UserProfile,
        UserSummary,
        ListingPayload,
        ImagePayload,
        ListingImage,
        ListingFields,
        ListingSummaryBody,
        ListingDetailBody,
        ListingsData,
        ListingData,
        ReviewRequest,
        ReviewBody,
        ReviewsData,
        ReviewData,
        ServerStatus,
    )),
    tags(
        (name = "auth", description = "Registration, login and the current user"),
        (name = "listings", description = "Accommodation listings"),
        (name = "reviews", description = "Guest reviews of listings"),
        (name = "health", description = "Status and orchestration probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::openapi::security::SecurityScheme;

    use super::*;

    #[rstest]
    #[case("/api/auth/register")]
    #[case("/api/listings")]
    #[case("/api/listings/{id}")]
    #[case("/api/reviews/listing/{listingId}")]
    #[case("/api/reviews/{reviewId}")]
    #[case("/api/health")]
    fn document_lists_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(matches!(
            components.security_schemes.get("bearer"),
            Some(SecurityScheme::Http(_))
        ));
    }

    #[rstest]
    #[case("ErrorBody", "traceId")]
    #[case("ListingPayload", "price")]
    #[case("ReviewBody", "rating")]
    fn schema_exposes_field(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("serialise document");
        assert!(
            json["components"]["schemas"][schema]["properties"]
                .get(field)
                .is_some(),
            "{schema} lacks {field}"
        );
    }
}
