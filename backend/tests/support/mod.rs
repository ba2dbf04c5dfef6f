//! Shared harness for the HTTP scenario tests.
//!
//! Wires the real domain services, Argon2 hashing and JWT signing over the
//! in-memory adapters so scenarios exercise the full request path without a
//! database.

#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::TimeDelta;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use wanderlust::Trace;
use wanderlust::domain::{AccountService, ListingService, ReviewService};
use wanderlust::inbound::http::health::HealthState;
use wanderlust::inbound::http::routes;
use wanderlust::inbound::http::state::{HttpState, HttpStatePorts};
use wanderlust::inbound::http::validation::json_config;
use wanderlust::outbound::security::{Argon2PasswordHasher, JwtTokenCodec, TokenSettings};
use wanderlust::test_support::{InMemoryStore, RecordingImageStore, SteppingClock};

pub const SECRET: &str = "integration-secret-0123456789abcdef";
pub const PASSWORD: &str = "s3cret-pass";

/// Adapters backing one scenario.
pub struct World {
    pub store: Arc<InMemoryStore>,
    pub images: Arc<RecordingImageStore>,
    token_clock: Arc<dyn Clock>,
    max_upload_bytes: Option<usize>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            images: Arc::new(RecordingImageStore::new()),
            token_clock: Arc::new(DefaultClock),
            max_upload_bytes: None,
        }
    }
}

impl World {
    /// Issue tokens as if the current time were `clock`'s.
    #[must_use]
    pub fn with_token_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.token_clock = clock;
        self
    }

    #[must_use]
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = Some(limit);
        self
    }

    fn state(&self) -> HttpState {
        let tokens = JwtTokenCodec::new(TokenSettings::new(
            SECRET,
            TimeDelta::days(7),
            "wanderlust",
        ));
        let clock: Arc<dyn Clock> = Arc::new(SteppingClock::default());
        let accounts = AccountService::new(
            Arc::clone(&self.store),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(tokens),
            Arc::clone(&self.token_clock),
        );
        let listings = Arc::new(ListingService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.images),
            Arc::clone(&clock),
        ));
        let reviews = Arc::new(ReviewService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.store),
            clock,
        ));
        let state = HttpState::new(HttpStatePorts {
            accounts: Arc::new(accounts),
            listings: listings.clone(),
            listings_query: listings,
            reviews: reviews.clone(),
            reviews_query: reviews,
        });
        match self.max_upload_bytes {
            Some(limit) => state.with_max_upload_bytes(limit),
            None => state,
        }
    }

    /// Build the application the way the server does, minus CORS and files.
    pub async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
    {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        test::init_service(
            App::new()
                .app_data(health)
                .app_data(web::Data::new(self.state()))
                .app_data(json_config())
                .wrap(Trace)
                .configure(routes::configure),
        )
        .await
    }
}

/// Send a request and decode the JSON body (`Null` when empty).
pub async fn send<S, B>(app: &S, request: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    (status, body)
}

/// `Authorization: Bearer <token>` header.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// A freshly registered account.
pub struct Account {
    pub id: String,
    pub token: String,
}

/// Register `username` and return its id and token.
pub async fn register<S, B>(app: &S, username: &str) -> Account
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": PASSWORD,
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {username}: {body}");
    Account {
        id: body["data"]["user"]["id"]
            .as_str()
            .expect("user id")
            .to_owned(),
        token: body["data"]["token"].as_str().expect("token").to_owned(),
    }
}

/// Body of the beach hut listing used across scenarios.
pub fn beach_hut() -> Value {
    json!({
        "title": "Beach Hut",
        "description": "Cozy",
        "location": "Goa",
        "country": "India",
        "price": 2000,
    })
}

/// Create a listing as `token` and return its id.
pub async fn create_listing<S, B>(app: &S, token: &str, body: Value) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, response) = send(
        app,
        test::TestRequest::post()
            .uri("/api/listings")
            .insert_header(bearer(token))
            .set_json(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create listing: {response}");
    response["data"]["listing"]["id"]
        .as_str()
        .expect("listing id")
        .to_owned()
}

/// Review `listing` as `token` and return the review id.
pub async fn create_review<S, B>(
    app: &S,
    token: &str,
    listing: &str,
    rating: u8,
    comment: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, response) = send(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/reviews/listing/{listing}"))
            .insert_header(bearer(token))
            .set_json(json!({"rating": rating, "comment": comment})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create review: {response}");
    response["data"]["review"]["id"]
        .as_str()
        .expect("review id")
        .to_owned()
}
