//! Account API handlers.
//!
//! ```text
//! POST /api/auth/register {"username":"wanderer","email":"w@example.com","password":"secret1"}
//! POST /api/auth/login {"username":"wanderer","password":"secret1"}
//! GET /api/auth/me
//! POST /api/auth/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{AuthSession, LoginCredentials, Registration, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Principal;
use crate::inbound::http::envelope::{Envelope, ErrorBody};
use crate::inbound::http::routes::api_not_found;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::validation_error;

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[schema(example = "wanderer")]
    pub username: String,
    #[schema(example = "wanderer@example.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
}

/// Login request body for `POST /api/auth/login`.
///
/// Example JSON:
/// `{"username":"wanderer","password":"secret1"}`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token and account returned by register and login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthPayload {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub user: UserProfile,
}

impl From<AuthSession> for AuthPayload {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token.as_str().to_owned(),
            user: UserProfile::from(&session.user),
        }
    }
}

/// Current account wrapper for `GET /api/auth/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    pub user: UserProfile,
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = Envelope<AuthPayload>),
        (status = 400, description = "Validation error or duplicate username/email", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(&username, &email, &password).map_err(validation_error)?;
    let session = state.accounts.register(registration).await?;
    Ok(Envelope::with_message("User registered successfully", AuthPayload::from(session)).created())
}

/// Verify credentials and issue a token.
///
/// Unknown usernames and wrong passwords produce the same `401` so clients
/// cannot probe for accounts.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = Envelope<AuthPayload>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&username, &password).map_err(validation_error)?;
    let session = state.accounts.login(credentials).await?;
    Ok(Envelope::with_message("Login successful", AuthPayload::from(session)).ok())
}

/// Return the account behind the bearer token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = Envelope<CurrentUser>),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "currentUser",
    security(("bearer" = []))
)]
#[get("/me")]
pub async fn me(principal: Principal) -> ApiResult<HttpResponse> {
    let user = principal.into_user();
    Ok(Envelope::data(CurrentUser {
        user: UserProfile::from(&user),
    })
    .ok())
}

/// Acknowledge a logout. Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security(("bearer" = []))
)]
#[post("/logout")]
pub async fn logout(principal: Principal) -> ApiResult<HttpResponse> {
    debug!(user_id = %principal.id(), "logout acknowledged");
    Ok(Envelope::<serde_json::Value>::message("Logged out successfully").ok())
}

/// Mount the account routes under `/api/auth`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(register)
            .service(login)
            .service(me)
            .service(logout)
            .default_service(web::to(api_not_found)),
    );
}
