//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that require a principal take [`Principal`] as an argument; the
//! extractor reads `Authorization: Bearer <token>` and resolves it through
//! [`AccountsService::authenticate`](crate::domain::ports::AccountsService).

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::{Error, User, UserId};

use super::state::HttpState;

const MISSING_TOKEN: &str = "Unauthorized. Please login to access this resource.";
const BEARER_SCHEME: &str = "bearer";

/// The authenticated account behind the request.
#[derive(Debug, Clone)]
pub struct Principal(pub User);

impl Principal {
    /// Identifier of the authenticated user.
    #[must_use]
    pub fn id(&self) -> &UserId {
        self.0.id()
    }

    /// Unwrap the account.
    #[must_use]
    pub fn into_user(self) -> User {
        self.0
    }
}

/// Pull the token out of an `Authorization` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}

impl FromRequest for Principal {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_owned);
        let state = req.app_data::<web::Data<HttpState>>().cloned();

        Box::pin(async move {
            let token = token.ok_or_else(|| Error::unauthorized(MISSING_TOKEN))?;
            let state = state.ok_or_else(|| {
                error!("HttpState missing from application data");
                Error::internal("HTTP state is not configured")
            })?;
            state.accounts.authenticate(&token).await.map(Principal)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Extractor behaviour against a mocked accounts service.
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::MockAccountsService;
    use crate::domain::{EmailAddress, Username};
    use crate::inbound::http::test_utils::state_with_accounts;

    fn account() -> User {
        User::new(
            UserId::random(),
            Username::new("wanderer").expect("username"),
            EmailAddress::new("wanderer@example.com").expect("email"),
            Utc::now(),
        )
    }

    async fn whoami(principal: Principal) -> HttpResponse {
        HttpResponse::Ok().body(principal.id().to_string())
    }

    #[rstest]
    #[case("Bearer abc.def", Some("abc.def"))]
    #[case("bearer   abc.def  ", Some("abc.def"))]
    #[case("Basic abc", None)]
    #[case("Bearer ", None)]
    #[case("abc.def", None)]
    fn bearer_token_parsing(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn resolves_principal_from_token() {
        let user = account();
        let expected = user.id().to_string();
        let mut accounts = MockAccountsService::new();
        accounts
            .expect_authenticate()
            .withf(|token| token == "good-token")
            .times(1)
            .return_once(move |_| Ok(user));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_accounts(Arc::new(accounts))))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, "Bearer good-token"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        assert_eq!(body, expected.as_bytes());
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let mut accounts = MockAccountsService::new();
        accounts.expect_authenticate().never();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_accounts(Arc::new(accounts))))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/me").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["message"], MISSING_TOKEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn rejected_token_keeps_service_message() {
        let mut accounts = MockAccountsService::new();
        accounts
            .expect_authenticate()
            .return_once(|_| Err(Error::unauthorized("Token expired")));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_accounts(Arc::new(accounts))))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, "Bearer stale"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "Token expired");
    }
}
