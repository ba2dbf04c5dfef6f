//! HS256 JSON Web Token implementation of the `TokenCodec` port.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{TokenCodec, TokenError};
use crate::domain::{AccessToken, UserId};

use super::token_settings::TokenSettings;

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    iss: String,
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    settings: TokenSettings,
}

impl JwtTokenCodec {
    /// Build a codec from validated settings.
    #[must_use]
    pub fn new(settings: TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(settings.secret()),
            decoding: DecodingKey::from_secret(settings.secret()),
            validation,
            settings,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, user: &UserId, now: DateTime<Utc>) -> Result<AccessToken, TokenError> {
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: (now + self.settings.ttl()).timestamp(),
            iss: self.settings.issuer().to_owned(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::encode(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(),
            }
        })?;
        UserId::parse(&data.claims.sub).map_err(|_| TokenError::invalid())
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for JWT issue and verify.
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[fixture]
    fn codec() -> JwtTokenCodec {
        JwtTokenCodec::new(TokenSettings::new(SECRET, TimeDelta::days(7), "wanderlust"))
    }

    #[rstest]
    fn issued_token_names_the_user(codec: JwtTokenCodec) {
        let user = UserId::random();
        let token = codec.issue(&user, Utc::now()).expect("issue");
        assert_eq!(codec.verify(token.as_str()).expect("verify"), user);
    }

    #[rstest]
    fn expired_token_is_rejected(codec: JwtTokenCodec) {
        let issued_at = Utc::now() - TimeDelta::days(8);
        let token = codec.issue(&UserId::random(), issued_at).expect("issue");
        assert_eq!(codec.verify(token.as_str()), Err(TokenError::Expired));
    }

    #[rstest]
    fn token_signed_with_other_secret_is_invalid(codec: JwtTokenCodec) {
        let other = JwtTokenCodec::new(TokenSettings::new(
            "ffffffffffffffffffffffffffffffff",
            TimeDelta::days(7),
            "wanderlust",
        ));
        let token = other.issue(&UserId::random(), Utc::now()).expect("issue");
        assert_eq!(codec.verify(token.as_str()), Err(TokenError::Invalid));
    }

    #[rstest]
    fn token_from_other_issuer_is_invalid(codec: JwtTokenCodec) {
        let other = JwtTokenCodec::new(TokenSettings::new(SECRET, TimeDelta::days(7), "elsewhere"));
        let token = other.issue(&UserId::random(), Utc::now()).expect("issue");
        assert_eq!(codec.verify(token.as_str()), Err(TokenError::Invalid));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn garbage_is_invalid(codec: JwtTokenCodec, #[case] token: &str) {
        assert_eq!(codec.verify(token), Err(TokenError::Invalid));
    }
}
