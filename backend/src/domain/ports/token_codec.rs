//! Port for issuing and verifying bearer tokens.
use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised while encoding or decoding bearer tokens.
    pub enum TokenError {
        /// Signature, structure or claims are not acceptable.
        Invalid => "Invalid token",
        /// The token is well formed but past its expiry.
        Expired => "Token expired",
        /// Signing a new token failed.
        Encode { message: String } => "token encoding failed: {message}",
    }
}

/// Signed, expiring bearer tokens naming a user.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Issue a token for `user`, valid from `now`.
    fn issue(&self, user: &UserId, now: DateTime<Utc>) -> Result<AccessToken, TokenError>;

    /// Verify a presented token and return the user it names.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
