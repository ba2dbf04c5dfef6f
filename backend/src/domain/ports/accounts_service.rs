//! Driving port for registration, login and principal resolution.
use async_trait::async_trait;

use crate::domain::{AuthSession, Error, LoginCredentials, Registration, User};

/// Identity operations consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Create an account and issue its first token.
    ///
    /// # Errors
    ///
    /// Returns a conflict when the username or email is already registered.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` for unknown users and wrong passwords alike.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Resolve a presented bearer token to the principal's account.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` for invalid or expired tokens and for tokens
    /// naming a user that no longer exists.
    async fn authenticate(&self, token: &str) -> Result<User, Error>;
}
