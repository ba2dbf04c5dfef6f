//! Account registration, login and bearer-token resolution.
//!
//! Credential hashing runs on the blocking pool; everything else stays on the
//! request task.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountsService, PasswordHashError, PasswordHasher, TokenCodec, TokenError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccessToken, AuthSession, Error, LoginCredentials, PasswordHash, Registration, User, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const UNKNOWN_PRINCIPAL: &str = "Unauthorized. Please login to access this resource.";

/// Domain service implementing [`AccountsService`].
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    /// Create a new account service.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    fn issue_token(&self, user: &User) -> Result<AccessToken, Error> {
        self.tokens
            .issue(user.id(), self.clock.utc())
            .map_err(map_token_error)
    }

    async fn hash_password(&self, password: &str) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify_password(&self, password: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(map_hash_error)
    }
}

#[async_trait]
impl<U> AccountsService for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let password_hash = self.hash_password(registration.password()).await?;
        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.email().clone(),
            self.clock.utc(),
        );

        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "user registered");

        let token = self.issue_token(&user)?;
        Ok(AuthSession { token, user })
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(stored) = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login for unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let user = stored.user;
        if !self
            .verify_password(credentials.password(), stored.password_hash)
            .await?
        {
            warn!(user_id = %user.id(), "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.issue_token(&user)?;
        Ok(AuthSession { token, user })
    }

    async fn authenticate(&self, token: &str) -> Result<User, Error> {
        let user_id = self.tokens.verify(token).map_err(map_token_error)?;
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(UNKNOWN_PRINCIPAL))
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("{field} already exists"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Invalid | TokenError::Expired => Error::unauthorized(error.to_string()),
        TokenError::Encode { .. } => Error::internal(error.to_string()),
    }
}
