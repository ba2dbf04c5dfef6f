//! Authentication primitives: login credentials, registrations and tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::{EmailAddress, User, UserValidationError, Username};

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// Username was missing or blank once trimmed.
    #[error("Username is required")]
    EmptyUsername,
    /// Password was blank.
    #[error("Password is required")]
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    /// Username or email failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use wanderlust::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// Every problem is reported, not only the first.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, Vec<CredentialValidationError>> {
        let normalized = username.trim();
        let mut errors = Vec::new();
        if normalized.is_empty() {
            errors.push(CredentialValidationError::EmptyUsername);
        }
        if password.is_empty() {
            errors.push(CredentialValidationError::EmptyPassword);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated sign-up request.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate all registration fields at once.
    ///
    /// # Examples
    /// ```
    /// use wanderlust::domain::Registration;
    ///
    /// let errors = Registration::try_from_parts("ab", "bad", "123").unwrap_err();
    /// assert_eq!(errors.len(), 3);
    /// ```
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, Vec<CredentialValidationError>> {
        let mut errors = Vec::new();
        let username = Username::new(username)
            .map_err(|err| errors.push(err.into()))
            .ok();
        let email = EmailAddress::new(email)
            .map_err(|err| errors.push(err.into()))
            .ok();
        if password.is_empty() {
            errors.push(CredentialValidationError::EmptyPassword);
        } else if password.chars().count() < PASSWORD_MIN {
            errors.push(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        match (username, email) {
            (Some(username), Some(email)) if errors.is_empty() => Ok(Self {
                username,
                email,
                password: Zeroizing::new(password.to_owned()),
            }),
            _ => Err(errors),
        }
    }

    /// Requested login handle.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password, wiped on drop.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One-way credential hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`PasswordHasher`](super::ports::PasswordHasher).
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// A user together with the stored credential hash, used only for login.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    /// Account the hash belongs to.
    pub user: User,
    /// Stored one-way hash.
    pub password_hash: PasswordHash,
}

/// Signed bearer token handed to clients.
#[derive(Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Result of a successful registration or login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub token: AccessToken,
    /// The authenticated account.
    pub user: User,
}
