//! Bearer token configuration parsing and validation.
//!
//! Centralises the environment-driven signing settings so they are validated
//! consistently and can be tested in isolation with [`mockable::MockEnv`].

use std::path::PathBuf;

use chrono::TimeDelta;
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

pub mod fingerprint;

const SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";
const SECRET_ENV: &str = "JWT_SECRET";
const EXPIRES_IN_DAYS_ENV: &str = "JWT_EXPIRES_IN_DAYS";
const ISSUER_ENV: &str = "JWT_ISSUER";
const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;
const DEFAULT_EXPIRES_IN_DAYS: i64 = 7;
const DEFAULT_ISSUER: &str = "wanderlust";
const DAYS_EXPECTED: &str = "a whole number of days >= 1";

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing secrets and emit warnings.
    Debug,
    /// Release builds require an explicit, long enough secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wanderlust::outbound::security::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Signing secret, lifetime and issuer for bearer tokens.
pub struct TokenSettings {
    secret: Zeroizing<Vec<u8>>,
    ttl: TimeDelta,
    issuer: String,
}

impl TokenSettings {
    /// Assemble settings directly, bypassing the environment.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>, ttl: TimeDelta, issuer: impl Into<String>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            ttl,
            issuer: issuer.into(),
        }
    }

    /// HMAC key material.
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// How long an issued token stays valid.
    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Value of the `iss` claim.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Truncated digest of the secret, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        fingerprint::secret_fingerprint(self.secret())
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for release builds.
    #[error("token secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    /// The operating system random source failed.
    #[error("failed to generate ephemeral token secret: {message}")]
    Entropy { message: String },
}

/// Build token settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use wanderlust::outbound::security::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_string()),
///     "JWT_EXPIRES_IN_DAYS" => Some("3".to_string()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.ttl().num_days(), 3);
/// assert_eq!(settings.issuer(), "wanderlust");
/// # Ok(())
/// # }
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let secret = secret_from_env(env, mode)?;
    let ttl = ttl_from_env(env, mode)?;
    let issuer = env
        .string(ISSUER_ENV)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_ISSUER.to_owned());

    Ok(TokenSettings {
        secret,
        ttl,
        issuer,
    })
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    let secret = match env.string(SECRET_FILE_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            let mut bytes = Zeroizing::new(
                std::fs::read(&path)
                    .map_err(|source| TokenConfigError::SecretRead { path, source })?,
            );
            while bytes.last().is_some_and(u8::is_ascii_whitespace) {
                bytes.pop();
            }
            bytes
        }
        None => match env.string(SECRET_ENV).filter(|value| !value.is_empty()) {
            Some(value) => Zeroizing::new(value.into_bytes()),
            None => {
                if !mode.is_debug() {
                    return Err(TokenConfigError::MissingEnv { name: SECRET_ENV });
                }
                warn!("JWT_SECRET not set; using temporary token secret (dev only)");
                return ephemeral_secret();
            }
        },
    };

    let length = secret.len();
    if length < SECRET_MIN_LEN {
        if !mode.is_debug() {
            return Err(TokenConfigError::SecretTooShort {
                length,
                min_len: SECRET_MIN_LEN,
            });
        }
        warn!(length, min_len = SECRET_MIN_LEN, "token secret is shorter than recommended");
    }
    Ok(secret)
}

fn ephemeral_secret() -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
    getrandom::getrandom(bytes.as_mut_slice()).map_err(|err| TokenConfigError::Entropy {
        message: err.to_string(),
    })?;
    Ok(bytes)
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<TimeDelta, TokenConfigError> {
    let Some(value) = env.string(EXPIRES_IN_DAYS_ENV) else {
        return Ok(TimeDelta::days(DEFAULT_EXPIRES_IN_DAYS));
    };
    match value.trim().parse::<i64>() {
        Ok(days) if (1..=365).contains(&days) => Ok(TimeDelta::days(days)),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid JWT_EXPIRES_IN_DAYS; using default");
            Ok(TimeDelta::days(DEFAULT_EXPIRES_IN_DAYS))
        }
        _ => Err(TokenConfigError::InvalidEnv {
            name: EXPIRES_IN_DAYS_ENV,
            value,
            expected: DAYS_EXPECTED,
        }),
    }
}
