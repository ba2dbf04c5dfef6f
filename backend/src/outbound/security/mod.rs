//! Credential hashing and bearer token adapters.
//!
//! - **argon2_password_hasher**: Argon2id implementation of `PasswordHasher`
//! - **jwt_token_codec**: HS256 JWT implementation of `TokenCodec`
//! - **token_settings**: environment-driven signing configuration

mod argon2_password_hasher;
mod jwt_token_codec;
mod token_settings;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_token_codec::JwtTokenCodec;
pub use token_settings::{
    BuildMode, TokenConfigError, TokenSettings, fingerprint, token_settings_from_env,
};
