//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Service`, `*Command`, `*Query`) are implemented by the
//! domain services and consumed by inbound adapters. Driven ports
//! (`*Repository`, [`ImageStore`], [`PasswordHasher`], [`TokenCodec`]) are
//! implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_service;
mod image_store;
mod listing_repository;
mod listings_command;
mod listings_query;
mod password_hasher;
mod review_repository;
mod reviews_command;
mod reviews_query;
mod token_codec;
mod user_repository;

#[cfg(test)]
pub use accounts_service::MockAccountsService;
pub use accounts_service::AccountsService;
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError, ImageUpload};
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingPersistenceError, ListingRepository};
#[cfg(test)]
pub use listings_command::MockListingsCommand;
pub use listings_command::{CreateListingRequest, ListingsCommand, UpdateListingRequest};
#[cfg(test)]
pub use listings_query::MockListingsQuery;
pub use listings_query::ListingsQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewPersistenceError, ReviewRepository};
#[cfg(test)]
pub use reviews_command::MockReviewsCommand;
pub use reviews_command::ReviewsCommand;
#[cfg(test)]
pub use reviews_query::MockReviewsQuery;
pub use reviews_query::ReviewsQuery;
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
