//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user, listing and review repository ports
//! backed by PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel rows and domain types. Ownership and uniqueness rules live in the
//!   domain services; the schema backs them with constraints.
//! - **Internal models**: Row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel failures are classified once in
//!   `diesel_helpers` and mapped to each port's error enum.
//!
//! # Example
//!
//! ```rust,no_run
//! use wanderlust::outbound::persistence::{
//!     DbPool, DieselListingRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/wanderlust";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let listings = DieselListingRepository::new(pool);
//! # let _ = listings;
//! # Ok(())
//! # }
//! ```

pub(crate) mod diesel_helpers;
mod diesel_listing_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
