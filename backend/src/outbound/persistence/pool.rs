//! Shared `bb8` pool of async PostgreSQL connections.
//!
//! Repositories hold a clone each. A failed checkout is reported as a
//! connection error by every adapter so the API answers 503.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use crate::domain::ports::define_port_error;

/// How long a request waits for a free connection.
pub const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

define_port_error! {
    /// Raised while building the pool or borrowing from it.
    pub enum PoolError {
        /// No connection became free within [`CHECKOUT_TIMEOUT`].
        Checkout { message: String } => "database checkout failed: {message}",
        /// The pool could not be created from the configured URL.
        Build { message: String } => "database pool setup failed: {message}",
    }
}

/// Where to connect and how many connections to keep open.
///
/// ```
/// use wanderlust::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://wanderlust@localhost/wanderlust").with_max_size(4);
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
}

impl PoolConfig {
    /// Ten connections to `database_url`.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
        }
    }

    /// Cap the number of open connections; zero is raised to one.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Cloneable handle on the connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool. Connections are opened lazily on first checkout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when `bb8` rejects the configuration.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);
        Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(|err| PoolError::build(err.to_string()))
    }

    /// Borrow a connection for one unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when the database is unreachable or
    /// the pool stays exhausted past [`CHECKOUT_TIMEOUT`].
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
