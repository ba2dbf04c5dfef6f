//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsService, ListingsCommand, ListingsQuery, ReviewsCommand, ReviewsQuery,
};

/// Default cap on a buffered image upload: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountsService>,
    pub listings: Arc<dyn ListingsCommand>,
    pub listings_query: Arc<dyn ListingsQuery>,
    pub reviews: Arc<dyn ReviewsCommand>,
    pub reviews_query: Arc<dyn ReviewsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsService>,
    pub listings: Arc<dyn ListingsCommand>,
    pub listings_query: Arc<dyn ListingsQuery>,
    pub reviews: Arc<dyn ReviewsCommand>,
    pub reviews_query: Arc<dyn ReviewsQuery>,
    /// Largest image part buffered from a multipart body.
    pub max_upload_bytes: usize,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with the default upload limit.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            listings,
            listings_query,
            reviews,
            reviews_query,
        } = ports;
        Self {
            accounts,
            listings,
            listings_query,
            reviews,
            reviews_query,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Override the multipart upload limit.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}
