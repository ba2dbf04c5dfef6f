//! WanderLust backend: accommodation listings and guest reviews behind a
//! bearer-token REST API.
//!
//! The crate follows a hexagonal layout. [`domain`] owns the entities, the
//! ports and the services enforcing ownership and uniqueness rules;
//! [`inbound`] adapts HTTP requests onto the driving ports; [`outbound`]
//! provides PostgreSQL, credential and image storage adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
