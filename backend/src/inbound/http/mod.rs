//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod listing_form;
pub mod listings;
pub mod reviews;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
