//! Shared validation helpers for inbound HTTP adapters.

use std::fmt::Display;
use std::str::FromStr;

use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::{Error, IdParseError};

/// Message returned for identifiers that are not UUIDs.
pub(crate) const INVALID_ID_MESSAGE: &str = "Invalid ID format";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidId,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn invalid_id_error(field: FieldName, value: &str) -> Error {
    Error::invalid_request(INVALID_ID_MESSAGE).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": ErrorCode::InvalidId.as_str(),
    }))
}

/// Parse an entity identifier taken from the request path.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdParseError>,
{
    value.parse().map_err(|_| invalid_id_error(field, value))
}

/// Convert collected domain validation problems into one error.
pub(crate) fn validation_error<E: Display>(problems: Vec<E>) -> Error {
    Error::validation(problems.iter().map(ToString::to_string))
}

pub(crate) fn malformed_body_error(reason: impl Display) -> Error {
    debug!(%reason, "request body rejected");
    Error::invalid_request("Invalid request body").with_details(json!({
        "reason": reason.to_string(),
        "code": ErrorCode::MalformedBody.as_str(),
    }))
}

/// JSON extractor configuration rendering parse failures as envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| malformed_body_error(err).into())
}
