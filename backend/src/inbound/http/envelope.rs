//! JSON envelope shared by every API response.
//!
//! Success bodies look like `{"success":true,"message":"…","count":2,"data":{…}}`;
//! error bodies are rendered by [`ErrorBody`] from the domain [`Error`].

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// Successful response wrapper.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    /// Always `true` for this wrapper.
    pub success: bool,
    /// Human-readable outcome, present on mutations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items in a collection payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload without a message.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    /// Wrap a payload with an outcome message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::data(data)
        }
    }

    /// Attach a collection size.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// `200 OK` carrying this envelope.
    pub fn ok(self) -> HttpResponse {
        self.respond(StatusCode::OK)
    }

    /// `201 Created` carrying this envelope.
    pub fn created(self) -> HttpResponse {
        self.respond(StatusCode::CREATED)
    }

    fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl Envelope<Value> {
    /// Message-only body such as `Listing deleted successfully`.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data: None,
        }
    }
}

/// Failure body rendered for every [`Error`].
///
/// # Examples
/// ```
/// use wanderlust::domain::Error;
/// use wanderlust::inbound::http::envelope::ErrorBody;
///
/// let body = ErrorBody::from(&Error::validation(["Title is required"]));
/// assert!(!body.success);
/// assert_eq!(body.errors, vec!["Title is required".to_owned()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable failure category.
    pub code: ErrorCode,
    /// Human-readable summary.
    #[schema(example = "Validation error")]
    pub message: String,
    /// One line per validation problem.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Structured context for non-validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Correlation identifier echoed in the `trace-id` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl From<&Error> for ErrorBody {
    fn from(error: &Error) -> Self {
        let (errors, details) = match error.details() {
            Some(Value::Array(_)) => (
                error
                    .validation_errors()
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
                None,
            ),
            other => (Vec::new(), other.cloned()),
        };
        Self {
            success: false,
            code: error.code(),
            message: error.message().to_owned(),
            errors,
            details,
            trace_id: error.trace_id().map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Envelope serialisation checks.
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn message_only_envelope_omits_data() {
        let value = serde_json::to_value(Envelope::message("Logged out successfully"))
            .expect("serialise");
        assert_eq!(
            value,
            json!({"success": true, "message": "Logged out successfully"})
        );
    }

    #[rstest]
    fn collection_envelope_carries_count() {
        let value = serde_json::to_value(Envelope::data(json!({"reviews": []})).with_count(0))
            .expect("serialise");
        assert_eq!(
            value,
            json!({"success": true, "count": 0, "data": {"reviews": []}})
        );
    }

    #[rstest]
    fn not_found_details_are_kept_outside_errors() {
        let error = Error::not_found("Listing not found")
            .with_details(json!({"listingId": "abc"}));
        let body = ErrorBody::from(&error);
        assert!(body.errors.is_empty());
        assert_eq!(body.details, Some(json!({"listingId": "abc"})));
        assert_eq!(body.code, ErrorCode::NotFound);
    }
}
