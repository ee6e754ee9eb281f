use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::food::error::{MalformedReason, SuggestionError};

#[derive(Serialize, Debug, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<Value>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            raw: None,
            received: None,
        }
    }

    fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// A suggestion failure on its way out of the HTTP boundary.
#[derive(Debug)]
pub struct ApiError {
    error: SuggestionError,
    received: Option<Value>,
}

impl ApiError {
    /// Attaches the client input echoed back on validation failures.
    pub fn with_received(mut self, received: Value) -> Self {
        self.received = Some(received);
        self
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            SuggestionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SuggestionError::MalformedResponse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            SuggestionError::NoResults => StatusCode::UNPROCESSABLE_ENTITY,
            SuggestionError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SuggestionError::UpstreamAuthFailed => StatusCode::INTERNAL_SERVER_ERROR,
            SuggestionError::UpstreamRateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            SuggestionError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match &self.error {
            SuggestionError::InvalidInput(input) => ErrorBody {
                received: Some(self.received.clone().unwrap_or(Value::Null)),
                ..ErrorBody::new(input.to_string())
            },
            SuggestionError::MalformedResponse { reason, raw_preview } => {
                let error = match reason {
                    MalformedReason::NoArrayDelimiters => "No valid JSON array found in AI response",
                    MalformedReason::InvalidJson => "Invalid JSON in AI response",
                    MalformedReason::NotAnArray => "AI response is not a JSON array",
                };
                ErrorBody {
                    raw: Some(raw_preview.clone()),
                    ..ErrorBody::new(error).details(reason.to_string())
                }
            }
            SuggestionError::NoResults => ErrorBody::new("No valid recipes were generated")
                .details("Try different ingredients or another meal type"),
            SuggestionError::UpstreamUnavailable(cause) => {
                ErrorBody::new("Unable to connect to the AI service").details(cause.clone())
            }
            SuggestionError::UpstreamAuthFailed => {
                ErrorBody::new("AI service is misconfigured, please try again later")
            }
            SuggestionError::UpstreamRateLimited { .. } => ErrorBody::new("AI service is busy")
                .details("Too many requests, please wait a moment before trying again"),
            SuggestionError::Upstream(cause) => {
                ErrorBody::new("AI service request failed").details(cause.clone())
            }
        }
    }
}

impl From<SuggestionError> for ApiError {
    fn from(error: SuggestionError) -> Self {
        Self {
            error,
            received: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), Json(self.body())).into_response();

        if let SuggestionError::UpstreamRateLimited {
            retry_after_secs: Some(secs),
        } = self.error
        {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
