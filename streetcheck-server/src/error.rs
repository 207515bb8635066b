//! HTTP error type for the check endpoint.
//!
//! Bodies are always `{"error": "..."}`. Store failures are logged with their
//! detail and answered with a fixed message.

use axum::Json;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use streetcheck_core::{ports::StoreError, service::MatchError};
use thiserror::Error;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Public, detail-free message.
    pub error: &'static str,
}

/// Failures surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Only `POST` is served (405).
    #[error("method not allowed")]
    MethodNotAllowed,
    /// Body or `address` field is unusable (400).
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// Body exceeds the configured limit (413).
    #[error("request body too large")]
    BodyTooLarge,
    /// Address store could not be queried (500). Detail is logged only.
    #[error("address lookup failed: {0}")]
    LookupFailed(#[source] StoreError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
            Self::InvalidAddress(_) => (StatusCode::BAD_REQUEST, "Missing or invalid address"),
            Self::BodyTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large"),
            Self::LookupFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::BodyTooLarge
        } else {
            Self::InvalidAddress(rejection.body_text())
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::InvalidInput(reason) => Self::InvalidAddress(reason),
            MatchError::LookupFailed(source) => Self::LookupFailed(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match &self {
            Self::LookupFailed(source) => {
                tracing::error!(error = %source, "address lookup failed");
            }
            Self::InvalidAddress(reason) => tracing::debug!(%reason, "rejected request"),
            Self::MethodNotAllowed | Self::BodyTooLarge => {}
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
