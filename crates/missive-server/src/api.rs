//! Error type shared by the HTTP handlers.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use missive_messages::MessageError;
use thiserror::Error;

/// Methods served on `/messages`, advertised on 405 responses.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

/// API error type mapping to HTTP status codes.
///
/// Client errors carry fixed text. `Internal` carries the underlying error
/// text verbatim, and that text is what the caller receives.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to read request body")]
    UnreadableBody,
    #[error("failed to parse request body")]
    MalformedBody,
    #[error("invalid id")]
    InvalidId,
    #[error("method not supported")]
    MethodNotAllowed,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnreadableBody | ApiError::MalformedBody | ApiError::InvalidId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MessageError> for ApiError {
    fn from(e: MessageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(e: r2d2::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let ApiError::Internal(ref message) = self {
            tracing::error!(error = %message, "message request failed");
        }

        let mut response = (status, self.to_string()).into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        response
    }
}
