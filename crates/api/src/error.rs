//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart::CartError;
use catalog::CatalogError;
use checkout::QuoteError;
use common::{ErrorKind, IdError};
use order::OrderError;
use serde::Serialize;

/// API-level error type that maps to HTTP responses.
///
/// Every service error is translated through its [`ErrorKind`], so the same
/// classification always yields the same status and code.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// A dependency is down or the request deadline passed.
    Unavailable(String),
    /// Internal server error. The message is logged, never returned.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: &'static str,
}

impl ApiError {
    /// Builds an error from a classified failure.
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::InvalidArgument => ApiError::BadRequest(message),
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::Unavailable => ApiError::Unavailable(message),
            ErrorKind::Internal => ApiError::Internal(message),
        }
    }

    /// Error for a call that did not finish within the request deadline.
    pub fn deadline_exceeded() -> Self {
        ApiError::Unavailable("deadline exceeded".to_string())
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest(_) => ErrorKind::InvalidArgument,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Unavailable(_) => ErrorKind::Unavailable,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.kind().code();

        let message = match &self {
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                "internal error"
            }
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Unavailable(msg) => {
                tracing::warn!(status = status.as_u16(), code, error = %msg, "request failed");
                msg.as_str()
            }
        };

        let body = ErrorBody {
            error: message,
            code,
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string())
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string())
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string())
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string())
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::BadRequest(format!("invalid json: {}", err.body_text()))
    }
}
